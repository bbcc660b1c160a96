//! Linear and band scales mapping data values to pixel positions
//!
//! Behaviour matches the d3 scales the slideshow was designed around:
//! `nice()` rounds the domain outward to tick boundaries, ticks land on
//! 1/2/5 multiples of a power of ten, and bands share one step with equal
//! inner and outer padding.

use serde::Serialize;

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Default number of ticks requested for axes
pub const DEFAULT_TICKS: usize = 10;

/// Continuous scale: `domain` maps linearly onto `range`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LinearScale {
    pub domain: [f64; 2],
    pub range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    /// Scale over the min/max of `values`, or `[0, 1]` when empty
    pub fn from_extent(values: impl IntoIterator<Item = f64>, range: [f64; 2]) -> Self {
        Self::new(extent(values).unwrap_or([0.0, 1.0]), range)
    }

    /// Map a domain value to the range.
    ///
    /// A collapsed domain maps everything to the middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (value - d0) / span };
        r0 + t * (r1 - r0)
    }

    /// Map a range value back into the domain
    pub fn invert(&self, pixel: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = r1 - r0;
        if span == 0.0 {
            return (d0 + d1) / 2.0;
        }
        d0 + (pixel - r0) / span * (d1 - d0)
    }

    /// Extend the domain outward to round tick boundaries
    pub fn nice(mut self, count: usize) -> Self {
        let reversed = self.domain[1] < self.domain[0];
        let (mut start, mut stop) = if reversed {
            (self.domain[1], self.domain[0])
        } else {
            (self.domain[0], self.domain[1])
        };

        // The domain only changes once the step stops moving.
        let mut prestep: Option<f64> = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count as f64);
            if prestep == Some(step) {
                self.domain = if reversed { [stop, start] } else { [start, stop] };
                break;
            } else if !step.is_finite() || step == 0.0 {
                break;
            } else if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            }
            prestep = Some(step);
        }
        self
    }

    /// Tick values inside the domain
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain[0], self.domain[1], count as f64)
    }

    /// Tick step used for `count` ticks, as a positive size
    pub fn tick_step(&self, count: usize) -> f64 {
        let [d0, d1] = self.domain;
        tick_step(d0.min(d1), d0.max(d1), count as f64)
    }

    /// Format a tick label with the precision implied by the tick step
    pub fn tick_format(&self, count: usize, value: f64) -> String {
        format_with_step(value, self.tick_step(count))
    }

    /// Whether `value` lies inside the domain (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        let lo = self.domain[0].min(self.domain[1]);
        let hi = self.domain[0].max(self.domain[1]);
        value >= lo && value <= hi
    }
}

/// Min and max of the non-NaN values
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<[f64; 2]> {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some([v, v]),
            Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
        })
}

/// Signed tick increment: positive steps are multipliers, negative steps
/// are inverted divisors (to avoid floating-point drift for small steps).
fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    let inc = tick_increment(start, stop, count);
    if inc < 0.0 { -1.0 / inc } else { inc }
}

/// (first index, last index, increment) with the same sign convention as
/// `tick_increment`
fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(f64, f64, f64)> {
    let inc = tick_increment(start, stop, count);
    if !inc.is_finite() || inc == 0.0 {
        return None;
    }
    let (mut i1, mut i2) = if inc < 0.0 {
        ((start * -inc).round(), (stop * -inc).round())
    } else {
        ((start / inc).round(), (stop / inc).round())
    };
    let at = |i: f64| if inc < 0.0 { i / -inc } else { i * inc };
    if at(i1) < start {
        i1 += 1.0;
    }
    if at(i2) > stop {
        i2 -= 1.0;
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    Some((i1, i2, inc))
}

fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if count <= 0.0 || start.is_nan() || stop.is_nan() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let Some((i1, i2, inc)) = tick_spec(lo, hi, count) else {
        return Vec::new();
    };
    if i2 < i1 {
        return Vec::new();
    }

    let n = (i2 - i1 + 1.0) as usize;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 { k / -inc } else { k * inc }
        })
        .collect();
    if reverse {
        out.reverse();
    }
    out
}

/// Fixed-point format with thousands separators; decimals follow `step`.
pub fn format_with_step(value: f64, step: f64) -> String {
    let decimals = if step.is_finite() && step > 0.0 {
        decimals_for_step(step)
    } else {
        0
    };
    group_thousands(&format!("{:.*}", decimals, value))
}

/// Smallest number of decimals that represents multiples of `step` exactly
fn decimals_for_step(step: f64) -> usize {
    (0..15)
        .find(|&d| {
            let scaled = step * 10f64.powi(d as i32);
            (scaled - scaled.round()).abs() <= 1e-9 * scaled.abs().max(1.0)
        })
        .unwrap_or(15)
}

/// Insert `,` separators into the integer part of a formatted number
pub fn group_thousands(formatted: &str) -> String {
    let (sign, body) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match body.find('.') {
        Some(idx) => body.split_at(idx),
        None => (body, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}{}", sign, grouped, frac_part)
}

/// Categorical scale dividing a pixel range into equal bands.
///
/// Bands are addressed by index, so repeated labels still get their own band.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BandScale {
    pub labels: Vec<String>,
    pub range: [f64; 2],
    pub padding: f64,
    step: f64,
    start: f64,
}

impl BandScale {
    /// Band scale with equal inner and outer `padding` and centred alignment
    pub fn new(labels: Vec<String>, range: [f64; 2], padding: f64) -> Self {
        let n = labels.len() as f64;
        let [r0, r1] = range;
        let (lo, hi) = if r1 < r0 { (r1, r0) } else { (r0, r1) };
        let step = (hi - lo) / (n - padding + 2.0 * padding).max(1.0);
        let start = lo + ((hi - lo) - step * (n - padding)) * 0.5;
        Self {
            labels,
            range,
            padding,
            step,
            start,
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn bandwidth(&self) -> f64 {
        self.step * (1.0 - self.padding)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Start of the band at `index`; reversed ranges count from the far end
    pub fn position(&self, index: usize) -> Option<f64> {
        if index >= self.labels.len() {
            return None;
        }
        let slot = if self.range[1] < self.range[0] {
            self.labels.len() - 1 - index
        } else {
            index
        };
        Some(self.start + self.step * slot as f64)
    }

    /// Centre of the band at `index`
    pub fn center(&self, index: usize) -> Option<f64> {
        self.position(index).map(|p| p + self.bandwidth() / 2.0)
    }
}
