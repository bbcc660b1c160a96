//! Country records and the in-memory dataset
//!
//! These structures are platform-agnostic (no WASM deps) and shared
//! between the CLI and dashboard.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

/// One country's per-capita COVID and development statistics.
///
/// Numeric fields that failed to parse hold `f64::NAN`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CountryRecord {
    pub country: String,
    /// Total deaths per million
    pub deaths: f64,
    /// GDP per capita
    pub gdp: f64,
    /// Human development index
    pub hdi: f64,
    /// Median age
    pub age: f64,
}

impl CountryRecord {
    /// Value of the given comparison metric
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Gdp => self.gdp,
            Metric::Hdi => self.hdi,
            Metric::Age => self.age,
        }
    }

    /// Whether the death rate is usable for plotting
    pub fn has_deaths(&self) -> bool {
        is_present(self.deaths)
    }

    /// Whether both the death rate and `metric` are usable for plotting
    pub fn has_metric(&self, metric: Metric) -> bool {
        self.has_deaths() && is_present(self.metric(metric))
    }

    /// Take each present field of a later row for the same country
    fn merge_latest(&mut self, later: &CountryRecord) {
        for (field, value) in [
            (&mut self.deaths, later.deaths),
            (&mut self.gdp, later.gdp),
            (&mut self.hdi, later.hdi),
            (&mut self.age, later.age),
        ] {
            if is_present(value) {
                *field = value;
            }
        }
    }
}

/// A value is present when it is finite and non-zero.
///
/// Zero counts as missing: the source data uses empty cells and zeros
/// interchangeably for countries that did not report.
pub fn is_present(value: f64) -> bool {
    value.is_finite() && value != 0.0
}

/// Metric plotted against the death rate in the scatter scenes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Gdp,
    Hdi,
    Age,
}

impl Metric {
    pub const ALL: &'static [Metric] = &[Metric::Gdp, Metric::Hdi, Metric::Age];

    /// Short selector key
    pub fn key(self) -> &'static str {
        match self {
            Metric::Gdp => "gdp",
            Metric::Hdi => "hdi",
            Metric::Age => "age",
        }
    }

    /// Axis label
    pub fn label(self) -> &'static str {
        match self {
            Metric::Gdp => "GDP per Capita ($)",
            Metric::Hdi => "Human Development Index",
            Metric::Age => "Median Age",
        }
    }

    pub fn from_key(key: &str) -> Option<Metric> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.key().eq_ignore_ascii_case(key.trim()))
    }
}

/// All records loaded for the session. Read-only after load.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    records: Vec<CountryRecord>,
}

impl Dataset {
    pub fn new(records: Vec<CountryRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Collapse to one row per country holding the latest present value
    /// of each field.
    ///
    /// Later rows overwrite a field only when their value is present, so a
    /// trailing row with blank cells does not erase earlier data. Countries
    /// keep the position of their first appearance.
    pub fn latest_per_country(&self) -> Dataset {
        let mut slot: HashMap<&str, usize> = HashMap::new();
        let mut records: Vec<CountryRecord> = Vec::new();

        for record in &self.records {
            match slot.get(record.country.as_str()) {
                Some(&idx) => records[idx].merge_latest(record),
                None => {
                    slot.insert(record.country.as_str(), records.len());
                    records.push(record.clone());
                }
            }
        }

        debug!(rows = self.records.len(), countries = records.len(), "Deduplicated dataset");
        Dataset { records }
    }

    /// Unique country names, sorted alphabetically
    pub fn country_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records.iter().map(|r| r.country.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Records with a usable death rate, sorted by death rate descending.
    ///
    /// The sort is stable so ties keep dataset order.
    pub fn by_deaths_desc(&self) -> Vec<&CountryRecord> {
        let mut rows: Vec<&CountryRecord> =
            self.records.iter().filter(|r| r.has_deaths()).collect();
        rows.sort_by(|a, b| b.deaths.total_cmp(&a.deaths));
        rows
    }

    /// Records with a usable death rate and `metric`, in dataset order
    pub fn plottable(&self, metric: Metric) -> Vec<&CountryRecord> {
        self.records.iter().filter(|r| r.has_metric(metric)).collect()
    }

    /// Last record with the given country name
    pub fn find(&self, country: &str) -> Option<&CountryRecord> {
        self.records.iter().rev().find(|r| r.country == country)
    }
}

impl FromIterator<CountryRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = CountryRecord>>(iter: I) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
pub(crate) fn record(country: &str, deaths: f64, gdp: f64, hdi: f64, age: f64) -> CountryRecord {
    CountryRecord {
        country: country.to_string(),
        deaths,
        gdp,
        hdi,
        age,
    }
}
