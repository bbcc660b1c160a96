//! SVG export of scene views
//!
//! Produces standalone documents: marks, bottom/left axes with ticks,
//! axis titles, annotation callouts and, for the explorer, the statistics
//! panel. All text passes through `escape`.

use crate::core::scale::LinearScale;
use crate::core::scenes::{Annotation, BarChartView, ExploreDetails, SceneView, ScatterView};
use crate::theme::colors;

const TICK_SIZE: f64 = 6.0;
const FONT: &str = "sans-serif";

/// Render a scene view to an SVG document
pub fn render(view: &SceneView) -> String {
    match view {
        SceneView::Bars(v) => render_bars(v),
        SceneView::Scatter(v) => render_scatter(v),
    }
}

fn open_document(out: &mut String, width: f64, height: f64, title: &str) {
    out.push_str(&format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">
"##,
        w = width,
        h = height,
        font = FONT,
    ));
    out.push_str(&format!(
        r##"  <rect width="{}" height="{}" fill="{}"/>
"##,
        width,
        height,
        colors::BG_PRIMARY.hex()
    ));
    out.push_str(&format!(
        r##"  <text x="{:.1}" y="28" text-anchor="middle" font-size="18" font-weight="600" fill="{}">{}</text>
"##,
        width / 2.0,
        colors::TEXT_PRIMARY.hex(),
        escape(title)
    ));
}

fn render_bars(v: &BarChartView) -> String {
    let mut out = String::new();
    open_document(&mut out, v.width, v.height, &v.title);

    let plot_h = v.y.range[1];
    out.push_str(&format!(
        r##"  <g transform="translate({},{})">
"##,
        v.offset.0, v.offset.1
    ));

    for bar in &v.bars {
        out.push_str(&format!(
            r##"    <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"><title>{}: {:.1}</title></rect>
"##,
            bar.x,
            bar.y,
            bar.width,
            bar.height,
            colors::BAR.hex(),
            escape(&bar.country),
            bar.deaths
        ));
    }

    // Band axis on the left
    out.push_str("    <g class=\"axis axis-left\">\n");
    axis_line(&mut out, 0.0, 0.0, 0.0, plot_h);
    for (i, label) in v.y.labels.iter().enumerate() {
        let Some(cy) = v.y.center(i) else { continue };
        tick_left(&mut out, cy, label);
    }
    out.push_str("    </g>\n");

    axis_bottom(&mut out, &v.x, v.ticks, plot_h);

    out.push_str("  </g>\n</svg>\n");
    out
}

fn render_scatter(v: &ScatterView) -> String {
    let mut out = String::new();
    open_document(&mut out, v.width, v.height, &v.title);

    let plot_w = v.x.range[1];
    let plot_h = v.y.range[0];
    out.push_str(&format!(
        r##"  <g transform="translate({},{})">
"##,
        v.offset.0, v.offset.1
    ));

    axis_bottom(&mut out, &v.x, v.ticks, plot_h);
    axis_left(&mut out, &v.y, v.ticks);

    // Axis titles
    out.push_str(&format!(
        r##"    <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="13" fill="{}">{}</text>
"##,
        plot_w / 2.0,
        plot_h + 40.0,
        colors::TEXT_SECONDARY.hex(),
        escape(&v.x_label)
    ));
    out.push_str(&format!(
        r##"    <text x="{:.1}" y="-50" transform="rotate(-90)" text-anchor="middle" font-size="13" fill="{}">{}</text>
"##,
        -plot_h / 2.0,
        colors::TEXT_SECONDARY.hex(),
        escape(&v.y_label)
    ));

    // Regular points first so highlights draw on top
    for p in v.points.iter().filter(|p| !p.highlighted) {
        point(&mut out, p.cx, p.cy, p.r, &colors::POINT.hex(), &p.tooltip);
    }
    for p in v.points.iter().filter(|p| p.highlighted) {
        point(&mut out, p.cx, p.cy, p.r, &colors::HIGHLIGHT.hex(), &p.tooltip);
    }

    for a in &v.annotations {
        annotation(&mut out, a);
    }

    out.push_str("  </g>\n");

    if let Some(panel) = &v.explore {
        let lines: Vec<String> = match &panel.details {
            ExploreDetails::Prompt => vec![format!(
                "Comparing against {}. Select a country to see its statistics.",
                panel.metric.label()
            )],
            ExploreDetails::Stats(lines) => {
                let mut all = Vec::with_capacity(lines.len() + 1);
                all.push(panel.country.clone().unwrap_or_default());
                all.extend(lines.iter().cloned());
                all
            }
            ExploreDetails::NoData(msg) => vec![msg.clone()],
        };
        explore_panel(&mut out, v, &lines);
    }

    out.push_str("</svg>\n");
    out
}

fn explore_panel(out: &mut String, v: &ScatterView, lines: &[String]) {
    let x = v.offset.0 + v.x.range[1] - 230.0;
    let y = v.offset.1 + 10.0;
    let height = 20.0 * lines.len() as f64 + 12.0;
    out.push_str(&format!(
        r##"  <g class="explore-panel"><rect x="{:.1}" y="{:.1}" width="230" height="{:.1}" fill="{}" stroke="{}"/>
"##,
        x,
        y,
        height,
        colors::BG_ELEVATED.hex(),
        colors::TEXT_MUTED.hex()
    ));
    for (i, line) in lines.iter().enumerate() {
        let weight = if i == 0 { "600" } else { "400" };
        out.push_str(&format!(
            r##"    <text x="{:.1}" y="{:.1}" font-size="12" font-weight="{}" fill="{}">{}</text>
"##,
            x + 8.0,
            y + 20.0 * (i as f64 + 1.0),
            weight,
            colors::TEXT_PRIMARY.hex(),
            escape(line)
        ));
    }
    out.push_str("  </g>\n");
}

fn point(out: &mut String, cx: f64, cy: f64, r: f64, fill: &str, tooltip: &str) {
    out.push_str(&format!(
        r##"    <circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}"><title>{}</title></circle>
"##,
        cx,
        cy,
        r,
        fill,
        escape(tooltip)
    ));
}

fn annotation(out: &mut String, a: &Annotation) {
    let (tx, ty) = (a.x + a.dx, a.y + a.dy);
    let color = colors::ANNOTATION.hex();
    out.push_str(&format!(
        r##"    <g class="annotation"><line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{c}"/><text x="{:.2}" y="{:.2}" font-size="12" font-weight="600" fill="{c}">{}</text><text x="{:.2}" y="{:.2}" font-size="11" fill="{c}">{}</text></g>
"##,
        a.x,
        a.y,
        tx,
        ty,
        tx + 2.0,
        ty - 4.0,
        escape(&a.title),
        tx + 2.0,
        ty + 10.0,
        escape(&a.label),
        c = color,
    ));
}

fn axis_line(out: &mut String, x1: f64, y1: f64, x2: f64, y2: f64) {
    out.push_str(&format!(
        r##"      <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}"/>
"##,
        x1,
        y1,
        x2,
        y2,
        colors::AXIS.hex()
    ));
}

fn axis_bottom(out: &mut String, scale: &LinearScale, count: usize, y: f64) {
    out.push_str(&format!(
        r##"    <g class="axis axis-bottom" transform="translate(0,{})">
"##,
        y
    ));
    axis_line(out, scale.range[0], 0.0, scale.range[1], 0.0);
    for t in scale.ticks(count) {
        let x = scale.map(t);
        out.push_str(&format!(
            r##"      <line x1="{x:.2}" y1="0" x2="{x:.2}" y2="{s}" stroke="{c}"/><text x="{x:.2}" y="{ty}" text-anchor="middle" font-size="10" fill="{c}">{label}</text>
"##,
            x = x,
            s = TICK_SIZE,
            ty = TICK_SIZE + 12.0,
            c = colors::AXIS.hex(),
            label = escape(&scale.tick_format(count, t)),
        ));
    }
    out.push_str("    </g>\n");
}

fn axis_left(out: &mut String, scale: &LinearScale, count: usize) {
    out.push_str("    <g class=\"axis axis-left\">\n");
    axis_line(out, 0.0, scale.range[0], 0.0, scale.range[1]);
    for t in scale.ticks(count) {
        tick_left(out, scale.map(t), &scale.tick_format(count, t));
    }
    out.push_str("    </g>\n");
}

fn tick_left(out: &mut String, y: f64, label: &str) {
    out.push_str(&format!(
        r##"      <line x1="{neg:.1}" y1="{y:.2}" x2="0" y2="{y:.2}" stroke="{c}"/><text x="{tx:.1}" y="{y:.2}" dy="0.32em" text-anchor="end" font-size="10" fill="{c}">{label}</text>
"##,
        neg = -TICK_SIZE,
        y = y,
        tx = -TICK_SIZE - 3.0,
        c = colors::AXIS.hex(),
        label = escape(label),
    ));
}

/// Escape text for use inside SVG elements and attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::core::data::{record, Dataset, Metric};
    use crate::core::scenes::{render_scene, ExploreState, Scene};

    fn sample() -> Dataset {
        Dataset::new(vec![
            record("Peru", 6437.2, 12236.7, 0.777, 29.1),
            record("Bosnia & Herzegovina", 4900.0, 6000.0, 0.78, 42.5),
            record("Japan", 600.1, 39002.2, 0.919, 48.2),
        ])
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_bar_chart_svg() {
        let cfg = ChartConfig::default();
        let view = render_scene(&sample(), Scene::Intro, &ExploreState::default(), &cfg);
        let svg = render(&view);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<rect x=").count(), 3);
        assert!(svg.contains("translate(150,50)"));
        assert!(svg.contains("Bosnia &amp; Herzegovina"));
        assert!(svg.contains(&colors::BAR.hex()));
    }

    #[test]
    fn test_one_element_per_line() {
        let cfg = ChartConfig::default();
        let svg = render(&render_scene(&sample(), Scene::Intro, &ExploreState::default(), &cfg));
        let bar_lines = svg
            .lines()
            .filter(|l| l.trim_start().starts_with("<rect x="))
            .count();
        assert_eq!(bar_lines, 3);
        assert!(svg.lines().next().unwrap().starts_with("<svg"));
        assert!(svg.lines().all(|l| l.trim_start().starts_with('<')));
    }

    #[test]
    fn test_scatter_svg() {
        let cfg = ChartConfig::default();
        let view = render_scene(&sample(), Scene::Gdp, &ExploreState::default(), &cfg);
        let svg = render(&view);
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains("GDP per Capita ($)"));
        assert!(svg.contains("COVID-19 Deaths per Million"));
        assert!(svg.contains("Highest deaths"));
        assert!(svg.contains("Lowest deaths"));
        assert!(svg.contains("Peru: 6437.2 deaths"));
        assert!(svg.contains("translate(0,390)"));
    }

    #[test]
    fn test_explore_svg_messages() {
        let cfg = ChartConfig::default();
        let state = ExploreState {
            metric: Metric::Age,
            country: Some("Japan".into()),
        };
        let svg = render(&render_scene(&sample(), Scene::Explore, &state, &cfg));
        assert!(svg.contains("GDP per Capita: $39002.20"));
        assert!(svg.contains("Median Age"));

        let missing = ExploreState {
            metric: Metric::Age,
            country: Some("Atlantis".into()),
        };
        let svg = render(&render_scene(&sample(), Scene::Explore, &missing, &cfg));
        assert!(svg.contains("No data available for Atlantis"));
    }
}
