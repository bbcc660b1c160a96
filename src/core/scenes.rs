//! Scene models: the five slides and the chart each one shows
//!
//! `render_scene` is a pure function of the dataset, the scene and the
//! explorer selection. The resulting `SceneView` carries both the data
//! values and their pixel positions so the SVG renderer and the egui
//! dashboard can draw it without touching the scales again.

use serde::Serialize;
use tracing::{debug, trace};

use super::data::{CountryRecord, Dataset, Metric};
use super::scale::{BandScale, LinearScale};
use crate::config::ChartConfig;

pub const DEATHS_LABEL: &str = "COVID-19 Deaths per Million";

/// One fixed step in the slideshow
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scene {
    Intro,
    Gdp,
    Hdi,
    Age,
    Explore,
}

impl Scene {
    /// Slideshow order
    pub const ALL: &'static [Scene] = &[Scene::Intro, Scene::Gdp, Scene::Hdi, Scene::Age, Scene::Explore];

    pub fn index(self) -> usize {
        Scene::ALL.iter().position(|&s| s == self).unwrap_or(0)
    }

    pub fn at(index: usize) -> Option<Scene> {
        Scene::ALL.get(index).copied()
    }

    /// File-name friendly identifier
    pub fn slug(self) -> &'static str {
        match self {
            Scene::Intro => "intro",
            Scene::Gdp => "gdp",
            Scene::Hdi => "hdi",
            Scene::Age => "age",
            Scene::Explore => "explore",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Scene::Intro => "Top 10 Countries by COVID-19 Deaths per Million",
            Scene::Gdp => "Deaths per Million vs GDP per Capita",
            Scene::Hdi => "Deaths per Million vs Human Development Index",
            Scene::Age => "Deaths per Million vs Median Age",
            Scene::Explore => "Explore the Data",
        }
    }

    /// Metric a scatter scene is fixed to, if any
    pub fn metric(self) -> Option<Metric> {
        match self {
            Scene::Gdp => Some(Metric::Gdp),
            Scene::Hdi => Some(Metric::Hdi),
            Scene::Age => Some(Metric::Age),
            Scene::Intro | Scene::Explore => None,
        }
    }
}

/// Explorer selector state: comparison metric plus an optional country
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExploreState {
    pub metric: Metric,
    pub country: Option<String>,
}

/// One entry of the explorer dropdown
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Metric(Metric),
    Country(String),
}

impl Selection {
    /// Interpret selector text: a metric key, otherwise a country name
    pub fn parse(text: &str) -> Selection {
        match Metric::from_key(text) {
            Some(metric) => Selection::Metric(metric),
            None => Selection::Country(text.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Selection::Metric(m) => m.label(),
            Selection::Country(name) => name,
        }
    }
}

/// All dropdown entries: the three metrics followed by every country
pub fn selector_options(dataset: &Dataset) -> Vec<Selection> {
    Metric::ALL
        .iter()
        .map(|&m| Selection::Metric(m))
        .chain(dataset.country_names().into_iter().map(Selection::Country))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarMark {
    pub country: String,
    pub deaths: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarChartView {
    pub title: String,
    pub width: f64,
    pub height: f64,
    /// Translation of the plotting group inside the canvas
    pub offset: (f64, f64),
    pub x: LinearScale,
    pub y: BandScale,
    pub ticks: usize,
    pub bars: Vec<BarMark>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PointMark {
    pub country: String,
    /// Value of the comparison metric
    pub value: f64,
    pub deaths: f64,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub highlighted: bool,
    pub tooltip: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Annotation {
    /// Heading, normally the country name
    pub title: String,
    pub label: String,
    /// Anchor point in plot pixels
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
}

/// Text shown under the explorer chart
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "lines")]
pub enum ExploreDetails {
    /// Nothing selected
    Prompt,
    Stats(Vec<String>),
    NoData(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExplorePanel {
    pub metric: Metric,
    pub country: Option<String>,
    pub details: ExploreDetails,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScatterView {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub offset: (f64, f64),
    pub metric: Metric,
    pub x_label: String,
    pub y_label: String,
    pub x: LinearScale,
    pub y: LinearScale,
    pub ticks: usize,
    pub points: Vec<PointMark>,
    pub annotations: Vec<Annotation>,
    pub explore: Option<ExplorePanel>,
}

/// Everything needed to draw one scene
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SceneView {
    Bars(BarChartView),
    Scatter(ScatterView),
}

impl SceneView {
    pub fn title(&self) -> &str {
        match self {
            SceneView::Bars(v) => &v.title,
            SceneView::Scatter(v) => &v.title,
        }
    }

    /// Number of bars or points
    pub fn mark_count(&self) -> usize {
        match self {
            SceneView::Bars(v) => v.bars.len(),
            SceneView::Scatter(v) => v.points.len(),
        }
    }
}

/// Build the view for `scene`. The dataset is never modified.
pub fn render_scene(
    dataset: &Dataset,
    scene: Scene,
    explore: &ExploreState,
    cfg: &ChartConfig,
) -> SceneView {
    let view = match scene {
        Scene::Intro => SceneView::Bars(top_deaths(dataset, cfg)),
        Scene::Gdp | Scene::Hdi | Scene::Age => {
            let metric = scene.metric().unwrap_or_default();
            let mut view = scatter(dataset, metric, cfg);
            view.title = scene.title().to_string();
            view.annotations = extreme_annotations(&mut view.points, cfg);
            SceneView::Scatter(view)
        }
        Scene::Explore => SceneView::Scatter(explore_view(dataset, explore, cfg)),
    };
    debug!(scene = scene.slug(), marks = view.mark_count(), "Scene rendered");
    view
}

/// Horizontal bar chart of the highest death rates
pub fn top_deaths(dataset: &Dataset, cfg: &ChartConfig) -> BarChartView {
    let top: Vec<&CountryRecord> = dataset
        .by_deaths_desc()
        .into_iter()
        .take(cfg.bar_count)
        .collect();

    let max = top.first().map_or(1.0, |r| r.deaths);
    let x = LinearScale::new([0.0, max], [0.0, cfg.bar_size.0]);
    let y = BandScale::new(
        top.iter().map(|r| r.country.clone()).collect(),
        [0.0, cfg.bar_size.1],
        cfg.bar_padding,
    );

    let bars = top
        .iter()
        .enumerate()
        .map(|(i, r)| BarMark {
            country: r.country.clone(),
            deaths: r.deaths,
            x: 0.0,
            y: y.position(i).unwrap_or(0.0),
            width: x.map(r.deaths),
            height: y.bandwidth(),
        })
        .collect();

    BarChartView {
        title: Scene::Intro.title().to_string(),
        width: cfg.width,
        height: cfg.height,
        offset: cfg.bar_offset,
        x,
        y,
        ticks: cfg.ticks,
        bars,
    }
}

/// Scatterplot of `metric` (x) against death rate (y), without annotations
pub fn scatter(dataset: &Dataset, metric: Metric, cfg: &ChartConfig) -> ScatterView {
    let rows = dataset.plottable(metric);
    let width = cfg.plot_width();
    let height = cfg.plot_height();

    let x = LinearScale::from_extent(rows.iter().map(|r| r.metric(metric)), [0.0, width]).nice(cfg.ticks);
    let y = LinearScale::from_extent(rows.iter().map(|r| r.deaths), [height, 0.0]).nice(cfg.ticks);

    let points = rows
        .iter()
        .map(|r| {
            let value = r.metric(metric);
            PointMark {
                country: r.country.clone(),
                value,
                deaths: r.deaths,
                cx: x.map(value),
                cy: y.map(r.deaths),
                r: cfg.point_radius,
                highlighted: false,
                tooltip: format!("{}: {:.1} deaths", r.country, r.deaths),
            }
        })
        .collect();

    trace!(metric = metric.key(), rows = rows.len(), x = ?x.domain, y = ?y.domain, "Scatter scales");

    ScatterView {
        title: String::new(),
        width: cfg.width,
        height: cfg.height,
        offset: (cfg.scatter_margin.left, cfg.scatter_margin.top),
        metric,
        x_label: metric.label().to_string(),
        y_label: DEATHS_LABEL.to_string(),
        x,
        y,
        ticks: cfg.ticks,
        points,
        annotations: Vec::new(),
        explore: None,
    }
}

/// Highlight and annotate the highest and lowest death rates.
///
/// Ties resolve to the first point in dataset order.
fn extreme_annotations(points: &mut [PointMark], cfg: &ChartConfig) -> Vec<Annotation> {
    let mut hi: Option<usize> = None;
    let mut lo: Option<usize> = None;
    for (i, p) in points.iter().enumerate() {
        if hi.map_or(true, |h| p.deaths > points[h].deaths) {
            hi = Some(i);
        }
        if lo.map_or(true, |l| p.deaths < points[l].deaths) {
            lo = Some(i);
        }
    }

    let (dx, dy) = cfg.annotation_offset;
    let mut annotations = Vec::new();
    for (idx, label, dy) in [(hi, "Highest deaths", dy), (lo, "Lowest deaths", -dy)] {
        let Some(idx) = idx else { continue };
        // A single point is both extremes; annotate it once.
        if label == "Lowest deaths" && Some(idx) == hi {
            continue;
        }
        let p = &mut points[idx];
        p.highlighted = true;
        p.r = cfg.highlight_radius;
        annotations.push(Annotation {
            title: p.country.clone(),
            label: label.to_string(),
            x: p.cx,
            y: p.cy,
            dx,
            dy,
        });
    }
    annotations
}

/// Explorer scene: scatter against the selected metric, with the selected
/// country highlighted and its statistics listed
pub fn explore_view(dataset: &Dataset, state: &ExploreState, cfg: &ChartConfig) -> ScatterView {
    let mut view = scatter(dataset, state.metric, cfg);
    view.title = Scene::Explore.title().to_string();

    let details = match state.country.as_deref() {
        None => ExploreDetails::Prompt,
        Some(country) => match view.points.iter().rposition(|p| p.country == country) {
            None => {
                debug!(country, metric = state.metric.key(), "Selected country has no data");
                ExploreDetails::NoData(no_data_message(country))
            }
            Some(idx) => {
                let (dx, dy) = cfg.annotation_offset;
                let p = &mut view.points[idx];
                p.highlighted = true;
                p.r = cfg.highlight_radius;
                view.annotations.push(Annotation {
                    title: p.country.clone(),
                    label: format!("{:.1} deaths per million", p.deaths),
                    x: p.cx,
                    y: p.cy,
                    dx,
                    dy,
                });
                match plotted_record(dataset, state.metric, country) {
                    Some(record) => ExploreDetails::Stats(stat_lines(record)),
                    None => ExploreDetails::NoData(no_data_message(country)),
                }
            }
        },
    };

    view.explore = Some(ExplorePanel {
        metric: state.metric,
        country: state.country.clone(),
        details,
    });
    view
}

/// Last plottable record for `country`, the same one the highlighted point came from
fn plotted_record<'a>(dataset: &'a Dataset, metric: Metric, country: &str) -> Option<&'a CountryRecord> {
    dataset
        .records()
        .iter()
        .rev()
        .find(|r| r.country == country && r.has_metric(metric))
}

pub fn no_data_message(country: &str) -> String {
    format!("No data available for {}", country)
}

/// The four statistics shown for a selected country
pub fn stat_lines(record: &CountryRecord) -> Vec<String> {
    vec![
        format!("Deaths per Million: {:.1}", record.deaths),
        format!("GDP per Capita: ${:.2}", record.gdp),
        format!("HDI: {:.3}", record.hdi),
        format!("Median Age: {:.1}", record.age),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::record;

    fn sample() -> Dataset {
        Dataset::new(vec![
            record("Peru", 6437.2, 12236.7, 0.777, 29.1),
            record("Bulgaria", 5600.4, 18563.3, 0.816, 44.7),
            record("Hungary", 4900.9, 26777.6, 0.854, 43.4),
            record("United States", 3300.2, 54225.4, 0.926, 38.3),
            record("Japan", 600.1, 39002.2, 0.919, 48.2),
            record("Niger", 12.3, 926.0, 0.394, 15.1),
            record("Atlantis", f64::NAN, 50000.0, 0.9, 40.0),
            record("Nauru", 100.0, f64::NAN, f64::NAN, 25.0),
        ])
    }

    fn many(n: usize) -> Dataset {
        (0..n)
            .map(|i| record(&format!("C{}", i), (i * 37 % 101) as f64 + 1.0, 1000.0, 0.5, 30.0))
            .collect()
    }

    #[test]
    fn test_scene_order() {
        assert_eq!(Scene::ALL.len(), 5);
        assert_eq!(Scene::at(0), Some(Scene::Intro));
        assert_eq!(Scene::at(4), Some(Scene::Explore));
        assert_eq!(Scene::at(5), None);
        assert_eq!(Scene::Age.index(), 3);
    }

    #[test]
    fn test_top_ten_at_most_ten_sorted_desc() {
        let cfg = ChartConfig::default();
        for n in [0, 3, 10, 25] {
            let view = top_deaths(&many(n), &cfg);
            assert_eq!(view.bars.len(), n.min(10));
            for pair in view.bars.windows(2) {
                assert!(pair[0].deaths >= pair[1].deaths);
                assert!(pair[0].y < pair[1].y);
            }
        }
    }

    #[test]
    fn test_top_ten_widths() {
        let cfg = ChartConfig::default();
        let view = top_deaths(&sample(), &cfg);
        assert_eq!(view.bars[0].country, "Peru");
        assert_eq!(view.bars[0].width, 600.0);
        assert!(view.bars.iter().all(|b| b.width <= 600.0 && b.width > 0.0));
        assert!(view.bars.iter().all(|b| b.country != "Atlantis"));
    }

    #[test]
    fn test_scatter_domains_bound_points() {
        let cfg = ChartConfig::default();
        let ds = sample();
        for &metric in Metric::ALL {
            let view = scatter(&ds, metric, &cfg);
            assert!(!view.points.is_empty());
            for p in &view.points {
                assert!(view.x.contains(p.value), "{} outside {:?}", p.value, view.x.domain);
                assert!(view.y.contains(p.deaths));
                assert!(p.cx >= 0.0 && p.cx <= cfg.plot_width());
                assert!(p.cy >= 0.0 && p.cy <= cfg.plot_height());
            }
        }
    }

    #[test]
    fn test_scatter_filters_missing_values() {
        let cfg = ChartConfig::default();
        let view = scatter(&sample(), Metric::Gdp, &cfg);
        assert_eq!(view.points.len(), 6);
        assert!(view.points.iter().all(|p| p.country != "Atlantis" && p.country != "Nauru"));

        let ages = scatter(&sample(), Metric::Age, &cfg);
        assert!(ages.points.iter().any(|p| p.country == "Nauru"));
    }

    #[test]
    fn test_tooltip_format() {
        let cfg = ChartConfig::default();
        let view = scatter(&sample(), Metric::Gdp, &cfg);
        assert_eq!(view.points[0].tooltip, "Peru: 6437.2 deaths");
    }

    #[test]
    fn test_metric_scene_annotates_extremes() {
        let cfg = ChartConfig::default();
        let view = match render_scene(&sample(), Scene::Hdi, &ExploreState::default(), &cfg) {
            SceneView::Scatter(v) => v,
            other => panic!("expected scatter, got {:?}", other),
        };
        assert_eq!(view.annotations.len(), 2);
        assert_eq!(view.annotations[0].title, "Peru");
        assert_eq!(view.annotations[0].label, "Highest deaths");
        assert_eq!(view.annotations[1].title, "Niger");
        assert_eq!(view.points.iter().filter(|p| p.highlighted).count(), 2);
    }

    #[test]
    fn test_single_point_annotated_once() {
        let cfg = ChartConfig::default();
        let ds = Dataset::new(vec![record("Solo", 10.0, 5.0, 0.5, 30.0)]);
        let view = match render_scene(&ds, Scene::Gdp, &ExploreState::default(), &cfg) {
            SceneView::Scatter(v) => v,
            other => panic!("expected scatter, got {:?}", other),
        };
        assert_eq!(view.annotations.len(), 1);
        // Collapsed domain puts the point in the middle
        assert_eq!(view.points[0].cx, cfg.plot_width() / 2.0);
    }

    #[test]
    fn test_empty_dataset_renders_every_scene() {
        let cfg = ChartConfig::default();
        let ds = Dataset::default();
        let state = ExploreState {
            metric: Metric::Age,
            country: Some("Peru".into()),
        };
        for &scene in Scene::ALL {
            let view = render_scene(&ds, scene, &state, &cfg);
            assert_eq!(view.mark_count(), 0);
        }
    }

    #[test]
    fn test_explore_country_highlights_exactly_one() {
        let cfg = ChartConfig::default();
        let state = ExploreState {
            metric: Metric::Gdp,
            country: Some("Japan".into()),
        };
        let view = explore_view(&sample(), &state, &cfg);
        let highlighted: Vec<&PointMark> = view.points.iter().filter(|p| p.highlighted).collect();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted[0].country, "Japan");
        assert_eq!(view.annotations.len(), 1);

        let panel = view.explore.unwrap();
        assert_eq!(
            panel.details,
            ExploreDetails::Stats(vec![
                "Deaths per Million: 600.1".to_string(),
                "GDP per Capita: $39002.20".to_string(),
                "HDI: 0.919".to_string(),
                "Median Age: 48.2".to_string(),
            ])
        );
    }

    #[test]
    fn test_explore_duplicate_country_uses_last_row() {
        let cfg = ChartConfig::default();
        let ds = Dataset::new(vec![
            record("Peru", 100.0, 1000.0, 0.7, 29.0),
            record("Chile", 200.0, 2000.0, 0.8, 35.0),
            record("Peru", 300.0, 1500.0, 0.7, 29.0),
        ]);
        let state = ExploreState {
            metric: Metric::Gdp,
            country: Some("Peru".into()),
        };
        let view = explore_view(&ds, &state, &cfg);
        let highlighted: Vec<&PointMark> = view.points.iter().filter(|p| p.highlighted).collect();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted[0].deaths, 300.0);
    }

    #[test]
    fn test_explore_missing_country_shows_message() {
        let cfg = ChartConfig::default();
        for country in ["Atlantis", "Nauru", "Mordor"] {
            let state = ExploreState {
                metric: Metric::Gdp,
                country: Some(country.into()),
            };
            let view = explore_view(&sample(), &state, &cfg);
            assert!(view.points.iter().all(|p| !p.highlighted));
            assert_eq!(
                view.explore.unwrap().details,
                ExploreDetails::NoData(format!("No data available for {}", country))
            );
        }
    }

    #[test]
    fn test_explore_without_selection_prompts() {
        let cfg = ChartConfig::default();
        let view = explore_view(&sample(), &ExploreState::default(), &cfg);
        assert_eq!(view.metric, Metric::Gdp);
        assert_eq!(view.explore.unwrap().details, ExploreDetails::Prompt);
        assert!(view.annotations.is_empty());
    }

    #[test]
    fn test_selection_parse_and_options() {
        assert_eq!(Selection::parse("age"), Selection::Metric(Metric::Age));
        assert_eq!(Selection::parse(" Peru "), Selection::Country("Peru".into()));

        let opts = selector_options(&sample());
        assert_eq!(opts.len(), 3 + 8);
        assert_eq!(opts[0], Selection::Metric(Metric::Gdp));
        assert_eq!(opts[3], Selection::Country("Atlantis".into()));
    }

    #[test]
    fn test_view_serializes() {
        let cfg = ChartConfig::default();
        let view = render_scene(&sample(), Scene::Intro, &ExploreState::default(), &cfg);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["type"], "bars");
        assert_eq!(json["bars"][0]["country"], "Peru");
    }
}
