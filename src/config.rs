//! Chart geometry and runtime configuration

use std::path::PathBuf;

use tracing::debug;

/// Default location of the OWID export, relative to the working directory
pub const DEFAULT_DATA_PATH: &str = "data/owid-covid-data.csv";

/// Default directory for exported scenes
pub const DEFAULT_OUT_DIR: &str = "out";

/// Blank space around a chart's plotting area
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Canvas sizes and mark styling for every scene
#[derive(Clone, Debug, PartialEq)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    /// Offset of the bar chart's plotting group
    pub bar_offset: (f64, f64),
    /// Plotting area of the bar chart
    pub bar_size: (f64, f64),
    pub bar_padding: f64,
    pub bar_count: usize,
    pub scatter_margin: Margin,
    pub point_radius: f64,
    pub highlight_radius: f64,
    /// Annotation offset from its point (dx, dy)
    pub annotation_offset: (f64, f64),
    pub ticks: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
            bar_offset: (150.0, 50.0),
            bar_size: (600.0, 400.0),
            bar_padding: 0.1,
            bar_count: 10,
            scatter_margin: Margin {
                top: 50.0,
                right: 50.0,
                bottom: 60.0,
                left: 80.0,
            },
            point_radius: 5.0,
            highlight_radius: 8.0,
            annotation_offset: (10.0, -40.0),
            ticks: crate::core::scale::DEFAULT_TICKS,
        }
    }
}

impl ChartConfig {
    /// Inner width of scatter plots
    pub fn plot_width(&self) -> f64 {
        self.width - self.scatter_margin.left - self.scatter_margin.right
    }

    /// Inner height of scatter plots
    pub fn plot_height(&self) -> f64 {
        self.height - self.scatter_margin.top - self.scatter_margin.bottom
    }
}

/// CLI settings, read from `STORY_*` environment variables
#[derive(Clone, Debug, PartialEq)]
pub struct StoryConfig {
    pub data_path: PathBuf,
    pub out_dir: PathBuf,
    /// Read next/prev/select commands from stdin after exporting
    pub interactive: bool,
    /// Also write each scene model as JSON
    pub json: bool,
    /// Keep every CSV row instead of the latest row per country
    pub all_rows: bool,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            interactive: false,
            json: false,
            all_rows: false,
        }
    }
}

impl StoryConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unset variables keep defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let config = Self {
            data_path: lookup("STORY_DATA").map(PathBuf::from).unwrap_or(defaults.data_path),
            out_dir: lookup("STORY_OUT").map(PathBuf::from).unwrap_or(defaults.out_dir),
            interactive: lookup("STORY_INTERACTIVE").map_or(defaults.interactive, |v| is_truthy(&v)),
            json: lookup("STORY_JSON").map_or(defaults.json, |v| is_truthy(&v)),
            all_rows: lookup("STORY_ALL_ROWS").map_or(defaults.all_rows, |v| is_truthy(&v)),
        };
        debug!(?config, "Configuration resolved");
        config
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
