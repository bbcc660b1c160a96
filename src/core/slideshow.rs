//! Slideshow cursor and explorer selection

use tracing::{debug, info};

use super::data::Dataset;
use super::scenes::{render_scene, ExploreState, Scene, SceneView, Selection};
use crate::config::ChartConfig;

/// View-model for the slideshow: which scene is showing and what the
/// explorer has selected. The dataset is passed in on every render.
#[derive(Clone, Debug, Default)]
pub struct Slideshow {
    cursor: usize,
    explore: ExploreState,
    config: ChartConfig,
}

impl Slideshow {
    pub fn new(config: ChartConfig) -> Self {
        Self {
            cursor: 0,
            explore: ExploreState::default(),
            config,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scene(&self) -> Scene {
        Scene::at(self.cursor).unwrap_or(Scene::Intro)
    }

    pub fn scene_count(&self) -> usize {
        Scene::ALL.len()
    }

    pub fn explore(&self) -> &ExploreState {
        &self.explore
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Whether the explorer selector should be shown
    pub fn explore_active(&self) -> bool {
        self.scene() == Scene::Explore
    }

    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.scene_count()
    }

    pub fn has_prev(&self) -> bool {
        self.cursor > 0
    }

    /// Advance one scene. Returns false at the last scene.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.set_cursor(self.cursor + 1);
        true
    }

    /// Go back one scene. Returns false at the first scene.
    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.set_cursor(self.cursor - 1);
        true
    }

    /// Jump to `index`, clamped to the valid range. Returns whether the cursor moved.
    pub fn go_to(&mut self, index: usize) -> bool {
        let index = index.min(self.scene_count() - 1);
        if index == self.cursor {
            return false;
        }
        self.set_cursor(index);
        true
    }

    fn set_cursor(&mut self, index: usize) {
        self.cursor = index;
        let scene = self.scene();
        // Metric scenes carry their metric over into the explorer.
        if let Some(metric) = scene.metric() {
            self.explore.metric = metric;
        }
        info!(cursor = index, scene = scene.slug(), "Scene changed");
    }

    /// Apply a dropdown choice from the explorer.
    ///
    /// The dropdown holds one value, so picking a metric drops the country.
    pub fn select(&mut self, selection: Selection) {
        match selection {
            Selection::Metric(metric) => {
                debug!(metric = metric.key(), "Explorer metric selected");
                self.explore.metric = metric;
                self.explore.country = None;
            }
            Selection::Country(country) => {
                debug!(country = %country, "Explorer country selected");
                self.explore.country = Some(country);
            }
        }
    }

    /// Drop the selected country
    pub fn clear_country(&mut self) {
        self.explore.country = None;
    }

    /// Rebuild the current scene from scratch
    pub fn render(&self, dataset: &Dataset) -> SceneView {
        render_scene(dataset, self.scene(), &self.explore, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::{record, Metric};
    use crate::core::scenes::ExploreDetails;

    #[test]
    fn test_cursor_clamped() {
        let mut show = Slideshow::default();
        assert!(!show.prev());
        assert_eq!(show.cursor(), 0);

        for _ in 0..20 {
            show.next();
            assert!(show.cursor() <= 4);
        }
        assert_eq!(show.cursor(), 4);
        assert_eq!(show.scene(), Scene::Explore);
        assert!(show.explore_active());
        assert!(!show.next());

        for _ in 0..20 {
            show.prev();
        }
        assert_eq!(show.cursor(), 0);
    }

    #[test]
    fn test_next_prev_report_movement() {
        let mut show = Slideshow::default();
        assert!(show.next());
        assert_eq!(show.scene(), Scene::Gdp);
        assert!(show.prev());
        assert_eq!(show.scene(), Scene::Intro);
    }

    #[test]
    fn test_go_to_clamps() {
        let mut show = Slideshow::default();
        assert!(show.go_to(99));
        assert_eq!(show.cursor(), 4);
        assert!(!show.go_to(4));
        assert!(show.go_to(2));
        assert_eq!(show.scene(), Scene::Hdi);
    }

    #[test]
    fn test_metric_follows_last_metric_scene() {
        let mut show = Slideshow::default();
        assert_eq!(show.explore().metric, Metric::Gdp);
        show.go_to(3);
        assert_eq!(show.explore().metric, Metric::Age);
        show.next();
        assert_eq!(show.scene(), Scene::Explore);
        assert_eq!(show.explore().metric, Metric::Age);
    }

    #[test]
    fn test_select_and_render() {
        let ds = Dataset::new(vec![
            record("Peru", 6437.2, 12236.7, 0.777, 29.1),
            record("Japan", 600.1, 39002.2, 0.919, 48.2),
        ]);
        let mut show = Slideshow::default();
        show.go_to(4);
        show.select(Selection::Metric(Metric::Hdi));
        show.select(Selection::Country("Japan".into()));

        let SceneView::Scatter(view) = show.render(&ds) else {
            panic!("explorer should render a scatter");
        };
        assert_eq!(view.metric, Metric::Hdi);
        assert_eq!(view.points.iter().filter(|p| p.highlighted).count(), 1);
        assert!(matches!(view.explore.unwrap().details, ExploreDetails::Stats(_)));

        show.select(Selection::Metric(Metric::Gdp));
        assert!(show.explore().country.is_none());
        assert_eq!(show.explore().metric, Metric::Gdp);

        show.select(Selection::Country("Peru".into()));
        show.clear_country();
        assert!(show.explore().country.is_none());
    }
}
