//! Browser slideshow app
//!
//! Header with prev/next, the current scene drawn with egui_plot, and the
//! explorer selector on the last scene.

mod charts;
mod explore;
mod header;

use std::cell::RefCell;
use std::rc::Rc;

use eframe::egui;
use tracing::info;

use crate::core::scenes::selector_options;
use crate::core::{Dataset, SceneView, Selection, Slideshow};
use crate::fetch_wasm::spawn_fetch;
use crate::load_state::LoadState;
use crate::theme::{colors, story_visuals};

/// Default dataset URL (override with `window.__story_data_url`)
pub const DEFAULT_DATA_URL: &str = "data/owid-covid-data.csv";

/// Slideshow app state
pub struct StoryApp {
    /// Written by the fetch future, drained in update()
    load_state: Rc<RefCell<LoadState>>,
    /// Dataset once loaded; read-only afterwards
    pub(crate) dataset: Option<Dataset>,
    pub(crate) slideshow: Slideshow,
    /// View of the current scene, rebuilt on every scene or selection change
    pub(crate) view: Option<SceneView>,
    /// Explorer dropdown entries
    pub(crate) options: Vec<Selection>,
}

impl StoryApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(story_visuals());

        let url = js_sys::eval("window.__story_data_url")
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_else(|| DEFAULT_DATA_URL.to_string());

        let load_state = Rc::new(RefCell::new(LoadState::Loading));
        spawn_fetch(&url, true, load_state.clone());

        Self {
            load_state,
            dataset: None,
            slideshow: Slideshow::default(),
            view: None,
            options: Vec::new(),
        }
    }

    /// Pick up the dataset when the fetch completes
    fn poll_load(&mut self) {
        if self.dataset.is_some() {
            return;
        }
        let Some(dataset) = self.load_state.borrow_mut().take_dataset() else {
            return;
        };
        info!(records = dataset.len(), "Dataset received");
        self.options = selector_options(&dataset);
        self.dataset = Some(dataset);
        self.rerender();
    }

    /// Clear and rebuild the current scene
    pub(crate) fn rerender(&mut self) {
        self.view = self.dataset.as_ref().map(|ds| self.slideshow.render(ds));
    }

    pub(crate) fn next(&mut self) {
        if self.slideshow.next() {
            self.rerender();
        }
    }

    pub(crate) fn prev(&mut self) {
        if self.slideshow.prev() {
            self.rerender();
        }
    }

    pub(crate) fn select(&mut self, selection: Selection) {
        self.slideshow.select(selection);
        self.rerender();
    }
}

impl eframe::App for StoryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_load();
        if self.dataset.is_none() {
            // Keep polling until the fetch future resolves
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY.into()).inner_margin(8.0))
            .show(ctx, |ui| {
                self.render_header(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY.into()).inner_margin(8.0))
            .show(ctx, |ui| {
                if let Some(msg) = self.load_state.borrow().error() {
                    ui.label(
                        egui::RichText::new(format!("Failed to load data: {}", msg))
                            .color(colors::ANNOTATION),
                    );
                    return;
                }
                if self.dataset.is_none() {
                    ui.label(egui::RichText::new("Loading data...").color(colors::TEXT_MUTED));
                    return;
                }

                if self.slideshow.explore_active() {
                    self.render_explore_controls(ui);
                    ui.add_space(8.0);
                }

                match self.view.clone() {
                    Some(SceneView::Bars(view)) => self.render_bar_chart(ui, &view),
                    Some(SceneView::Scatter(view)) => self.render_scatter(ui, &view),
                    None => {}
                }
            });
    }
}
