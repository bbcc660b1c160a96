//! COVID-19 narrative slideshow
//!
//! Loads the OWID COVID-19 export and steps through five scenes:
//! - Top 10 death rates as a bar chart
//! - Death rate vs GDP, HDI and median age as scatter plots
//! - An explorer with a metric/country selector
//!
//! The `core` module is platform-agnostic and shared by the `story` CLI
//! (SVG export) and the browser dashboard (`wasm` feature).

pub mod config;
pub mod core;
pub mod svg;
pub mod theme;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod app;
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod fetch_wasm;
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod load_state;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod web {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::app::StoryApp;

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();

        // Initialize tracing for browser console
        tracing_wasm::set_as_global_default();

        let web_options = eframe::WebOptions::default();

        wasm_bindgen_futures::spawn_local(async {
            let canvas = web_sys::window()
                .expect("no window")
                .document()
                .expect("no document")
                .get_element_by_id("canvas")
                .expect("no canvas element")
                .dyn_into::<web_sys::HtmlCanvasElement>()
                .expect("not a canvas element");

            eframe::WebRunner::new()
                .start(
                    canvas,
                    web_options,
                    Box::new(|cc| Ok(Box::new(StoryApp::new(cc)))),
                )
                .await
                .expect("Failed to start eframe");
        });
    }
}
