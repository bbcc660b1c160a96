//! WASM dataset fetch: downloads the CSV and parses it off the UI callback

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::core::{parse_csv, Dataset};
use crate::load_state::LoadState;

/// Start fetching `url`; `state` flips to `Loaded` or `Failed` when done.
///
/// `latest_only` collapses the daily rows to one record per country.
pub fn spawn_fetch(url: &str, latest_only: bool, state: Rc<RefCell<LoadState>>) {
    let url = url.to_string();
    wasm_bindgen_futures::spawn_local(async move {
        info!(url = %url, "Fetching dataset");
        let next = match fetch_text(&url).await {
            Ok(text) => match parse_csv(&text) {
                Ok(ds) => {
                    let ds: Dataset = if latest_only { ds.latest_per_country() } else { ds };
                    info!(records = ds.len(), "Dataset ready");
                    LoadState::Loaded(ds)
                }
                Err(e) => {
                    error!(error = %e, "Failed to parse dataset");
                    LoadState::Failed(e.to_string())
                }
            },
            Err(e) => {
                let msg = e.as_string().unwrap_or_else(|| format!("{:?}", e));
                error!(error = %msg, "Failed to fetch dataset");
                LoadState::Failed(msg)
            }
        };
        *state.borrow_mut() = next;
    });
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: web_sys::Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "HTTP {} while fetching {}",
            response.status(),
            url
        )));
    }
    let text = JsFuture::from(response.text()?).await?;
    text.as_string()
        .ok_or_else(|| JsValue::from_str("response body is not text"))
}
