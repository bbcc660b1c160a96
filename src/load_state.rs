//! Dataset load state shared between the fetch future and the app

use crate::core::Dataset;

/// Progress of the one asynchronous dataset load
#[derive(Clone, Debug)]
pub enum LoadState {
    Loading,
    Loaded(Dataset),
    Failed(String),
}

impl LoadState {
    /// Take the dataset once it has arrived. Other states are left untouched.
    pub fn take_dataset(&mut self) -> Option<Dataset> {
        match std::mem::replace(self, LoadState::Loading) {
            LoadState::Loaded(ds) => Some(ds),
            other => {
                *self = other;
                None
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}
