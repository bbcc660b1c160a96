//! Platform-agnostic core module - shared between WASM dashboard and CLI

pub mod data;
pub mod parser;
pub mod scale;
pub mod scenes;
pub mod slideshow;

pub use data::{CountryRecord, Dataset, Metric};
pub use parser::{from_reader, load_path, parse_csv, LoadError};
pub use scale::{BandScale, LinearScale};
pub use scenes::{render_scene, ExploreDetails, ExploreState, Scene, SceneView, Selection};
pub use slideshow::Slideshow;
