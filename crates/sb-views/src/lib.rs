//! View layer for the sunburst explorer

pub mod colors;
pub mod geometry;
mod sunburst;

pub use colors::ColorResolver;
pub use geometry::{format_number, LevelScale};
pub use sunburst::{SunburstConfig, SunburstView};

use std::sync::Arc;

use parking_lot::RwLock;

use sb_core::data::DataSource;
use sb_data::ExplorerConfig;

/// Context passed to views during rendering
#[derive(Clone)]
pub struct ViewerContext {
    /// Current data source
    pub data_source: Arc<RwLock<Option<Box<dyn DataSource>>>>,

    /// Orientations and palette maps
    pub config: Arc<ExplorerConfig>,

    /// Tokio runtime handle
    pub runtime_handle: tokio::runtime::Handle,
}
