//! UI chrome for the sunburst explorer

pub mod tabs;
pub mod theme;

pub use tabs::orientation_tabs;
pub use theme::{apply_theme, Theme};
