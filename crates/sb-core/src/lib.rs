//! Core model for the sunburst explorer
//!
//! This crate provides the aggregation tree, the radial partition layout
//! and the zoom state machine shared by the data and view layers.

pub mod aggregate;
pub mod data;
pub mod hierarchy;
pub mod partition;
pub mod zoom;

// Re-export commonly used types
pub use aggregate::{aggregate, AggregateError};
pub use data::DataSource;
pub use hierarchy::{compute_height, forest_height, HierarchyNode};
pub use partition::{ArcNode, Partition};
pub use zoom::ZoomController;
