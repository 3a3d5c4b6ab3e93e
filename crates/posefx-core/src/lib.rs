//! posefx Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every posefx crate:
//! - Geometry (Point2D, distance, normalization)
//! - Landmark sets and the provider index tables
//! - Timestamps and clocks
//! - Error types

pub mod error;
pub mod geometry;
pub mod landmarks;
pub mod time;

pub use error::*;
pub use geometry::*;
pub use landmarks::*;
pub use time::*;
