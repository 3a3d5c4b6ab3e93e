//! posefx Test Harness - synthetic landmarks and engine scenarios
//!
//! This crate provides:
//! - Landmark builders aimed at feature thresholds
//! - A scripted pose provider with latency and failure chaos
//! - Deterministic timeline scenarios on a manual clock
//! - Live runs against the real polling loop

pub mod builders;
pub mod live;
pub mod scenario;
pub mod scripted;

pub use builders::*;
pub use live::*;
pub use scenario::*;
pub use scripted::*;
