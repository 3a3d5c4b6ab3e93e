//! posefx Runtime - engine orchestration and per-frame loop
//!
//! The detection side and the rendering side never wait on each other:
//! 1. A polling loop asks the pose provider for landmarks at a fixed interval
//! 2. Results land in last-write-wins slots, face and hands independently
//! 3. Each animation frame reads whatever the slots hold
//! 4. Feature extraction and the trigger state machines run on that snapshot
//! 5. The composer emits draw commands for the enabled layers
//! 6. The formatter fills the telemetry panel

pub mod composer;
pub mod config;
pub mod engine;
pub mod observability;
pub mod provider;
pub mod render;
pub mod slots;
pub mod telemetry;

pub use composer::*;
pub use config::*;
pub use engine::*;
pub use observability::*;
pub use provider::*;
pub use render::*;
pub use slots::*;
pub use telemetry::*;
