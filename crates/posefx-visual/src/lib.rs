//! posefx Visual - gestures as state
//!
//! Raw landmarks are noisy geometry. This crate turns them into meaning:
//!
//! # Feature extractors (stateless, per tick)
//!
//! - face: mouth open, eye open (per side), nose position
//! - hand: wrists, fingertips, finger extension, fist
//!
//! # Temporal state machines (carry state across ticks)
//!
//! - wink: one eye shut, recomputed every tick
//! - mouth text: quote revealed on a clock while the mouth is open
//! - drawing: freehand paths traced by an extended index finger

pub mod color;
pub mod drawing;
pub mod face;
pub mod hand;
pub mod mouth_text;
pub mod thresholds;
pub mod wink;

pub use color::*;
pub use drawing::*;
pub use face::*;
pub use hand::*;
pub use mouth_text::*;
pub use thresholds::*;
pub use wink::*;
