//! Freehand drawing with an extended index finger
//!
//! A path starts the tick drawing intent appears, grows by one sample every
//! tick the intent holds (no dedup, no simplification) and is finalized the
//! tick the intent goes away. Finalized paths live until `clear()`.

use posefx_core::{Point2D, Timestamp};
use tracing::debug;

/// One sample of a drawing path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub point: Point2D,
    pub timestamp: Timestamp,
}

/// Ordered samples of one stroke
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawingPath {
    points: Vec<PathPoint>,
}

impl DrawingPath {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, point: Point2D, timestamp: Timestamp) {
        self.points.push(PathPoint { point, timestamp });
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn positions(&self) -> impl Iterator<Item = Point2D> + '_ {
        self.points.iter().map(|p| p.point)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Polyline length
    pub fn length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|w| w[0].point.distance(&w[1].point))
            .sum()
    }
}

/// Finalized paths plus at most one active path
#[derive(Debug, Clone, Default)]
pub struct DrawingPathSet {
    finalized: Vec<DrawingPath>,
    active: Option<DrawingPath>,
}

impl DrawingPathSet {
    pub fn finalized(&self) -> &[DrawingPath] {
        &self.finalized
    }

    pub fn active(&self) -> Option<&DrawingPath> {
        self.active.as_ref()
    }

    /// Finalized paths in order, then the active one
    pub fn iter(&self) -> impl Iterator<Item = &DrawingPath> {
        self.finalized.iter().chain(self.active.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.finalized.is_empty() && self.active.is_none()
    }

    pub fn total_points(&self) -> usize {
        self.iter().map(DrawingPath::len).sum()
    }
}

/// Accumulator phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawingPhase {
    #[default]
    Idle,
    Drawing,
}

/// Turns per-tick drawing intent into paths
#[derive(Debug, Default)]
pub struct DrawingPathAccumulator {
    paths: DrawingPathSet,
    phase: DrawingPhase,
    finalized_total: u64,
}

impl DrawingPathAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this tick's intent: `Some(fingertip)` while drawing, `None` otherwise
    pub fn update(&mut self, intent: Option<Point2D>, now: Timestamp) -> DrawingPhase {
        match (self.phase, intent) {
            (DrawingPhase::Idle, Some(point)) => {
                let mut path = DrawingPath::new();
                path.push(point, now);
                self.paths.active = Some(path);
                self.phase = DrawingPhase::Drawing;
                debug!(at = %now, "drawing path started");
            }
            (DrawingPhase::Drawing, Some(point)) => {
                self.paths
                    .active
                    .get_or_insert_with(DrawingPath::new)
                    .push(point, now);
            }
            (DrawingPhase::Drawing, None) => {
                self.finish();
            }
            (DrawingPhase::Idle, None) => {}
        }
        self.phase
    }

    /// Finalize the active path, dropping it if it is empty
    pub fn finish(&mut self) {
        if let Some(path) = self.paths.active.take() {
            if !path.is_empty() {
                debug!(points = path.len(), "drawing path finalized");
                self.paths.finalized.push(path);
                self.finalized_total += 1;
            }
        }
        self.phase = DrawingPhase::Idle;
    }

    /// Drop every path and return to idle
    pub fn clear(&mut self) {
        let dropped = self.paths.finalized.len() + usize::from(self.paths.active.is_some());
        self.paths = DrawingPathSet::default();
        self.phase = DrawingPhase::Idle;
        debug!(dropped, "drawing cleared");
    }

    pub fn paths(&self) -> &DrawingPathSet {
        &self.paths
    }

    pub fn phase(&self) -> DrawingPhase {
        self.phase
    }

    /// Paths finalized over the accumulator's lifetime, including cleared ones
    pub fn finalized_total(&self) -> u64 {
        self.finalized_total
    }
}
