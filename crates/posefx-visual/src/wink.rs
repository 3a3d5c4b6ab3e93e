//! Wink detection
//!
//! Recomputed from both eye signals every tick: exactly one eye closed is a
//! wink. There is no hysteresis, so an eye gap hovering at the threshold
//! flickers the wink on and off tick by tick.

use tracing::debug;

use crate::EyeSide;

/// Wink state for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WinkState {
    #[default]
    NoWink,
    Winking {
        /// The eye that is shut
        closed: EyeSide,
    },
}

impl WinkState {
    /// Derive from the two eye signals (`left_open XOR right_open`)
    pub fn from_eyes(left_open: bool, right_open: bool) -> Self {
        match (left_open, right_open) {
            (true, false) => WinkState::Winking {
                closed: EyeSide::Right,
            },
            (false, true) => WinkState::Winking {
                closed: EyeSide::Left,
            },
            _ => WinkState::NoWink,
        }
    }

    pub fn is_winking(&self) -> bool {
        matches!(self, WinkState::Winking { .. })
    }
}

/// Wink detector
///
/// Holds the previous tick only to count onsets; the state itself is never
/// carried over.
#[derive(Debug, Default)]
pub struct WinkDetector {
    state: WinkState,
    onsets: u64,
}

impl WinkDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this tick's eye signals
    pub fn update(&mut self, left_open: bool, right_open: bool) -> WinkState {
        let next = WinkState::from_eyes(left_open, right_open);
        if next.is_winking() && !self.state.is_winking() {
            self.onsets += 1;
            debug!(?next, onsets = self.onsets, "wink started");
        }
        self.state = next;
        next
    }

    pub fn state(&self) -> WinkState {
        self.state
    }

    /// Wink onsets seen since the last reset
    pub fn onsets(&self) -> u64 {
        self.onsets
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xor_rule() {
        assert_eq!(WinkState::from_eyes(true, true), WinkState::NoWink);
        assert_eq!(WinkState::from_eyes(false, false), WinkState::NoWink);
        assert_eq!(
            WinkState::from_eyes(false, true),
            WinkState::Winking {
                closed: EyeSide::Left
            }
        );
        assert_eq!(
            WinkState::from_eyes(true, false),
            WinkState::Winking {
                closed: EyeSide::Right
            }
        );
    }

    #[test]
    fn test_no_debounce() {
        let mut detector = WinkDetector::new();
        // Flickering eye: every tick toggles the wink
        let ticks = [(false, true), (true, true), (false, true), (true, true)];
        let states: Vec<bool> = ticks
            .iter()
            .map(|(l, r)| detector.update(*l, *r).is_winking())
            .collect();
        assert_eq!(states, vec![true, false, true, false]);
        assert_eq!(detector.onsets(), 2);
    }

    #[test]
    fn test_held_wink_counts_once() {
        let mut detector = WinkDetector::new();
        for _ in 0..5 {
            detector.update(true, false);
        }
        assert_eq!(detector.onsets(), 1);
        assert!(detector.state().is_winking());

        detector.reset();
        assert_eq!(detector.onsets(), 0);
        assert_eq!(detector.state(), WinkState::NoWink);
    }
}
