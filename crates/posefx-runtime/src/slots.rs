//! Landmark slots - latest face and hand results
//!
//! Face and hand detections complete independently and in any order, so
//! each has its own slot. Readers never wait for a fresh result and may see
//! the same landmarks for several frames. A read may pair a new face with
//! stale hands; it never sees a half-written landmark set, because whole
//! values are swapped under the slot's lock.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use posefx_core::{FaceLandmarkSet, FrameSnapshot, HandLandmarkSet};

/// Ordering policy for slot writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotPolicy {
    /// Every completed detection overwrites the slot, even one that was
    /// requested before the value it replaces
    #[default]
    LastWriteWins,
    /// Drop results whose request sequence is older than the slot's
    RejectStale,
}

/// Outcome of a slot write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotWrite {
    Applied,
    Stale,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SlotStats {
    pub face_writes: u64,
    pub hand_writes: u64,
    pub stale_rejected: u64,
}

#[derive(Debug, Default)]
struct Slot<T> {
    value: T,
    sequence: u64,
}

impl<T> Slot<T> {
    fn write(&mut self, policy: SlotPolicy, sequence: u64, value: T) -> SlotWrite {
        if policy == SlotPolicy::RejectStale && sequence < self.sequence {
            return SlotWrite::Stale;
        }
        self.value = value;
        self.sequence = sequence;
        SlotWrite::Applied
    }
}

/// Face and hand slots shared by the polling loop and the renderer
#[derive(Debug, Default)]
pub struct LandmarkSlots {
    policy: SlotPolicy,
    face: Mutex<Slot<Option<FaceLandmarkSet>>>,
    hands: Mutex<Slot<Vec<HandLandmarkSet>>>,
    face_writes: AtomicU64,
    hand_writes: AtomicU64,
    stale_rejected: AtomicU64,
}

impl LandmarkSlots {
    pub fn new(policy: SlotPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn policy(&self) -> SlotPolicy {
        self.policy
    }

    /// Store a face result requested with `sequence`
    pub fn write_face(&self, sequence: u64, face: Option<FaceLandmarkSet>) -> SlotWrite {
        let outcome = self.face.lock().write(self.policy, sequence, face);
        self.count(outcome, &self.face_writes, "face", sequence);
        outcome
    }

    /// Store a hand result requested with `sequence`
    pub fn write_hands(&self, sequence: u64, hands: Vec<HandLandmarkSet>) -> SlotWrite {
        let outcome = self.hands.lock().write(self.policy, sequence, hands);
        self.count(outcome, &self.hand_writes, "hands", sequence);
        outcome
    }

    fn count(&self, outcome: SlotWrite, writes: &AtomicU64, slot: &'static str, sequence: u64) {
        match outcome {
            SlotWrite::Applied => {
                writes.fetch_add(1, Ordering::Relaxed);
            }
            SlotWrite::Stale => {
                self.stale_rejected.fetch_add(1, Ordering::Relaxed);
                debug!(slot, sequence, "stale detection result dropped");
            }
        }
    }

    pub fn face(&self) -> Option<FaceLandmarkSet> {
        self.face.lock().value.clone()
    }

    pub fn hands(&self) -> Vec<HandLandmarkSet> {
        self.hands.lock().value.clone()
    }

    /// Sequence of the result currently in each slot (face, hands)
    pub fn sequences(&self) -> (u64, u64) {
        (self.face.lock().sequence, self.hands.lock().sequence)
    }

    /// Latest face and hands as one snapshot
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::new(self.face(), self.hands())
    }

    /// Empty both slots
    pub fn clear(&self) {
        *self.face.lock() = Slot::default();
        *self.hands.lock() = Slot::default();
    }

    pub fn stats(&self) -> SlotStats {
        SlotStats {
            face_writes: self.face_writes.load(Ordering::Relaxed),
            hand_writes: self.hand_writes.load(Ordering::Relaxed),
            stale_rejected: self.stale_rejected.load(Ordering::Relaxed),
        }
    }
}
