//! Landmark sets delivered by the pose provider
//!
//! The index tables below are an EXTERNAL CONTRACT with the provider's
//! topology (FaceMesh 478-point face model, 21-point hand model). Nothing
//! here validates that a provider actually follows it beyond the length
//! check. Switching provider model versions means updating these tables,
//! not the feature logic.

use serde::{Deserialize, Serialize};

use crate::Point2D;

/// Face mesh landmark count (with iris refinement)
pub const FACE_LANDMARK_COUNT: usize = 478;

/// Hand landmark count
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Semantic face landmarks used by the feature extractors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceLandmark {
    NoseTip,
    UpperInnerLip,
    LowerInnerLip,
    LeftEyeUpperLid,
    LeftEyeLowerLid,
    RightEyeUpperLid,
    RightEyeLowerLid,
}

impl FaceLandmark {
    /// Index in the 478-point topology
    pub const fn index(self) -> usize {
        match self {
            FaceLandmark::NoseTip => 1,
            FaceLandmark::UpperInnerLip => 13,
            FaceLandmark::LowerInnerLip => 14,
            FaceLandmark::LeftEyeUpperLid => 159,
            FaceLandmark::LeftEyeLowerLid => 145,
            FaceLandmark::RightEyeUpperLid => 386,
            FaceLandmark::RightEyeLowerLid => 374,
        }
    }
}

/// Wrist landmark index
pub const WRIST: usize = 0;

/// Finger in fixed thumb-to-pinky order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// All fingers in order
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Fingertip landmark index
    pub const fn tip(self) -> usize {
        match self {
            Finger::Thumb => 4,
            Finger::Index => 8,
            Finger::Middle => 12,
            Finger::Ring => 16,
            Finger::Pinky => 20,
        }
    }

    /// Base joint used for the extension test
    pub const fn base(self) -> usize {
        match self {
            Finger::Thumb => 2,
            Finger::Index => 5,
            Finger::Middle => 9,
            Finger::Ring => 13,
            Finger::Pinky => 17,
        }
    }

    /// Position in the thumb-to-pinky order
    pub fn position(self) -> usize {
        self as usize
    }

    pub fn from_position(position: usize) -> Option<Finger> {
        Finger::ALL.get(position).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Finger::Thumb => "thumb",
            Finger::Index => "index",
            Finger::Middle => "middle",
            Finger::Ring => "ring",
            Finger::Pinky => "pinky",
        }
    }
}

/// Hand skeleton connections: finger chains plus the palm outline
/// 0-5-9-13-17-0
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (5, 9),
    (9, 10),
    (10, 11),
    (11, 12),
    (9, 13),
    (13, 14),
    (14, 15),
    (15, 16),
    (13, 17),
    (0, 17),
    (17, 18),
    (18, 19),
    (19, 20),
];

/// Handedness label reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
    #[default]
    Unknown,
}

impl Handedness {
    /// Parse a provider label, anything unrecognised is `Unknown`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "left" => Handedness::Left,
            "right" => Handedness::Right,
            _ => Handedness::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
            Handedness::Unknown => "Unknown",
        }
    }
}

/// One detected face
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceLandmarkSet {
    pub points: Vec<Point2D>,
}

impl FaceLandmarkSet {
    pub fn new(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    /// Landmark at `index`, `None` when out of range or non-finite
    pub fn get(&self, index: usize) -> Option<Point2D> {
        self.points.get(index).copied().filter(Point2D::is_finite)
    }

    pub fn landmark(&self, landmark: FaceLandmark) -> Option<Point2D> {
        self.get(landmark.index())
    }

    /// Carries the full face topology
    pub fn is_complete(&self) -> bool {
        self.points.len() >= FACE_LANDMARK_COUNT
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One detected hand
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HandLandmarkSet {
    pub points: Vec<Point2D>,
    pub handedness: Handedness,
}

impl HandLandmarkSet {
    pub fn new(points: Vec<Point2D>, handedness: Handedness) -> Self {
        Self { points, handedness }
    }

    /// Landmark at `index`, `None` when out of range or non-finite
    pub fn get(&self, index: usize) -> Option<Point2D> {
        self.points.get(index).copied().filter(Point2D::is_finite)
    }

    pub fn wrist(&self) -> Option<Point2D> {
        self.get(WRIST)
    }

    pub fn tip(&self, finger: Finger) -> Option<Point2D> {
        self.get(finger.tip())
    }

    pub fn base(&self, finger: Finger) -> Option<Point2D> {
        self.get(finger.base())
    }

    /// Carries the full hand topology
    pub fn is_complete(&self) -> bool {
        self.points.len() >= HAND_LANDMARK_COUNT
    }
}

/// Landmarks for the current tick
///
/// Replaced wholesale every read. No merging or smoothing happens here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameSnapshot {
    pub face: Option<FaceLandmarkSet>,
    pub hands: Vec<HandLandmarkSet>,
}

impl FrameSnapshot {
    pub fn new(face: Option<FaceLandmarkSet>, hands: Vec<HandLandmarkSet>) -> Self {
        Self { face, hands }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn face(&self) -> Option<&FaceLandmarkSet> {
        self.face.as_ref()
    }

    pub fn hands(&self) -> &[HandLandmarkSet] {
        &self.hands
    }

    pub fn is_empty(&self) -> bool {
        self.face.is_none() && self.hands.is_empty()
    }
}
