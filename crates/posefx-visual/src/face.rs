//! Face features - mouth, eyes and nose from the face mesh
//!
//! Every extractor accepts an absent face. Defaults on missing data:
//! - mouth: closed
//! - eyes: OPEN (only a positively measured small gap means closed)
//! - nose: none
//!
//! The asymmetric eye default is intentional. A wink callout must never be
//! triggered by a face that simply dropped out of tracking.

use posefx_core::{distance, FaceLandmark, FaceLandmarkSet, Point2D};

use crate::FeatureThresholds;

/// Which eye
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EyeSide {
    Left,
    Right,
}

impl EyeSide {
    fn lids(self) -> (FaceLandmark, FaceLandmark) {
        match self {
            EyeSide::Left => (FaceLandmark::LeftEyeUpperLid, FaceLandmark::LeftEyeLowerLid),
            EyeSide::Right => (
                FaceLandmark::RightEyeUpperLid,
                FaceLandmark::RightEyeLowerLid,
            ),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EyeSide::Left => "left",
            EyeSide::Right => "right",
        }
    }
}

fn complete(face: Option<&FaceLandmarkSet>) -> Option<&FaceLandmarkSet> {
    face.filter(|f| f.is_complete())
}

/// Inner-lip gap, `None` without a complete face
pub fn mouth_gap(face: Option<&FaceLandmarkSet>) -> Option<f32> {
    let face = complete(face)?;
    let upper = face.landmark(FaceLandmark::UpperInnerLip)?;
    let lower = face.landmark(FaceLandmark::LowerInnerLip)?;
    Some(upper.distance(&lower))
}

/// Eyelid gap, `None` without a complete face or when a lid is missing
pub fn eye_gap(face: Option<&FaceLandmarkSet>, side: EyeSide) -> Option<f32> {
    let face = complete(face)?;
    let (upper, lower) = side.lids();
    let upper = face.landmark(upper)?;
    let lower = face.landmark(lower)?;
    Some(upper.distance(&lower))
}

/// Mouth open with default thresholds
pub fn is_mouth_open(face: Option<&FaceLandmarkSet>) -> bool {
    is_mouth_open_with(face, &FeatureThresholds::default())
}

pub fn is_mouth_open_with(face: Option<&FaceLandmarkSet>, thresholds: &FeatureThresholds) -> bool {
    let Some(face) = complete(face) else {
        return false;
    };
    let gap = distance(
        face.landmark(FaceLandmark::UpperInnerLip),
        face.landmark(FaceLandmark::LowerInnerLip),
    );
    gap > thresholds.mouth_open_gap
}

/// Eye open with default thresholds
pub fn is_eye_open(face: Option<&FaceLandmarkSet>, side: EyeSide) -> bool {
    is_eye_open_with(face, side, &FeatureThresholds::default())
}

pub fn is_eye_open_with(
    face: Option<&FaceLandmarkSet>,
    side: EyeSide,
    thresholds: &FeatureThresholds,
) -> bool {
    match eye_gap(face, side) {
        Some(gap) => gap > thresholds.eye_open_gap,
        None => true,
    }
}

/// Nose tip, `None` without a complete face
pub fn nose_center(face: Option<&FaceLandmarkSet>) -> Option<Point2D> {
    complete(face)?.landmark(FaceLandmark::NoseTip)
}

/// All face-derived signals for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceSignals {
    pub present: bool,
    pub mouth_open: bool,
    pub left_eye_open: bool,
    pub right_eye_open: bool,
    pub nose: Option<Point2D>,
    /// Raw gaps behind the booleans, for on-canvas labels
    pub mouth_gap: Option<f32>,
    pub left_eye_gap: Option<f32>,
    pub right_eye_gap: Option<f32>,
}

impl FaceSignals {
    pub fn extract(face: Option<&FaceLandmarkSet>, thresholds: &FeatureThresholds) -> Self {
        Self {
            present: complete(face).is_some(),
            mouth_open: is_mouth_open_with(face, thresholds),
            left_eye_open: is_eye_open_with(face, EyeSide::Left, thresholds),
            right_eye_open: is_eye_open_with(face, EyeSide::Right, thresholds),
            nose: nose_center(face),
            mouth_gap: mouth_gap(face),
            left_eye_gap: eye_gap(face, EyeSide::Left),
            right_eye_gap: eye_gap(face, EyeSide::Right),
        }
    }

    /// Defaults for "no face"
    pub fn absent() -> Self {
        Self::extract(None, &FeatureThresholds::default())
    }
}
