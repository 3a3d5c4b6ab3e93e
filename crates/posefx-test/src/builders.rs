//! Synthetic landmark builders
//!
//! Produce full-size landmark sets whose feature-relevant points sit at
//! controlled distances, so tests can aim just above or below thresholds.

use posefx_core::{
    FaceLandmark, FaceLandmarkSet, Finger, HandLandmarkSet, Handedness, Point2D,
    FACE_LANDMARK_COUNT, HAND_LANDMARK_COUNT,
};

/// Builds a face centred on the nose
#[derive(Debug, Clone)]
pub struct FaceBuilder {
    nose: Point2D,
    mouth_gap: f32,
    left_eye_gap: f32,
    right_eye_gap: f32,
}

impl Default for FaceBuilder {
    fn default() -> Self {
        Self {
            nose: Point2D::new(320.0, 220.0),
            mouth_gap: 2.0,
            left_eye_gap: 12.0,
            right_eye_gap: 12.0,
        }
    }
}

impl FaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nose(mut self, nose: Point2D) -> Self {
        self.nose = nose;
        self
    }

    pub fn mouth_gap(mut self, gap: f32) -> Self {
        self.mouth_gap = gap;
        self
    }

    pub fn mouth_open(self) -> Self {
        self.mouth_gap(30.0)
    }

    pub fn mouth_closed(self) -> Self {
        self.mouth_gap(2.0)
    }

    pub fn eye_gaps(mut self, left: f32, right: f32) -> Self {
        self.left_eye_gap = left;
        self.right_eye_gap = right;
        self
    }

    /// Left eye closed, right open
    pub fn left_wink(self) -> Self {
        self.eye_gaps(2.0, 12.0)
    }

    /// Right eye closed, left open
    pub fn right_wink(self) -> Self {
        self.eye_gaps(12.0, 2.0)
    }

    pub fn blink(self) -> Self {
        self.eye_gaps(2.0, 2.0)
    }

    pub fn build(&self) -> FaceLandmarkSet {
        let mut points = vec![self.nose; FACE_LANDMARK_COUNT];

        let mouth_top = self.nose.offset(0.0, 40.0);
        points[FaceLandmark::UpperInnerLip.index()] = mouth_top;
        points[FaceLandmark::LowerInnerLip.index()] = mouth_top.offset(0.0, self.mouth_gap);

        let left_lid = self.nose.offset(-40.0, -40.0);
        points[FaceLandmark::LeftEyeUpperLid.index()] = left_lid;
        points[FaceLandmark::LeftEyeLowerLid.index()] = left_lid.offset(0.0, self.left_eye_gap);

        let right_lid = self.nose.offset(40.0, -40.0);
        points[FaceLandmark::RightEyeUpperLid.index()] = right_lid;
        points[FaceLandmark::RightEyeLowerLid.index()] = right_lid.offset(0.0, self.right_eye_gap);

        FaceLandmarkSet::new(points)
    }
}

/// Distance from wrist to each finger base
const BASE_REACH: f32 = 60.0;
const CURLED_REACH: f32 = 40.0;
const EXTENDED_REACH: f32 = 160.0;

/// Builds an upright hand: fingers point up from the wrist
#[derive(Debug, Clone)]
pub struct HandBuilder {
    wrist: Point2D,
    handedness: Handedness,
    extended: [bool; 5],
}

impl HandBuilder {
    pub fn at(wrist: Point2D) -> Self {
        Self {
            wrist,
            handedness: Handedness::Unknown,
            extended: [false; 5],
        }
    }

    pub fn handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }

    pub fn extend(mut self, finger: Finger) -> Self {
        self.extended[finger.position()] = true;
        self
    }

    /// All fingers curled into the palm
    pub fn fist(mut self) -> Self {
        self.extended = [false; 5];
        self
    }

    pub fn open(mut self) -> Self {
        self.extended = [true; 5];
        self
    }

    /// Only the index finger extended
    pub fn pointing(self) -> Self {
        self.fist().extend(Finger::Index)
    }

    /// Where the index fingertip ends up when pointing
    pub fn index_tip(&self) -> Point2D {
        self.tip_point(Finger::Index, true)
    }

    fn tip_point(&self, finger: Finger, extended: bool) -> Point2D {
        let reach = if extended { EXTENDED_REACH } else { CURLED_REACH };
        self.wrist.offset(Self::spread(finger), -reach)
    }

    fn spread(finger: Finger) -> f32 {
        -40.0 + 20.0 * finger.position() as f32
    }

    pub fn build(&self) -> HandLandmarkSet {
        let mut points = vec![self.wrist; HAND_LANDMARK_COUNT];
        for finger in Finger::ALL {
            let dx = Self::spread(finger);
            let extended = self.extended[finger.position()];
            points[finger.base()] = self.wrist.offset(dx, -BASE_REACH);
            // Joints between base and tip
            for joint in finger.base() + 1..finger.tip() {
                points[joint] = self.wrist.offset(dx, -BASE_REACH - 10.0);
            }
            points[finger.tip()] = self.tip_point(finger, extended);
        }
        HandLandmarkSet::new(points, self.handedness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posefx_visual::{
        extended_fingers, hand_gesture, is_eye_open, is_mouth_open, pointing_fingertip, EyeSide,
        FeatureThresholds, HandGesture,
    };
    use proptest::prelude::*;

    #[test]
    fn test_face_builder_thresholds() {
        let face = FaceBuilder::new().mouth_open().left_wink().build();
        assert!(face.is_complete());
        assert!(is_mouth_open(Some(&face)));
        assert!(!is_eye_open(Some(&face), EyeSide::Left));
        assert!(is_eye_open(Some(&face), EyeSide::Right));

        let closed = FaceBuilder::new().build();
        assert!(!is_mouth_open(Some(&closed)));

        let blink = FaceBuilder::new().blink().build();
        assert!(!is_eye_open(Some(&blink), EyeSide::Left));
        assert!(!is_eye_open(Some(&blink), EyeSide::Right));
    }

    #[test]
    fn test_hand_builder_handedness() {
        let hand = HandBuilder::at(Point2D::new(200.0, 400.0))
            .handedness(Handedness::Right)
            .build();
        assert_eq!(hand.handedness, Handedness::Right);
        let default = HandBuilder::at(Point2D::new(0.0, 400.0)).build();
        assert_eq!(default.handedness, Handedness::Unknown);
    }

    #[test]
    fn test_hand_builder_gestures() {
        let thresholds = FeatureThresholds::default();
        let fist = HandBuilder::at(Point2D::new(200.0, 400.0)).fist().build();
        let open = HandBuilder::at(Point2D::new(200.0, 400.0)).open().build();
        assert_eq!(hand_gesture(&fist, &thresholds), HandGesture::Fist);
        assert_eq!(hand_gesture(&open, &thresholds), HandGesture::Open);
    }

    #[test]
    fn test_pointing_tip() {
        let builder = HandBuilder::at(Point2D::new(200.0, 400.0)).pointing();
        let hands = vec![builder.build()];
        assert_eq!(
            pointing_fingertip(&hands, &FeatureThresholds::default()),
            Some(builder.index_tip())
        );
    }

    proptest! {
        #[test]
        fn prop_mouth_gap_tracks_threshold(gap in prop_oneof![0f32..14.5, 15.5f32..100.0]) {
            let threshold = FeatureThresholds::default().mouth_open_gap;
            let face = FaceBuilder::new().mouth_gap(gap).build();
            prop_assert_eq!(is_mouth_open(Some(&face)), gap > threshold);
        }

        #[test]
        fn prop_extended_fingers_follow_builder(mask in proptest::array::uniform5(any::<bool>())) {
            let mut builder = HandBuilder::at(Point2D::new(200.0, 400.0)).fist();
            for (finger, extended) in Finger::ALL.into_iter().zip(mask) {
                if extended {
                    builder = builder.extend(finger);
                }
            }
            let thresholds = FeatureThresholds::default();
            prop_assert_eq!(extended_fingers(&builder.build(), &thresholds), mask);
        }
    }
}
