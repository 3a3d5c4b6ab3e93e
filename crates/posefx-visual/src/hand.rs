//! Hand features - wrists, fingertips, extension and fist
//!
//! Hands are reported in provider detection order. That order is not
//! stable across ticks when the hand count changes, so nothing here keys
//! state on a hand's position in the list.

use posefx_core::{Finger, HandLandmarkSet, Point2D};

use crate::FeatureThresholds;

/// Coarse hand shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandGesture {
    Fist,
    Open,
}

impl HandGesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandGesture::Fist => "Fist",
            HandGesture::Open => "Open",
        }
    }
}

/// Wrist per hand, in detection order
pub fn wrist_positions(hands: &[HandLandmarkSet]) -> Vec<Option<Point2D>> {
    hands.iter().map(HandLandmarkSet::wrist).collect()
}

/// Fingertips per hand (thumb to pinky), in detection order
pub fn fingertip_positions(hands: &[HandLandmarkSet]) -> Vec<[Option<Point2D>; 5]> {
    hands
        .iter()
        .map(|hand| Finger::ALL.map(|finger| hand.tip(finger)))
        .collect()
}

/// Finger extended with default thresholds
pub fn is_finger_extended(hand: &HandLandmarkSet, finger: Finger) -> bool {
    is_finger_extended_with(hand, finger, &FeatureThresholds::default())
}

/// Tip reaches further from the wrist than the base plus a tolerance
///
/// False when the wrist, tip or base is missing.
pub fn is_finger_extended_with(
    hand: &HandLandmarkSet,
    finger: Finger,
    thresholds: &FeatureThresholds,
) -> bool {
    let (Some(wrist), Some(tip), Some(base)) = (hand.wrist(), hand.tip(finger), hand.base(finger))
    else {
        return false;
    };
    tip.distance(&wrist) > base.distance(&wrist) + thresholds.extension_tolerance
}

/// Extension flags for all five fingers
pub fn extended_fingers(hand: &HandLandmarkSet, thresholds: &FeatureThresholds) -> [bool; 5] {
    Finger::ALL.map(|finger| is_finger_extended_with(hand, finger, thresholds))
}

/// Fist with default thresholds
pub fn is_hand_fist(hand: &HandLandmarkSet) -> bool {
    is_hand_fist_with(hand, &FeatureThresholds::default())
}

/// Enough fingertips curled in close to the wrist
///
/// A missing fingertip does not count as curled. Incomplete hands are never
/// a fist.
pub fn is_hand_fist_with(hand: &HandLandmarkSet, thresholds: &FeatureThresholds) -> bool {
    closed_finger_count(hand, thresholds) >= thresholds.fist_min_closed
}

/// Fingertips within the fist radius of the wrist
pub fn closed_finger_count(hand: &HandLandmarkSet, thresholds: &FeatureThresholds) -> usize {
    if !hand.is_complete() {
        return 0;
    }
    let Some(wrist) = hand.wrist() else {
        return 0;
    };
    Finger::ALL
        .iter()
        .filter_map(|finger| hand.tip(*finger))
        .filter(|tip| tip.distance(&wrist) < thresholds.fist_radius)
        .count()
}

pub fn hand_gesture(hand: &HandLandmarkSet, thresholds: &FeatureThresholds) -> HandGesture {
    if is_hand_fist_with(hand, thresholds) {
        HandGesture::Fist
    } else {
        HandGesture::Open
    }
}

/// Index fingertip of the first hand pointing with its index finger
///
/// First match in detection order wins.
pub fn pointing_fingertip(
    hands: &[HandLandmarkSet],
    thresholds: &FeatureThresholds,
) -> Option<Point2D> {
    hands
        .iter()
        .find(|hand| is_finger_extended_with(hand, Finger::Index, thresholds))
        .and_then(|hand| hand.tip(Finger::Index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use posefx_core::{Handedness, HAND_LANDMARK_COUNT};

    const WRIST_AT: Point2D = Point2D { x: 300.0, y: 400.0 };
    const BASE_REACH: f32 = 60.0;

    /// Hand pointing up with each fingertip `reach[i]` above the wrist
    ///
    /// Bases sit 60 above the wrist, so a finger is extended past 80 and
    /// curled under 100.
    fn hand_with(reach: [f32; 5]) -> HandLandmarkSet {
        hand_at(WRIST_AT, reach)
    }

    fn hand_at(wrist: Point2D, reach: [f32; 5]) -> HandLandmarkSet {
        let mut points = vec![wrist; HAND_LANDMARK_COUNT];
        for (i, finger) in Finger::ALL.iter().enumerate() {
            let x = wrist.x - 40.0 + 20.0 * i as f32;
            points[finger.base()] = Point2D::new(x, wrist.y - BASE_REACH);
            points[finger.tip()] = Point2D::new(x, wrist.y - reach[i]);
        }
        HandLandmarkSet::new(points, Handedness::Right)
    }

    fn reach_of(points: &HandLandmarkSet, finger: Finger) -> f32 {
        points.tip(finger).unwrap().distance(&points.wrist().unwrap())
    }

    #[test]
    fn test_finger_extended() {
        let hand = hand_with([50.0, 160.0, 50.0, 50.0, 50.0]);
        assert!(is_finger_extended(&hand, Finger::Index));
        assert!(!is_finger_extended(&hand, Finger::Middle));
        assert_eq!(
            extended_fingers(&hand, &FeatureThresholds::default()),
            [false, true, false, false, false]
        );
    }

    #[test]
    fn test_finger_extended_needs_tolerance() {
        // Tip just past base but inside the 20 unit tolerance
        let hand = hand_with([70.0, 70.0, 70.0, 70.0, 70.0]);
        assert!(reach_of(&hand, Finger::Ring) > BASE_REACH);
        assert!(!is_finger_extended(&hand, Finger::Ring));
    }

    #[test]
    fn test_fist_boundary() {
        // Exactly three curled fingers -> fist
        let three = hand_with([50.0, 50.0, 50.0, 160.0, 160.0]);
        assert!(is_hand_fist(&three));
        // Exactly two -> not a fist
        let two = hand_with([50.0, 50.0, 160.0, 160.0, 160.0]);
        assert!(!is_hand_fist(&two));
        assert_eq!(hand_gesture(&two, &FeatureThresholds::default()), HandGesture::Open);
    }

    #[test]
    fn test_fist_radius_is_strict() {
        // Curled fingers sit exactly on the radius, which is not "below"
        let hand = hand_with([100.0, 100.0, 100.0, 160.0, 160.0]);
        assert_eq!(closed_finger_count(&hand, &FeatureThresholds::default()), 0);
        assert!(!is_hand_fist(&hand));
    }

    #[test]
    fn test_incomplete_hand_is_not_fist() {
        let mut hand = hand_with([50.0; 5]);
        assert!(is_hand_fist(&hand));
        hand.points.truncate(20);
        assert!(!is_hand_fist(&hand));
    }

    #[test]
    fn test_missing_landmarks_are_not_extended() {
        let mut hand = hand_with([160.0; 5]);
        hand.points[Finger::Index.base()] = Point2D::new(f32::INFINITY, 0.0);
        assert!(!is_finger_extended(&hand, Finger::Index));
        assert!(is_finger_extended(&hand, Finger::Middle));
    }

    #[test]
    fn test_positions_in_detection_order() {
        let a = hand_at(Point2D::new(100.0, 400.0), [160.0; 5]);
        let b = hand_at(Point2D::new(500.0, 400.0), [50.0; 5]);
        let hands = vec![a, b];

        let wrists = wrist_positions(&hands);
        assert_eq!(
            wrists,
            vec![Some(Point2D::new(100.0, 400.0)), Some(Point2D::new(500.0, 400.0))]
        );

        let tips = fingertip_positions(&hands);
        assert_eq!(tips.len(), 2);
        assert_eq!(tips[0][1], Some(Point2D::new(80.0, 240.0)));
        assert_eq!(tips[1][4], Some(Point2D::new(540.0, 350.0)));

        assert!(wrist_positions(&[]).is_empty());
    }

    #[test]
    fn test_pointing_first_match_wins() {
        let fist = hand_at(Point2D::new(100.0, 400.0), [50.0; 5]);
        let first_pointer = hand_at(Point2D::new(300.0, 400.0), [50.0, 160.0, 50.0, 50.0, 50.0]);
        let second_pointer = hand_at(Point2D::new(500.0, 400.0), [50.0, 160.0, 50.0, 50.0, 50.0]);
        let hands = vec![fist, first_pointer, second_pointer];

        let tip = pointing_fingertip(&hands, &FeatureThresholds::default());
        assert_eq!(tip, Some(Point2D::new(280.0, 240.0)));
        assert!(pointing_fingertip(&hands[..1], &FeatureThresholds::default()).is_none());
    }
}
