//! Data stream formatting - telemetry panel lines and on-canvas labels
//!
//! Stateless. Everything is recomputed from the snapshot each tick. Hands
//! are numbered from 1 in output, in detection order.

use std::collections::BTreeMap;

use posefx_core::{Finger, FrameSnapshot, HandLandmarkSet, Point2D};
use posefx_visual::{
    extended_fingers, fingertip_positions, hand_gesture, wrist_positions, FaceSignals,
    FeatureThresholds,
};

use crate::DataStreamOption;

/// One panel line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryLine {
    pub option: DataStreamOption,
    pub text: String,
}

/// Panel lines keyed by option name
pub fn as_map(lines: &[TelemetryLine]) -> BTreeMap<&'static str, String> {
    lines
        .iter()
        .map(|line| (line.option.name(), line.text.clone()))
        .collect()
}

fn fmt_point(point: Option<Point2D>) -> String {
    match point {
        Some(p) => format!("({:.0}, {:.0})", p.x, p.y),
        None => "n/a".to_string(),
    }
}

fn open_closed(open: bool) -> &'static str {
    if open {
        "Open"
    } else {
        "Closed"
    }
}

/// `Open (12)` when the gap was measured, bare `Open` otherwise
fn open_closed_gap(open: bool, gap: Option<f32>) -> String {
    match gap {
        Some(gap) => format!("{} ({:.0})", open_closed(open), gap),
        None => open_closed(open).to_string(),
    }
}

/// Join per-hand parts as `Hand 1 ... | Hand 2 ...`
fn per_hand<T>(items: impl IntoIterator<Item = T>, fmt: impl Fn(T) -> String) -> String {
    let parts: Vec<String> = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| format!("Hand {} {}", i + 1, fmt(item)))
        .collect();
    if parts.is_empty() {
        "no hands".to_string()
    } else {
        parts.join(" | ")
    }
}

/// Maps feature values to display strings
#[derive(Debug, Clone, Default)]
pub struct DataStreamFormatter {
    thresholds: FeatureThresholds,
}

impl DataStreamFormatter {
    pub fn new(thresholds: FeatureThresholds) -> Self {
        Self { thresholds }
    }

    /// One line per enabled option, in option order
    pub fn format<'a>(
        &self,
        options: impl IntoIterator<Item = &'a DataStreamOption>,
        snapshot: &FrameSnapshot,
    ) -> Vec<TelemetryLine> {
        let face = FaceSignals::extract(snapshot.face(), &self.thresholds);
        options
            .into_iter()
            .map(|option| TelemetryLine {
                option: *option,
                text: self.line(*option, &face, snapshot.hands()),
            })
            .collect()
    }

    fn line(
        &self,
        option: DataStreamOption,
        face: &FaceSignals,
        hands: &[HandLandmarkSet],
    ) -> String {
        match option {
            DataStreamOption::MouthState => format!("Mouth: {}", open_closed(face.mouth_open)),
            DataStreamOption::EyeState => format!(
                "Eyes: Left {}, Right {}",
                open_closed(face.left_eye_open),
                open_closed(face.right_eye_open)
            ),
            DataStreamOption::NosePosition => format!("Nose: {}", fmt_point(face.nose)),
            DataStreamOption::WristPositions => format!(
                "Wrists: {}",
                per_hand(wrist_positions(hands), fmt_point)
            ),
            DataStreamOption::WristDistance => {
                let wrists = wrist_positions(hands);
                match (wrists.first().copied().flatten(), wrists.get(1).copied().flatten()) {
                    (Some(a), Some(b)) => format!("Wrist distance: {:.0}", a.distance(&b)),
                    _ => "Wrist distance: n/a".to_string(),
                }
            }
            DataStreamOption::FingertipPositions => format!(
                "Fingertips: {}",
                per_hand(fingertip_positions(hands), |tips| {
                    let parts: Vec<String> = Finger::ALL
                        .iter()
                        .zip(tips)
                        .map(|(finger, tip)| format!("{} {}", finger.name(), fmt_point(tip)))
                        .collect();
                    format!("[{}]", parts.join(", "))
                })
            ),
            DataStreamOption::HandGesture => format!(
                "Gesture: {}",
                per_hand(hands, |hand| hand_gesture(hand, &self.thresholds)
                    .as_str()
                    .to_string())
            ),
            DataStreamOption::FingerExtension => format!(
                "Extended: {}",
                per_hand(hands, |hand| self.extended_names(hand))
            ),
        }
    }

    fn extended_names(&self, hand: &HandLandmarkSet) -> String {
        let names: Vec<&str> = Finger::ALL
            .iter()
            .zip(extended_fingers(hand, &self.thresholds))
            .filter(|(_, extended)| *extended)
            .map(|(finger, _)| finger.name())
            .collect();
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(", ")
        }
    }

    /// Label drawn next to the face, with the measured gaps
    pub fn face_label(&self, face: &FaceSignals) -> String {
        format!(
            "Mouth: {} | Eyes: {}/{}",
            open_closed_gap(face.mouth_open, face.mouth_gap),
            open_closed_gap(face.left_eye_open, face.left_eye_gap),
            open_closed_gap(face.right_eye_open, face.right_eye_gap)
        )
    }

    /// Label drawn next to a hand; `index` is 0-based
    pub fn hand_label(&self, index: usize, hand: &HandLandmarkSet) -> String {
        format!(
            "Hand {} ({}): {} | {}",
            index + 1,
            hand.handedness.as_str(),
            hand_gesture(hand, &self.thresholds).as_str(),
            self.extended_names(hand)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posefx_core::{
        FaceLandmark, FaceLandmarkSet, Handedness, FACE_LANDMARK_COUNT, HAND_LANDMARK_COUNT,
    };
    use proptest::prelude::*;

    fn face(mouth_gap: f32) -> FaceLandmarkSet {
        let mut points = vec![Point2D::new(320.0, 240.0); FACE_LANDMARK_COUNT];
        points[FaceLandmark::NoseTip.index()] = Point2D::new(320.0, 220.0);
        points[FaceLandmark::LowerInnerLip.index()] = Point2D::new(320.0, 240.0 + mouth_gap);
        points[FaceLandmark::LeftEyeLowerLid.index()] = Point2D::new(320.0, 252.0);
        points[FaceLandmark::RightEyeLowerLid.index()] = Point2D::new(320.0, 242.0);
        FaceLandmarkSet::new(points)
    }

    fn hand(wrist: Point2D, reach: f32, handedness: Handedness) -> HandLandmarkSet {
        let mut points = vec![wrist; HAND_LANDMARK_COUNT];
        for finger in Finger::ALL {
            points[finger.base()] = wrist.offset(0.0, -60.0);
            points[finger.tip()] = wrist.offset(0.0, -reach);
        }
        HandLandmarkSet::new(points, handedness)
    }

    fn all_lines(snapshot: &FrameSnapshot) -> BTreeMap<&'static str, String> {
        let formatter = DataStreamFormatter::default();
        as_map(&formatter.format(&DataStreamOption::ALL, snapshot))
    }

    #[test]
    fn test_face_lines() {
        let snapshot = FrameSnapshot::new(Some(face(30.0)), vec![]);
        let lines = all_lines(&snapshot);
        assert_eq!(lines["mouth_state"], "Mouth: Open");
        assert_eq!(lines["eye_state"], "Eyes: Left Open, Right Closed");
        assert_eq!(lines["nose_position"], "Nose: (320, 220)");
    }

    #[test]
    fn test_absent_face_uses_defaults() {
        let lines = all_lines(&FrameSnapshot::empty());
        assert_eq!(lines["mouth_state"], "Mouth: Closed");
        assert_eq!(lines["eye_state"], "Eyes: Left Open, Right Open");
        assert_eq!(lines["nose_position"], "Nose: n/a");
        assert_eq!(lines["wrist_positions"], "Wrists: no hands");
        assert_eq!(lines["wrist_distance"], "Wrist distance: n/a");
    }

    #[test]
    fn test_hand_lines_are_one_indexed() {
        let hands = vec![
            hand(Point2D::new(100.0, 400.0), 50.0, Handedness::Left),
            hand(Point2D::new(400.0, 400.0), 160.0, Handedness::Right),
        ];
        let lines = all_lines(&FrameSnapshot::new(None, hands));
        assert_eq!(
            lines["wrist_positions"],
            "Wrists: Hand 1 (100, 400) | Hand 2 (400, 400)"
        );
        assert_eq!(lines["wrist_distance"], "Wrist distance: 300");
        assert_eq!(lines["hand_gesture"], "Gesture: Hand 1 Fist | Hand 2 Open");
        assert_eq!(
            lines["finger_extension"],
            "Extended: Hand 1 none | Hand 2 thumb, index, middle, ring, pinky"
        );
        assert!(lines["fingertip_positions"].starts_with("Fingertips: Hand 1 [thumb (100, 350)"));
    }

    #[test]
    fn test_only_selected_options() {
        let formatter = DataStreamFormatter::default();
        let lines = formatter.format(&[DataStreamOption::HandGesture], &FrameSnapshot::empty());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Gesture: no hands");
    }

    #[test]
    fn test_labels() {
        let formatter = DataStreamFormatter::default();
        let signals = FaceSignals::extract(Some(&face(2.0)), &FeatureThresholds::default());
        assert_eq!(
            formatter.face_label(&signals),
            "Mouth: Closed (2) | Eyes: Open (12)/Closed (2)"
        );
        assert_eq!(
            formatter.face_label(&FaceSignals::absent()),
            "Mouth: Closed | Eyes: Open/Open"
        );

        let h = hand(Point2D::new(0.0, 400.0), 50.0, Handedness::Left);
        assert_eq!(formatter.hand_label(0, &h), "Hand 1 (Left): Fist | none");
    }

    proptest! {
        #[test]
        fn prop_one_line_per_selected_option(
            picks in proptest::collection::vec(0usize..DataStreamOption::ALL.len(), 0..12),
            hands in 0usize..3,
        ) {
            let options: Vec<DataStreamOption> =
                picks.iter().map(|i| DataStreamOption::ALL[*i]).collect();
            let hands = (0..hands)
                .map(|i| hand(Point2D::new(100.0 * i as f32, 400.0), 160.0, Handedness::Left))
                .collect();
            let snapshot = FrameSnapshot::new(Some(face(30.0)), hands);

            let lines = DataStreamFormatter::default().format(&options, &snapshot);
            prop_assert_eq!(lines.len(), options.len());
            for (line, option) in lines.iter().zip(&options) {
                prop_assert_eq!(line.option, *option);
                prop_assert!(!line.text.is_empty());
            }
        }
    }
}
