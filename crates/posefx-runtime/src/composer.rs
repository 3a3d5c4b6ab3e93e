//! Effect composer - turns signals and state into draw commands
//!
//! Layer order, bottom to top:
//! 1. pixelation
//! 2. face landmarks
//! 3. hand skeletons
//! 4. freehand paths
//! 5. wrist circle
//! 6. wink callout and staged quote
//! 7. data labels

use posefx_core::{map_range, FrameSnapshot, HandLandmarkSet, Point2D, HAND_CONNECTIONS};
use posefx_visual::{viridis, Color, DrawingPathSet, FaceSignals, Reveal, WinkState};

use crate::{ControlState, DataStreamFormatter, DrawCommand, TextAlign, TextStyle};

/// Wrist distance range mapped onto the circle radius
pub const WRIST_DISTANCE_RANGE: (f32, f32) = (50.0, 400.0);
/// Wrist circle radius range
pub const WRIST_CIRCLE_RANGE: (f32, f32) = (20.0, 200.0);

/// Circle radius for a wrist-to-wrist distance, clamped to 20..=200
pub fn wrist_circle_radius(distance: f32) -> f32 {
    map_range(
        distance,
        WRIST_DISTANCE_RANGE.0,
        WRIST_DISTANCE_RANGE.1,
        WRIST_CIRCLE_RANGE.0,
        WRIST_CIRCLE_RANGE.1,
    )
}

/// Centre and radius of the circle between the first two wrists
pub fn wrist_circle(hands: &[HandLandmarkSet]) -> Option<(Point2D, f32)> {
    let a = hands.first()?.wrist()?;
    let b = hands.get(1)?.wrist()?;
    Some((a.midpoint(&b), wrist_circle_radius(a.distance(&b))))
}

/// Presentation constants
#[derive(Debug, Clone)]
pub struct ComposerStyle {
    pub face_point_radius: f32,
    pub face_color: Color,
    pub joint_radius: f32,
    pub bone_width: f32,
    pub bone_color: Color,
    pub circle_color: Color,
    pub callout_text: String,
    pub callout_style: TextStyle,
    /// Callout offset above the nose
    pub callout_offset: f32,
    pub quote_style: TextStyle,
    /// Quote offset below the nose
    pub quote_offset: f32,
    pub label_style: TextStyle,
}

impl Default for ComposerStyle {
    fn default() -> Self {
        Self {
            face_point_radius: 1.0,
            face_color: Color::rgb(0x30, 0xff, 0x30),
            joint_radius: 4.0,
            bone_width: 2.0,
            bone_color: Color::WHITE,
            circle_color: Color::rgb(0xff, 0x40, 0x80),
            callout_text: "Wink!".to_string(),
            callout_style: TextStyle::new(48.0, Color::YELLOW),
            callout_offset: 120.0,
            quote_style: TextStyle::new(32.0, Color::WHITE),
            quote_offset: 140.0,
            label_style: TextStyle::new(14.0, Color::WHITE).aligned(TextAlign::Left),
        }
    }
}

/// Per-tick inputs
#[derive(Debug, Clone, Copy)]
pub struct EffectInputs<'a> {
    pub snapshot: &'a FrameSnapshot,
    pub face: &'a FaceSignals,
    pub wink: WinkState,
    pub reveal: Option<&'a Reveal>,
    pub paths: &'a DrawingPathSet,
}

#[derive(Debug, Clone, Default)]
pub struct EffectComposer {
    style: ComposerStyle,
}

impl EffectComposer {
    pub fn new(style: ComposerStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ComposerStyle {
        &self.style
    }

    /// Draw commands for every enabled layer
    pub fn compose(
        &self,
        control: &ControlState,
        inputs: &EffectInputs<'_>,
        formatter: &DataStreamFormatter,
    ) -> Vec<DrawCommand> {
        let mut out = Vec::new();
        let hands = inputs.snapshot.hands();

        if control.show_pixelation {
            out.push(DrawCommand::Pixelate {
                block_size: control.pixel_size,
            });
        }

        if control.show_face {
            if let Some(face) = inputs.snapshot.face() {
                self.face_points(&face.points, &mut out);
            }
        }

        if control.show_hands {
            for hand in hands {
                self.hand_skeleton(hand, &mut out);
            }
        }

        if control.show_fingertip_drawing {
            self.paths(inputs.paths, control, &mut out);
        }

        if control.wrist_circle_trigger {
            if let Some((center, radius)) = wrist_circle(hands) {
                out.push(DrawCommand::FillCircle {
                    center,
                    radius,
                    color: self.style.circle_color,
                });
            }
        }

        if let Some(nose) = inputs.face.nose {
            if control.wink_trigger && inputs.wink.is_winking() {
                out.push(DrawCommand::Text {
                    at: nose.offset(0.0, -self.style.callout_offset),
                    text: self.style.callout_text.clone(),
                    style: self.style.callout_style,
                });
            }
            if control.mouth_text_trigger {
                if let Some(reveal) = inputs.reveal {
                    out.push(DrawCommand::Text {
                        at: nose.offset(0.0, self.style.quote_offset),
                        text: reveal.text.clone(),
                        style: self.style.quote_style,
                    });
                }
            }
        }

        if control.show_data_on_visualization {
            self.labels(inputs, formatter, &mut out);
        }

        out
    }

    fn face_points(&self, points: &[Point2D], out: &mut Vec<DrawCommand>) {
        out.extend(
            points
                .iter()
                .filter(|p| p.is_finite())
                .map(|p| DrawCommand::FillCircle {
                    center: *p,
                    radius: self.style.face_point_radius,
                    color: self.style.face_color,
                }),
        );
    }

    fn hand_skeleton(&self, hand: &HandLandmarkSet, out: &mut Vec<DrawCommand>) {
        for (from, to) in HAND_CONNECTIONS {
            if let (Some(a), Some(b)) = (hand.get(from), hand.get(to)) {
                out.push(DrawCommand::Line {
                    from: a,
                    to: b,
                    color: self.style.bone_color,
                    width: self.style.bone_width,
                });
            }
        }
        let last = hand.points.len().saturating_sub(1).max(1) as f32;
        for (i, point) in hand.points.iter().enumerate() {
            if point.is_finite() {
                out.push(DrawCommand::FillCircle {
                    center: *point,
                    radius: self.style.joint_radius,
                    color: viridis(i as f32 / last),
                });
            }
        }
    }

    fn paths(&self, paths: &DrawingPathSet, control: &ControlState, out: &mut Vec<DrawCommand>) {
        let color = control.drawing_color();
        let width = control.drawing_line_width;
        for path in paths.iter() {
            match path.len() {
                0 => {}
                1 => out.push(DrawCommand::FillCircle {
                    center: path.points()[0].point,
                    radius: width / 2.0,
                    color,
                }),
                _ => out.push(DrawCommand::Polyline {
                    points: path.positions().collect(),
                    color,
                    width,
                }),
            }
        }
    }

    fn labels(
        &self,
        inputs: &EffectInputs<'_>,
        formatter: &DataStreamFormatter,
        out: &mut Vec<DrawCommand>,
    ) {
        if let Some(nose) = inputs.face.nose {
            out.push(DrawCommand::Text {
                at: nose.offset(60.0, 0.0),
                text: formatter.face_label(inputs.face),
                style: self.style.label_style,
            });
        }
        for (i, hand) in inputs.snapshot.hands().iter().enumerate() {
            if let Some(wrist) = hand.wrist() {
                out.push(DrawCommand::Text {
                    at: wrist.offset(0.0, 24.0),
                    text: formatter.hand_label(i, hand),
                    style: self.style.label_style,
                });
            }
        }
    }
}
