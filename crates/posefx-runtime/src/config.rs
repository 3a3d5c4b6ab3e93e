//! Control and engine configuration
//!
//! `ControlState` is what the UI layer toggles. The engine only reads it;
//! changing it goes through `Engine::apply_control` so trigger-enable events
//! can reset the state machines.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use posefx_core::{PosefxError, PosefxResult};
use posefx_visual::{Color, FeatureThresholds};

use crate::SlotPolicy;

/// Longest accepted per-word display time (one minute)
pub const MAX_WORD_DISPLAY_MS: u64 = 60_000;

/// Telemetry panel entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataStreamOption {
    MouthState,
    EyeState,
    NosePosition,
    WristPositions,
    WristDistance,
    FingertipPositions,
    HandGesture,
    FingerExtension,
}

impl DataStreamOption {
    pub const ALL: [DataStreamOption; 8] = [
        DataStreamOption::MouthState,
        DataStreamOption::EyeState,
        DataStreamOption::NosePosition,
        DataStreamOption::WristPositions,
        DataStreamOption::WristDistance,
        DataStreamOption::FingertipPositions,
        DataStreamOption::HandGesture,
        DataStreamOption::FingerExtension,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DataStreamOption::MouthState => "mouth_state",
            DataStreamOption::EyeState => "eye_state",
            DataStreamOption::NosePosition => "nose_position",
            DataStreamOption::WristPositions => "wrist_positions",
            DataStreamOption::WristDistance => "wrist_distance",
            DataStreamOption::FingertipPositions => "fingertip_positions",
            DataStreamOption::HandGesture => "hand_gesture",
            DataStreamOption::FingerExtension => "finger_extension",
        }
    }
}

/// Default quote for the mouth-text trigger
pub const DEFAULT_QUOTE: &str = "The only way to do great work is to love what you do";

/// Toggles and parameters owned by the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlState {
    pub show_face: bool,
    pub show_hands: bool,
    pub show_data_stream: bool,
    pub show_data_on_visualization: bool,
    pub show_pixelation: bool,
    pub show_fingertip_drawing: bool,
    pub wink_trigger: bool,
    pub mouth_text_trigger: bool,
    pub wrist_circle_trigger: bool,
    /// Pixelation block size in pixels
    pub pixel_size: u32,
    /// How long each quote word stays before the next appears
    pub word_display_ms: u64,
    pub quote: String,
    /// `#rrggbb`
    pub drawing_color: String,
    pub drawing_line_width: f32,
    pub data_stream_options: BTreeSet<DataStreamOption>,
    pub thresholds: FeatureThresholds,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            show_face: true,
            show_hands: true,
            show_data_stream: false,
            show_data_on_visualization: false,
            show_pixelation: false,
            show_fingertip_drawing: false,
            wink_trigger: false,
            mouth_text_trigger: false,
            wrist_circle_trigger: false,
            pixel_size: 10,
            word_display_ms: 500,
            quote: DEFAULT_QUOTE.to_string(),
            drawing_color: "#00ffff".to_string(),
            drawing_line_width: 4.0,
            data_stream_options: DataStreamOption::ALL.into_iter().collect(),
            thresholds: FeatureThresholds::default(),
        }
    }
}

impl ControlState {
    /// Parse from JSON, missing fields take their defaults
    pub fn from_json(json: &str) -> PosefxResult<Self> {
        let control: ControlState =
            serde_json::from_str(json).map_err(|e| PosefxError::Config(e.to_string()))?;
        control.validate()?;
        Ok(control)
    }

    pub fn to_json(&self) -> PosefxResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PosefxError::Config(e.to_string()))
    }

    pub fn validate(&self) -> PosefxResult<()> {
        if self.pixel_size == 0 {
            return Err(PosefxError::InvalidConfig(
                "pixel_size must be at least 1".into(),
            ));
        }
        if self.word_display_ms == 0 || self.word_display_ms > MAX_WORD_DISPLAY_MS {
            return Err(PosefxError::InvalidConfig(format!(
                "word_display_ms must be in 1..={}, got {}",
                MAX_WORD_DISPLAY_MS, self.word_display_ms
            )));
        }
        if !self.drawing_line_width.is_finite() || self.drawing_line_width <= 0.0 {
            return Err(PosefxError::InvalidConfig(format!(
                "drawing_line_width must be positive, got {}",
                self.drawing_line_width
            )));
        }
        Color::from_hex(&self.drawing_color)?;
        self.thresholds.validate()
    }

    pub fn word_display(&self) -> Duration {
        Duration::from_millis(self.word_display_ms)
    }

    /// Parsed drawing colour, cyan if the string is not a colour
    pub fn drawing_color(&self) -> Color {
        Color::from_hex(&self.drawing_color).unwrap_or(Color::CYAN)
    }
}

/// Engine configuration
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Detection polling interval
    pub poll_interval: Duration,
    /// How landmark slots treat out-of-order results
    pub slot_policy: SlotPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            poll_interval: Duration::from_millis(100),
            slot_policy: SlotPolicy::LastWriteWins,
        }
    }
}
