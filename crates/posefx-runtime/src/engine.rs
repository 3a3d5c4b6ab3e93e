//! posefx Engine - per-frame loop
//!
//! One `render_frame` call:
//! 1. Read the latest face and hand slots (never waits)
//! 2. Extract face signals
//! 3. Advance wink, mouth text and drawing state machines
//! 4. Compose draw commands for enabled layers
//! 5. Format telemetry if the panel is on
//! 6. Hand out a pending provider status message

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info};

use posefx_core::{FaceLandmarkSet, HandLandmarkSet, PosefxResult, Timestamp};
use posefx_visual::{
    pointing_fingertip, DrawingPathAccumulator, DrawingPathSet, DrawingPhase, FaceSignals,
    MouthTextProgression, Reveal, WinkDetector, WinkState,
};

use crate::{
    ControlState, DataStreamFormatter, DrawCommand, EffectComposer, EffectInputs, EngineConfig,
    LandmarkSlots, ProviderState, ProviderStatus, SlotStats, SlotWrite, TelemetryLine,
};

/// Engine shared between threads
pub type SharedEngine = Arc<Mutex<Engine>>;

#[derive(Clone, Debug, Default)]
pub struct EngineStats {
    pub frames: u64,
    pub wink_onsets: u64,
    pub paths_finalized: u64,
    /// Slot writes as of the last frame
    pub slots: SlotStats,
    pub last_frame_duration: Duration,
}

/// Output of one rendered frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub timestamp: Timestamp,
    pub commands: Vec<DrawCommand>,
    /// Present while the data stream panel is enabled
    pub telemetry: Option<Vec<TelemetryLine>>,
    pub face: FaceSignals,
    pub wink: WinkState,
    pub reveal: Option<Reveal>,
    pub drawing: DrawingPhase,
    /// One-time provider status message
    pub status_message: Option<String>,
}

/// The gesture/effect engine
pub struct Engine {
    config: EngineConfig,
    control: ControlState,
    slots: Arc<LandmarkSlots>,
    status: Arc<ProviderStatus>,
    formatter: DataStreamFormatter,
    composer: EffectComposer,
    wink: WinkDetector,
    mouth_text: MouthTextProgression,
    drawing: DrawingPathAccumulator,
    stats: EngineStats,
}

impl Engine {
    /// Create an engine with default configuration and controls
    pub fn new() -> Self {
        Self::build(EngineConfig::default(), ControlState::default())
    }

    /// Create an engine with custom configuration and controls
    pub fn with_config(config: EngineConfig, control: ControlState) -> PosefxResult<Self> {
        control.validate()?;
        Ok(Self::build(config, control))
    }

    fn build(config: EngineConfig, control: ControlState) -> Self {
        let mut mouth_text = MouthTextProgression::new(control.word_display());
        if control.mouth_text_trigger {
            mouth_text.enable(&control.quote, Timestamp::ZERO);
        }
        Engine {
            slots: Arc::new(LandmarkSlots::new(config.slot_policy)),
            status: Arc::new(ProviderStatus::new()),
            formatter: DataStreamFormatter::new(control.thresholds),
            composer: EffectComposer::default(),
            wink: WinkDetector::new(),
            mouth_text,
            drawing: DrawingPathAccumulator::new(),
            stats: EngineStats::default(),
            config,
            control,
        }
    }

    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    pub fn with_composer(mut self, composer: EffectComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn control(&self) -> &ControlState {
        &self.control
    }

    /// Landmark slots for the detection side
    pub fn slots(&self) -> Arc<LandmarkSlots> {
        Arc::clone(&self.slots)
    }

    /// Provider status for the detection side
    pub fn status(&self) -> Arc<ProviderStatus> {
        Arc::clone(&self.status)
    }

    pub fn provider_state(&self) -> ProviderState {
        self.status.state()
    }

    /// Face detection completed
    pub fn on_face_result(&self, sequence: u64, face: Option<FaceLandmarkSet>) -> SlotWrite {
        self.slots.write_face(sequence, face)
    }

    /// Hand detection completed
    pub fn on_hand_result(&self, sequence: u64, hands: Vec<HandLandmarkSet>) -> SlotWrite {
        self.slots.write_hands(sequence, hands)
    }

    /// Apply a new control state from the UI layer
    ///
    /// Enabling the mouth-text trigger, or changing the quote while it is
    /// on, re-tokenizes the quote and restarts the reveal. Enabling the wink
    /// trigger resets the wink detector. Turning drawing off finalizes the
    /// active path.
    pub fn apply_control(&mut self, control: ControlState, now: Timestamp) -> PosefxResult<()> {
        control.validate()?;
        let prev = std::mem::replace(&mut self.control, control);

        if self.control.mouth_text_trigger
            && (!prev.mouth_text_trigger || prev.quote != self.control.quote)
        {
            self.mouth_text.enable(&self.control.quote, now);
        }
        self.mouth_text.set_word_display(self.control.word_display());

        if self.control.wink_trigger && !prev.wink_trigger {
            self.wink.reset();
        }

        if prev.show_fingertip_drawing && !self.control.show_fingertip_drawing {
            self.finish_drawing();
        }

        self.formatter = DataStreamFormatter::new(self.control.thresholds);
        debug!(control = ?self.control, "control updated");
        Ok(())
    }

    /// Clear every drawing path
    pub fn clear_drawing(&mut self) {
        self.drawing.clear();
        info!("drawing cleared");
    }

    pub fn drawing_paths(&self) -> &DrawingPathSet {
        self.drawing.paths()
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    fn finish_drawing(&mut self) {
        let before = self.drawing.finalized_total();
        self.drawing.finish();
        self.stats.paths_finalized += self.drawing.finalized_total() - before;
    }

    /// Render one frame from whatever the slots hold right now
    pub fn render_frame(&mut self, now: Timestamp) -> Frame {
        let started = Instant::now();
        let snapshot = self.slots.snapshot();
        let thresholds = self.control.thresholds;

        let face = FaceSignals::extract(snapshot.face(), &thresholds);

        let wink = if self.control.wink_trigger {
            let onsets = self.wink.onsets();
            let state = self.wink.update(face.left_eye_open, face.right_eye_open);
            self.stats.wink_onsets += self.wink.onsets() - onsets;
            state
        } else {
            WinkState::from_eyes(face.left_eye_open, face.right_eye_open)
        };

        let reveal = if self.control.mouth_text_trigger {
            self.mouth_text.update(face.mouth_open, now)
        } else {
            None
        };

        let drawing = if self.control.show_fingertip_drawing {
            let intent = pointing_fingertip(snapshot.hands(), &thresholds);
            let before = self.drawing.finalized_total();
            let phase = self.drawing.update(intent, now);
            self.stats.paths_finalized += self.drawing.finalized_total() - before;
            phase
        } else {
            self.drawing.phase()
        };

        let inputs = EffectInputs {
            snapshot: &snapshot,
            face: &face,
            wink,
            reveal: reveal.as_ref(),
            paths: self.drawing.paths(),
        };
        let commands = self.composer.compose(&self.control, &inputs, &self.formatter);

        let telemetry = self
            .control
            .show_data_stream
            .then(|| self.formatter.format(&self.control.data_stream_options, &snapshot));

        self.stats.frames += 1;
        self.stats.slots = self.slots.stats();
        self.stats.last_frame_duration = started.elapsed();

        Frame {
            timestamp: now,
            commands,
            telemetry,
            face,
            wink,
            reveal,
            drawing,
            status_message: self.status.take_message(),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
