//! End-to-end scenario harness
//!
//! Drives an `Engine` through a timeline of detection results and animation
//! frames on a manual clock. Every rendered frame is checked for:
//! - Quote reveals that shrink without wrapping
//! - Finalized paths lost without a clear

use std::time::Duration;

use thiserror::Error;

use posefx_core::{Clock, FaceLandmarkSet, HandLandmarkSet, ManualClock, PosefxError, Timestamp};
use posefx_runtime::{ControlState, Engine, EngineConfig, Frame, SlotWrite};
use posefx_visual::WinkState;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("engine rejected control: {0}")]
    Control(#[from] PosefxError),

    #[error("step {step} goes back in time")]
    TimeTravel { step: usize },
}

/// One event on the timeline
#[derive(Clone, Debug)]
pub enum ScenarioEvent {
    /// A face detection lands with this request sequence
    Face {
        sequence: u64,
        face: Option<FaceLandmarkSet>,
    },
    /// A hand detection lands with this request sequence
    Hands {
        sequence: u64,
        hands: Vec<HandLandmarkSet>,
    },
    /// Replace the control state
    Control(ControlState),
    ClearDrawing,
    /// Render one frame
    Render,
}

#[derive(Clone, Debug)]
pub struct ScenarioStep {
    pub at: Timestamp,
    pub event: ScenarioEvent,
}

/// Timeline builder with a moving cursor
#[derive(Clone, Debug, Default)]
pub struct Scenario {
    control: ControlState,
    config: EngineConfig,
    steps: Vec<ScenarioStep>,
    cursor: Timestamp,
    sequence: u64,
}

impl Scenario {
    pub fn new(control: ControlState) -> Self {
        Self {
            control,
            ..Default::default()
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Move the cursor forward
    pub fn wait(mut self, d: Duration) -> Self {
        self.cursor = self.cursor + d;
        self
    }

    fn push(mut self, event: ScenarioEvent) -> Self {
        self.steps.push(ScenarioStep {
            at: self.cursor,
            event,
        });
        self
    }

    fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    /// Face and hands land together with a fresh sequence
    pub fn detect(mut self, face: Option<FaceLandmarkSet>, hands: Vec<HandLandmarkSet>) -> Self {
        let sequence = self.next_sequence();
        self.push(ScenarioEvent::Face { sequence, face })
            .push(ScenarioEvent::Hands { sequence, hands })
    }

    /// Face result with an explicit sequence, for out-of-order arrival
    pub fn face_result(self, sequence: u64, face: Option<FaceLandmarkSet>) -> Self {
        self.push(ScenarioEvent::Face { sequence, face })
    }

    pub fn hand_result(self, sequence: u64, hands: Vec<HandLandmarkSet>) -> Self {
        self.push(ScenarioEvent::Hands { sequence, hands })
    }

    pub fn control(self, control: ControlState) -> Self {
        self.push(ScenarioEvent::Control(control))
    }

    pub fn clear_drawing(self) -> Self {
        self.push(ScenarioEvent::ClearDrawing)
    }

    pub fn render(self) -> Self {
        self.push(ScenarioEvent::Render)
    }

    /// Render `count` frames `every` apart
    pub fn render_frames(mut self, count: usize, every: Duration) -> Self {
        for _ in 0..count {
            self = self.render().wait(every);
        }
        self
    }

    pub fn steps(&self) -> &[ScenarioStep] {
        &self.steps
    }

    pub fn run(&self) -> Result<ScenarioResult, ScenarioError> {
        ScenarioHarness::new(self)?.run()
    }
}

/// Result of a scenario run
#[derive(Debug, Clone, Default)]
pub struct ScenarioResult {
    pub frames: Vec<Frame>,
    pub stale_writes: usize,
    pub wink_onsets: u64,
    pub paths_finalized: u64,
    /// Paths on screen after the last step
    pub final_paths: usize,
    pub invariant_violations: Vec<String>,
}

impl ScenarioResult {
    pub fn passed(&self) -> bool {
        self.invariant_violations.is_empty()
    }

    /// Revealed text per frame, `None` where nothing was shown
    pub fn reveals(&self) -> Vec<Option<&str>> {
        self.frames
            .iter()
            .map(|f| f.reveal.as_ref().map(|r| r.text.as_str()))
            .collect()
    }

    pub fn winks(&self) -> Vec<WinkState> {
        self.frames.iter().map(|f| f.wink).collect()
    }
}

/// Scenario harness
pub struct ScenarioHarness<'a> {
    scenario: &'a Scenario,
    engine: Engine,
    clock: ManualClock,
}

impl<'a> ScenarioHarness<'a> {
    pub fn new(scenario: &'a Scenario) -> Result<Self, ScenarioError> {
        let engine = Engine::with_config(scenario.config.clone(), scenario.control.clone())?;
        Ok(Self {
            scenario,
            engine,
            clock: ManualClock::new(Timestamp::ZERO),
        })
    }

    pub fn run(mut self) -> Result<ScenarioResult, ScenarioError> {
        let mut result = ScenarioResult::default();
        let mut last_reveal_len: Option<usize> = None;
        let mut last_paths = 0usize;

        let scenario = self.scenario;
        for (i, step) in scenario.steps.iter().enumerate() {
            if step.at < self.clock.now() {
                return Err(ScenarioError::TimeTravel { step: i });
            }
            self.clock.set(step.at);
            let now = self.clock.now();

            match &step.event {
                ScenarioEvent::Face { sequence, face } => {
                    if self.engine.on_face_result(*sequence, face.clone()) == SlotWrite::Stale {
                        result.stale_writes += 1;
                    }
                }
                ScenarioEvent::Hands { sequence, hands } => {
                    if self.engine.on_hand_result(*sequence, hands.clone()) == SlotWrite::Stale {
                        result.stale_writes += 1;
                    }
                }
                ScenarioEvent::Control(control) => {
                    self.engine.apply_control(control.clone(), now)?;
                    last_reveal_len = None;
                }
                ScenarioEvent::ClearDrawing => {
                    self.engine.clear_drawing();
                    last_paths = 0;
                }
                ScenarioEvent::Render => {
                    let frame = self.engine.render_frame(now);

                    match (&frame.reveal, last_reveal_len) {
                        (Some(reveal), Some(prev)) => {
                            let len = reveal.word_index + 1;
                            // Wraps back to one word after a full cycle
                            if len < prev && len != 1 {
                                result.invariant_violations.push(format!(
                                    "frame {}: reveal shrank from {} to {} words",
                                    result.frames.len(),
                                    prev,
                                    len
                                ));
                            }
                            last_reveal_len = Some(len);
                        }
                        (reveal, _) => last_reveal_len = reveal.as_ref().map(|r| r.word_index + 1),
                    }

                    let paths = self.engine.drawing_paths().finalized().len();
                    if paths < last_paths {
                        result.invariant_violations.push(format!(
                            "frame {}: finalized paths dropped from {} to {}",
                            result.frames.len(),
                            last_paths,
                            paths
                        ));
                    }
                    last_paths = paths;

                    result.frames.push(frame);
                }
            }
        }

        let stats = self.engine.stats();
        result.wink_onsets = stats.wink_onsets;
        result.paths_finalized = stats.paths_finalized;
        result.final_paths = self.engine.drawing_paths().iter().count();
        Ok(result)
    }
}

// ============================================================================
// CANNED SCENARIOS
// ============================================================================

const FRAME: Duration = Duration::from_millis(16);

/// Mouth opens, stays open long enough to reveal the whole quote, closes
pub fn mouth_text_scenario() -> Scenario {
    use crate::FaceBuilder;

    let control = ControlState {
        mouth_text_trigger: true,
        word_display_ms: 100,
        quote: "one two three".into(),
        ..Default::default()
    };
    Scenario::new(control)
        .detect(Some(FaceBuilder::new().mouth_closed().build()), vec![])
        .render_frames(3, FRAME)
        .detect(Some(FaceBuilder::new().mouth_open().build()), vec![])
        .render_frames(20, FRAME)
        .detect(Some(FaceBuilder::new().mouth_closed().build()), vec![])
        .render_frames(3, FRAME)
}

/// Point, lift, point again, then clear
pub fn drawing_scenario() -> Scenario {
    use crate::HandBuilder;
    use posefx_core::Point2D;

    let control = ControlState {
        show_fingertip_drawing: true,
        ..Default::default()
    };
    let pointing = |x: f32| HandBuilder::at(Point2D::new(x, 400.0)).pointing().build();

    let mut scenario = Scenario::new(control);
    for x in [100.0, 120.0, 140.0] {
        scenario = scenario.detect(None, vec![pointing(x)]).render().wait(FRAME);
    }
    scenario = scenario.detect(None, vec![]).render().wait(FRAME);
    for x in [300.0, 320.0] {
        scenario = scenario.detect(None, vec![pointing(x)]).render().wait(FRAME);
    }
    scenario
}

/// Several winks separated by open eyes
pub fn wink_scenario(winks: usize) -> Scenario {
    use crate::FaceBuilder;

    let control = ControlState {
        wink_trigger: true,
        ..Default::default()
    };
    let mut scenario = Scenario::new(control);
    for i in 0..winks {
        let wink = if i % 2 == 0 {
            FaceBuilder::new().left_wink()
        } else {
            FaceBuilder::new().right_wink()
        };
        scenario = scenario
            .detect(Some(wink.build()), vec![])
            .render_frames(2, FRAME)
            .detect(Some(FaceBuilder::new().build()), vec![])
            .render_frames(2, FRAME);
    }
    scenario
}
