//! Live engine runs
//!
//! Real tokio polling loop against a `ScriptedProvider`, with the render
//! side ticking on its own interval. Verifies that slow or failing
//! detection never stalls rendering.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;

use posefx_core::{Clock, PosefxResult, SystemClock};
use posefx_runtime::{ControlState, Engine, EngineConfig, PollingLoop, ProviderState};

use crate::{DetectionChaos, ScriptFrame, ScriptedProvider};

/// Live run configuration
#[derive(Clone, Debug)]
pub struct LiveRunConfig {
    pub engine: EngineConfig,
    pub control: ControlState,
    pub chaos: DetectionChaos,
    pub seed: u64,
    /// Render interval (16ms ~ 60fps)
    pub frame_interval: Duration,
    pub frames: usize,
}

impl Default for LiveRunConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig {
                poll_interval: Duration::from_millis(20),
                ..Default::default()
            },
            control: ControlState::default(),
            chaos: DetectionChaos::default(),
            seed: 0,
            frame_interval: Duration::from_millis(5),
            frames: 30,
        }
    }
}

impl LiveRunConfig {
    pub fn with_chaos(mut self, chaos: DetectionChaos) -> Self {
        self.chaos = chaos;
        self
    }

    pub fn with_control(mut self, control: ControlState) -> Self {
        self.control = control;
        self
    }
}

/// Result of a live run
#[derive(Debug, Clone)]
pub struct LiveRunResult {
    pub frames_rendered: usize,
    /// Frames that saw a face or at least one hand
    pub frames_with_landmarks: usize,
    pub face_requests: u64,
    pub provider_failures: u64,
    pub status_messages: Vec<String>,
    pub provider_state: ProviderState,
    /// Longest single `render_frame` call
    pub worst_frame: Duration,
}

impl LiveRunResult {
    /// Every requested frame was produced
    pub fn never_stalled(&self, expected: usize) -> bool {
        self.frames_rendered == expected
    }
}

/// Run the engine live for `config.frames` frames
pub async fn run_live(
    script: Vec<ScriptFrame>,
    config: LiveRunConfig,
) -> PosefxResult<LiveRunResult> {
    let mut engine = Engine::with_config(config.engine.clone(), config.control.clone())?;
    let chaos = config.chaos.clone();
    let provider = Arc::new(ScriptedProvider::with_seed(script, chaos, config.seed));

    let polling = PollingLoop::new(
        provider.clone(),
        engine.slots(),
        engine.status(),
        config.engine.poll_interval,
    );
    let handle = polling.spawn();

    let clock = SystemClock::new();
    let mut ticker = tokio::time::interval(config.frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut frames_with_landmarks = 0;
    let mut status_messages = Vec::new();
    let mut worst_frame = Duration::ZERO;

    for _ in 0..config.frames {
        ticker.tick().await;
        let started = Instant::now();
        let frame = engine.render_frame(clock.now());
        worst_frame = worst_frame.max(started.elapsed());

        if frame.face.present || !engine.slots().hands().is_empty() {
            frames_with_landmarks += 1;
        }
        status_messages.extend(frame.status_message);
    }

    handle.shutdown().await;

    let counters = provider.counters();
    Ok(LiveRunResult {
        frames_rendered: engine.stats().frames as usize,
        frames_with_landmarks,
        face_requests: counters.face_requests,
        provider_failures: counters.failures,
        status_messages,
        provider_state: engine.provider_state(),
        worst_frame,
    })
}
