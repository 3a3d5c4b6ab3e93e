//! Scripted pose provider with detection chaos
//!
//! Simulates a real landmark model:
//! - Latency with jitter
//! - Transient failures
//! - Permanent unavailability (model never loads)
//!
//! Face and hand requests draw from the same seeded RNG, so a given seed
//! always produces the same latencies in the same call order.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use posefx_core::{FaceLandmarkSet, HandLandmarkSet, PosefxError};
use posefx_runtime::{PoseProvider, ProviderFuture};

/// Detection latency distribution
#[derive(Clone, Debug)]
pub enum LatencyDistribution {
    Fixed { ms: u64 },
    Uniform { min_ms: u64, max_ms: u64 },
    /// Heavy tail, capped at one second
    Pareto { scale_ms: f64, shape: f64 },
}

impl LatencyDistribution {
    pub fn sample(&self, rng: &mut StdRng) -> Duration {
        match self {
            LatencyDistribution::Fixed { ms } => Duration::from_millis(*ms),
            LatencyDistribution::Uniform { min_ms, max_ms } => {
                if min_ms >= max_ms {
                    return Duration::from_millis(*min_ms);
                }
                let dist = Uniform::new(*min_ms, *max_ms);
                Duration::from_millis(dist.sample(rng))
            }
            LatencyDistribution::Pareto { scale_ms, shape } => {
                let u: f64 = rng.gen_range(f64::EPSILON..1.0);
                let value = scale_ms / u.powf(1.0 / shape);
                Duration::from_millis(value.min(1000.0) as u64)
            }
        }
    }
}

/// Provider behaviour
#[derive(Clone, Debug)]
pub struct DetectionChaos {
    pub latency: LatencyDistribution,
    /// Chance a single request fails (0.0 - 1.0)
    pub failure_rate: f64,
    /// Every request fails, as when the model cannot load
    pub unavailable: bool,
}

impl Default for DetectionChaos {
    fn default() -> Self {
        DetectionChaos {
            latency: LatencyDistribution::Fixed { ms: 0 },
            failure_rate: 0.0,
            unavailable: false,
        }
    }
}

impl DetectionChaos {
    /// Typical in-browser model: 20-60ms per request
    pub fn realistic() -> Self {
        DetectionChaos {
            latency: LatencyDistribution::Uniform {
                min_ms: 20,
                max_ms: 60,
            },
            failure_rate: 0.01,
            unavailable: false,
        }
    }

    /// Slow device: latencies regularly exceed the polling interval
    pub fn sluggish() -> Self {
        DetectionChaos {
            latency: LatencyDistribution::Pareto {
                scale_ms: 80.0,
                shape: 1.5,
            },
            failure_rate: 0.05,
            unavailable: false,
        }
    }

    pub fn unavailable() -> Self {
        DetectionChaos {
            unavailable: true,
            ..Default::default()
        }
    }
}

/// One scripted detection result
#[derive(Clone, Debug, Default)]
pub struct ScriptFrame {
    pub face: Option<FaceLandmarkSet>,
    pub hands: Vec<HandLandmarkSet>,
}

impl ScriptFrame {
    pub fn new(face: Option<FaceLandmarkSet>, hands: Vec<HandLandmarkSet>) -> Self {
        Self { face, hands }
    }
}

#[derive(Debug)]
struct Script {
    frames: VecDeque<ScriptFrame>,
    current: ScriptFrame,
}

impl Script {
    /// Advance to the next frame; the last frame repeats once the script runs out
    fn advance(&mut self) -> &ScriptFrame {
        if let Some(next) = self.frames.pop_front() {
            self.current = next;
        }
        &self.current
    }
}

#[derive(Debug, Default, Clone)]
pub struct ProviderCounters {
    pub face_requests: u64,
    pub hand_requests: u64,
    pub failures: u64,
}

/// Provider that plays back a script of detection results
///
/// Face and hand requests advance independent cursors through the script.
pub struct ScriptedProvider {
    chaos: DetectionChaos,
    rng: Mutex<StdRng>,
    face_script: Mutex<Script>,
    hand_script: Mutex<Script>,
    counters: Mutex<ProviderCounters>,
}

impl ScriptedProvider {
    pub fn new(frames: Vec<ScriptFrame>, chaos: DetectionChaos) -> Self {
        Self::with_seed(frames, chaos, rand::random())
    }

    pub fn with_seed(frames: Vec<ScriptFrame>, chaos: DetectionChaos, seed: u64) -> Self {
        let script = || Script {
            frames: frames.iter().cloned().collect(),
            current: ScriptFrame::default(),
        };
        ScriptedProvider {
            chaos,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            face_script: Mutex::new(script()),
            hand_script: Mutex::new(script()),
            counters: Mutex::new(ProviderCounters::default()),
        }
    }

    /// Same result forever
    pub fn constant(frame: ScriptFrame) -> Self {
        Self::with_seed(vec![frame], DetectionChaos::default(), 0)
    }

    pub fn counters(&self) -> ProviderCounters {
        self.counters.lock().clone()
    }

    /// Latency and failure decision for one request
    fn roll(&self) -> (Duration, bool) {
        let mut rng = self.rng.lock();
        let latency = self.chaos.latency.sample(&mut rng);
        let failed = self.chaos.unavailable
            || (self.chaos.failure_rate > 0.0 && rng.gen_bool(self.chaos.failure_rate.min(1.0)));
        if failed {
            self.counters.lock().failures += 1;
        }
        (latency, failed)
    }

    fn failure(&self) -> PosefxError {
        if self.chaos.unavailable {
            PosefxError::ProviderUnavailable("landmark model failed to load".into())
        } else {
            PosefxError::ProviderUnavailable("detection request failed".into())
        }
    }
}

impl PoseProvider for ScriptedProvider {
    fn poll_face(&self) -> ProviderFuture<'_, Option<FaceLandmarkSet>> {
        self.counters.lock().face_requests += 1;
        let (latency, failed) = self.roll();
        let face = self.face_script.lock().advance().face.clone();
        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if failed {
                return Err(self.failure());
            }
            Ok(face)
        })
    }

    fn poll_hands(&self) -> ProviderFuture<'_, Vec<HandLandmarkSet>> {
        self.counters.lock().hand_requests += 1;
        let (latency, failed) = self.roll();
        let hands = self.hand_script.lock().advance().hands.clone();
        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if failed {
                return Err(self.failure());
            }
            Ok(hands)
        })
    }
}
