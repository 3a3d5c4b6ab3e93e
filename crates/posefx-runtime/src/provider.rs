//! Pose provider polling
//!
//! Every tick the loop takes a request sequence number and fires the face
//! and hand detections as two independent tasks. Whichever finishes writes
//! its slot; there is no joining and no cancellation. A slow request keeps
//! running in the background and still writes when it lands.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use posefx_core::{FaceLandmarkSet, HandLandmarkSet, PosefxError, PosefxResult};

use crate::LandmarkSlots;

/// Boxed detection future
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = PosefxResult<T>> + Send + 'a>>;

/// External pose-estimation provider
pub trait PoseProvider: Send + Sync + 'static {
    /// At most one face
    fn poll_face(&self) -> ProviderFuture<'_, Option<FaceLandmarkSet>>;

    /// Zero or more hands, in detection order
    fn poll_hands(&self) -> ProviderFuture<'_, Vec<HandLandmarkSet>>;
}

/// Provider health as seen by the engine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProviderState {
    #[default]
    Starting,
    Ready,
    Unavailable(String),
}

/// The two independent detections behind a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorKind {
    Face,
    Hands,
}

impl DetectorKind {
    pub fn name(self) -> &'static str {
        match self {
            DetectorKind::Face => "face",
            DetectorKind::Hands => "hands",
        }
    }
}

#[derive(Debug, Default)]
struct StatusInner {
    face: ProviderState,
    hands: ProviderState,
    reported: bool,
    pending_message: Option<String>,
}

impl StatusInner {
    fn detector_mut(&mut self, kind: DetectorKind) -> &mut ProviderState {
        match kind {
            DetectorKind::Face => &mut self.face,
            DetectorKind::Hands => &mut self.hands,
        }
    }
}

/// Per-detector health plus the one-time unavailability message
#[derive(Debug, Default)]
pub struct ProviderStatus {
    inner: Mutex<StatusInner>,
}

impl ProviderStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combined health: unavailable if either detector is failing, ready
    /// once both have answered
    pub fn state(&self) -> ProviderState {
        let inner = self.inner.lock();
        match (&inner.face, &inner.hands) {
            (ProviderState::Unavailable(reason), _) | (_, ProviderState::Unavailable(reason)) => {
                ProviderState::Unavailable(reason.clone())
            }
            (ProviderState::Ready, ProviderState::Ready) => ProviderState::Ready,
            _ => ProviderState::Starting,
        }
    }

    pub fn detector_state(&self, kind: DetectorKind) -> ProviderState {
        let mut inner = self.inner.lock();
        inner.detector_mut(kind).clone()
    }

    pub fn report_success(&self, kind: DetectorKind) {
        let mut inner = self.inner.lock();
        let state = inner.detector_mut(kind);
        if *state != ProviderState::Ready {
            info!(detector = kind.name(), "pose detector ready");
            *state = ProviderState::Ready;
        }
    }

    /// Record a failure; returns true the first time only
    pub fn report_failure(&self, kind: DetectorKind, error: &PosefxError) -> bool {
        let mut inner = self.inner.lock();
        *inner.detector_mut(kind) = ProviderState::Unavailable(error.to_string());
        if inner.reported {
            debug!(detector = kind.name(), %error, "pose detector still failing");
            return false;
        }
        warn!(detector = kind.name(), %error, "pose detector failed, keeping last landmarks");
        inner.reported = true;
        inner.pending_message = Some(error.to_string());
        true
    }

    /// Status message for the control surface, handed out once
    pub fn take_message(&self) -> Option<String> {
        self.inner.lock().pending_message.take()
    }
}

fn store_face(
    slots: &LandmarkSlots,
    status: &ProviderStatus,
    sequence: u64,
    result: PosefxResult<Option<FaceLandmarkSet>>,
) {
    match result {
        Ok(face) => {
            status.report_success(DetectorKind::Face);
            slots.write_face(sequence, face);
        }
        Err(e) => {
            status.report_failure(DetectorKind::Face, &e);
        }
    }
}

fn store_hands(
    slots: &LandmarkSlots,
    status: &ProviderStatus,
    sequence: u64,
    result: PosefxResult<Vec<HandLandmarkSet>>,
) {
    match result {
        Ok(hands) => {
            status.report_success(DetectorKind::Hands);
            slots.write_hands(sequence, hands);
        }
        Err(e) => {
            status.report_failure(DetectorKind::Hands, &e);
        }
    }
}

/// Fixed-interval detection loop
pub struct PollingLoop<P> {
    provider: Arc<P>,
    slots: Arc<LandmarkSlots>,
    status: Arc<ProviderStatus>,
    interval: Duration,
    sequence: AtomicU64,
}

impl<P: PoseProvider> PollingLoop<P> {
    pub fn new(
        provider: Arc<P>,
        slots: Arc<LandmarkSlots>,
        status: Arc<ProviderStatus>,
        interval: Duration,
    ) -> Self {
        Self {
            provider,
            slots,
            status,
            interval,
            sequence: AtomicU64::new(0),
        }
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Run one detection round and wait for both results
    pub async fn poll_once(&self) -> u64 {
        let sequence = self.next_sequence();
        let (face, hands) =
            tokio::join!(self.provider.poll_face(), self.provider.poll_hands());
        store_face(&self.slots, &self.status, sequence, face);
        store_hands(&self.slots, &self.status, sequence, hands);
        sequence
    }

    /// Fire one detection round without waiting for it
    pub fn dispatch(&self) -> u64 {
        let sequence = self.next_sequence();

        let provider = self.provider.clone();
        let slots = self.slots.clone();
        let status = self.status.clone();
        tokio::spawn(async move {
            let result = provider.poll_face().await;
            store_face(&slots, &status, sequence, result);
        });

        let provider = self.provider.clone();
        let slots = self.slots.clone();
        let status = self.status.clone();
        tokio::spawn(async move {
            let result = provider.poll_hands().await;
            store_hands(&slots, &status, sequence, result);
        });

        sequence
    }

    /// Start polling on the current runtime
    pub fn spawn(self) -> PollingHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval_ms = self.interval.as_millis() as u64, "polling started");
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.dispatch();
                    }
                    // Only `true` is ever sent; a dropped handle also stops the loop
                    _ = shutdown_rx.changed() => break,
                }
            }
            info!(ticks = self.sequence.load(Ordering::Relaxed), "polling stopped");
        });
        PollingHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// Handle to a running polling loop
pub struct PollingHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollingHandle {
    /// Stop issuing requests; in-flight detections still complete
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!(error = %e, "polling task ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posefx_core::{Handedness, Point2D};
    use std::sync::atomic::AtomicUsize;

    struct FixedProvider {
        hands: usize,
        fail_face: bool,
        fail_hands: bool,
        calls: AtomicUsize,
    }

    impl PoseProvider for FixedProvider {
        fn poll_face(&self) -> ProviderFuture<'_, Option<FaceLandmarkSet>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if self.fail_face {
                    return Err(PosefxError::ProviderUnavailable("model failed to load".into()));
                }
                Ok(Some(FaceLandmarkSet::new(vec![Point2D::new(1.0, 1.0); 478])))
            })
        }

        fn poll_hands(&self) -> ProviderFuture<'_, Vec<HandLandmarkSet>> {
            Box::pin(async move {
                if self.fail_hands {
                    return Err(PosefxError::ProviderUnavailable("hand model missing".into()));
                }
                Ok((0..self.hands)
                    .map(|_| HandLandmarkSet::new(vec![Point2D::default(); 21], Handedness::Left))
                    .collect())
            })
        }
    }

    type Fixture = (
        PollingLoop<FixedProvider>,
        Arc<LandmarkSlots>,
        Arc<ProviderStatus>,
    );

    fn setup_with(hands: usize, fail_face: bool, fail_hands: bool) -> Fixture {
        let provider = Arc::new(FixedProvider {
            hands,
            fail_face,
            fail_hands,
            calls: AtomicUsize::new(0),
        });
        let slots = Arc::new(LandmarkSlots::default());
        let status = Arc::new(ProviderStatus::new());
        let interval = Duration::from_millis(10);
        let polling = PollingLoop::new(provider, slots.clone(), status.clone(), interval);
        (polling, slots, status)
    }

    fn setup(hands: usize, fail: bool) -> Fixture {
        setup_with(hands, fail, fail)
    }

    #[tokio::test]
    async fn test_poll_once_fills_slots() {
        let (polling, slots, status) = setup(2, false);
        assert_eq!(status.state(), ProviderState::Starting);

        assert_eq!(polling.poll_once().await, 1);
        let snapshot = slots.snapshot();
        assert!(snapshot.face.is_some());
        assert_eq!(snapshot.hands.len(), 2);
        assert_eq!(status.state(), ProviderState::Ready);
        assert_eq!(slots.sequences(), (1, 1));
    }

    #[tokio::test]
    async fn test_failure_reported_once() {
        let (polling, slots, status) = setup(1, true);
        polling.poll_once().await;
        polling.poll_once().await;

        assert!(slots.snapshot().is_empty());
        assert!(matches!(status.state(), ProviderState::Unavailable(_)));
        let message = status.take_message().unwrap();
        assert!(message.contains("model failed to load"));
        assert!(status.take_message().is_none());
    }

    #[tokio::test]
    async fn test_one_failing_detector_keeps_state_steady() {
        let (polling, slots, status) = setup_with(1, false, true);
        for _ in 0..3 {
            polling.poll_once().await;
            assert!(matches!(status.state(), ProviderState::Unavailable(_)));
        }

        assert_eq!(status.detector_state(DetectorKind::Face), ProviderState::Ready);
        assert!(matches!(
            status.detector_state(DetectorKind::Hands),
            ProviderState::Unavailable(_)
        ));
        assert!(slots.snapshot().face.is_some());
        assert!(slots.snapshot().hands.is_empty());

        let message = status.take_message().unwrap();
        assert!(message.contains("hand model missing"));
        assert!(status.take_message().is_none());
    }

    #[test]
    fn test_ready_needs_both_detectors() {
        let status = ProviderStatus::new();
        status.report_success(DetectorKind::Face);
        assert_eq!(status.state(), ProviderState::Starting);
        status.report_success(DetectorKind::Face);
        status.report_success(DetectorKind::Hands);
        assert_eq!(status.state(), ProviderState::Ready);

        let error = PosefxError::ProviderUnavailable("camera unplugged".into());
        assert!(status.report_failure(DetectorKind::Face, &error));
        assert!(!status.report_failure(DetectorKind::Face, &error));
        assert!(matches!(status.state(), ProviderState::Unavailable(_)));

        // recovery of the failing detector restores the combined state
        status.report_success(DetectorKind::Face);
        assert_eq!(status.state(), ProviderState::Ready);
    }

    #[tokio::test]
    async fn test_spawned_loop_polls_until_shutdown() {
        let (polling, slots, _status) = setup(1, false);
        let provider = polling.provider.clone();
        let handle = polling.spawn();

        tokio::time::sleep(Duration::from_millis(60)).await;
        handle.shutdown().await;
        // Let in-flight detections land
        tokio::time::sleep(Duration::from_millis(20)).await;

        let calls = provider.calls.load(Ordering::SeqCst);
        assert!(calls >= 2, "expected several polls, got {}", calls);
        assert_eq!(slots.snapshot().hands.len(), 1);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), calls);
    }
}
