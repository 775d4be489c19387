//! Poll/vote controller: owns the rendered view, the read sequence and the
//! per-option vote gate.

use std::{
    collections::HashSet,
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::Duration,
};

use shared::domain::{ResultsSnapshot, VoteOption};
use tokio::{
    sync::broadcast,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::backend::ResultsBackend;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusMessage {
    #[default]
    Empty,
    Submitting,
    Submitted,
    Error(String),
}

impl StatusMessage {
    pub fn is_error(&self) -> bool {
        matches!(self, StatusMessage::Error(_))
    }

    /// The failure text without the `Error: ` prefix used for display.
    pub fn error_description(&self) -> Option<&str> {
        match self {
            StatusMessage::Error(description) => Some(description),
            _ => None,
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::Empty => Ok(()),
            StatusMessage::Submitting => f.write_str("Submitting your vote..."),
            StatusMessage::Submitted => f.write_str("Vote submitted successfully!"),
            StatusMessage::Error(description) => write!(f, "Error: {description}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// `None` until the first successful read.
    pub results: Option<ResultsSnapshot>,
    pub status: StatusMessage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    ResultsUpdated(ResultsSnapshot),
    StatusChanged(StatusMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer read had already been applied when this one resolved.
    Stale,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Submitted,
    Failed,
    AlreadyInFlight,
}

struct ViewInner {
    view: ViewState,
    applied_read: u64,
}

pub struct PollVoteController {
    backend: Arc<dyn ResultsBackend>,
    poll_interval: Duration,
    inner: Mutex<ViewInner>,
    issued_reads: AtomicU64,
    inflight_votes: Mutex<HashSet<VoteOption>>,
    events: broadcast::Sender<ControllerEvent>,
}

impl PollVoteController {
    pub fn new(backend: Arc<dyn ResultsBackend>) -> Arc<Self> {
        Self::with_poll_interval(backend, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(backend: Arc<dyn ResultsBackend>, poll_interval: Duration) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            backend,
            poll_interval,
            inner: Mutex::new(ViewInner {
                view: ViewState::default(),
                applied_read: 0,
            }),
            issued_reads: AtomicU64::new(0),
            inflight_votes: Mutex::new(HashSet::new()),
            events,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn view(&self) -> ViewState {
        self.lock_inner().view.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn fetch_results(&self) -> FetchOutcome {
        let seq = self.issued_reads.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(seq, "fetching results");

        match self.backend.fetch_results().await {
            Ok(snapshot) => {
                let changed = {
                    let mut inner = self.lock_inner();
                    if seq < inner.applied_read {
                        debug!(
                            seq,
                            applied = inner.applied_read,
                            "discarding stale results response"
                        );
                        return FetchOutcome::Stale;
                    }
                    inner.applied_read = seq;
                    let changed = inner.view.results != Some(snapshot);
                    inner.view.results = Some(snapshot);
                    changed
                };
                if changed {
                    let _ = self.events.send(ControllerEvent::ResultsUpdated(snapshot));
                }
                FetchOutcome::Applied
            }
            Err(err) => {
                warn!(seq, error = %err, "failed to fetch results");
                self.set_status(StatusMessage::Error(err.to_string()));
                FetchOutcome::Failed
            }
        }
    }

    pub async fn cast_vote(&self, option: VoteOption) -> VoteOutcome {
        let Some(_gate) = self.try_begin_vote(option) else {
            debug!(option = option.as_str(), "vote already in flight, ignoring");
            return VoteOutcome::AlreadyInFlight;
        };

        self.set_status(StatusMessage::Submitting);
        match self.backend.submit_vote(option).await {
            Ok(()) => {
                info!(option = option.as_str(), "vote submitted");
                self.set_status(StatusMessage::Submitted);
                self.fetch_results().await;
                VoteOutcome::Submitted
            }
            Err(err) => {
                warn!(option = option.as_str(), error = %err, "vote submission failed");
                self.set_status(StatusMessage::Error(err.to_string()));
                VoteOutcome::Failed
            }
        }
    }

    /// Fetches once right away, then on every poll interval until the
    /// returned handle is stopped or dropped.
    pub fn start(self: &Arc<Self>) -> PollerHandle {
        let controller = Arc::clone(self);
        let period = self.poll_interval.max(MIN_POLL_INTERVAL);
        info!(interval_ms = period.as_millis() as u64, "results poller started");
        let task = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let controller = Arc::clone(&controller);
                tokio::spawn(async move {
                    controller.fetch_results().await;
                });
            }
        });
        PollerHandle { task: Some(task) }
    }

    fn set_status(&self, status: StatusMessage) {
        {
            let mut inner = self.lock_inner();
            inner.view.status = status.clone();
        }
        let _ = self.events.send(ControllerEvent::StatusChanged(status));
    }

    fn try_begin_vote(&self, option: VoteOption) -> Option<InflightVote<'_>> {
        let mut inflight = lock_or_recover(&self.inflight_votes);
        if !inflight.insert(option) {
            return None;
        }
        Some(InflightVote {
            votes: &self.inflight_votes,
            option,
        })
    }

    fn lock_inner(&self) -> MutexGuard<'_, ViewInner> {
        lock_or_recover(&self.inner)
    }
}

fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Releases the option's vote gate when the submission finishes, however it ends.
struct InflightVote<'a> {
    votes: &'a Mutex<HashSet<VoteOption>>,
    option: VoteOption,
}

impl Drop for InflightVote<'_> {
    fn drop(&mut self) {
        lock_or_recover(self.votes).remove(&self.option);
    }
}

pub struct PollerHandle {
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("results poller stopped");
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
