// ── Monitor: the polling task ──
//
// Owns the lifecycle of polling: started when the view mounts, cancelled when
// it unmounts. Every cycle (ticked or manual) runs as its own tracked task
// and publishes through one watch slot. Cycles may overlap; the poll
// generation taken at cycle start decides which result is kept.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Local;
use strum::Display;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::error::CoreError;
use crate::model::{NetworkSnapshot, PollState, PollStatus};
use crate::poll::{error_message, poll_cycle};
use crate::source::NetworkSource;

/// `tokio::time::interval` rejects a zero period.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// What started a poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Trigger {
    Tick,
    Manual,
}

struct Shared<S> {
    source: S,
    config: MonitorConfig,
    state: watch::Sender<PollStatus>,
    next_generation: AtomicU64,
}

impl<S> Shared<S> {
    /// Claim a generation and mark a cycle in flight.
    fn begin(&self) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.state.send_modify(|status| status.in_flight += 1);
        generation
    }

    /// Settle a cycle. `outcome` is `None` when the cycle was cancelled.
    fn finish(
        &self,
        generation: u64,
        outcome: Option<Result<NetworkSnapshot, CoreError>>,
        cancel: &CancellationToken,
    ) {
        if cancel.is_cancelled() {
            return;
        }

        self.state.send_modify(|status| {
            status.in_flight = status.in_flight.saturating_sub(1);
            let Some(result) = outcome else {
                return;
            };
            if generation <= status.generation {
                debug!(generation, current = status.generation, "discarding stale poll result");
                return;
            }

            status.state = match result {
                Ok(snapshot) => PollState::Ready(Arc::new(snapshot)),
                Err(e) => {
                    warn!(generation, error = %e, "poll cycle failed");
                    PollState::Failed(error_message(&e))
                }
            };
            status.generation = generation;
            status.updated_at = Some(Local::now());
        });
    }
}

/// Background poller publishing [`PollStatus`] updates.
///
/// Dropping a `Monitor` cancels polling; [`shutdown`](Self::shutdown)
/// additionally waits until every task has exited.
pub struct Monitor<S: NetworkSource> {
    shared: Arc<Shared<S>>,
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl<S: NetworkSource> Monitor<S> {
    /// Start polling. The first cycle runs immediately, then one per
    /// `config.interval`. Must be called from within a Tokio runtime.
    pub fn start(source: S, config: MonitorConfig) -> Self {
        let (state, _) = watch::channel(PollStatus::default());
        info!(
            interval_ms = config.interval.as_millis(),
            target = %config.probe_target,
            "starting network monitor"
        );

        let shared = Arc::new(Shared {
            source,
            config,
            state,
            next_generation: AtomicU64::new(0),
        });
        let cancel = CancellationToken::new();
        let tracker = TaskTracker::new();

        tracker.spawn(ticker_task(
            Arc::clone(&shared),
            cancel.clone(),
            tracker.clone(),
        ));

        Self {
            shared,
            cancel,
            tracker,
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<PollStatus> {
        self.shared.state.subscribe()
    }

    /// Current published state.
    pub fn status(&self) -> PollStatus {
        self.shared.state.borrow().clone()
    }

    /// Run one cycle now. The automatic interval is neither paused nor reset.
    pub fn refresh(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.tracker.spawn(run_cycle(
            Arc::clone(&self.shared),
            self.cancel.clone(),
            Trigger::Manual,
        ));
    }

    /// Stop polling and wait for the ticker and any in-flight cycle to exit.
    /// No state is published once this returns.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;
        info!("network monitor stopped");
    }
}

impl<S: NetworkSource> Drop for Monitor<S> {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.tracker.close();
    }
}

async fn ticker_task<S: NetworkSource>(
    shared: Arc<Shared<S>>,
    cancel: CancellationToken,
    tracker: TaskTracker,
) {
    let mut interval = tokio::time::interval(shared.config.interval.max(MIN_INTERVAL));
    // A slow cycle shouldn't cause a burst of catch-up ticks.
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                tracker.spawn(run_cycle(Arc::clone(&shared), cancel.clone(), Trigger::Tick));
            }
        }
    }
    debug!("ticker shut down");
}

async fn run_cycle<S: NetworkSource>(
    shared: Arc<Shared<S>>,
    cancel: CancellationToken,
    trigger: Trigger,
) {
    if cancel.is_cancelled() {
        return;
    }
    let generation = shared.begin();
    debug!(generation, %trigger, "poll cycle started");

    let outcome = tokio::select! {
        biased;
        () = cancel.cancelled() => None,
        result = poll_cycle(&shared.source, shared.config.probe_target) => Some(result),
    };

    debug!(generation, %trigger, completed = outcome.is_some(), "poll cycle finished");
    shared.finish(generation, outcome, &cancel);
}
