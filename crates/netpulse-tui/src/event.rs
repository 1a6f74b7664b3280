//! Event pump: one background task merging terminal input with monitor
//! state into a single channel.
//!
//! Besides keys and resizes, the pump forwards every [`PollStatus`] the
//! [`Monitor`](netpulse_core::Monitor) publishes. Animation ticks only
//! fire while a poll cycle is in flight, so an idle screen produces
//! nothing but render ticks.

use std::io;
use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::{Stream, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use netpulse_core::PollStatus;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    /// The monitor published a new state.
    Poll(Box<PollStatus>),
    /// Throbber frame; only emitted while polling.
    Tick,
    Render,
}

#[derive(Debug, Clone, Copy)]
pub struct Rates {
    pub tick: Duration,
    pub render: Duration,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(100),
            render: Duration::from_millis(33),
        }
    }
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Spawn the pump over the real terminal.
    pub fn new(status: watch::Receiver<PollStatus>, rates: Rates) -> Self {
        Self::spawn(EventStream::new(), status, rates)
    }

    fn spawn<S>(input: S, status: watch::Receiver<PollStatus>, rates: Rates) -> Self
    where
        S: Stream<Item = io::Result<CrosstermEvent>> + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(pump(input, status, tx, cancel.clone(), rates));
        Self { rx, cancel }
    }

    /// Next event, or `None` once the pump has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn pump<S>(
    mut input: S,
    mut status: watch::Receiver<PollStatus>,
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
    rates: Rates,
) where
    S: Stream<Item = io::Result<CrosstermEvent>> + Unpin,
{
    // The screen renders the current state before the first change arrives
    let initial = status.borrow_and_update().clone();
    let mut polling = initial.is_loading();
    if tx.send(Event::Poll(Box::new(initial))).is_err() {
        return;
    }

    let mut monitor_live = true;
    let mut tick = tokio::time::interval(rates.tick);
    let mut render = tokio::time::interval(rates.render);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    render.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = status.changed(), if monitor_live => {
                if changed.is_err() {
                    debug!("monitor state channel closed");
                    monitor_live = false;
                    polling = false;
                    continue;
                }
                let next = status.borrow_and_update().clone();
                polling = next.is_loading();
                debug!(generation = next.generation, in_flight = next.in_flight, "poll status changed");
                Event::Poll(Box::new(next))
            }

            Some(Ok(input_event)) = input.next() => match input_event {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
                CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
                _ => continue,
            },

            _ = tick.tick(), if polling => Event::Tick,

            _ = render.tick() => Event::Render,
        };

        if tx.send(event).is_err() {
            break;
        }
    }

    debug!("event pump shut down");
}
