//! Fixed-period polling with cancellation.
//!
//! A [`Poller`] owns one background task that fires on a fixed schedule and
//! issues an independent request per tick. Successful responses are queued
//! for the UI thread, which drains them with [`Poller::poll`] without
//! blocking. Failures are logged and dropped, so whatever the UI last showed
//! stays on screen.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Notify};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::RequestFailed;

/// When a poller fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Time between two requests.
    pub period: Duration,
    /// Whether the first request goes out at once instead of after one period.
    pub immediate: bool,
}

impl Schedule {
    /// First request after one period, then every period.
    pub fn every(period: Duration) -> Self {
        Self {
            period,
            immediate: false,
        }
    }

    /// First request at once, then every period.
    pub fn immediately_then_every(period: Duration) -> Self {
        Self {
            period,
            immediate: true,
        }
    }
}

/// A cancellable periodic fetch.
///
/// Requests are not deduplicated: if a response is slower than the period,
/// the next tick still sends a new request and both may be in flight.
/// Dropping the poller cancels the timer, so no request is issued afterwards.
///
/// Must be created from within a tokio runtime.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use fabwatch::{Poller, RequestFailed, Schedule};
///
/// # tokio_test::block_on(async {
/// let mut poller = Poller::spawn("counter", Schedule::every(Duration::from_secs(2)), || async {
///     Ok::<_, RequestFailed>(42)
/// });
/// // Nothing has arrived yet.
/// assert!(poller.poll().is_none());
/// # });
/// ```
#[derive(Debug)]
pub struct Poller<T> {
    receiver: mpsc::Receiver<T>,
    cancel: CancellationToken,
    refresh: Arc<Notify>,
}

impl<T: Send + 'static> Poller<T> {
    /// Start polling `fetch` on the given schedule.
    pub fn spawn<F, Fut>(description: &str, schedule: Schedule, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, RequestFailed>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        let refresh = Arc::new(Notify::new());

        tracing::info!("Polling {} every {:?}", description, schedule.period);
        tokio::spawn(poll_loop(
            description.to_string(),
            schedule,
            fetch,
            tx,
            cancel.clone(),
            refresh.clone(),
        ));

        Self {
            receiver: rx,
            cancel,
            refresh,
        }
    }

    /// Take the most recent response received since the last call.
    ///
    /// Returns `None` if nothing new arrived. Non-blocking.
    pub fn poll(&mut self) -> Option<T> {
        let mut latest = None;
        while let Ok(value) = self.receiver.try_recv() {
            latest = Some(value);
        }
        latest
    }

    /// Send a request now instead of waiting for the next tick.
    ///
    /// The regular schedule restarts from this point.
    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop<T, F, Fut>(
    description: String,
    schedule: Schedule,
    fetch: F,
    tx: mpsc::Sender<T>,
    cancel: CancellationToken,
    refresh: Arc<Notify>,
) where
    T: Send + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, RequestFailed>> + Send + 'static,
{
    let start = if schedule.immediate {
        Instant::now()
    } else {
        Instant::now() + schedule.period
    };
    let mut ticker = time::interval_at(start, schedule.period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Polling for {} cancelled", description);
                break;
            }
            _ = refresh.notified() => {
                ticker.reset();
            }
            _ = ticker.tick() => {}
        }

        let request = fetch();
        let tx = tx.clone();
        let description = description.clone();
        tokio::spawn(async move {
            match request.await {
                Ok(value) => {
                    // Receiver dropped means the owner was torn down
                    let _ = tx.send(value).await;
                }
                Err(e) => {
                    tracing::warn!("Poll of {} failed, keeping last data: {}", description, e);
                }
            }
        });
    }
}
