//! Queue management and the pacing worker.

use super::config::RateLimiterConfig;
use super::metrics::{MetricsState, RateLimiterMetrics};
use super::types::{ExecuteError, RateLimiterState};
use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::time::{sleep_until, Instant};

/// Outcome of a finished unit of work, delivered to its caller by the worker
struct Settlement {
    succeeded: bool,
    deliver: Box<dyn FnOnce() + Send>,
}

type QueuedWork = Box<dyn FnOnce() -> BoxFuture<'static, Settlement> + Send>;

struct QueueItem {
    id: u64,
    enqueued_at: Instant,
    work: QueuedWork,
}

#[derive(Default)]
struct QueueState {
    items: VecDeque<QueueItem>,
    draining: bool,
    in_flight: bool,
    last_start: Option<Instant>,
    next_id: u64,
}

struct LimiterInner {
    config: RateLimiterConfig,
    queue: Mutex<QueueState>,
    metrics: MetricsState,
}

enum Step {
    Run(QueueItem, Instant),
    Wait(Instant),
    Done,
}

/// Serializes and paces units of work against one constrained resource
///
/// Cloning is cheap and clones share the same queue.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<LimiterInner>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            inner: Arc::new(LimiterInner {
                config,
                queue: Mutex::new(QueueState::default()),
                metrics: MetricsState::default(),
            }),
        }
    }

    /// The configuration this limiter was built with
    pub fn config(&self) -> &RateLimiterConfig {
        &self.inner.config
    }

    /// Queue a unit of work and wait for its result
    ///
    /// The work is enqueued immediately, when `execute` is called rather than
    /// when the returned future is first polled, so calls made later start
    /// later. The returned future resolves when the work settles:
    /// `Ok` with its value, [`ExecuteError::Failed`] with its own error,
    /// [`ExecuteError::Panicked`] if it panicked, or [`ExecuteError::Cleared`]
    /// if [`clear`](Self::clear) or a runtime shutdown dropped it before it
    /// settled.
    ///
    /// Dropping the returned future does not dequeue the work.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime, since the worker is a
    /// spawned task.
    pub fn execute<F, Fut, T, E>(
        &self,
        work: F,
    ) -> impl Future<Output = Result<T, ExecuteError<E>>> + Send + 'static
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let (tx, rx) = oneshot::channel::<Result<T, ExecuteError<E>>>();

        let queued: QueuedWork = Box::new(move || {
            async move {
                let outcome = AssertUnwindSafe(async move { work().await })
                    .catch_unwind()
                    .await;
                let result = match outcome {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(error)) => Err(ExecuteError::Failed(error)),
                    Err(_) => Err(ExecuteError::Panicked),
                };
                Settlement {
                    succeeded: result.is_ok(),
                    deliver: Box::new(move || {
                        // The caller may have stopped waiting
                        let _ = tx.send(result);
                    }),
                }
            }
            .boxed()
        });

        self.enqueue(queued);

        async move {
            match rx.await {
                Ok(result) => result,
                Err(_) => Err(ExecuteError::Cleared),
            }
        }
    }

    fn enqueue(&self, work: QueuedWork) {
        let spawn_worker = {
            let mut queue = self.inner.queue.lock();
            let id = queue.next_id;
            queue.next_id += 1;
            queue.items.push_back(QueueItem {
                id,
                enqueued_at: Instant::now(),
                work,
            });
            tracing::trace!(
                limiter = %self.inner.config.name,
                id,
                queued = queue.items.len(),
                "Enqueued unit of work"
            );

            let idle = !queue.draining;
            queue.draining = true;
            idle
        };

        if spawn_worker {
            // The guard lives in the task so it is dropped even if never polled
            tokio::spawn(drain(DrainGuard {
                inner: Arc::clone(&self.inner),
                finished: false,
            }));
        }
    }

    /// Number of units of work that have not settled yet
    ///
    /// Counts queued items plus the one currently running, so it drops by
    /// exactly one each time a unit of work settles.
    pub fn queue_size(&self) -> usize {
        let queue = self.inner.queue.lock();
        queue.items.len() + usize::from(queue.in_flight)
    }

    /// Whether a worker is currently pacing through the queue
    pub fn state(&self) -> RateLimiterState {
        if self.inner.queue.lock().draining {
            RateLimiterState::Draining
        } else {
            RateLimiterState::Idle
        }
    }

    /// Snapshot of processed/error counts and wait times
    pub fn metrics(&self) -> RateLimiterMetrics {
        self.inner.metrics.snapshot()
    }

    /// Reject every queued unit of work that has not started yet
    ///
    /// Each affected caller receives [`ExecuteError::Cleared`]. Work that is
    /// already running is left alone. Returns the number of rejected items.
    pub fn clear(&self) -> usize {
        let dropped: Vec<QueueItem> = self.inner.queue.lock().items.drain(..).collect();
        let count = dropped.len();

        self.inner.metrics.record_cleared(count);
        if count > 0 {
            tracing::info!(
                limiter = %self.inner.config.name,
                cleared = count,
                "Cleared queued units of work"
            );
        }

        // Dropping the items drops their result senders, which settles the callers
        drop(dropped);
        count
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let queue = self.inner.queue.lock();
        f.debug_struct("RateLimiter")
            .field("name", &self.inner.config.name)
            .field("min_interval", &self.inner.config.min_interval)
            .field("queued", &queue.items.len())
            .field("in_flight", &queue.in_flight)
            .finish()
    }
}

/// Resets the queue when a worker is dropped before it drains
///
/// A worker task is only dropped early when its runtime shuts down. Without
/// the reset the limiter would stay `draining` with no worker left, so no
/// later call would ever start. Stranded items are dropped, which settles
/// their callers with [`ExecuteError::Cleared`].
struct DrainGuard {
    inner: Arc<LimiterInner>,
    finished: bool,
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        let stranded: Vec<QueueItem> = {
            let mut queue = self.inner.queue.lock();
            queue.draining = false;
            queue.in_flight = false;
            queue.items.drain(..).collect()
        };

        self.inner.metrics.record_cleared(stranded.len());
        tracing::warn!(
            limiter = %self.inner.config.name,
            stranded = stranded.len(),
            "Worker stopped before the queue drained"
        );
        drop(stranded);
    }
}

/// Worker loop: runs until the queue is empty, then marks the limiter idle
async fn drain(mut guard: DrainGuard) {
    let inner = Arc::clone(&guard.inner);

    loop {
        let step = {
            let mut queue = inner.queue.lock();
            let now = Instant::now();
            let ready_at = queue
                .last_start
                .map(|last| last + inner.config.min_interval);

            match ready_at {
                // The head stays queued while we wait so clear() can still reject it
                Some(at) if at > now && !queue.items.is_empty() => Step::Wait(at),
                _ => match queue.items.pop_front() {
                    Some(item) => {
                        queue.last_start = Some(now);
                        queue.in_flight = true;
                        Step::Run(item, now)
                    }
                    None => {
                        queue.draining = false;
                        Step::Done
                    }
                },
            }
        };

        match step {
            Step::Done => {
                guard.finished = true;
                tracing::trace!(limiter = %inner.config.name, "Queue drained");
                return;
            }
            Step::Wait(at) => sleep_until(at).await,
            Step::Run(item, started) => {
                let waited = started.saturating_duration_since(item.enqueued_at);
                inner.metrics.record_start(waited);
                tracing::debug!(
                    limiter = %inner.config.name,
                    id = item.id,
                    waited_ms = waited.as_millis() as u64,
                    "Starting unit of work"
                );

                let settlement = (item.work)().await;

                inner.metrics.record_settled(settlement.succeeded);
                inner.queue.lock().in_flight = false;
                if !settlement.succeeded {
                    tracing::debug!(
                        limiter = %inner.config.name,
                        id = item.id,
                        "Unit of work failed"
                    );
                }
                (settlement.deliver)();
            }
        }
    }
}
