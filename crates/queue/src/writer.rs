use std::marker::PhantomData;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::error::QueueError;
use crate::traits::FragmentSink;
use crate::types::{WriteRequest, WriterState, WriterStats};

/// Serializes write requests against a single sink.
///
/// At most one physical write is in flight. Requests that arrive while a
/// write is running wait in a FIFO queue and are started strictly in enqueue
/// order. Every request gets its own write and exactly one callback, whether
/// the write succeeds or fails; a failure never affects later requests.
///
/// All writers targeting the same resource must share one `QueuedWriter`,
/// otherwise two read-merge-write cycles can interleave.
pub struct QueuedWriter<F, S>
where
    F: Send + 'static,
    S: FragmentSink<F> + 'static,
{
    tx: mpsc::UnboundedSender<WriteRequest<F, S::Error>>,
    outstanding: Arc<AtomicUsize>,
    task: JoinHandle<WriterStats>,
    _marker: PhantomData<fn() -> S>,
}

impl<F, S> QueuedWriter<F, S>
where
    F: Send + 'static,
    S: FragmentSink<F> + 'static,
{
    /// Spawns the writer task. Must be called from within a Tokio runtime.
    pub fn new(sink: S) -> Self {
        Self::from_arc(Arc::new(sink))
    }

    pub fn from_arc(sink: Arc<S>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let outstanding = Arc::new(AtomicUsize::new(0));
        let task = tokio::spawn(drain(sink, rx, Arc::clone(&outstanding)));

        Self {
            tx,
            outstanding,
            task,
            _marker: PhantomData,
        }
    }

    /// Queues `fragment` for writing and returns immediately.
    ///
    /// `callback` receives the outcome of this request's physical write.
    pub fn enqueue<C>(&self, fragment: F, callback: C)
    where
        C: FnOnce(Result<(), S::Error>) + Send + 'static,
    {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        let request = WriteRequest {
            fragment,
            callback: Box::new(callback),
        };

        if let Err(mpsc::error::SendError(request)) = self.tx.send(request) {
            self.outstanding.fetch_sub(1, Ordering::SeqCst);
            warn!("write requested after writer task stopped");
            (request.callback)(Err(QueueError::Closed.into()));
        }
    }

    /// Queues `fragment` and waits for its write to finish.
    pub async fn write(&self, fragment: F) -> Result<(), S::Error> {
        let (tx, rx) = oneshot::channel();
        self.enqueue(fragment, move |outcome| {
            let _ = tx.send(outcome);
        });
        rx.await.unwrap_or_else(|_| Err(QueueError::Closed.into()))
    }

    pub fn state(&self) -> WriterState {
        if self.outstanding.load(Ordering::SeqCst) == 0 {
            WriterState::Idle
        } else {
            WriterState::Writing
        }
    }

    /// Requests waiting behind the one currently being written.
    pub fn pending(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst).saturating_sub(1)
    }

    /// Stops accepting requests, drains everything already queued and
    /// returns the totals.
    pub async fn shutdown(self) -> Result<WriterStats, QueueError> {
        let Self { tx, task, .. } = self;
        drop(tx);
        task.await
            .map_err(|e| QueueError::Panicked(format!("writer task join failure: {e}")))
    }
}

async fn drain<F, S>(
    sink: Arc<S>,
    mut rx: mpsc::UnboundedReceiver<WriteRequest<F, S::Error>>,
    outstanding: Arc<AtomicUsize>,
) -> WriterStats
where
    F: Send + 'static,
    S: FragmentSink<F> + 'static,
{
    let mut stats = WriterStats::default();
    let mut seq = 0u64;

    while let Some(WriteRequest { fragment, callback }) = rx.recv().await {
        seq += 1;
        debug!(
            seq,
            queued = outstanding.load(Ordering::SeqCst).saturating_sub(1),
            "starting write"
        );

        let sink_cloned = Arc::clone(&sink);
        let outcome = match tokio::task::spawn_blocking(move || sink_cloned.persist(fragment)).await
        {
            Ok(result) => result,
            Err(e) => Err(QueueError::Panicked(e.to_string()).into()),
        };

        match &outcome {
            Ok(()) => {
                stats.completed_writes += 1;
                debug!(seq, "write completed");
            }
            Err(e) => {
                stats.failed_writes += 1;
                warn!(seq, error = %e, "write failed");
            }
        }

        // Callbacks observe the post-write state.
        outstanding.fetch_sub(1, Ordering::SeqCst);
        if catch_unwind(AssertUnwindSafe(|| callback(outcome))).is_err() {
            error!(seq, "write callback panicked");
        }
    }

    stats
}
