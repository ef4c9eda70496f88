//! Cancellation handle for a running scheduler.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

/// How a scheduler run ended. Cancellation is the normal way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSummary {
    pub ticks_started: u64,
    /// True when every in-flight tick finished; false when any was aborted,
    /// either by abandon mode or by the drain deadline.
    pub drained: bool,
}

/// Controls one scheduler run.
///
/// Dropping the handle also cancels the run.
pub struct CancellationHandle {
    cancel: broadcast::Sender<()>,
    stopped: AtomicBool,
    ticks: Arc<AtomicU64>,
    task: Mutex<Option<JoinHandle<SchedulerSummary>>>,
    summary: Mutex<Option<SchedulerSummary>>,
}

impl CancellationHandle {
    pub(crate) fn new(
        cancel: broadcast::Sender<()>,
        ticks: Arc<AtomicU64>,
        task: JoinHandle<SchedulerSummary>,
    ) -> Self {
        Self {
            cancel,
            stopped: AtomicBool::new(false),
            ticks,
            task: Mutex::new(Some(task)),
            summary: Mutex::new(None),
        }
    }

    /// Request cancellation. Returns false if already requested.
    pub fn stop(&self) -> bool {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return false;
        }
        let _ = self.cancel.send(());
        true
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Ticks started so far.
    pub fn ticks_started(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    /// Wait for the scheduler loop to exit (after drain or abort).
    ///
    /// Safe to call more than once; later calls return the same summary.
    /// Returns `None` if the loop task panicked.
    pub async fn join(&self) -> Option<SchedulerSummary> {
        let mut summary = self.summary.lock().await;
        if summary.is_some() {
            return *summary;
        }

        let task = self.task.lock().await.take();
        if let Some(task) = task {
            match task.await {
                Ok(result) => *summary = Some(result),
                Err(e) => tracing::error!(error = %e, "Scheduler task ended abnormally"),
            }
        }
        *summary
    }
}

impl std::fmt::Debug for CancellationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationHandle")
            .field("stopped", &self.is_stopped())
            .field("ticks_started", &self.ticks_started())
            .finish()
    }
}
