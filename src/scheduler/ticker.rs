//! Fixed-cadence tick loop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::observability::metrics;
use crate::pipeline::{TickPipeline, TickReport};
use crate::sampler::TickPlanner;
use crate::scheduler::handle::{CancellationHandle, SchedulerSummary};

#[derive(Debug, Clone, Copy)]
pub struct ScheduleSettings {
    pub interval: Duration,
    /// Await in-flight ticks on cancel instead of aborting them.
    pub drain_on_cancel: bool,
    /// Longest a drain may take before remaining ticks are aborted.
    pub drain_timeout: Duration,
}

pub struct TickScheduler;

impl TickScheduler {
    /// Spawn the tick loop. The first tick starts immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(planner: TickPlanner, pipeline: TickPipeline, settings: ScheduleSettings) -> CancellationHandle {
        let (cancel_tx, cancel_rx) = broadcast::channel(1);
        let ticks = Arc::new(AtomicU64::new(0));

        tracing::info!(
            interval_ms = settings.interval.as_millis() as u64,
            scenarios = ?planner.scenarios(),
            drain_on_cancel = settings.drain_on_cancel,
            drain_timeout_ms = settings.drain_timeout.as_millis() as u64,
            "Tick scheduler starting"
        );

        let task = tokio::spawn(run_loop(
            planner,
            Arc::new(pipeline),
            settings,
            ticks.clone(),
            cancel_rx,
        ));

        CancellationHandle::new(cancel_tx, ticks, task)
    }

    /// Stop scheduling new ticks. Idempotent.
    pub fn stop(handle: &CancellationHandle) {
        if handle.stop() {
            tracing::info!(ticks_started = handle.ticks_started(), "Tick scheduler cancelled");
        }
    }
}

async fn run_loop(
    mut planner: TickPlanner,
    pipeline: Arc<TickPipeline>,
    settings: ScheduleSettings,
    ticks: Arc<AtomicU64>,
    mut cancel: broadcast::Receiver<()>,
) -> SchedulerSummary {
    let mut ticker = time::interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight: JoinSet<TickReport> = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            _ = cancel.recv() => break,
            started = ticker.tick() => {
                let plan = planner.plan(started.into_std());
                ticks.fetch_add(1, Ordering::SeqCst);
                metrics::record_tick();
                tracing::trace!(
                    tick = plan.context.sequence,
                    fired = ?plan.entry_ids(),
                    draws = ?plan.draws,
                    "Tick planned"
                );

                if plan.is_empty() {
                    tracing::trace!(tick = plan.context.sequence, "Nothing fired this tick");
                    continue;
                }

                let pipeline = pipeline.clone();
                in_flight.spawn(async move { pipeline.run_tick(plan).await });
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = joined {
                    tracing::error!(error = %e, "Tick task ended abnormally");
                }
            }
        }
    }

    let pending = in_flight.len();
    let drained = if settings.drain_on_cancel {
        if pending > 0 {
            tracing::info!(pending, "Draining in-flight ticks");
        }
        let drain_started = Instant::now();
        let finished = time::timeout(settings.drain_timeout, async {
            while let Some(joined) = in_flight.join_next().await {
                if let Err(e) = joined {
                    tracing::error!(error = %e, "Tick task ended abnormally");
                }
            }
        })
        .await
        .is_ok();

        if finished {
            tracing::debug!(elapsed_ms = drain_started.elapsed().as_millis() as u64, "Drain complete");
        } else {
            tracing::warn!(
                remaining = in_flight.len(),
                timeout_ms = settings.drain_timeout.as_millis() as u64,
                "Drain deadline passed, aborting remaining ticks"
            );
            in_flight.shutdown().await;
        }
        finished
    } else {
        if pending > 0 {
            tracing::info!(pending, "Abandoning in-flight ticks");
        }
        in_flight.shutdown().await;
        false
    };

    SchedulerSummary {
        ticks_started: ticks.load(Ordering::SeqCst),
        drained,
    }
}
