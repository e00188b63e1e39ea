//! Interval runner for periodic jobs such as vote snapshots.

use async_trait::async_trait;
use buzzclip_errors::AppResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub const DEFAULT_SNAPSHOT_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// A job the scheduler can trigger. Errors are logged by the scheduler and
/// the job is retried on the next tick.
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self) -> AppResult<()>;
}

/// Runs one job on a fixed interval inside this process.
///
/// Only one scheduler per deployment should be started: two processes each
/// running one would record duplicate snapshots every interval.
pub struct SnapshotScheduler {
    period: Duration,
    job: Arc<dyn ScheduledJob>,
}

impl SnapshotScheduler {
    pub fn new(period: Duration, job: Arc<dyn ScheduledJob>) -> Self {
        Self { period, job }
    }

    /// Spawns the timer task. The first run happens one period after start.
    pub fn start(self) -> SchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let Self { period, job } = self;

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(job = job.name(), period_secs = period.as_secs(), "Scheduler started");

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        // runs are awaited inline, so a slow run delays the next tick instead of overlapping it
                        if let Err(e) = job.run().await {
                            tracing::error!(job = job.name(), error = %e, "Scheduled job failed");
                        }
                    }
                }
            }

            tracing::info!(job = job.name(), "Scheduler stopped");
        });

        SchedulerHandle {
            shutdown: Some(shutdown_tx),
            task,
        }
    }
}

pub struct SchedulerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signals the timer task and waits for it to exit. A run in progress
    /// is allowed to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            tracing::warn!(error = %e, "Scheduler task ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buzzclip_errors::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingJob {
        runs: AtomicUsize,
        fail: bool,
    }

    impl CountingJob {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                runs: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl ScheduledJob for CountingJob {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn run(&self) -> AppResult<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::SchedulerRun("boom".to_string()));
            }
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_once_per_period() {
        let job = CountingJob::new(false);
        let handle = SnapshotScheduler::new(DEFAULT_SNAPSHOT_INTERVAL, job.clone()).start();

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(job.runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(DEFAULT_SNAPSHOT_INTERVAL * 2).await;
        assert_eq!(job.runs.load(Ordering::SeqCst), 2);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_stop_the_scheduler() {
        let job = CountingJob::new(true);
        let handle = SnapshotScheduler::new(Duration::from_secs(10), job.clone()).start();

        tokio::time::sleep(Duration::from_secs(35)).await;
        assert_eq!(job.runs.load(Ordering::SeqCst), 3);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_runs() {
        let job = CountingJob::new(false);
        let handle = SnapshotScheduler::new(Duration::from_secs(10), job.clone()).start();

        tokio::time::sleep(Duration::from_secs(15)).await;
        handle.stop().await;
        let runs = job.runs.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(100)).await;
        assert_eq!(job.runs.load(Ordering::SeqCst), runs);
        assert_eq!(runs, 1);
    }
}
