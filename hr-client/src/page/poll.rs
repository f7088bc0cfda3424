//! Periodic refresh
//!
//! A poller re-runs [`Refresh::refresh`] on a fixed period until it is
//! stopped or its handle is dropped.

use async_trait::async_trait;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

/// Something that can re-fetch itself
#[async_trait]
pub trait Refresh: Send + Sync + 'static {
    async fn refresh(&self);
}

/// Running poller; stops when dropped
#[derive(Debug)]
pub struct PollHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Ask the poller to stop after the current refresh
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Stop and wait for the task to finish
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::error!("Poller task failed: {}", e);
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Start refreshing `target` every `every`; the first refresh happens one
/// period from now.
pub fn spawn_poller<R: Refresh>(target: R, every: Duration) -> PollHandle {
    let token = CancellationToken::new();
    let child = token.clone();

    let task = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::debug!(period_secs = every.as_secs(), "Poller started");

        loop {
            tokio::select! {
                _ = child.cancelled() => break,
                _ = ticker.tick() => target.refresh().await,
            }
        }

        tracing::debug!("Poller stopped");
    });

    PollHandle {
        token,
        task: Some(task),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct Counter(Arc<AtomicUsize>);

    #[async_trait]
    impl Refresh for Counter {
        async fn refresh(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_stopped() {
        let counter = Counter::default();
        let handle = spawn_poller(counter.clone(), Duration::from_secs(5));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);

        handle.shutdown().await;
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_poller() {
        let counter = Counter::default();
        let handle = spawn_poller(counter.clone(), Duration::from_secs(1));
        assert!(handle.is_running());
        drop(handle);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);
    }
}
