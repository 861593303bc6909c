use crate::domain::ports::{TickScheduler, TickSource};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Tick scheduler backed by `tokio::time::interval`.
///
/// Each registered source runs in its own task, aborted when the source
/// is cancelled or dropped. An optional period override re-paces every
/// source this scheduler hands out, used by the CLI demo to run faster
/// than real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalScheduler {
    period_override: Option<Duration>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period_override: Some(period),
        }
    }
}

impl TickScheduler for IntervalScheduler {
    fn every(&self, period: Duration) -> TickSource {
        let period = self.period_override.unwrap_or(period);
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first interval tick completes immediately; swallow it so
            // the source fires one period after registration.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(()).is_err() {
                    break;
                }
            }
        });
        TickSource::with_task(rx, task)
    }
}

/// Tick scheduler whose ticks are fired by hand.
///
/// The in-memory twin of [`IntervalScheduler`] for tests and harnesses:
/// clones share the same set of registered sources, so a harness keeps a
/// clone and fires ticks at will.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    senders: Arc<Mutex<Vec<mpsc::UnboundedSender<()>>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers one tick to every live source, pruning cancelled ones.
    pub fn fire(&self) {
        let mut senders = self.senders.lock().expect("scheduler mutex poisoned");
        senders.retain(|tx| tx.send(()).is_ok());
    }

    /// Number of registered sources that have not been cancelled.
    pub fn active_sources(&self) -> usize {
        let mut senders = self.senders.lock().expect("scheduler mutex poisoned");
        senders.retain(|tx| !tx.is_closed());
        senders.len()
    }
}

impl TickScheduler for ManualScheduler {
    fn every(&self, _period: Duration) -> TickSource {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders
            .lock()
            .expect("scheduler mutex poisoned")
            .push(tx);
        TickSource::detached(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_interval_scheduler_delivers_periodic_ticks() {
        let scheduler = IntervalScheduler::new();
        let mut source = scheduler.every(Duration::from_secs(1));

        assert!(source.tick().await);
        assert!(source.tick().await);
        assert!(source.tick().await);
        source.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_scheduler_period_override() {
        let scheduler = IntervalScheduler::with_period(Duration::from_millis(10));
        let mut source = scheduler.every(Duration::from_secs(3600));

        // Re-paced: a tick arrives long before the requested hour.
        assert!(source.tick().await);
        source.cancel();
    }

    #[test]
    fn test_manual_scheduler_prunes_cancelled_sources() {
        let scheduler = ManualScheduler::new();
        let first = scheduler.every(Duration::from_secs(1));
        let _second = scheduler.every(Duration::from_secs(1));
        assert_eq!(scheduler.active_sources(), 2);

        first.cancel();
        assert_eq!(scheduler.active_sources(), 1);
        scheduler.fire();
        assert_eq!(scheduler.active_sources(), 1);
    }
}
