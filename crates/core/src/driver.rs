//! Fixed-period consumer loop for hosts that do not tick the context
//! themselves.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::{Instant, MissedTickBehavior};

use crate::context::{ProximityContext, TickReport};

/// Tick `context` every `period` until `shutdown` resolves (or its sender is
/// dropped). Each tick is fed the real time since the previous one. `on_tick`
/// runs with the lock released.
pub async fn run_consumer_loop<F>(
    context: Arc<Mutex<ProximityContext>>,
    period: Duration,
    mut shutdown: oneshot::Receiver<()>,
    mut on_tick: F,
) where
    F: FnMut(&TickReport) + Send,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();

    tracing::debug!(?period, "consumer loop started");
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            now = interval.tick() => {
                let elapsed = now.saturating_duration_since(last);
                last = now;

                let report = context
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .tick(elapsed);
                on_tick(&report);
            }
        }
    }
    tracing::debug!("consumer loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeartbeatConfig;
    use crate::role::PlayerIdentity;
    use pursuit_ranging::{PlayerId, SystemClock};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_loop_ticks_until_shutdown() {
        let identity = PlayerIdentity::new(PlayerId::new(1001), PlayerId::new(1000));
        let mut context =
            ProximityContext::new(HeartbeatConfig::default(), identity, None, Arc::new(SystemClock)).unwrap();
        context.start().unwrap();
        let context = Arc::new(Mutex::new(context));

        let ticks = Arc::new(AtomicUsize::new(0));
        let admitted = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(run_consumer_loop(context.clone(), Duration::from_millis(100), shutdown_rx, {
            let ticks = ticks.clone();
            let admitted = admitted.clone();
            move |report: &TickReport| {
                ticks.fetch_add(1, Ordering::Relaxed);
                admitted.fetch_add(report.admitted, Ordering::Relaxed);
            }
        }));

        tokio::time::sleep(Duration::from_millis(5_050)).await;
        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();

        // first tick is immediate, then one per 100ms
        let ticks = ticks.load(Ordering::Relaxed);
        assert!((50..=52).contains(&ticks), "{ticks} ticks");
        // simulated sightings at 2s and 5s
        assert_eq!(admitted.load(Ordering::Relaxed), 2);

        let context = context.lock().unwrap();
        assert!(context.distance_to_opponent().is_finite());
    }
}
