use std::sync::Arc;

use arcade_rental::{LifecyclePolicy, RentalStore, SweepOutcome};
use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex};
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, info};

/// Periodically sweeps the booking ledger until `shutdown` flips to true
/// (or its sender goes away).
pub async fn start_lifecycle_worker(
    store: Arc<Mutex<RentalStore>>,
    policy: LifecyclePolicy,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately; the first sweep happens one period in.
    ticker.tick().await;

    info!("Lifecycle worker started, sweeping every {:?}", period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let outcome = sweep_once(&store, &policy, Utc::now()).await;
                if !outcome.is_empty() {
                    debug!("Reminded {:?}, completed {:?}", outcome.reminded, outcome.completed);
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    info!("Lifecycle worker stopped");
}

/// One sweep under the store lock. Runs to completion before the next tick.
pub async fn sweep_once(store: &Mutex<RentalStore>, policy: &LifecyclePolicy, now: DateTime<Utc>) -> SweepOutcome {
    let mut store = store.lock().await;
    policy.sweep(&mut store, now)
}
