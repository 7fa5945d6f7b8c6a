use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};

use crate::meals::services::run_sync;
use crate::state::AppState;

/// Start the periodic meal sync, unless the configured interval is zero.
///
/// The first run happens one full interval after startup. Each run gets its
/// own task so a panic inside it is logged and the schedule keeps going.
pub fn spawn(state: AppState) -> Option<JoinHandle<()>> {
    let period = state.config.sync.interval()?;
    info!(interval_minutes = state.config.sync.interval_minutes, "scheduled meal sync enabled");

    Some(tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            info!("running scheduled meal sync");

            let run_state = state.clone();
            match tokio::spawn(async move { run_sync(&run_state).await }).await {
                Ok(result) => info!(outcome = result.label(), "scheduled meal sync finished"),
                Err(e) => error!(error = %e, "scheduled meal sync aborted"),
            }
        }
    }))
}
