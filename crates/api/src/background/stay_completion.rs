//! Periodic completion sweep for ended stays.
//!
//! Spawns a background loop that moves confirmed reservations whose
//! check-out date has passed into `completed`. This is the "system"
//! actor of the lifecycle: admins can complete individual stays by
//! hand, the sweep keeps the rest honest. Runs on a fixed interval
//! using `tokio::time::interval`.

use std::time::Duration;

use chrono::Utc;
use lodgia_db::repositories::ReservationRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the stay-completion loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Stay completion sweep started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Stay completion sweep stopping");
                break;
            }
            _ = interval.tick() => {
                let today = Utc::now().date_naive();
                match ReservationRepo::complete_due(&pool, today).await {
                    Ok(completed) => {
                        if completed > 0 {
                            tracing::info!(completed, "Stay completion sweep: stays completed");
                        } else {
                            tracing::debug!("Stay completion sweep: nothing due");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Stay completion sweep failed");
                    }
                }
            }
        }
    }
}
