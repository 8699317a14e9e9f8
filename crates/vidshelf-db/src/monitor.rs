//! Background connection monitor for the PostgreSQL catalog.
//!
//! Pings the pool on a fixed interval and reports the outcome to the readiness
//! gate. Schema migrations run on the first successful ping, so the service can
//! start while the database is still unreachable.

use crate::catalog::is_connection_error;
use sqlx::PgPool;
use std::time::Duration;
use tokio::task::JoinHandle;
use vidshelf_core::{BackendState, ReadinessReporter};

const PING_TIMEOUT: Duration = Duration::from_secs(5);

pub struct ConnectionMonitor {
    pool: PgPool,
    reporter: ReadinessReporter,
    interval: Duration,
    migrate: bool,
}

impl ConnectionMonitor {
    pub fn new(pool: PgPool, reporter: ReadinessReporter, interval: Duration) -> Self {
        Self {
            pool,
            reporter,
            interval,
            migrate: true,
        }
    }

    /// Skip schema migrations, for databases managed elsewhere.
    pub fn without_migrations(mut self) -> Self {
        self.migrate = false;
        self
    }

    /// Run the ping loop until the returned handle is aborted.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut migrated = !self.migrate;
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let state = self.ping_once(&mut migrated).await;
                self.reporter.report(state);
            }
        })
    }

    async fn ping_once(&self, migrated: &mut bool) -> BackendState {
        let ping = tokio::time::timeout(
            PING_TIMEOUT,
            sqlx::query("SELECT 1").execute(&self.pool),
        )
        .await;

        match ping {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "Catalog ping failed");
                return if is_connection_error(&e) {
                    BackendState::Disconnected
                } else {
                    BackendState::Error
                };
            }
            Err(_) => {
                tracing::debug!(
                    timeout_secs = PING_TIMEOUT.as_secs(),
                    "Catalog ping timed out"
                );
                return BackendState::Disconnected;
            }
        }

        if !*migrated {
            match crate::run_migrations(&self.pool).await {
                Ok(()) => *migrated = true,
                Err(e) => {
                    tracing::error!(error = %e, "Database migrations failed");
                    return BackendState::Error;
                }
            }
        }

        BackendState::Connected
    }
}
