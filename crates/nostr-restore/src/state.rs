//! Application state shared across all request handlers.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use crate::archive::Archive;
use crate::config::Config;
use crate::profile::ProfileFetcher;

/// Shared application state available to all request handlers.
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Archive query handle (wraps the Postgres pool).
    pub archive: Archive,

    /// Relay-backed profile lookup.
    pub profiles: ProfileFetcher,

    /// Application configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// The pool connects lazily, so startup succeeds while the database is
    /// still coming up; failures surface per request as `ArchiveUnavailable`.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect_lazy(&config.database_url)?;

        let archive = Archive::new(pool, &config.archive_table);
        let profiles = ProfileFetcher::new(
            Arc::clone(&config.profile_relays),
            config.profile_timeout,
        );

        tracing::info!(
            db_max_connections = config.db_max_connections,
            db_acquire_timeout_secs = config.db_acquire_timeout.as_secs(),
            "application state initialized"
        );

        Ok(Self {
            archive,
            profiles,
            config: Arc::new(config),
        })
    }
}
