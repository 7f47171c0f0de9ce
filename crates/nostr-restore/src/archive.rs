//! Postgres query layer for the event archive.
//!
//! The archive is read-only from this service's point of view: rows are
//! written by a separate backup process and only ever selected here.

use serde::Serialize;
use sqlx::PgPool;
use sqlx::postgres::PgRow;

use crate::error::RestoreError;

/// A row from the archive table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivedEvent {
    /// Event ID (hex).
    pub id: String,
    /// Author public key (hex).
    pub pubkey: String,
    /// Unix timestamp of event creation.
    pub created_at: i64,
    /// Event kind number.
    pub kind: i32,
    /// The full serialized event as it was archived.
    pub event_data: String,
}

impl<'r> sqlx::FromRow<'r, PgRow> for ArchivedEvent {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            id: row.try_get("id")?,
            pubkey: row.try_get("pubkey")?,
            created_at: row.try_get("created_at")?,
            kind: row.try_get("event_kind")?,
            event_data: row.try_get("event_data")?,
        })
    }
}

impl ArchivedEvent {
    /// Format `created_at` as "YYYY-MM-DD HH:MM:SS UTC".
    ///
    /// Timestamps outside chrono's range fall back to the raw number.
    pub fn formatted_date(&self) -> String {
        chrono::DateTime::from_timestamp(self.created_at, 0)
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| self.created_at.to_string())
    }
}

/// A run of consecutive events sharing one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindGroup<'a> {
    pub kind: i32,
    pub events: &'a [ArchivedEvent],
}

/// Split an already-ordered event slice into runs of equal kind.
///
/// A new group starts whenever the kind differs from the previous event, so
/// group order follows the input order exactly.
pub fn group_by_kind(events: &[ArchivedEvent]) -> Vec<KindGroup<'_>> {
    events
        .chunk_by(|a, b| a.kind == b.kind)
        .map(|run| KindGroup {
            kind: run[0].kind,
            events: run,
        })
        .collect()
}

/// Handle to the archive table.
///
/// Cheap to clone; the pool is shared.
#[derive(Debug, Clone)]
pub struct Archive {
    pool: PgPool,
    select_by_pubkey: String,
}

impl Archive {
    /// Wrap a pool. `table` must already be a validated identifier
    /// (see [`crate::config::is_valid_table_name`]).
    ///
    /// The table is owned by the backup process, so every column is cast to
    /// the type [`ArchivedEvent`] decodes. Any integer width works for
    /// `event_kind`/`created_at`, and `event_data` may be `json`/`jsonb`.
    pub fn new(pool: PgPool, table: &str) -> Self {
        let select_by_pubkey = format!(
            "SELECT id::TEXT AS id, pubkey::TEXT AS pubkey, \
             created_at::INT8 AS created_at, event_kind::INT4 AS event_kind, \
             event_data::TEXT AS event_data \
             FROM {table} \
             WHERE pubkey = $1 \
             ORDER BY event_kind ASC, created_at DESC"
        );
        Self {
            pool,
            select_by_pubkey,
        }
    }

    /// Fetch every archived event authored by `pubkey`.
    ///
    /// Sorted by kind ascending, then newest first within a kind. An author
    /// with no rows yields an empty vector.
    pub async fn events_by_pubkey(&self, pubkey: &str) -> Result<Vec<ArchivedEvent>, RestoreError> {
        let events = sqlx::query_as::<_, ArchivedEvent>(&self.select_by_pubkey)
            .bind(pubkey)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(pubkey = %pubkey, count = events.len(), "archive query complete");

        Ok(events)
    }

    /// Check that the database is reachable.
    pub async fn ping(&self) -> Result<(), RestoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
