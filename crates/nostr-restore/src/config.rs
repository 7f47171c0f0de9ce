//! Application configuration loaded from environment variables.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};

/// Relays queried (in order) for a user's kind 0 profile.
pub const DEFAULT_PROFILE_RELAYS: &[&str] = &[
    "wss://relay.damus.io",
    "wss://yabu.me",
    "wss://nostr.compile-error.net",
];

/// Relays the browser re-broadcasts restored contact lists to.
pub const DEFAULT_RESTORE_RELAYS: &[&str] = &[
    "wss://relay.damus.io",
    "wss://nos.lol",
    "wss://relay.nostr.band",
    "wss://yabu.me",
    "wss://nostr.compile-error.net",
];

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080").
    pub bind_addr: String,

    /// Postgres connection string for the event archive.
    pub database_url: String,

    /// Maximum number of pooled database connections.
    pub db_max_connections: u32,

    /// How long a request waits for a pooled connection.
    pub db_acquire_timeout: Duration,

    /// Archive table name (optionally schema-qualified).
    pub archive_table: String,

    /// Relays used for the server-side profile lookup.
    pub profile_relays: Arc<Vec<String>>,

    /// Upper bound on the time spent with any single profile relay.
    pub profile_timeout: Duration,

    /// Relays handed to the browser for the restore action.
    pub restore_relays: Arc<Vec<String>>,

    /// Site name shown in page titles and the footer.
    pub site_name: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`: Postgres connection string
    ///
    /// Optional:
    /// - `PORT`: Listening port (default: 8080)
    /// - `BIND_HOST`: Listening host (default: "0.0.0.0")
    /// - `DB_MAX_CONNECTIONS`: Pool size (default: 5)
    /// - `DB_ACQUIRE_TIMEOUT_SECS`: Pool acquire timeout (default: 5)
    /// - `ARCHIVE_TABLE`: Archive table (default: "event_backup")
    /// - `PROFILE_RELAYS`: Comma-separated relay URLs for profile lookup
    /// - `PROFILE_TIMEOUT_SECS`: Per-relay profile timeout (default: 5)
    /// - `RESTORE_RELAYS`: Comma-separated relay URLs for re-broadcast
    /// - `SITE_NAME`: Site name (default: "Nostr Event Restore Service")
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => bail!("DATABASE_URL environment variable is required"),
        };

        let port: u16 = std::env::var("PORT")
            .ok()
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().with_context(|| format!("invalid PORT '{s}'")))
            .transpose()?
            .unwrap_or(8080);

        let host = std::env::var("BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let bind_addr = format!("{host}:{port}");

        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", 5)?;
        let db_acquire_timeout = Duration::from_secs(parse_or("DB_ACQUIRE_TIMEOUT_SECS", 5)?);

        let archive_table =
            std::env::var("ARCHIVE_TABLE").unwrap_or_else(|_| "event_backup".to_string());
        if !is_valid_table_name(&archive_table) {
            bail!("ARCHIVE_TABLE '{archive_table}' is not a plain SQL identifier");
        }

        let profile_relays = relay_list("PROFILE_RELAYS", DEFAULT_PROFILE_RELAYS);
        let profile_timeout = Duration::from_secs(parse_or("PROFILE_TIMEOUT_SECS", 5)?);
        let restore_relays = relay_list("RESTORE_RELAYS", DEFAULT_RESTORE_RELAYS);

        let site_name = std::env::var("SITE_NAME")
            .unwrap_or_else(|_| "Nostr Event Restore Service".to_string());

        tracing::info!(
            bind_addr = %bind_addr,
            archive_table = %archive_table,
            db_max_connections,
            profile_relays = profile_relays.len(),
            profile_timeout_secs = profile_timeout.as_secs(),
            restore_relays = restore_relays.len(),
            "restore configuration loaded"
        );

        Ok(Self {
            bind_addr,
            database_url,
            db_max_connections,
            db_acquire_timeout,
            archive_table,
            profile_relays: Arc::new(profile_relays),
            profile_timeout,
            restore_relays: Arc::new(restore_relays),
            site_name,
        })
    }
}

/// Parse a numeric env var, falling back to `default` when unset or empty.
fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(s) if !s.trim().is_empty() => s
            .trim()
            .parse()
            .with_context(|| format!("invalid {key} '{s}'")),
        _ => Ok(default),
    }
}

/// Read a comma-separated list of websocket URLs.
///
/// Entries that are not `ws://` or `wss://` are dropped; an empty result
/// falls back to `defaults`.
fn relay_list(key: &str, defaults: &[&str]) -> Vec<String> {
    let relays: Vec<String> = std::env::var(key)
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| s.starts_with("wss://") || s.starts_with("ws://"))
        .collect();

    if relays.is_empty() {
        defaults.iter().map(|s| s.to_string()).collect()
    } else {
        relays
    }
}

/// Accept `name` or `schema.name` where each part is `[A-Za-z_][A-Za-z0-9_]*`.
///
/// The table name is spliced into SQL text, so nothing else may pass.
pub fn is_valid_table_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() > 2 {
        return false;
    }
    parts.iter().all(|part| {
        let mut chars = part.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize config tests that manipulate env vars.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "DATABASE_URL",
        "PORT",
        "BIND_HOST",
        "DB_MAX_CONNECTIONS",
        "DB_ACQUIRE_TIMEOUT_SECS",
        "ARCHIVE_TABLE",
        "PROFILE_RELAYS",
        "PROFILE_TIMEOUT_SECS",
        "RESTORE_RELAYS",
        "SITE_NAME",
    ];

    const DB: (&str, &str) = ("DATABASE_URL", "postgres://localhost/archive");

    /// Helper to run config tests with isolated env vars.
    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap();

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: Serialized by mutex; only test code touches these vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: Restoring original env state.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn config_requires_database_url() {
        with_env_vars(&[], || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("DATABASE_URL"));
        });
    }

    #[test]
    fn config_rejects_blank_database_url() {
        with_env_vars(&[("DATABASE_URL", "  ")], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn config_defaults() {
        with_env_vars(&[DB], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.bind_addr, "0.0.0.0:8080");
            assert_eq!(config.database_url, "postgres://localhost/archive");
            assert_eq!(config.db_max_connections, 5);
            assert_eq!(config.db_acquire_timeout, Duration::from_secs(5));
            assert_eq!(config.archive_table, "event_backup");
            assert_eq!(config.profile_relays.len(), DEFAULT_PROFILE_RELAYS.len());
            assert_eq!(config.profile_relays[0], "wss://relay.damus.io");
            assert_eq!(config.profile_timeout, Duration::from_secs(5));
            assert_eq!(config.restore_relays.len(), DEFAULT_RESTORE_RELAYS.len());
            assert_eq!(config.site_name, "Nostr Event Restore Service");
        });
    }

    #[test]
    fn config_custom_values() {
        with_env_vars(
            &[
                DB,
                ("PORT", "9090"),
                ("BIND_HOST", "127.0.0.1"),
                ("DB_MAX_CONNECTIONS", "20"),
                ("ARCHIVE_TABLE", "backup.events"),
                ("PROFILE_TIMEOUT_SECS", "2"),
                ("SITE_NAME", "My Restore"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.bind_addr, "127.0.0.1:9090");
                assert_eq!(config.db_max_connections, 20);
                assert_eq!(config.archive_table, "backup.events");
                assert_eq!(config.profile_timeout, Duration::from_secs(2));
                assert_eq!(config.site_name, "My Restore");
            },
        );
    }

    #[test]
    fn config_invalid_port_is_error() {
        with_env_vars(&[DB, ("PORT", "eighty")], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn config_empty_port_uses_default() {
        with_env_vars(&[DB, ("PORT", "")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.bind_addr, "0.0.0.0:8080");
        });
    }

    #[test]
    fn config_rejects_injected_table_name() {
        with_env_vars(&[DB, ("ARCHIVE_TABLE", "event_backup; DROP TABLE x")], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn config_relay_list_parsing() {
        with_env_vars(
            &[
                DB,
                (
                    "PROFILE_RELAYS",
                    "wss://a.example/, https://not-a-relay.example,, ws://localhost:7777",
                ),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(
                    config.profile_relays.as_slice(),
                    &["wss://a.example".to_string(), "ws://localhost:7777".to_string()]
                );
            },
        );
    }

    #[test]
    fn config_relay_list_falls_back_when_all_invalid() {
        with_env_vars(&[DB, ("RESTORE_RELAYS", "http://x, ftp://y")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.restore_relays.len(), DEFAULT_RESTORE_RELAYS.len());
        });
    }

    #[test]
    fn table_name_validation() {
        assert!(is_valid_table_name("event_backup"));
        assert!(is_valid_table_name("_events2"));
        assert!(is_valid_table_name("public.event_backup"));
        assert!(!is_valid_table_name(""));
        assert!(!is_valid_table_name("2events"));
        assert!(!is_valid_table_name("a.b.c"));
        assert!(!is_valid_table_name("events;--"));
        assert!(!is_valid_table_name("public."));
        assert!(!is_valid_table_name("event backup"));
    }
}
