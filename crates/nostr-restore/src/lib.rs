//! Nostr Restore - look up archived Nostr events by npub.
//!
//! This crate provides a small HTTP server that shows the events a backup
//! process stored for a public key, and lets the key's owner re-publish a
//! lost contact list from the browser.
//!
//! # Architecture
//!
//! - **Identifier**: Decodes the NIP-19 `npub` into a hex public key
//! - **Archive**: One parameterized Postgres query, ordered by kind then newest first
//! - **Profile**: Best-effort kind 0 lookup, trying a fixed relay list in order
//! - **Render**: Generates HTML using maud (compile-time templates)
//!
//! The restore itself happens client-side (`static/script.js`): the viewer's
//! NIP-07 extension signs a fresh copy of the contact list and the browser
//! publishes it. The server never holds keys and never writes to the archive.
//!
//! # URL Pattern
//!
//! ```text
//! GET /npub/{npub}
//! GET /npub/?q={npub}
//! ```
//!
//! # Security
//!
//! - All dynamic content, including raw archived payloads, is HTML-escaped by maud
//! - Profile picture URLs are validated (HTTPS/HTTP only) before use in attributes
//! - Content-Security-Policy allows scripts only from `/static/`
//! - X-Frame-Options: DENY prevents clickjacking

pub mod archive;
pub mod config;
pub mod error;
pub mod identifier;
pub mod profile;
pub mod render;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::{router, service};
pub use state::AppState;
