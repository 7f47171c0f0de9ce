//! HTML rendering for the restore service.
//!
//! All rendering uses [maud](https://maud.lambda.xyz/) for compile-time HTML
//! generation with automatic XSS protection (all dynamic values are escaped).
//! Stored payloads are attacker-controlled text and never bypass that
//! escaping.

pub mod components;
pub mod results;

pub use results::ResultsView;
