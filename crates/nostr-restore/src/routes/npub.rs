//! Npub lookup handlers.
//!
//! Handles `GET /npub/{identifier}` and the landing-page form submission
//! `GET /npub/?q={identifier}`. Appending `.json` to the path form returns
//! the same data as JSON.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::html_response;
use crate::archive::ArchivedEvent;
use crate::error::RestoreError;
use crate::identifier::{self, DecodedNpub};
use crate::profile::Profile;
use crate::render::{self, ResultsView};
use crate::state::AppState;

/// Query string of the landing-page search form.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: Option<String>,
}

/// Everything gathered for one key.
struct Lookup {
    key: DecodedNpub,
    events: Vec<ArchivedEvent>,
    profile: Profile,
}

/// Decode, query the archive, then fetch the profile, in that order.
///
/// A bad identifier never reaches the database; a database failure never
/// reaches the relays.
async fn lookup(state: &AppState, input: &str) -> Result<Lookup, RestoreError> {
    let key = identifier::decode_npub(input)?;
    let events = state.archive.events_by_pubkey(&key.hex).await?;
    let profile = state.profiles.fetch(&key.hex).await;

    tracing::info!(
        pubkey = %key.hex,
        events = events.len(),
        has_profile = profile != Profile::default(),
        "npub lookup complete"
    );

    Ok(Lookup {
        key,
        events,
        profile,
    })
}

/// `GET /npub/{identifier}` (or `{identifier}.json`).
pub async fn npub_handler(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Response, RestoreError> {
    let identifier = identifier.trim();

    if let Some(bare) = identifier.strip_suffix(".json") {
        return json_response(&state, bare).await;
    }

    results_page(&state, identifier).await
}

/// `GET /npub/?q={identifier}`.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, RestoreError> {
    let identifier = params.q.unwrap_or_default();
    results_page(&state, &identifier).await
}

async fn results_page(state: &AppState, identifier: &str) -> Result<Response, RestoreError> {
    let Lookup {
        key,
        events,
        profile,
    } = lookup(state, identifier).await?;

    let view = ResultsView {
        npub: &key.npub,
        pubkey_hex: &key.hex,
        profile: &profile,
        events: &events,
    };
    let markup = render::results::render(
        &view,
        &state.config.site_name,
        &state.config.restore_relays,
    );

    Ok(html_response(markup))
}

/// Serve the lookup as JSON.
///
/// See [`embedded_payload`] for how each archived payload is represented.
async fn json_response(state: &AppState, identifier: &str) -> Result<Response, RestoreError> {
    let Lookup {
        key,
        events,
        profile,
    } = lookup(state, identifier).await?;

    let events_json: Vec<serde_json::Value> = events
        .iter()
        .map(|e| {
            let payload = embedded_payload(&e.event_data);
            serde_json::json!({
                "id": e.id,
                "pubkey": e.pubkey,
                "created_at": e.created_at,
                "kind": e.kind,
                "event": payload,
            })
        })
        .collect();

    let json_body = serde_json::json!({
        "npub": key.npub,
        "pubkey": key.hex,
        "profile": profile,
        "total": events.len(),
        "events": events_json,
    });

    let json_string = serde_json::to_string_pretty(&json_body).map_err(anyhow::Error::from)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );

    Ok((StatusCode::OK, headers, json_string).into_response())
}

/// Embed a payload that is a JSON object as-is; pass anything else
/// (including bare JSON scalars and arrays) through as the raw string.
fn embedded_payload(raw: &str) -> serde_json::Value {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value @ serde_json::Value::Object(_)) => value,
        _ => serde_json::Value::String(raw.to_string()),
    }
}
