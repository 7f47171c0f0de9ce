//! Best-effort kind 0 profile lookup against live relays.
//!
//! Relays are tried one at a time, in configured order. The first relay that
//! returns a parseable kind 0 event for the key wins; every failure along the
//! way is logged and skipped. Running out of relays yields an empty
//! [`Profile`], never an error, so a missing profile can't block the page.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{Sink, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

type RelayStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Upper bound on the best-effort goodbye to a relay that already answered.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Profile metadata parsed from kind 0 JSON content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// User-facing display name (takes priority over name).
    #[serde(default)]
    pub display_name: Option<String>,
    /// Short biography.
    #[serde(default)]
    pub about: Option<String>,
    /// Profile picture URL.
    #[serde(default)]
    pub picture: Option<String>,
    /// NIP-05 identifier (e.g., "user@domain.com").
    #[serde(default)]
    pub nip05: Option<String>,
}

impl Profile {
    /// Best non-empty name, preferring `display_name` over `name`.
    pub fn best_name(&self) -> Option<&str> {
        [self.display_name.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    /// Parse from kind 0 JSON content.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

/// Why a single relay produced no profile.
#[derive(Debug, thiserror::Error)]
enum RelayError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Sequential profile fetcher over a fixed relay list.
#[derive(Debug, Clone)]
pub struct ProfileFetcher {
    relays: Arc<Vec<String>>,
    timeout: Duration,
}

impl ProfileFetcher {
    /// Create a fetcher. `timeout` bounds the whole exchange with each relay.
    pub fn new(relays: Arc<Vec<String>>, timeout: Duration) -> Self {
        Self { relays, timeout }
    }

    /// Fetch the newest kind 0 profile for `pubkey` (hex).
    ///
    /// Worst case this takes `(timeout + CLOSE_GRACE) × relays`.
    pub async fn fetch(&self, pubkey: &str) -> Profile {
        let sub_id = subscription_id(pubkey);

        for relay in self.relays.iter() {
            let attempt = tokio::time::timeout(self.timeout, query_relay(relay, pubkey, &sub_id))
                .await
                .unwrap_or(Err(RelayError::Timeout(self.timeout)));

            let found = match attempt {
                Ok((mut ws, found)) => {
                    close_subscription(&mut ws, &sub_id).await;
                    found
                }
                Err(e) => {
                    tracing::warn!(relay = %relay, pubkey = %pubkey, error = %e, "profile fetch failed");
                    continue;
                }
            };

            match found {
                Some(profile) => {
                    tracing::debug!(relay = %relay, pubkey = %pubkey, "profile fetched");
                    return profile;
                }
                None => {
                    tracing::debug!(relay = %relay, pubkey = %pubkey, "relay has no profile");
                }
            }
        }

        Profile::default()
    }
}

/// Run one REQ against one relay and hand back the open stream with the result.
async fn query_relay(
    url: &str,
    pubkey: &str,
    sub_id: &str,
) -> Result<(RelayStream, Option<Profile>), RelayError> {
    let (mut ws, _) = tokio_tungstenite::connect_async(url).await?;

    let req = json!(["REQ", sub_id, {"authors": [pubkey], "kinds": [0], "limit": 1}]);
    ws.send(Message::Text(req.to_string().into())).await?;

    let mut found = None;
    while let Some(msg) = ws.next().await {
        let text = match msg? {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        match parse_relay_message(text.as_str(), sub_id, pubkey) {
            RelayReply::Profile(profile) => {
                found = Some(profile);
                break;
            }
            RelayReply::Done => break,
            RelayReply::Ignore => {}
        }
    }

    Ok((ws, found))
}

/// Send `CLOSE` and a close frame, giving up after [`CLOSE_GRACE`].
///
/// Runs after the answer is in hand, so errors and stalls are only logged.
async fn close_subscription<S>(ws: &mut S, sub_id: &str)
where
    S: Sink<Message> + Unpin,
{
    let close = json!(["CLOSE", sub_id]);
    let goodbye = async {
        match ws.send(Message::Text(close.to_string().into())).await {
            Ok(()) => ws.close().await,
            Err(e) => Err(e),
        }
    };

    match tokio::time::timeout(CLOSE_GRACE, goodbye).await {
        Ok(Ok(())) => {}
        Ok(Err(_)) => tracing::debug!(sub_id = %sub_id, "relay dropped before CLOSE"),
        Err(_) => tracing::debug!(sub_id = %sub_id, "relay close timed out"),
    }
}

fn subscription_id(pubkey: &str) -> String {
    let short = pubkey.get(..8).unwrap_or(pubkey);
    format!("restore-profile-{short}")
}

/// The event fields needed to pick out a profile.
#[derive(Debug, Deserialize)]
struct RelayEvent {
    pubkey: String,
    kind: u64,
    content: String,
}

/// What a relay message means for an in-flight profile REQ.
#[derive(Debug, PartialEq, Eq)]
enum RelayReply {
    Profile(Profile),
    Done,
    Ignore,
}

/// Interpret one NIP-01 relay message.
fn parse_relay_message(text: &str, sub_id: &str, pubkey: &str) -> RelayReply {
    let Ok(Value::Array(parts)) = serde_json::from_str::<Value>(text) else {
        return RelayReply::Ignore;
    };
    let for_us = parts.get(1).and_then(Value::as_str) == Some(sub_id);

    match parts.first().and_then(Value::as_str) {
        Some("EVENT") if for_us => {
            let Some(event) = parts
                .get(2)
                .and_then(|v| serde_json::from_value::<RelayEvent>(v.clone()).ok())
            else {
                return RelayReply::Ignore;
            };
            if event.kind != 0 || event.pubkey != pubkey {
                return RelayReply::Ignore;
            }
            match Profile::from_json(&event.content) {
                Ok(profile) => RelayReply::Profile(profile),
                Err(e) => {
                    tracing::warn!(pubkey = %pubkey, error = %e, "unparsable profile content");
                    RelayReply::Ignore
                }
            }
        }
        Some("EOSE") | Some("CLOSED") if for_us => RelayReply::Done,
        Some("NOTICE") => {
            tracing::debug!(notice = %text, "relay notice");
            RelayReply::Ignore
        }
        _ => RelayReply::Ignore,
    }
}
