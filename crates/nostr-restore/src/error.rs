//! Error types for the restore service.
//!
//! Errors are rendered as simple HTML error pages rather than JSON,
//! since this is a user-facing HTML service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::{DOCTYPE, html};

/// Restore service error type.
#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    /// The identifier is not a well-formed npub.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The archive database could not be queried.
    #[error("archive unavailable: {0}")]
    ArchiveUnavailable(#[from] sqlx::Error),

    /// The response body could not be produced.
    #[error("render failed: {0}")]
    Render(#[from] anyhow::Error),
}

impl IntoResponse for RestoreError {
    fn into_response(self) -> Response {
        let (status, title, message) = match &self {
            Self::InvalidIdentifier(msg) => {
                tracing::debug!(reason = %msg, "rejected identifier");
                (
                    StatusCode::BAD_REQUEST,
                    "Invalid npub format",
                    format!("Enter a public key starting with npub1. ({msg})"),
                )
            }
            Self::ArchiveUnavailable(err) => {
                tracing::error!(error = %err, "archive query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Archive Unavailable",
                    "The event archive is temporarily unavailable. Please try again later."
                        .to_string(),
                )
            }
            Self::Render(err) => {
                tracing::error!(error = %err, "render failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Error",
                    "The page could not be rendered. Please try again later.".to_string(),
                )
            }
        };

        let markup = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (title) }
                    meta name="robots" content="noindex";
                    style { (maud::PreEscaped(crate::render::components::ERROR_CSS)) }
                }
                body {
                    main class="error-page" {
                        h1 { (title) }
                        p { (message) }
                        a href="/" { "Back to Home" }
                    }
                }
            }
        };

        (status, markup).into_response()
    }
}
