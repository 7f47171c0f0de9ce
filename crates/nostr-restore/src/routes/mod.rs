//! Route definitions for the restore service.
//!
//! ## Routes
//!
//! - `GET /` - Home page with search form
//! - `GET /npub/{identifier}` - Results page (or `.json` for the API form)
//! - `GET /npub/?q={identifier}` - Results page from the search form
//! - `GET /static/{file}` - Embedded CSS and JS
//! - `GET /health` - Liveness check (JSON)
//! - `GET /ready` - Readiness check against the archive (JSON)
//! - `GET /robots.txt` - Crawler instructions

mod assets;
mod health;
mod home;
mod npub;

use axum::Router;
use axum::http::{HeaderMap, HeaderValue, Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use maud::Markup;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;

use crate::render::components::CSP_HEADER;
use crate::state::AppState;

/// Build the complete restore service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home_page))
        .route("/npub", get(npub::search_handler))
        .route("/npub/", get(npub::search_handler))
        .route("/npub/{identifier}", get(npub::npub_handler))
        .route("/static/{file}", get(assets::static_file))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness))
        .route("/robots.txt", get(robots_txt))
        .with_state(state)
}

/// The router with request tracing and permissive CORS, as served by the binary.
///
/// Each request gets an `http_request` span carrying method and path.
pub fn service(state: AppState) -> Router {
    router(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Serve robots.txt.
///
/// Per-key pages are personal archives; keep them out of search indexes.
async fn robots_txt() -> impl IntoResponse {
    (
        [("content-type", "text/plain; charset=utf-8")],
        "User-agent: *\nDisallow: /npub/\n",
    )
}

/// Build an HTTP response with HTML content and security headers.
pub(crate) fn html_response(markup: Markup) -> Response {
    let mut headers = HeaderMap::new();

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );

    // Security headers
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CSP_HEADER),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    // Pages embed a live profile fetch; never serve a stale one.
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    (StatusCode::OK, headers, markup.into_string()).into_response()
}
