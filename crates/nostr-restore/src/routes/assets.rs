//! Static assets compiled into the binary.
//!
//! Served read-only under `/static/`. The set is fixed at build time, so
//! there is no filesystem access at runtime.

use axum::extract::Path;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

const STYLE_CSS: &str = include_str!("../../static/style.css");
const SCRIPT_JS: &str = include_str!("../../static/script.js");

/// Look up an embedded asset by file name.
fn asset(name: &str) -> Option<(&'static str, &'static str)> {
    match name {
        "style.css" => Some(("text/css; charset=utf-8", STYLE_CSS)),
        "script.js" => Some(("text/javascript; charset=utf-8", SCRIPT_JS)),
        _ => None,
    }
}

/// Serve `GET /static/{file}`.
pub async fn static_file(Path(file): Path<String>) -> Response {
    let Some((content_type, body)) = asset(&file) else {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    };

    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
        (
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        ),
        (
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ),
    ];

    (StatusCode::OK, headers, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_assets_resolve() {
        let (ct, body) = asset("style.css").unwrap();
        assert!(ct.starts_with("text/css"));
        assert!(!body.is_empty());

        let (ct, body) = asset("script.js").unwrap();
        assert!(ct.starts_with("text/javascript"));
        assert!(body.contains("signEvent"));
    }

    #[test]
    fn unknown_and_traversal_paths_rejected() {
        assert!(asset("../Cargo.toml").is_none());
        assert!(asset("").is_none());
        assert!(asset("STYLE.CSS").is_none());
    }
}
