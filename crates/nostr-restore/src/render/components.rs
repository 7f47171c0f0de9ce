//! Shared HTML components used across all pages.
//!
//! These are maud functions that return `Markup` fragments for composition
//! into full pages.

use maud::{DOCTYPE, Markup, html};

/// Inline CSS for error pages.
///
/// Error pages must render even if static assets are the thing failing.
pub const ERROR_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;display:flex;justify-content:center;align-items:center;min-height:100vh;background:#fafafa;color:#1a1a2e;padding:1rem}
.error-page{text-align:center;max-width:400px}
.error-page h1{font-size:1.5rem;margin-bottom:.75rem}
.error-page p{color:#666;margin-bottom:1rem;line-height:1.5;word-break:break-word}
.error-page a{color:#6c5ce7}
@media(prefers-color-scheme:dark){
body{background:#0f0f17;color:#e0e0e8}
.error-page p{color:#aaa}
.error-page a{color:#a29bfe}
}
"#;

/// Content-Security-Policy header value.
///
/// Scripts and stylesheets only from our own `/static/`; the restore helper
/// needs websocket `connect-src` for the relays it publishes to. Profile
/// pictures are arbitrary http(s) URLs.
pub const CSP_HEADER: &str = "default-src 'none'; style-src 'self' 'unsafe-inline'; script-src 'self'; img-src https: http: data:; connect-src 'self' wss: ws:; form-action 'self'; base-uri 'none'; frame-ancestors 'none'";

/// Kind whose events can be re-signed and re-broadcast (NIP-02 contact list).
pub const RESTORABLE_KIND: i32 = 3;

/// Render the full HTML page shell with `<head>` and body content.
pub fn page_shell(title: &str, description: &str, site_name: &str, body_content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                meta name="description" content=(description);
                meta name="robots" content="noindex";
                link rel="stylesheet" href="/static/style.css";
                script src="/static/script.js" defer {}
            }
            body {
                main class="container" { (body_content) }
                footer class="footer" {
                    a href="/" { (site_name) }
                }
            }
        }
    }
}

/// Human label for well-known kinds, empty when we have none.
pub fn kind_label(kind: i32) -> &'static str {
    match kind {
        0 => "Profile",
        1 => "Note",
        3 => "Contacts",
        5 => "Deletion",
        6 => "Repost",
        7 => "Reaction",
        10002 => "Relay List",
        30023 => "Long-form Article",
        _ => "",
    }
}

/// Render a kind group header (e.g., "Kind 3 · Contacts").
pub fn kind_header(kind: i32) -> Markup {
    let label = kind_label(kind);

    html! {
        h2 class="kind-header" {
            "Kind " (kind)
            @if !label.is_empty() {
                span class="kind-label" { " · " (label) }
            }
        }
    }
}

/// Check if a URL is safe to use in `src` or `href` attributes.
pub fn is_safe_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Truncate a string to a maximum length, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Truncate an npub for display: first 16 chars + ... + last 12 chars.
pub fn truncate_npub_display(npub: &str) -> String {
    if npub.len() <= 32 || !npub.is_ascii() {
        return npub.to_string();
    }
    format!("{}...{}", &npub[..16], &npub[npub.len() - 12..])
}
