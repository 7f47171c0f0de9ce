//! Home page with the npub search form.

use axum::extract::State;
use axum::response::Response;
use maud::html;

use super::html_response;
use crate::render::components::page_shell;
use crate::state::AppState;

/// Render the home page.
pub async fn home_page(State(state): State<AppState>) -> Response {
    let site_name = &state.config.site_name;

    let body = html! {
        div class="header" {
            h1 { (site_name) }
            p { "This service shows Nostr events that were backed up earlier, looked up by npub." }
            p { "Enter an npub (e.g., npub1...) in the box below to view stored events." }
            p class="hint" {
                "Contact lists (kind 3) can be restored: the page asks your "
                a href="https://github.com/nostr-protocol/nips/blob/master/07.md" rel="noopener" { "NIP-07" }
                " signer extension to re-sign the backup and publishes it to a few relays."
            }
        }

        div class="search-box" {
            form action="/npub/" method="get" {
                input type="text" name="q" placeholder="Enter npub (e.g., npub1...)" required autocomplete="off" spellcheck="false";
                button type="submit" { "Search Events" }
            }
        }
    };

    html_response(page_shell(
        site_name,
        "Look up archived Nostr events by npub and restore lost contact lists.",
        site_name,
        body,
    ))
}
