//! Results page for one public key.
//!
//! Renders the profile header, the event count, and the archived events
//! grouped by consecutive kind. Every event gets a copy button; contact
//! lists additionally get a restore button wired up by `static/script.js`.

use maud::{Markup, html};

use super::components::{
    RESTORABLE_KIND, is_safe_url, kind_header, page_shell, truncate, truncate_npub_display,
};
use crate::archive::{ArchivedEvent, group_by_kind};
use crate::profile::Profile;

/// Everything the results page shows.
#[derive(Debug, Clone, Copy)]
pub struct ResultsView<'a> {
    /// The key as the user entered it (normalized).
    pub npub: &'a str,
    /// The key in hex.
    pub pubkey_hex: &'a str,
    /// Live profile, possibly empty.
    pub profile: &'a Profile,
    /// Archived events, already in display order.
    pub events: &'a [ArchivedEvent],
}

/// Render the results page.
pub fn render(view: &ResultsView<'_>, site_name: &str, restore_relays: &[String]) -> Markup {
    let profile = view.profile;
    let name = profile.best_name();

    let title = match name {
        Some(name) => format!("Events for {name}"),
        None => format!("Events for {}", truncate_npub_display(view.npub)),
    };
    let description = format!(
        "{} archived events for {}",
        view.events.len(),
        truncate_npub_display(view.npub)
    );

    let body = html! {
        div class="back-link" {
            a href="/" { "← Back to Home" }
        }

        div class="profile-header" {
            @if let Some(pic_url) = profile.picture.as_deref() {
                @if is_safe_url(pic_url) {
                    img class="profile-pic" src=(pic_url) alt="Profile Picture" loading="lazy";
                }
            }
            div class="profile-info" {
                @if let Some(name) = name {
                    h1 class="profile-name" { (name) }
                } @else {
                    h1 class="profile-name mono" { (view.pubkey_hex) }
                }
                p { strong { "npub:" } " " span class="mono" { (view.npub) } }
                p { strong { "Hex Pubkey:" } " " span class="mono" { (view.pubkey_hex) } }
                @if let Some(nip05) = profile.nip05.as_deref().filter(|s| !s.trim().is_empty()) {
                    p { strong { "Verification:" } " " (nip05) }
                }
                @if let Some(about) = profile.about.as_deref().filter(|s| !s.trim().is_empty()) {
                    p class="profile-about" { strong { "About:" } " " (truncate(about, 2000)) }
                }
                p class="event-count" { "Total Events Found: " (view.events.len()) }
            }
        }

        div class="events-container" data-restore-relays=(restore_relays.join(" ")) {
            @if view.events.is_empty() {
                p class="no-events" { "No events found for this pubkey." }
            }
            @for group in group_by_kind(view.events) {
                section class="kind-group" data-kind=(group.kind) {
                    (kind_header(group.kind))
                    @for event in group.events {
                        (event_card(event))
                    }
                }
            }
        }
    };

    page_shell(&title, &description, site_name, body)
}

/// One archived event with its actions.
///
/// The payload goes in twice: visibly in the `<pre>`, and in `data-content`
/// for the copy/restore script. Both go through maud's escaping.
fn event_card(event: &ArchivedEvent) -> Markup {
    html! {
        article class="event" data-kind=(event.kind) {
            div class="event-header" {
                span class="event-timestamp" { (event.formatted_date()) }
                div class="event-actions" {
                    @if event.kind == RESTORABLE_KIND {
                        button type="button" class="restore-btn" { "Restore" }
                    }
                    button type="button" class="copy-btn" { "Copy" }
                }
            }
            details class="event-details" open {
                summary { "Payload" }
                div class="event-content" data-content=(event.event_data) {
                    pre { (event.event_data) }
                }
            }
            div class="event-id mono" { (event.id) }
        }
    }
}
