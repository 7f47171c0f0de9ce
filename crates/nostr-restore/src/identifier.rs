//! NIP-19 `npub` decoding.
//!
//! The only identifier this service accepts is a bech32 `npub1...` public
//! key. Anything else is rejected before any database or relay I/O happens.

use nostr::nips::nip19::{FromBech32, Nip19};

use crate::error::RestoreError;

/// Human-readable prefix of a bech32-encoded public key.
pub const NPUB_PREFIX: &str = "npub1";

/// NIP-21 URI scheme that users sometimes paste along with the key.
const NOSTR_URI_SCHEME: &str = "nostr:";

/// A decoded public key in both of its display forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedNpub {
    /// 64-char lowercase hex public key.
    pub hex: String,
    /// The bech32 `npub1...` form, trimmed of whitespace and URI scheme.
    pub npub: String,
}

/// Decode an `npub1...` identifier into its hex public key.
///
/// Surrounding whitespace and a leading `nostr:` are ignored. Fails with
/// [`RestoreError::InvalidIdentifier`] if the prefix is wrong, the bech32
/// checksum or length is bad, or the payload is not a public key.
pub fn decode_npub(input: &str) -> Result<DecodedNpub, RestoreError> {
    let trimmed = input.trim();
    let npub = trimmed.strip_prefix(NOSTR_URI_SCHEME).unwrap_or(trimmed);

    if !npub.starts_with(NPUB_PREFIX) {
        return Err(RestoreError::InvalidIdentifier(format!(
            "does not start with {NPUB_PREFIX}"
        )));
    }

    match Nip19::from_bech32(npub) {
        Ok(Nip19::Pubkey(pk)) => Ok(DecodedNpub {
            hex: pk.to_hex(),
            npub: npub.to_string(),
        }),
        Ok(_) => Err(RestoreError::InvalidIdentifier(
            "decoded value is not a public key".to_string(),
        )),
        Err(e) => Err(RestoreError::InvalidIdentifier(e.to_string())),
    }
}
