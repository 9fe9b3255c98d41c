//! Discord interaction tokens
//!
//! A token ends up as one segment of the webhook URL, so only URL-safe
//! characters are accepted and dot-only tokens are refused.

/// Whether `token` can be sent as an interaction token
pub fn is_valid_interaction_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
        && token.bytes().any(|b| b != b'.')
}
