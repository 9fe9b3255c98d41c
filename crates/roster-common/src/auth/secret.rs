//! Shared-secret handling
//!
//! The role endpoints are called machine-to-machine with a pre-shared key.
//! Keys are compared without short-circuiting on the first differing byte.

use std::fmt;

use subtle::ConstantTimeEq;

/// A secret string whose `Debug` output never reveals the value
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret(String);

impl SharedSecret {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw secret bytes, for keying other primitives
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Compare `candidate` against the secret in constant time
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}
