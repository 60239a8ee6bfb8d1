//! Auth token wrapper
//!
//! Tokens are wiped from memory on drop and never appear in `Debug` output,
//! so they can travel inside worker tasks without leaking into logs.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A personal access token for the remote service
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    /// The raw token, for building a request
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let token = AuthToken::new("ghp_secret");
        assert_eq!(format!("{:?}", token), "AuthToken(***)");
        assert_eq!(token.expose(), "ghp_secret");
    }

    #[test]
    fn test_whitespace_only_is_blank() {
        assert!(AuthToken::new("  \n").is_blank());
        assert!(!AuthToken::new("x").is_blank());
    }
}
