//! Application Configuration

use platform::token::TokenSigner;
use std::time::Duration;

/// Identity application configuration
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Secret key for token signing (32 bytes)
    pub token_secret: [u8; 32],
    /// Access token TTL (1 hour)
    pub access_ttl: Duration,
    /// Refresh token TTL (1 week)
    pub refresh_ttl: Duration,
    /// Page size for user listings
    pub page_size: u32,
    /// From address used for confirmation-code mail
    pub from_email: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            token_secret: [0u8; 32],
            access_ttl: Duration::from_secs(3600),
            refresh_ttl: Duration::from_secs(7 * 24 * 3600),
            page_size: 10,
            from_email: "noreply@localhost".to_string(),
        }
    }
}

impl IdentityConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            token_secret: TokenSigner::random_secret(),
            ..Default::default()
        }
    }

    /// The signer/verifier bound to this config.
    pub fn signer(&self) -> TokenSigner {
        TokenSigner::new(self.token_secret, self.access_ttl, self.refresh_ttl)
    }
}
