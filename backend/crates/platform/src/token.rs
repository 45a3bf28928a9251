//! Signed Token Issuance and Verification
//!
//! Issues the access/refresh pair handed out by the auth endpoints and
//! verifies bearer tokens on every request. Tokens are opaque to clients:
//! `{user_id}.{expires_at_ms}.{kind}.{signature}` where the signature is
//! HMAC-SHA256 over the first three segments, base64url encoded.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Token verification failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    /// e.g. a refresh token presented where an access token is expected
    #[error("wrong token kind")]
    WrongKind,
}

/// Which half of the pair a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    const fn code(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "access" => Some(TokenKind::Access),
            "refresh" => Some(TokenKind::Refresh),
            _ => None,
        }
    }
}

/// An issued access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Issues and verifies signed tokens bound to a user id.
#[derive(Clone)]
pub struct TokenSigner {
    secret: [u8; 32],
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: [u8; 32], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            secret,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Generate a random 32-byte signing secret (for development).
    pub fn random_secret() -> [u8; 32] {
        let mut secret = [0u8; 32];
        OsRng.fill_bytes(&mut secret);
        secret
    }

    /// Issue a fresh access/refresh pair for the user.
    pub fn issue_pair(&self, user_id: Uuid) -> TokenPair {
        TokenPair {
            access: self.issue(user_id, TokenKind::Access, self.access_ttl),
            refresh: self.issue(user_id, TokenKind::Refresh, self.refresh_ttl),
        }
    }

    fn issue(&self, user_id: Uuid, kind: TokenKind, ttl: Duration) -> String {
        let expires_at_ms = now_ms() + ttl.as_millis() as i64;
        let payload = format!("{}.{}.{}", user_id, expires_at_ms, kind.code());
        format!("{}.{}", payload, self.sign(&payload))
    }

    /// Verify signature, expiry, and kind; return the bound user id.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Uuid, TokenError> {
        let (payload, signature) = token.rsplit_once('.').ok_or(TokenError::Malformed)?;

        let mut parts = payload.split('.');
        let user_id = parts.next().ok_or(TokenError::Malformed)?;
        let expires_at_ms = parts.next().ok_or(TokenError::Malformed)?;
        let kind = parts.next().ok_or(TokenError::Malformed)?;
        if parts.next().is_some() {
            return Err(TokenError::Malformed);
        }

        // Signature first: nothing else about the token is trusted until
        // the HMAC checks out.
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let user_id = Uuid::parse_str(user_id).map_err(|_| TokenError::Malformed)?;
        let expires_at_ms: i64 = expires_at_ms.parse().map_err(|_| TokenError::Malformed)?;
        let kind = TokenKind::from_code(kind).ok_or(TokenError::Malformed)?;

        if now_ms() >= expires_at_ms {
            return Err(TokenError::Expired);
        }
        if kind != expected {
            return Err(TokenError::WrongKind);
        }

        Ok(user_id)
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_millis() as i64
}
