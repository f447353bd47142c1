pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;
use crate::models::Role;

/// Claims carried by both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id.
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Access and refresh tokens share a claim shape but are signed with
/// distinct keys, so a leaked refresh token cannot forge access tokens
/// and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    fn secret(&self) -> &'static str {
        let security = &config::config().security;
        match self {
            TokenKind::Access => &security.access_secret,
            TokenKind::Refresh => &security.refresh_secret,
        }
    }

    fn lifetime(&self) -> Duration {
        let security = &config::config().security;
        match self {
            TokenKind::Access => Duration::minutes(security.access_token_minutes),
            TokenKind::Refresh => Duration::days(security.refresh_token_days),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token signing key not configured")]
    MissingSecret,
    #[error("Failed to sign token: {0}")]
    Signing(String),
    #[error("Token invalid or expired")]
    Invalid,
}

/// Issue a signed, time-limited token for the given principal.
pub fn issue_token(user_id: Uuid, role: Role, kind: TokenKind) -> Result<String, TokenError> {
    let secret = kind.secret();
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        role,
        iat: now.timestamp(),
        exp: (now + kind.lifetime()).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verify signature and expiry, returning the embedded claims.
pub fn verify_token(token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
    let secret = kind.secret();
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| TokenError::Invalid)
}
