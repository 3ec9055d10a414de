//! Access/refresh token issuance and validation.
//!
//! Both tokens are HMAC-signed JWTs carrying the full identity [`Claims`].
//! They are signed with two different secrets, so holding one never lets a
//! client forge the other. Tokens are not revocable: a token stays valid until
//! its own `exp`, whatever was issued after it.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Value of the `iss` claim on every token.
pub const ISSUER: &str = "MagicStream";

/// Access token lifetime.
pub const ACCESS_TOKEN_TTL_HOURS: i64 = 24;

/// Refresh token lifetime.
pub const REFRESH_TOKEN_TTL_HOURS: i64 = 7 * 24;

/// Only the HMAC family is accepted; anything else in the header is rejected.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Identity fields embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub user_id: String,
}

/// JWT claims: the identity plus issuer and validity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: Identity,
    /// Always [`ISSUER`].
    pub iss: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// A freshly issued access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signing secrets for the two token kinds.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret for access tokens (`SECRET_KEY`).
    pub access_secret: String,
    /// HMAC secret for refresh tokens (`SECRET_REFRESH_KEY`).
    pub refresh_secret: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Signature did not verify, or the header named a non-HMAC algorithm.
    #[error("Token signature is invalid")]
    InvalidSignature,

    /// Not a decodable JWT or missing required claims.
    #[error("Token is malformed: {0}")]
    Malformed(String),

    /// `exp` is not in the future.
    #[error("Token has expired")]
    Expired,

    /// Encoding failed while issuing.
    #[error("Token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Issue an access token (24 h) and a refresh token (7 days) for `identity`.
pub fn issue_tokens(identity: &Identity, config: &JwtConfig) -> Result<TokenPair, TokenError> {
    let now = Utc::now().timestamp();
    let access_token = sign(
        &claims_for(identity, now, ACCESS_TOKEN_TTL_HOURS),
        &config.access_secret,
    )?;
    let refresh_token = sign(
        &claims_for(identity, now, REFRESH_TOKEN_TTL_HOURS),
        &config.refresh_secret,
    )?;
    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Validate an access token and return its claims.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, TokenError> {
    verify(token, &config.access_secret)
}

/// Validate a refresh token and return its claims.
pub fn validate_refresh_token(token: &str, config: &JwtConfig) -> Result<Claims, TokenError> {
    verify(token, &config.refresh_secret)
}

fn claims_for(identity: &Identity, now: i64, ttl_hours: i64) -> Claims {
    Claims {
        identity: identity.clone(),
        iss: ISSUER.to_string(),
        iat: now,
        exp: now + ttl_hours * 3600,
    }
}

fn sign(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Signing)
}

fn verify(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss"]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed(e.to_string()),
    })?
    .claims;

    // The library allows a leeway on `exp`; expiry is enforced strictly here.
    if claims.exp <= Utc::now().timestamp() {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}
