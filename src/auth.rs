//! Credential helpers: password hashing and signed access tokens.
//!
//! Both halves are pure and stateless; the JWT keys are derived once from
//! the configured secret and injected wherever tokens are issued or
//! checked.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, ApiResult};

/// Fixed bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Token lifetime.
const TOKEN_TTL_DAYS: i64 = 30;

/// Message returned for any token that fails verification.
pub const INVALID_TOKEN: &str = "Invalid token";

/// One-way, salted password hash.
pub fn hash_password(plain: &str) -> ApiResult<String> {
    Ok(bcrypt::hash(plain, BCRYPT_COST)?)
}

/// Constant-cost comparison of a candidate password against a stored hash.
pub fn verify_password(plain: &str, hash: &str) -> ApiResult<bool> {
    Ok(bcrypt::verify(plain, hash)?)
}

/// Claims carried by an access token. `sub` is the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Symmetric signing/verification keys derived from the configured secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issues an HS256 token carrying the user id, valid for 30 days.
    pub fn sign(&self, user_id: &str) -> ApiResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verifies signature and expiry. Any failure collapses into the single
    /// `Invalid token` auth error; callers never learn why a token was bad.
    pub fn verify(&self, token: &str) -> ApiResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| ApiError::auth(INVALID_TOKEN))
    }
}
