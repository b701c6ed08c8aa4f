use thiserror::Error;

/// Top-level error type surfaced by the domain and API layers.
///
/// The first four variants carry the user-visible message exactly as the
/// client displays it; the remaining variants wrap infrastructure failures
/// and keep their library messages.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input (required fields, email format, password strength).
    #[error("{0}")]
    Validation(String),

    /// Missing/invalid token or bad credentials.
    #[error("{0}")]
    Auth(String),

    /// Referenced user/post/comment target is absent.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate like/follow, or their inverse absence.
    #[error("{0}")]
    Conflict(String),

    /// Underlying Redis command failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Document could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Password hashing/verification failed.
    #[error("password error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    /// Token issuance failed. Verification failures map to `Auth` instead.
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
