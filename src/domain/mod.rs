//! Domain entities: user accounts, posts with engagement, follow edges.
//!
//! Each service is an explicitly constructed, cloneable object holding the
//! injected store/cache/token handles. The API layer never touches storage
//! directly; everything goes through these operations.

mod follows;
mod posts;
mod users;

pub use follows::FollowService;
pub use posts::{CommentInput, CreatePostInput, LikeInput, PostService};
pub use users::{LoginInput, RegisterInput, UserService};

use crate::errors::{ApiError, ApiResult};

/// Unwraps a required input field, rejecting absence and the empty string
/// with the field's own message.
pub(crate) fn required_arg(value: Option<String>, message: &str) -> ApiResult<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::validation(message)),
    }
}
