use chrono::Utc;
use log::info;

use crate::{
    errors::{ApiError, ApiResult},
    keys::USERS,
    model::{FollowEdge, Viewer},
    store::Store,
};

use super::required_arg;

#[derive(Clone)]
pub struct FollowService {
    store: Store,
}

impl FollowService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Inserts the directed edge "follower follows followee". Uniqueness
    /// of the ordered pair is enforced by the storage script.
    pub async fn follow(&self, following_id: Option<String>, follower: &Viewer) -> ApiResult<String> {
        let following_id = required_arg(following_id, "Following ID is required")?;
        if following_id == follower.id {
            return Err(ApiError::validation("Cannot follow yourself"));
        }
        self.ensure_user_exists(&following_id).await?;

        let now = Utc::now();
        let edge = FollowEdge {
            following_id: following_id.clone(),
            follower_id: follower.id.clone(),
            created_at: now,
            updated_at: now,
        };
        self.store.create_follow_edge(&edge).await?;

        info!("user {} followed {}", follower.id, following_id);
        Ok("You are now following this user".to_string())
    }

    /// Removes the edge; fails when it never existed.
    pub async fn unfollow(&self, following_id: Option<String>, follower: &Viewer) -> ApiResult<String> {
        let following_id = required_arg(following_id, "Following ID is required")?;
        self.store.delete_follow_edge(&following_id, &follower.id).await?;

        info!("user {} unfollowed {}", follower.id, following_id);
        Ok("You have unfollowed this user".to_string())
    }

    async fn ensure_user_exists(&self, user_id: &str) -> ApiResult<()> {
        if !self.store.exists(&self.store.keys().entity(USERS, user_id)).await? {
            return Err(ApiError::not_found("User not found"));
        }
        Ok(())
    }
}
