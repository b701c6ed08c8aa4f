use async_graphql::{Context, Object, Result};

use crate::{
    domain::required_arg,
    model::{PostView, Profile, UserNode},
};

use super::{AppState, authenticate};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// All users, registration order. Protected.
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<UserNode>> {
        authenticate(ctx).await?;
        let state = ctx.data_unchecked::<AppState>();
        Ok(state.users.find_all().await?)
    }

    /// Case-insensitive substring search on name or username. Public.
    async fn find_by_name(&self, ctx: &Context<'_>, username: Option<String>) -> Result<Vec<UserNode>> {
        let state = ctx.data_unchecked::<AppState>();
        Ok(state.users.find_by_name(&username.unwrap_or_default()).await?)
    }

    /// One user by id. Public.
    async fn find_by_id(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "_id")] id: Option<String>,
    ) -> Result<UserNode> {
        let id = required_arg(id, "User ID is required")?;
        let state = ctx.data_unchecked::<AppState>();
        Ok(state.users.find_by_id(&id).await?)
    }

    /// Another user's profile, annotated relative to the caller.
    async fn get_user_profile(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "_id")] id: Option<String>,
    ) -> Result<Profile> {
        let viewer = authenticate(ctx).await?;
        let id = required_arg(id, "User ID is required")?;
        let state = ctx.data_unchecked::<AppState>();
        Ok(state.users.get_user_profile(&id, &viewer).await?)
    }

    /// The caller's own profile.
    async fn get_my_profile(&self, ctx: &Context<'_>) -> Result<Profile> {
        let viewer = authenticate(ctx).await?;
        let state = ctx.data_unchecked::<AppState>();
        Ok(state.users.get_my_profile(&viewer).await?)
    }

    /// The post feed, newest first, served through the cache.
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<PostView>> {
        let viewer = authenticate(ctx).await?;
        let state = ctx.data_unchecked::<AppState>();
        Ok(state.posts.get_posts(&viewer).await?)
    }

    /// One post with full comment and like lists.
    async fn post_by_id(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "_id")] id: Option<String>,
    ) -> Result<PostView> {
        let viewer = authenticate(ctx).await?;
        let id = required_arg(id, "Post ID is required")?;
        let state = ctx.data_unchecked::<AppState>();
        Ok(state.posts.get_post_by_id(&id, &viewer).await?)
    }
}
