use async_graphql::{Context, Object, Result};

use crate::{
    domain::{CommentInput, CreatePostInput, LikeInput, LoginInput, RegisterInput},
    model::LoginSession,
};

use super::{AppState, authenticate};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Creates an account. Public.
    async fn register(&self, ctx: &Context<'_>, payload: Option<RegisterInput>) -> Result<String> {
        let state = ctx.data_unchecked::<AppState>();
        Ok(state.users.register(payload.unwrap_or_default()).await?)
    }

    /// Exchanges credentials for a signed token. Public.
    async fn login(&self, ctx: &Context<'_>, payload: Option<LoginInput>) -> Result<LoginSession> {
        let state = ctx.data_unchecked::<AppState>();
        Ok(state.users.login(payload.unwrap_or_default()).await?)
    }

    async fn create_post(&self, ctx: &Context<'_>, payload: Option<CreatePostInput>) -> Result<String> {
        let viewer = authenticate(ctx).await?;
        let state = ctx.data_unchecked::<AppState>();
        Ok(state.posts.create_post(payload.unwrap_or_default(), &viewer).await?)
    }

    async fn create_comment(&self, ctx: &Context<'_>, payload: Option<CommentInput>) -> Result<String> {
        let viewer = authenticate(ctx).await?;
        let state = ctx.data_unchecked::<AppState>();
        Ok(state.posts.create_comment(payload.unwrap_or_default(), &viewer).await?)
    }

    async fn like_post(&self, ctx: &Context<'_>, payload: Option<LikeInput>) -> Result<String> {
        let viewer = authenticate(ctx).await?;
        let state = ctx.data_unchecked::<AppState>();
        Ok(state.posts.like_post(payload.unwrap_or_default(), &viewer).await?)
    }

    async fn unlike_post(&self, ctx: &Context<'_>, payload: Option<LikeInput>) -> Result<String> {
        let viewer = authenticate(ctx).await?;
        let state = ctx.data_unchecked::<AppState>();
        Ok(state.posts.unlike_post(payload.unwrap_or_default(), &viewer).await?)
    }

    /// Follow another user.
    async fn following(&self, ctx: &Context<'_>, following_id: Option<String>) -> Result<String> {
        let viewer = authenticate(ctx).await?;
        let state = ctx.data_unchecked::<AppState>();
        Ok(state.follows.follow(following_id, &viewer).await?)
    }

    /// Undo a follow.
    async fn unfollowing(&self, ctx: &Context<'_>, following_id: Option<String>) -> Result<String> {
        let viewer = authenticate(ctx).await?;
        let state = ctx.data_unchecked::<AppState>();
        Ok(state.follows.unfollow(following_id, &viewer).await?)
    }
}
