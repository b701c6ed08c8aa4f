//! GraphQL schema and the authentication gate.
//!
//! One query root, one mutation root, no subscriptions. Domain services
//! are injected as schema data; the bearer token (when present) is
//! attached to each request by the HTTP handler.

mod mutation;
mod query;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

use async_graphql::{Context, EmptySubscription, Schema};

use crate::{
    auth::INVALID_TOKEN,
    domain::{FollowService, PostService, UserService},
    errors::{ApiError, ApiResult},
    model::Viewer,
};

/// Everything the resolvers need, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub posts: PostService,
    pub follows: FollowService,
}

/// Raw `Authorization` header value of the current request.
pub struct BearerToken(pub String);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(state: AppState) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}

/// Shared authentication step for every protected operation: extract the
/// bearer token, verify it, load the referenced user, and return the
/// password-free caller identity. Absence and malformation both collapse
/// into the flat `Invalid token` error.
pub(crate) async fn authenticate(ctx: &Context<'_>) -> ApiResult<Viewer> {
    let state = ctx.data_unchecked::<AppState>();
    let header = ctx
        .data_opt::<BearerToken>()
        .ok_or_else(|| ApiError::auth(INVALID_TOKEN))?;
    let mut parts = header.0.split_whitespace();
    let token = match (parts.next(), parts.next()) {
        (Some(_scheme), Some(token)) => token,
        _ => return Err(ApiError::auth(INVALID_TOKEN)),
    };
    state.users.viewer_from_token(token).await
}
