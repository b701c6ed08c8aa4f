//! HTTP wiring: one GraphQL endpoint plus the GraphiQL playground.

use anyhow::Result;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Router,
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
    response::{Html, IntoResponse},
    routing::get,
};
use log::info;
use tokio::net::TcpListener;

use crate::{
    api::{AppSchema, AppState, BearerToken, build_schema},
    auth::TokenKeys,
    cache::FeedCache,
    config::Config,
    domain::{FollowService, PostService, UserService},
    store::Store,
};

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Executes one GraphQL request. The `Authorization` header, when present,
/// rides along as request data; resolvers decide whether they need it.
async fn graphql_handler(
    State(schema): State<AppSchema>,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = request.into_inner();
    if let Some(value) = headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()) {
        request = request.data(BearerToken(value.to_string()));
    }
    schema.execute(request).await.into()
}

pub fn router(schema: AppSchema) -> Router {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .with_state(schema)
}

/// Connects to storage, assembles the services, and serves until shutdown.
pub async fn run(config: Config) -> Result<()> {
    let store = Store::connect(&config.redis_url, &config.prefix).await?;
    let cache = FeedCache::new(store.connection(), store.keys());
    let tokens = TokenKeys::from_secret(&config.jwt_secret);

    let state = AppState {
        users: UserService::new(store.clone(), cache.clone(), tokens),
        posts: PostService::new(store.clone(), cache),
        follows: FollowService::new(store),
    };
    let schema = build_schema(state);

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("listening on port {}", config.port);
    axum::serve(listener, router(schema)).await?;
    Ok(())
}
