use async_graphql::Request;
use murmur::api::{AppSchema, AppState, BearerToken, build_schema};
use serde_json::Value;

use super::support::*;

fn schema_for(backend: &TestBackend) -> AppSchema {
    build_schema(AppState {
        users: backend.users.clone(),
        posts: backend.posts.clone(),
        follows: backend.follows.clone(),
    })
}

async fn execute(schema: &AppSchema, query: &str, token: Option<&str>) -> async_graphql::Response {
    let mut request = Request::new(query);
    if let Some(token) = token {
        request = request.data(BearerToken(format!("Bearer {token}")));
    }
    schema.execute(request).await
}

fn data(response: async_graphql::Response) -> Value {
    assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
    response.data.into_json().expect("json data")
}

#[tokio::test]
async fn register_and_login_over_graphql() {
    let backend = backend().await;
    let schema = schema_for(&backend);

    let register = r#"mutation {
        register(payload: { username: "alice", email: "alice@example.com", password: "hunter2" })
    }"#;
    let payload = data(execute(&schema, register, None).await);
    assert_eq!(payload["register"], "alice has been registered");

    let login = r#"mutation {
        login(payload: { username: "alice", password: "hunter2" }) { token userId }
    }"#;
    let payload = data(execute(&schema, login, None).await);
    assert!(payload["login"]["token"].as_str().is_some_and(|token| !token.is_empty()));
    assert!(payload["login"]["userId"].as_str().is_some());
}

#[tokio::test]
async fn register_errors_surface_as_graphql_errors() {
    let backend = backend().await;
    let schema = schema_for(&backend);

    let register = r#"mutation {
        register(payload: { username: "bob", email: "bob@example.com", password: "abc" })
    }"#;
    let response = execute(&schema, register, None).await;
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "Password is not strong enough");
}

#[tokio::test]
async fn protected_fields_require_a_valid_token() {
    let backend = backend().await;
    let schema = schema_for(&backend);

    let response = execute(&schema, "{ posts { _id } }", None).await;
    assert_eq!(response.errors[0].message, "Invalid token");

    let response = execute(&schema, "{ getMyProfile { username } }", Some("garbage")).await;
    assert_eq!(response.errors[0].message, "Invalid token");
}

#[tokio::test]
async fn authenticated_post_flow_over_graphql() {
    let backend = backend().await;
    let schema = schema_for(&backend);
    signup(&backend, "carol").await;

    let login = r#"mutation { login(payload: { username: "carol", password: "hunter2" }) { token } }"#;
    let payload = data(execute(&schema, login, None).await);
    let token = payload["login"]["token"].as_str().expect("token").to_string();

    let create = r#"mutation { createPost(payload: { content: "over the wire" }) }"#;
    let payload = data(execute(&schema, create, Some(&token)).await);
    assert_eq!(payload["createPost"], "Post created successfully");

    let feed = r#"{ posts { _id content isLiked likesCount author { username } } }"#;
    let payload = data(execute(&schema, feed, Some(&token)).await);
    let posts = payload["posts"].as_array().expect("posts array");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["content"], "over the wire");
    assert_eq!(posts[0]["isLiked"], false);
    assert_eq!(posts[0]["author"]["username"], "carol");

    let post_id = posts[0]["_id"].as_str().expect("post id").to_string();
    let like = format!(r#"mutation {{ likePost(payload: {{ postId: "{post_id}" }}) }}"#);
    let payload = data(execute(&schema, &like, Some(&token)).await);
    assert_eq!(payload["likePost"], "carol liked this post");

    let single = format!(r#"{{ postById(_id: "{post_id}") {{ isLiked likesCount }} }}"#);
    let payload = data(execute(&schema, &single, Some(&token)).await);
    assert_eq!(payload["postById"]["isLiked"], true);
    assert_eq!(payload["postById"]["likesCount"], 1);
}

#[tokio::test]
async fn public_user_lookup_uses_wire_names() {
    let backend = backend().await;
    let schema = schema_for(&backend);
    let viewer = signup(&backend, "dave").await;

    let by_name = r#"{ findByName(username: "DAV") { _id username } }"#;
    let payload = data(execute(&schema, by_name, None).await);
    assert_eq!(payload["findByName"][0]["username"], "dave");

    let by_id = format!(r#"{{ findById(_id: "{}") {{ username email }} }}"#, viewer.id);
    let payload = data(execute(&schema, &by_id, None).await);
    assert_eq!(payload["findById"]["username"], "dave");

    let missing = r#"{ findById(_id: "") { username } }"#;
    let response = execute(&schema, missing, None).await;
    assert_eq!(response.errors[0].message, "User ID is required");
}

#[tokio::test]
async fn follow_mutations_over_graphql() {
    let backend = backend().await;
    let schema = schema_for(&backend);
    signup(&backend, "erin").await;
    let frank = signup(&backend, "frank").await;

    let login = r#"mutation { login(payload: { username: "erin", password: "hunter2" }) { token } }"#;
    let payload = data(execute(&schema, login, None).await);
    let token = payload["login"]["token"].as_str().expect("token").to_string();

    let follow = format!(r#"mutation {{ following(followingId: "{}") }}"#, frank.id);
    let payload = data(execute(&schema, &follow, Some(&token)).await);
    assert_eq!(payload["following"], "You are now following this user");

    let profile = format!(r#"{{ getUserProfile(_id: "{}") {{ isFollowed followersCount }} }}"#, frank.id);
    let payload = data(execute(&schema, &profile, Some(&token)).await);
    assert_eq!(payload["getUserProfile"]["isFollowed"], true);
    assert_eq!(payload["getUserProfile"]["followersCount"], 1);

    let unfollow = format!(r#"mutation {{ unfollowing(followingId: "{}") }}"#, frank.id);
    let payload = data(execute(&schema, &unfollow, Some(&token)).await);
    assert_eq!(payload["unfollowing"], "You have unfollowed this user");
}
