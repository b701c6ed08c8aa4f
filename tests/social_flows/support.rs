pub(crate) use murmur::{
    auth::TokenKeys,
    cache::FeedCache,
    domain::{
        CommentInput, CreatePostInput, FollowService, LikeInput, LoginInput, PostService, RegisterInput,
        UserService,
    },
    id::generate_entity_id,
    model::{FeedEntry, Viewer},
    store::Store,
};
pub(crate) use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) const TEST_PASSWORD: &str = "hunter2";

pub(crate) static TEST_NAMESPACE_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub(crate) struct TestBackend {
    pub(crate) cache: FeedCache,
    pub(crate) users: UserService,
    pub(crate) posts: PostService,
    pub(crate) follows: FollowService,
}

/// Connects to the local Redis under a prefix unique to this test, so
/// tests never see each other's keys.
pub(crate) async fn backend() -> TestBackend {
    let idx = TEST_NAMESPACE_COUNTER.fetch_add(1, Ordering::SeqCst);
    let salt = generate_entity_id();
    let prefix = format!("murmur_test_{idx}_{}", &salt[..8]);
    let store = Store::connect("redis://127.0.0.1/", prefix).await.expect("redis");
    let cache = FeedCache::new(store.connection(), store.keys());
    let tokens = TokenKeys::from_secret("test-secret");
    TestBackend {
        users: UserService::new(store.clone(), cache.clone(), tokens),
        posts: PostService::new(store.clone(), cache.clone()),
        follows: FollowService::new(store),
        cache,
    }
}

pub(crate) fn register_input(username: &str) -> RegisterInput {
    register_input_with(username, &format!("{username}@example.com"))
}

pub(crate) fn register_input_with(username: &str, email: &str) -> RegisterInput {
    RegisterInput {
        name: Some(format!("{username} example")),
        username: Some(username.to_string()),
        email: Some(email.to_string()),
        password: Some(TEST_PASSWORD.to_string()),
        profile_img: None,
    }
}

pub(crate) fn login_input(handle: &str) -> LoginInput {
    LoginInput {
        username: Some(handle.to_string()),
        password: Some(TEST_PASSWORD.to_string()),
    }
}

/// Registers a user and returns the authenticated identity.
pub(crate) async fn signup(backend: &TestBackend, username: &str) -> Viewer {
    backend
        .users
        .register(register_input(username))
        .await
        .expect("register");
    let session = backend.users.login(login_input(username)).await.expect("login");
    backend
        .users
        .viewer_from_token(&session.token)
        .await
        .expect("viewer from token")
}

pub(crate) fn post_input(content: &str) -> CreatePostInput {
    CreatePostInput {
        content: Some(content.to_string()),
        tags: None,
        img_url: None,
    }
}

pub(crate) fn comment_input(post_id: &str, content: &str) -> CommentInput {
    CommentInput {
        post_id: Some(post_id.to_string()),
        content: Some(content.to_string()),
    }
}

pub(crate) fn like_input(post_id: &str) -> LikeInput {
    LikeInput {
        post_id: Some(post_id.to_string()),
    }
}

/// Creates a post and returns its id via the feed.
pub(crate) async fn create_post(backend: &TestBackend, viewer: &Viewer, content: &str) -> String {
    backend
        .posts
        .create_post(post_input(content), viewer)
        .await
        .expect("create post");
    let feed = backend.posts.get_posts(viewer).await.expect("feed");
    feed.iter()
        .find(|post| post.content == content)
        .expect("created post in feed")
        .id
        .clone()
}

/// Index scores are millisecond timestamps; spacing creations keeps feed
/// ordering deterministic.
pub(crate) async fn tick() {
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
}
