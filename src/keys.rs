/// Key-construction helpers for every Redis structure the service touches.
///
/// Layout: `{prefix}:social:{collection}:{entity_id}` for documents, with
/// auxiliary structures under reserved `~` segments so they can never
/// collide with entity ids.
#[derive(Debug, Clone)]
pub struct KeyContext {
    prefix: String,
}

/// Logical service segment shared by all keys.
const SERVICE: &str = "social";

pub const USERS: &str = "users";
pub const POSTS: &str = "posts";
pub const FOLLOWS: &str = "follows";

impl KeyContext {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Document key for one entity.
    pub fn entity(&self, collection: &str, entity_id: &str) -> String {
        format!("{}:{}:{}:{}", self.prefix, SERVICE, collection, entity_id)
    }

    /// Sorted-set index of a collection, scored by creation time.
    pub fn index(&self, collection: &str) -> String {
        format!("{}:{}:{}:~index", self.prefix, SERVICE, collection)
    }

    /// Reservation key for a unique field value; holds the owning entity id.
    pub fn unique(&self, collection: &str, field: &str, value: &str) -> String {
        format!(
            "{}:{}:{}:~unique:{}:{}",
            self.prefix,
            SERVICE,
            collection,
            field,
            value.to_lowercase()
        )
    }

    /// Hash of likes on one post (field = username).
    pub fn post_likes(&self, post_id: &str) -> String {
        format!("{}:{}:{}:~likes:{}", self.prefix, SERVICE, POSTS, post_id)
    }

    /// List of comments on one post, append order.
    pub fn post_comments(&self, post_id: &str) -> String {
        format!("{}:{}:{}:~comments:{}", self.prefix, SERVICE, POSTS, post_id)
    }

    /// Set of post ids authored by one user.
    pub fn posts_by_author(&self, author_id: &str) -> String {
        format!("{}:{}:{}:~by_author:{}", self.prefix, SERVICE, POSTS, author_id)
    }

    /// Deterministic key for a follow edge; its existence IS the uniqueness
    /// constraint on the ordered pair.
    pub fn follow_edge(&self, following_id: &str, follower_id: &str) -> String {
        format!(
            "{}:{}:{}:edge:{}:{}",
            self.prefix, SERVICE, FOLLOWS, following_id, follower_id
        )
    }

    /// Set of follower ids of one user.
    pub fn followers(&self, following_id: &str) -> String {
        format!("{}:{}:{}:~followers:{}", self.prefix, SERVICE, FOLLOWS, following_id)
    }

    /// Set of followee ids of one user.
    pub fn following(&self, follower_id: &str) -> String {
        format!("{}:{}:{}:~following:{}", self.prefix, SERVICE, FOLLOWS, follower_id)
    }

    /// The one fixed key holding the serialized post feed.
    pub fn feed_cache(&self) -> String {
        format!("{}:{}:cache:posts", self.prefix, SERVICE)
    }
}
