//! Stored documents and read-time projections.
//!
//! Stored structs are plain serde documents; anything the API returns goes
//! through a view struct so the password hash can never leak into a
//! response. View structs double as GraphQL objects and keep the wire
//! field names of the original schema (`_id`, `profileImg`, `likesCount`).

use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user, as stored. `password_hash` never appears in a view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile_img: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post document. Comments and likes live in per-post structures keyed
/// off the post id, not inside the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub img_url: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment, carrying a denormalized snapshot of the commenter's avatar.
#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject)]
#[graphql(name = "Comment")]
pub struct Comment {
    pub content: String,
    pub username: String,
    pub profile_img: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A like entry on a post.
#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject)]
#[graphql(name = "Like")]
pub struct Like {
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A directed follow edge: `follower_id` follows `following_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowEdge {
    pub following_id: String,
    pub follower_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal author projection attached to feed posts.
#[derive(Debug, Clone, Serialize, Deserialize, SimpleObject)]
#[graphql(name = "Author")]
pub struct Author {
    #[graphql(name = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub username: String,
    pub profile_img: Option<String>,
}

impl Author {
    pub fn of(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            username: user.username.clone(),
            profile_img: user.profile_img.clone(),
        }
    }
}

/// A user with the password stripped; the caller identity and the shape of
/// every user-returning query.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "User")]
pub struct UserNode {
    #[graphql(name = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub username: String,
    pub email: String,
    pub profile_img: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserNode {
    /// Strips the password hash.
    pub fn of(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            profile_img: user.profile_img.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// The authenticated caller of the current request.
pub type Viewer = UserNode;

/// A post annotated relative to a viewer.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Post")]
pub struct PostView {
    #[graphql(name = "_id")]
    pub id: String,
    pub content: String,
    pub tags: Vec<String>,
    pub img_url: String,
    pub author_id: String,
    pub author: Author,
    pub is_liked: bool,
    pub likes_count: i64,
    pub comments_count: i64,
    pub comments: Vec<Comment>,
    pub likes: Vec<Like>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One follower row in a profile.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Follower")]
pub struct FollowerEntry {
    pub follower_id: String,
    pub name: Option<String>,
    pub username: String,
    pub profile_img: Option<String>,
}

/// One followee row in a profile.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Following")]
pub struct FollowingEntry {
    pub following_id: String,
    pub name: Option<String>,
    pub username: String,
    pub profile_img: Option<String>,
}

/// Read-only profile projection: a user plus social-graph context and
/// their own annotated posts.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Profile")]
pub struct Profile {
    #[graphql(name = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub username: String,
    pub email: String,
    pub profile_img: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_followed: bool,
    pub followers_count: i64,
    pub followings_count: i64,
    pub followers: Vec<FollowerEntry>,
    pub followings: Vec<FollowingEntry>,
    pub posts: Vec<PostView>,
}

/// Successful login payload.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "LoginResponse")]
pub struct LoginSession {
    pub token: String,
    pub user_id: String,
}

/// One feed row as cached: everything a `PostView` needs except the
/// viewer-relative `is_liked` flag, which is recomputed per request so one
/// cache fill serves every viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEntry {
    pub post: Post,
    pub author: Author,
    pub comments: Vec<Comment>,
    pub likes: Vec<Like>,
}

impl FeedEntry {
    /// Computes the viewer-relative projection.
    pub fn annotate(&self, viewer_username: &str) -> PostView {
        PostView {
            id: self.post.id.clone(),
            content: self.post.content.clone(),
            tags: self.post.tags.clone(),
            img_url: self.post.img_url.clone(),
            author_id: self.post.author_id.clone(),
            author: self.author.clone(),
            is_liked: self.likes.iter().any(|like| like.username == viewer_username),
            likes_count: self.likes.len() as i64,
            comments_count: self.comments.len() as i64,
            comments: self.comments.clone(),
            likes: self.likes.clone(),
            created_at: self.post.created_at,
            updated_at: self.post.updated_at,
        }
    }
}

/// Assembles the profile view from its parts.
pub fn profile_view(
    user: &User,
    followers: Vec<FollowerEntry>,
    followings: Vec<FollowingEntry>,
    posts: Vec<PostView>,
    is_followed: bool,
) -> Profile {
    Profile {
        id: user.id.clone(),
        name: user.name.clone(),
        username: user.username.clone(),
        email: user.email.clone(),
        profile_img: user.profile_img.clone(),
        created_at: user.created_at,
        updated_at: user.updated_at,
        is_followed,
        followers_count: followers.len() as i64,
        followings_count: followings.len() as i64,
        followers,
        followings,
        posts,
    }
}
