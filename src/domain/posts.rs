use async_graphql::InputObject;
use chrono::Utc;
use log::info;

use crate::{
    cache::FeedCache,
    errors::{ApiError, ApiResult},
    id::generate_entity_id,
    keys::{POSTS, USERS},
    model::{Author, Comment, FeedEntry, Like, Post, PostView, User, Viewer},
    store::Store,
};

use super::required_arg;

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "CreatePostInput")]
pub struct CreatePostInput {
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub img_url: Option<String>,
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "CommentInput")]
pub struct CommentInput {
    pub post_id: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "LikeInput")]
pub struct LikeInput {
    pub post_id: Option<String>,
}

#[derive(Clone)]
pub struct PostService {
    store: Store,
    cache: FeedCache,
}

impl PostService {
    pub fn new(store: Store, cache: FeedCache) -> Self {
        Self { store, cache }
    }

    /// The full feed, newest first. The cached payload is viewer-agnostic;
    /// `is_liked` is recomputed per request from the cached like lists, so
    /// one fill serves every viewer.
    pub async fn get_posts(&self, viewer: &Viewer) -> ApiResult<Vec<PostView>> {
        let entries = match self.cache.get::<Vec<FeedEntry>>().await? {
            Some(entries) => entries,
            None => {
                let entries = self.build_feed().await?;
                self.cache.put(&entries).await?;
                entries
            }
        };
        Ok(entries.iter().map(|entry| entry.annotate(&viewer.username)).collect())
    }

    /// One post with full comment and like sub-lists.
    pub async fn get_post_by_id(&self, id: &str, viewer: &Viewer) -> ApiResult<PostView> {
        let keys = self.store.keys();
        let post: Post = self
            .store
            .get_doc(&keys.entity(POSTS, id))
            .await?
            .ok_or_else(|| ApiError::not_found("Post not found"))?;
        let author: User = self
            .store
            .get_doc(&keys.entity(USERS, &post.author_id))
            .await?
            .ok_or_else(|| ApiError::not_found("Post not found"))?;
        let entry = load_entry(&self.store, post, Author::of(&author)).await?;
        Ok(entry.annotate(&viewer.username))
    }

    pub async fn create_post(&self, input: CreatePostInput, author: &Viewer) -> ApiResult<String> {
        let content = required_arg(input.content, "Content is required")?;

        let now = Utc::now();
        let post = Post {
            id: generate_entity_id(),
            content,
            tags: input.tags.unwrap_or_default(),
            img_url: input.img_url.unwrap_or_default(),
            author_id: author.id.clone(),
            created_at: now,
            updated_at: now,
        };
        let by_author = self.store.keys().posts_by_author(&author.id);
        self.store
            .create_entity(POSTS, &post.id, &post, now, &[], &[by_author])
            .await?;
        self.cache.invalidate().await?;

        info!("user {} created post {}", author.username, post.id);
        Ok("Post created successfully".to_string())
    }

    /// Appends a timestamped comment carrying a snapshot of the
    /// commenter's avatar.
    pub async fn create_comment(&self, input: CommentInput, viewer: &Viewer) -> ApiResult<String> {
        let post_id = required_arg(input.post_id, "Post ID is required")?;
        let content = required_arg(input.content, "Content is required")?;
        self.ensure_post_exists(&post_id).await?;

        let now = Utc::now();
        let comment = Comment {
            content,
            username: viewer.username.clone(),
            profile_img: viewer.profile_img.clone(),
            created_at: now,
            updated_at: now,
        };
        self.store
            .list_append(&self.store.keys().post_comments(&post_id), &comment)
            .await?;
        self.cache.invalidate().await?;

        Ok("Comment created successfully".to_string())
    }

    /// Records a like. The duplicate check is a single `HSETNX`, so two
    /// concurrent likes by the same user cannot both land.
    pub async fn like_post(&self, input: LikeInput, viewer: &Viewer) -> ApiResult<String> {
        let post_id = required_arg(input.post_id, "Post ID is required")?;
        self.ensure_post_exists(&post_id).await?;

        let now = Utc::now();
        let like = Like {
            username: viewer.username.clone(),
            created_at: now,
            updated_at: now,
        };
        let stored = self
            .store
            .hash_put_if_absent(&self.store.keys().post_likes(&post_id), &viewer.username, &like)
            .await?;
        if !stored {
            return Err(ApiError::conflict("Already liked"));
        }
        self.cache.invalidate().await?;

        Ok(format!("{} liked this post", viewer.username))
    }

    /// Removes a like; the mirror of `like_post`.
    pub async fn unlike_post(&self, input: LikeInput, viewer: &Viewer) -> ApiResult<String> {
        let post_id = required_arg(input.post_id, "Post ID is required")?;
        self.ensure_post_exists(&post_id).await?;

        let removed = self
            .store
            .hash_remove(&self.store.keys().post_likes(&post_id), &viewer.username)
            .await?;
        if !removed {
            return Err(ApiError::conflict("Has not been liked"));
        }
        self.cache.invalidate().await?;

        Ok(format!("{} unliked this post", viewer.username))
    }

    async fn ensure_post_exists(&self, post_id: &str) -> ApiResult<()> {
        if !self.store.exists(&self.store.keys().entity(POSTS, post_id)).await? {
            return Err(ApiError::not_found("Post not found"));
        }
        Ok(())
    }

    /// Recomputes the viewer-agnostic feed from the store, newest first.
    async fn build_feed(&self) -> ApiResult<Vec<FeedEntry>> {
        let keys = self.store.keys();
        let ids = self.store.ids_by_recency(POSTS).await?;
        let post_keys: Vec<String> = ids.iter().map(|id| keys.entity(POSTS, id)).collect();
        let posts: Vec<Post> = self.store.get_docs(&post_keys).await?;

        let mut author_ids: Vec<String> = posts.iter().map(|post| post.author_id.clone()).collect();
        author_ids.sort();
        author_ids.dedup();
        let author_keys: Vec<String> = author_ids.iter().map(|id| keys.entity(USERS, id)).collect();
        let authors: Vec<User> = self.store.get_docs(&author_keys).await?;

        let mut entries = Vec::with_capacity(posts.len());
        for post in posts {
            // A post whose author vanished is dropped from the feed.
            let Some(author) = authors.iter().find(|user| user.id == post.author_id) else {
                continue;
            };
            entries.push(load_entry(&self.store, post, Author::of(author)).await?);
        }
        Ok(entries)
    }
}

/// Loads one post's engagement sub-lists and pairs them with the author
/// projection.
pub(crate) async fn load_entry(store: &Store, post: Post, author: Author) -> ApiResult<FeedEntry> {
    let keys = store.keys();
    let mut likes: Vec<Like> = store.hash_entries(&keys.post_likes(&post.id)).await?;
    likes.sort_by_key(|like| like.created_at);
    let comments: Vec<Comment> = store.list_entries(&keys.post_comments(&post.id)).await?;
    Ok(FeedEntry {
        post,
        author,
        comments,
        likes,
    })
}

/// All posts authored by one user, newest first, with engagement loaded.
pub(crate) async fn author_feed(store: &Store, author: &User) -> ApiResult<Vec<FeedEntry>> {
    let keys = store.keys();
    let post_ids = store.set_members(&keys.posts_by_author(&author.id)).await?;
    let post_keys: Vec<String> = post_ids.iter().map(|id| keys.entity(POSTS, id)).collect();
    let mut posts: Vec<Post> = store.get_docs(&post_keys).await?;
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let projection = Author::of(author);
    let mut entries = Vec::with_capacity(posts.len());
    for post in posts {
        entries.push(load_entry(store, post, projection.clone()).await?);
    }
    Ok(entries)
}
