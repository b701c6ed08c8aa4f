use async_graphql::InputObject;
use chrono::Utc;
use log::info;

use crate::{
    auth::{self, INVALID_TOKEN, TokenKeys},
    cache::FeedCache,
    errors::{ApiError, ApiResult},
    id::generate_entity_id,
    keys::USERS,
    model::{FollowerEntry, FollowingEntry, LoginSession, Profile, User, UserNode, Viewer, profile_view},
    store::{Store, UniqueClaim},
    validators::{is_strong_password, is_valid_email},
};

use super::{posts, required_arg};

/// Message returned for any credential mismatch; deliberately identical
/// for unknown users and wrong passwords.
const BAD_CREDENTIALS: &str = "Invalid username/email or password";

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "UserInput")]
pub struct RegisterInput {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile_img: Option<String>,
}

#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "LoginInput")]
pub struct LoginInput {
    /// A username or an email address; the format decides the lookup.
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    store: Store,
    cache: FeedCache,
    tokens: TokenKeys,
}

impl UserService {
    pub fn new(store: Store, cache: FeedCache, tokens: TokenKeys) -> Self {
        Self { store, cache, tokens }
    }

    /// Creates an account. Username and email uniqueness are reserved
    /// atomically by the storage engine, so two concurrent registrations
    /// of the same name cannot both succeed.
    pub async fn register(&self, input: RegisterInput) -> ApiResult<String> {
        let username = required_arg(input.username, "Username is required")?;
        let email = required_arg(input.email, "Email is required")?;
        if !is_valid_email(&email) {
            return Err(ApiError::validation("Invalid email format"));
        }
        let password = required_arg(input.password, "Password is required")?;
        if !is_strong_password(&password) {
            return Err(ApiError::validation("Password is not strong enough"));
        }

        let now = Utc::now();
        let user = User {
            id: generate_entity_id(),
            name: input.name,
            username: username.clone(),
            email: email.clone(),
            password_hash: auth::hash_password(&password)?,
            profile_img: input.profile_img,
            created_at: now,
            updated_at: now,
        };
        let keys = self.store.keys();
        let uniques = [
            UniqueClaim {
                label: "Username",
                key: keys.unique(USERS, "username", &username),
            },
            UniqueClaim {
                label: "Email",
                key: keys.unique(USERS, "email", &email),
            },
        ];
        self.store
            .create_entity(USERS, &user.id, &user, now, &uniques, &[])
            .await?;

        info!("registered user {username}");
        Ok(format!("{username} has been registered"))
    }

    /// Verifies credentials and issues a token. Any mismatch collapses
    /// into one message so callers cannot enumerate accounts.
    pub async fn login(&self, input: LoginInput) -> ApiResult<LoginSession> {
        let handle = required_arg(input.username, "Username/Email is required")?;
        let password = required_arg(input.password, "Password is required")?;

        let field = if is_valid_email(&handle) { "email" } else { "username" };
        let user_id = self
            .store
            .lookup_unique(USERS, field, &handle)
            .await?
            .ok_or_else(|| ApiError::auth(BAD_CREDENTIALS))?;
        let user = self
            .find_user(&user_id)
            .await?
            .ok_or_else(|| ApiError::auth(BAD_CREDENTIALS))?;
        if !auth::verify_password(&password, &user.password_hash)? {
            return Err(ApiError::auth(BAD_CREDENTIALS));
        }

        let token = self.tokens.sign(&user.id)?;
        self.cache.invalidate().await?;

        info!("user {} logged in", user.username);
        Ok(LoginSession {
            token,
            user_id: user.id,
        })
    }

    /// All users in registration order, passwords stripped.
    pub async fn find_all(&self) -> ApiResult<Vec<UserNode>> {
        let users = self.load_all_users().await?;
        Ok(users.iter().map(UserNode::of).collect())
    }

    /// Case-insensitive substring match against name OR username.
    pub async fn find_by_name(&self, query: &str) -> ApiResult<Vec<UserNode>> {
        let needle = query.to_lowercase();
        let users = self.load_all_users().await?;
        Ok(users
            .iter()
            .filter(|user| {
                user.username.to_lowercase().contains(&needle)
                    || user
                        .name
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .map(UserNode::of)
            .collect())
    }

    pub async fn find_by_id(&self, id: &str) -> ApiResult<UserNode> {
        let user = self
            .find_user(id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        Ok(UserNode::of(&user))
    }

    /// Verifies a bearer token and loads the caller identity. Every
    /// failure mode is the same flat auth error.
    pub async fn viewer_from_token(&self, token: &str) -> ApiResult<Viewer> {
        let claims = self.tokens.verify(token)?;
        let user = self
            .find_user(&claims.sub)
            .await?
            .ok_or_else(|| ApiError::auth(INVALID_TOKEN))?;
        Ok(UserNode::of(&user))
    }

    /// The Profile view: follower/following lists joined to user details,
    /// counts, the user's own posts annotated for the viewer, and whether
    /// the viewer follows this user.
    pub async fn get_user_profile(&self, id: &str, viewer: &Viewer) -> ApiResult<Profile> {
        let user = self
            .find_user(id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        let keys = self.store.keys();

        let follower_ids = self.store.set_members(&keys.followers(id)).await?;
        let followers = self
            .load_users(&follower_ids)
            .await?
            .iter()
            .map(|follower| FollowerEntry {
                follower_id: follower.id.clone(),
                name: follower.name.clone(),
                username: follower.username.clone(),
                profile_img: follower.profile_img.clone(),
            })
            .collect();

        let following_ids = self.store.set_members(&keys.following(id)).await?;
        let followings = self
            .load_users(&following_ids)
            .await?
            .iter()
            .map(|followee| FollowingEntry {
                following_id: followee.id.clone(),
                name: followee.name.clone(),
                username: followee.username.clone(),
                profile_img: followee.profile_img.clone(),
            })
            .collect();

        let entries = posts::author_feed(&self.store, &user).await?;
        let annotated = entries.iter().map(|entry| entry.annotate(&viewer.username)).collect();

        let is_followed = self.store.set_contains(&keys.followers(id), &viewer.id).await?;

        Ok(profile_view(&user, followers, followings, annotated, is_followed))
    }

    /// Same projection, self-view.
    pub async fn get_my_profile(&self, viewer: &Viewer) -> ApiResult<Profile> {
        self.get_user_profile(&viewer.id, viewer).await
    }

    pub(crate) async fn find_user(&self, id: &str) -> ApiResult<Option<User>> {
        self.store.get_doc(&self.store.keys().entity(USERS, id)).await
    }

    async fn load_all_users(&self) -> ApiResult<Vec<User>> {
        let ids = self.store.ids_by_insertion(USERS).await?;
        self.load_users(&ids).await
    }

    async fn load_users(&self, ids: &[String]) -> ApiResult<Vec<User>> {
        let keys: Vec<String> = ids.iter().map(|id| self.store.keys().entity(USERS, id)).collect();
        self.store.get_docs(&keys).await
    }
}
