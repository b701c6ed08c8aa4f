//! Redis-backed document store.
//!
//! One `ConnectionManager` handle is opened at startup and cloned into
//! every adapter; there is no process-global state. Documents are JSON
//! strings under `KeyContext` keys; each collection keeps a sorted-set
//! index scored by creation time. Multi-step writes that must be atomic
//! (unique-value reservation, follow edges) run as Lua scripts.

mod scripts;

use chrono::{DateTime, Utc};
use redis::{AsyncCommands, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    errors::{ApiError, ApiResult},
    keys::KeyContext,
    model::FollowEdge,
};
use scripts::{ENTITY_CREATE_SCRIPT, FOLLOW_MUTATION_SCRIPT, ScriptResponse, unexpected_script_error};

/// A unique-value reservation taken during entity creation: display label
/// (used in the conflict message) plus the reservation key.
pub struct UniqueClaim {
    pub label: &'static str,
    pub key: String,
}

#[derive(Clone)]
pub struct Store {
    conn: ConnectionManager,
    keys: KeyContext,
}

impl Store {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            keys: KeyContext::new(prefix),
        }
    }

    /// Opens the single connection handle this process will use.
    pub async fn connect(url: &str, prefix: impl Into<String>) -> ApiResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn, prefix))
    }

    pub fn keys(&self) -> &KeyContext {
        &self.keys
    }

    /// Clone of the underlying handle, for adapters that share it.
    pub fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }

    fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// Fetches and decodes one document.
    pub async fn get_doc<T: DeserializeOwned>(&self, key: &str) -> ApiResult<Option<T>> {
        let mut conn = self.conn();
        let raw: Option<String> = conn.get(key).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Fetches many documents at once; keys that resolve to nothing are
    /// skipped (a concurrently deleted entity is not an error).
    pub async fn get_docs<T: DeserializeOwned>(&self, keys: &[String]) -> ApiResult<Vec<T>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn();
        let raw: Vec<Option<String>> = conn.mget(keys).await?;
        let mut docs = Vec::with_capacity(raw.len());
        for json in raw.into_iter().flatten() {
            docs.push(serde_json::from_str(&json)?);
        }
        Ok(docs)
    }

    /// Creates an entity document atomically: every `UniqueClaim` is
    /// reserved (or the whole write is rejected with
    /// `Conflict("{label} already taken")`), then the document, the
    /// collection index entry, and any extra set-index memberships are
    /// written in the same script.
    pub async fn create_entity<T: Serialize>(
        &self,
        collection: &str,
        entity_id: &str,
        doc: &T,
        created_at: DateTime<Utc>,
        uniques: &[UniqueClaim],
        extra_indexes: &[String],
    ) -> ApiResult<()> {
        let payload = serde_json::to_string(doc)?;
        let mut invocation = ENTITY_CREATE_SCRIPT.prepare_invoke();
        invocation.key(self.keys.entity(collection, entity_id));
        invocation.key(self.keys.index(collection));
        for index in extra_indexes {
            invocation.key(index.as_str());
        }
        invocation.arg(payload);
        invocation.arg(created_at.timestamp_millis());
        invocation.arg(entity_id);
        for claim in uniques {
            invocation.arg(claim.label);
            invocation.arg(claim.key.as_str());
        }

        let mut conn = self.conn();
        let raw: String = invocation.invoke_async(&mut conn).await?;
        let response = ScriptResponse::parse(&raw)?;
        match response.error_code() {
            None => Ok(()),
            Some("unique_constraint_violation") => {
                let field = response.field().unwrap_or("Value");
                Err(ApiError::Conflict(format!("{field} already taken")))
            }
            Some(code) => Err(unexpected_script_error(code)),
        }
    }

    /// Entity ids of a collection, newest first.
    pub async fn ids_by_recency(&self, collection: &str) -> ApiResult<Vec<String>> {
        let mut conn = self.conn();
        let ids: Vec<String> = conn.zrevrange(self.keys.index(collection), 0, -1).await?;
        Ok(ids)
    }

    /// Entity ids of a collection in insertion order.
    pub async fn ids_by_insertion(&self, collection: &str) -> ApiResult<Vec<String>> {
        let mut conn = self.conn();
        let ids: Vec<String> = conn.zrange(self.keys.index(collection), 0, -1).await?;
        Ok(ids)
    }

    /// Resolves a unique field value to the owning entity id.
    pub async fn lookup_unique(&self, collection: &str, field: &str, value: &str) -> ApiResult<Option<String>> {
        let mut conn = self.conn();
        let id: Option<String> = conn.get(self.keys.unique(collection, field, value)).await?;
        Ok(id)
    }

    pub async fn exists(&self, key: &str) -> ApiResult<bool> {
        let mut conn = self.conn();
        let found: bool = conn.exists(key).await?;
        Ok(found)
    }

    pub async fn set_members(&self, key: &str) -> ApiResult<Vec<String>> {
        let mut conn = self.conn();
        let members: Vec<String> = conn.smembers(key).await?;
        Ok(members)
    }

    pub async fn set_contains(&self, key: &str, member: &str) -> ApiResult<bool> {
        let mut conn = self.conn();
        let found: bool = conn.sismember(key, member).await?;
        Ok(found)
    }

    /// `HSETNX`: stores the entry unless the field is already present.
    /// Returns `false` on the duplicate, which is the storage-enforced
    /// "at most one like per user per post" constraint.
    pub async fn hash_put_if_absent<T: Serialize>(&self, key: &str, field: &str, entry: &T) -> ApiResult<bool> {
        let payload = serde_json::to_string(entry)?;
        let mut conn = self.conn();
        let stored: bool = conn.hset_nx(key, field, payload).await?;
        Ok(stored)
    }

    /// Removes one hash entry; `false` when the field was absent.
    pub async fn hash_remove(&self, key: &str, field: &str) -> ApiResult<bool> {
        let mut conn = self.conn();
        let removed: i64 = conn.hdel(key, field).await?;
        Ok(removed > 0)
    }

    pub async fn hash_entries<T: DeserializeOwned>(&self, key: &str) -> ApiResult<Vec<T>> {
        let mut conn = self.conn();
        let raw: Vec<String> = conn.hvals(key).await?;
        raw.iter().map(|json| Ok(serde_json::from_str(json)?)).collect()
    }

    pub async fn list_append<T: Serialize>(&self, key: &str, entry: &T) -> ApiResult<()> {
        let payload = serde_json::to_string(entry)?;
        let mut conn = self.conn();
        let _: i64 = conn.rpush(key, payload).await?;
        Ok(())
    }

    pub async fn list_entries<T: DeserializeOwned>(&self, key: &str) -> ApiResult<Vec<T>> {
        let mut conn = self.conn();
        let raw: Vec<String> = conn.lrange(key, 0, -1).await?;
        raw.iter().map(|json| Ok(serde_json::from_str(json)?)).collect()
    }

    /// Inserts a follow edge; the script rejects a duplicate ordered pair.
    pub async fn create_follow_edge(&self, edge: &FollowEdge) -> ApiResult<()> {
        self.follow_mutation("add", &edge.following_id, &edge.follower_id, Some(edge))
            .await
    }

    /// Removes a follow edge; the script rejects a missing pair.
    pub async fn delete_follow_edge(&self, following_id: &str, follower_id: &str) -> ApiResult<()> {
        self.follow_mutation("remove", following_id, follower_id, None).await
    }

    async fn follow_mutation(
        &self,
        mode: &str,
        following_id: &str,
        follower_id: &str,
        edge: Option<&FollowEdge>,
    ) -> ApiResult<()> {
        let payload = match edge {
            Some(edge) => serde_json::to_string(edge)?,
            None => String::new(),
        };
        let mut invocation = FOLLOW_MUTATION_SCRIPT.prepare_invoke();
        invocation.key(self.keys.follow_edge(following_id, follower_id));
        invocation.key(self.keys.followers(following_id));
        invocation.key(self.keys.following(follower_id));
        invocation.arg(mode);
        invocation.arg(payload);
        invocation.arg(follower_id);
        invocation.arg(following_id);

        let mut conn = self.conn();
        let raw: String = invocation.invoke_async(&mut conn).await?;
        let response = ScriptResponse::parse(&raw)?;
        match response.error_code() {
            None => Ok(()),
            Some("already_following") => Err(ApiError::conflict("Already following")),
            Some("not_following") => Err(ApiError::conflict("Not following")),
            Some(code) => Err(unexpected_script_error(code)),
        }
    }
}
