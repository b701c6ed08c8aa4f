//! Single-key feed cache.
//!
//! Holds the serialized viewer-agnostic post feed under one fixed key with
//! no expiry. The cache is never authoritative: every feed-affecting
//! mutation deletes the key and the next read recomputes.

use log::debug;
use redis::{AsyncCommands, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};

use crate::{errors::ApiResult, keys::KeyContext};

#[derive(Clone)]
pub struct FeedCache {
    conn: ConnectionManager,
    key: String,
}

impl FeedCache {
    pub fn new(conn: ConnectionManager, keys: &KeyContext) -> Self {
        Self {
            conn,
            key: keys.feed_cache(),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self) -> ApiResult<Option<T>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(&self.key).await?;
        match raw {
            Some(json) => {
                debug!("feed cache hit ({} bytes)", json.len());
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => {
                debug!("feed cache miss");
                Ok(None)
            }
        }
    }

    pub async fn put<T: Serialize>(&self, feed: &T) -> ApiResult<()> {
        let payload = serde_json::to_string(feed)?;
        let mut conn = self.conn.clone();
        let _: () = conn.set(&self.key, payload).await?;
        Ok(())
    }

    /// Drops the cached feed; the next read recomputes it.
    pub async fn invalidate(&self) -> ApiResult<()> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.del(&self.key).await?;
        debug!("feed cache invalidated");
        Ok(())
    }
}
