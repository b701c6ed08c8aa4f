//! A GraphQL social-network backend on Redis.
//!
//! Redis plays two roles: the document store (JSON entities with sorted-set
//! indexes, unique-reservation keys, and per-post engagement structures)
//! and the feed cache. Atomic multi-key writes go through Lua scripts so
//! uniqueness and edge constraints hold under concurrency.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod domain;
pub mod errors;
pub mod id;
pub mod keys;
pub mod model;
pub mod server;
pub mod store;
pub mod validators;

pub use errors::{ApiError, ApiResult};
pub use keys::KeyContext;
pub use store::Store;
