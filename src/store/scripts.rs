use std::sync::LazyLock;

use redis::Script;
use serde_json::Value;

use crate::errors::{ApiError, ApiResult};

pub const ENTITY_CREATE_SCRIPT_BODY: &str = include_str!("../../lua/entity_create.lua");
pub const FOLLOW_MUTATION_SCRIPT_BODY: &str = include_str!("../../lua/follow_mutation.lua");

pub static ENTITY_CREATE_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(ENTITY_CREATE_SCRIPT_BODY));
pub static FOLLOW_MUTATION_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(FOLLOW_MUTATION_SCRIPT_BODY));

/// Decoded script response: `{ok = …}` or `{error = code, field = …}`.
pub struct ScriptResponse {
    value: Value,
}

impl ScriptResponse {
    pub fn parse(raw: &str) -> ApiResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Ok(Self { value })
    }

    pub fn error_code(&self) -> Option<&str> {
        self.value.get("error").and_then(Value::as_str)
    }

    pub fn field(&self) -> Option<&str> {
        self.value.get("field").and_then(Value::as_str)
    }
}

/// Maps an unexpected script error code into a redis-flavored failure.
pub fn unexpected_script_error(code: &str) -> ApiError {
    ApiError::Conflict(format!("storage script rejected the operation: {code}"))
}
