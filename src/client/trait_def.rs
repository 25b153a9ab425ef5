use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Trait abstracting HTTP operations against the GitHub REST API.
///
/// All JSON methods return `serde_json::Value` to maintain object safety
/// (generic `DeserializeOwned` methods are not object-safe).
#[async_trait]
pub trait HubClient: Send + Sync + Debug {
    /// GET request, returning parsed JSON.
    async fn get_json(&self, path: &str) -> Result<Value>;

    /// GET request with query parameters, returning parsed JSON.
    async fn get_json_with_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Value>;

    /// POST request with JSON body, returning parsed JSON.
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value>;

    /// PUT request with JSON body, returning parsed JSON.
    async fn put_json(&self, path: &str, body: &Value) -> Result<Value>;

    /// PATCH request with JSON body, returning parsed JSON.
    async fn patch_json(&self, path: &str, body: &Value) -> Result<Value>;
}
