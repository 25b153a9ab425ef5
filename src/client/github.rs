use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::Value;

use crate::config::Config;
use crate::error::{GhxError, Result};

use super::HubClient;

/// HTTP client wrapper for the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_api: String,
}

impl GitHubClient {
    /// Create a new client from configuration.
    ///
    /// For github.com the base API is `https://api.github.com`.
    /// For GitHub Enterprise, it is `{host}/api/v3`.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.token))
                .map_err(|e| GhxError::Other(anyhow::anyhow!("Invalid token header: {e}")))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("ghx-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GhxError::Other(anyhow::anyhow!("Failed to build HTTP client: {e}")))?;

        let base_api = if config.host == "https://github.com" {
            "https://api.github.com".to_string()
        } else {
            format!("{}/api/v3", config.host)
        };

        Ok(Self { http, base_api })
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_api, path)
    }

    /// Handle a response: check status, deserialize JSON.
    ///
    /// Non-success statuses keep the response body so the caller sees the
    /// API diagnostic verbatim.
    async fn handle_response(&self, resp: reqwest::Response) -> Result<Value> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(GhxError::Auth);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            let url = resp.url().to_string();
            return Err(GhxError::NotFound(url));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GhxError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let body = resp.json::<Value>().await?;
        Ok(body)
    }
}

#[async_trait]
impl HubClient for GitHubClient {
    async fn get_json(&self, path: &str) -> Result<Value> {
        tracing::debug!(path, "GET");
        let resp = self.http.get(self.url(path)).send().await?;
        self.handle_response(resp).await
    }

    async fn get_json_with_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        tracing::debug!(path, "GET");
        let resp = self.http.get(self.url(path)).query(query).send().await?;
        self.handle_response(resp).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        tracing::debug!(path, "POST");
        let resp = self.http.post(self.url(path)).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn put_json(&self, path: &str, body: &Value) -> Result<Value> {
        tracing::debug!(path, "PUT");
        let resp = self.http.put(self.url(path)).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn patch_json(&self, path: &str, body: &Value) -> Result<Value> {
        tracing::debug!(path, "PATCH");
        let resp = self.http.patch(self.url(path)).json(body).send().await?;
        self.handle_response(resp).await
    }
}
