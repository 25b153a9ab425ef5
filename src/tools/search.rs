use rmcp::model::{CallToolResult, Content, JsonObject};

use crate::args::{self, PaginationParams};
use crate::client::HubClient;
use crate::error::Result;
use crate::response;

pub async fn search_repositories(
    client: &dyn HubClient,
    args: &JsonObject,
) -> Result<CallToolResult> {
    let query_string = args::required_string(args, "query")?;
    let pagination = PaginationParams::extract(args)?;

    let mut query: Vec<(&'static str, String)> = vec![("q", query_string)];
    pagination.apply(&mut query);

    let query_refs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let result = client
        .get_json_with_query("/search/repositories", &query_refs)
        .await?;

    Ok(CallToolResult::success(vec![Content::text(
        response::format_repo_search(&result),
    )]))
}

pub async fn search_code(client: &dyn HubClient, args: &JsonObject) -> Result<CallToolResult> {
    let q = args::required_string(args, "q")?;
    let sort = args::optional_string(args, "sort")?;
    let order = args::optional_string(args, "order")?;
    let pagination = PaginationParams::extract(args)?;

    let mut query: Vec<(&'static str, String)> = vec![("q", q)];
    if !sort.is_empty() {
        query.push(("sort", sort));
    }
    if !order.is_empty() {
        query.push(("order", order));
    }
    pagination.apply(&mut query);

    let query_refs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let result = client
        .get_json_with_query("/search/code", &query_refs)
        .await?;

    Ok(CallToolResult::success(vec![Content::text(
        response::format_code_search(&result),
    )]))
}

pub async fn search_users(client: &dyn HubClient, args: &JsonObject) -> Result<CallToolResult> {
    let q = args::required_string(args, "q")?;
    let sort = args::optional_string(args, "sort")?;
    let order = args::optional_string(args, "order")?;
    let pagination = PaginationParams::extract(args)?;

    let mut query: Vec<(&'static str, String)> = vec![("q", q)];
    if !sort.is_empty() {
        query.push(("sort", sort));
    }
    if !order.is_empty() {
        query.push(("order", order));
    }
    pagination.apply(&mut query);

    let query_refs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let result = client
        .get_json_with_query("/search/users", &query_refs)
        .await?;

    Ok(CallToolResult::success(vec![Content::text(
        response::format_user_search(&result),
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockClient;
    use crate::error::GhxError;
    use serde_json::{json, Value};

    fn args_of(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[tokio::test]
    async fn repository_search_uses_query_parameter() {
        let client = MockClient::with_responses(vec![json!({"total_count": 0, "items": []})]);
        let a = args_of(json!({"query": "language:rust mcp"}));
        search_repositories(&client, &a).await.unwrap();

        let calls = client.calls();
        assert_eq!(calls[0].path, "/search/repositories");
        assert_eq!(calls[0].query[0], ("q".to_string(), "language:rust mcp".to_string()));
    }

    #[tokio::test]
    async fn empty_query_is_missing() {
        let client = MockClient::new();
        let a = args_of(json!({"q": ""}));
        let err = search_code(&client, &a).await.unwrap_err();
        assert!(matches!(err, GhxError::MissingParam(name) if name == "q"));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn sort_and_order_are_forwarded() {
        let client = MockClient::with_responses(vec![json!({"total_count": 0, "items": []})]);
        let a = args_of(json!({"q": "octocat", "sort": "followers", "order": "desc"}));
        search_users(&client, &a).await.unwrap();

        let query = client.calls()[0].query.clone();
        assert!(query.contains(&("sort".to_string(), "followers".to_string())));
        assert!(query.contains(&("order".to_string(), "desc".to_string())));
    }
}
