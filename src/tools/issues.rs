use rmcp::model::{CallToolResult, Content, JsonObject};
use serde_json::Value;

use crate::args::{self, PaginationParams};
use crate::client::HubClient;
use crate::error::Result;
use crate::response;

pub async fn get_issue(client: &dyn HubClient, args: &JsonObject) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let issue_number = args::required_int(args, "issue_number")?;

    let issue = client
        .get_json(&format!("/repos/{owner}/{repo}/issues/{issue_number}"))
        .await?;

    Ok(CallToolResult::success(vec![Content::text(
        response::format_issue(&issue),
    )]))
}

pub async fn list_issues(client: &dyn HubClient, args: &JsonObject) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let state = args::optional_string_with_default(args, "state", "open")?;
    let labels = args::optional_string_list(args, "labels")?;
    let sort = args::optional_string(args, "sort")?;
    let direction = args::optional_string(args, "direction")?;
    let since = args::optional_string(args, "since")?;
    let pagination = PaginationParams::extract(args)?;

    let mut query: Vec<(&'static str, String)> = vec![("state", state)];
    if !labels.is_empty() {
        query.push(("labels", labels.join(",")));
    }
    if !sort.is_empty() {
        query.push(("sort", sort));
    }
    if !direction.is_empty() {
        query.push(("direction", direction));
    }
    if !since.is_empty() {
        query.push(("since", since));
    }
    pagination.apply(&mut query);

    let query_refs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let issues = client
        .get_json_with_query(&format!("/repos/{owner}/{repo}/issues"), &query_refs)
        .await?;
    let issues = issues.as_array().cloned().unwrap_or_default();

    Ok(CallToolResult::success(vec![Content::text(
        response::format_issue_list(&issues),
    )]))
}

pub async fn get_issue_comments(
    client: &dyn HubClient,
    args: &JsonObject,
) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let issue_number = args::required_int(args, "issue_number")?;
    let pagination = PaginationParams::extract(args)?;

    let mut query: Vec<(&'static str, String)> = Vec::new();
    pagination.apply(&mut query);
    let query_refs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();

    let comments = client
        .get_json_with_query(
            &format!("/repos/{owner}/{repo}/issues/{issue_number}/comments"),
            &query_refs,
        )
        .await?;
    let comments = comments.as_array().cloned().unwrap_or_default();

    Ok(CallToolResult::success(vec![Content::text(
        response::format_comment_list(&comments),
    )]))
}

pub async fn search_issues(client: &dyn HubClient, args: &JsonObject) -> Result<CallToolResult> {
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
        .get_json_with_query("/search/issues", &query_refs)
        .await?;

    Ok(CallToolResult::success(vec![Content::text(
        response::format_issue_search(&result),
    )]))
}

pub async fn create_issue(client: &dyn HubClient, args: &JsonObject) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let title = args::required_string(args, "title")?;
    let body_text = args::optional_string(args, "body")?;
    let assignees = args::optional_string_list(args, "assignees")?;
    let labels = args::optional_string_list(args, "labels")?;
    let milestone = args::optional_int(args, "milestone")?;

    let mut body = serde_json::json!({ "title": title });
    if !body_text.is_empty() {
        body["body"] = Value::String(body_text);
    }
    if !assignees.is_empty() {
        body["assignees"] = serde_json::json!(assignees);
    }
    if !labels.is_empty() {
        body["labels"] = serde_json::json!(labels);
    }
    if milestone > 0 {
        body["milestone"] = serde_json::json!(milestone);
    }

    let issue = client
        .post_json(&format!("/repos/{owner}/{repo}/issues"), &body)
        .await?;

    Ok(CallToolResult::success(vec![Content::text(
        response::format_issue(&issue),
    )]))
}

pub async fn update_issue(client: &dyn HubClient, args: &JsonObject) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let issue_number = args::required_int(args, "issue_number")?;
    let title = args::optional_string(args, "title")?;
    let body_text = args::optional_string(args, "body")?;
    let state = args::optional_string(args, "state")?;
    let labels = args::optional_string_list(args, "labels")?;
    let assignees = args::optional_string_list(args, "assignees")?;
    let milestone = args::optional_int(args, "milestone")?;

    let mut body = serde_json::json!({});
    if !title.is_empty() {
        body["title"] = Value::String(title);
    }
    if !body_text.is_empty() {
        body["body"] = Value::String(body_text);
    }
    if !state.is_empty() {
        body["state"] = Value::String(state);
    }
    if !labels.is_empty() {
        body["labels"] = serde_json::json!(labels);
    }
    if !assignees.is_empty() {
        body["assignees"] = serde_json::json!(assignees);
    }
    if milestone > 0 {
        body["milestone"] = serde_json::json!(milestone);
    }

    let issue = client
        .patch_json(
            &format!("/repos/{owner}/{repo}/issues/{issue_number}"),
            &body,
        )
        .await?;

    Ok(CallToolResult::success(vec![Content::text(
        response::format_issue(&issue),
    )]))
}

pub async fn add_issue_comment(
    client: &dyn HubClient,
    args: &JsonObject,
) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let issue_number = args::required_int(args, "issue_number")?;
    let body_text = args::required_string(args, "body")?;

    let body = serde_json::json!({ "body": body_text });
    let comment = client
        .post_json(
            &format!("/repos/{owner}/{repo}/issues/{issue_number}/comments"),
            &body,
        )
        .await?;

    Ok(CallToolResult::success(vec![Content::text(
        response::format_comment(&comment),
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockClient;
    use crate::error::GhxError;
    use serde_json::json;

    fn args_of(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[tokio::test]
    async fn missing_owner_rejected_before_any_upstream_call() {
        let client = MockClient::new();
        let a = args_of(json!({"repo": "r", "issue_number": 1}));
        let err = get_issue(&client, &a).await.unwrap_err();
        assert!(matches!(err, GhxError::MissingParam(name) if name == "owner"));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn list_issues_applies_defaults() {
        let client = MockClient::with_responses(vec![json!([])]);
        let a = args_of(json!({"owner": "o", "repo": "r"}));
        list_issues(&client, &a).await.unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "/repos/o/r/issues");
        assert_eq!(
            calls[0].query,
            vec![
                ("state".to_string(), "open".to_string()),
                ("page".to_string(), "1".to_string()),
                ("per_page".to_string(), "30".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn list_issues_joins_label_list() {
        let client = MockClient::with_responses(vec![json!([])]);
        let a = args_of(json!({
            "owner": "o",
            "repo": "r",
            "labels": "bug, p1 ,,needs-triage",
            "page": 2,
            "perPage": 50,
        }));
        list_issues(&client, &a).await.unwrap();

        let calls = client.calls();
        let labels = calls[0]
            .query
            .iter()
            .find(|(k, _)| k == "labels")
            .cloned()
            .unwrap();
        assert_eq!(labels.1, "bug,p1,needs-triage");
        assert!(calls[0].query.contains(&("page".to_string(), "2".to_string())));
        assert!(calls[0]
            .query
            .contains(&("per_page".to_string(), "50".to_string())));
    }

    #[tokio::test]
    async fn fractional_issue_number_truncates() {
        let client = MockClient::with_responses(vec![json!({"number": 3, "title": "t", "state": "open"})]);
        let a = args_of(json!({"owner": "o", "repo": "r", "issue_number": 3.9}));
        get_issue(&client, &a).await.unwrap();
        assert_eq!(client.calls()[0].path, "/repos/o/r/issues/3");
    }

    #[tokio::test]
    async fn create_issue_builds_minimal_body() {
        let client = MockClient::with_responses(vec![json!({"number": 1, "title": "t", "state": "open"})]);
        let a = args_of(json!({"owner": "o", "repo": "r", "title": "t"}));
        create_issue(&client, &a).await.unwrap();

        let calls = client.calls();
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[0].path, "/repos/o/r/issues");
        assert_eq!(calls[0].body, Some(json!({"title": "t"})));
    }

    #[tokio::test]
    async fn create_issue_splits_assignee_list() {
        let client = MockClient::with_responses(vec![json!({"number": 1, "title": "t", "state": "open"})]);
        let a = args_of(json!({
            "owner": "o",
            "repo": "r",
            "title": "t",
            "assignees": "alice, bob",
            "labels": "bug",
        }));
        create_issue(&client, &a).await.unwrap();

        let body = client.calls()[0].body.clone().unwrap();
        assert_eq!(body["assignees"], json!(["alice", "bob"]));
        assert_eq!(body["labels"], json!(["bug"]));
    }

    #[tokio::test]
    async fn update_issue_omits_unset_fields() {
        let client = MockClient::with_responses(vec![json!({"number": 2, "title": "t", "state": "closed"})]);
        let a = args_of(json!({"owner": "o", "repo": "r", "issue_number": 2, "state": "closed"}));
        update_issue(&client, &a).await.unwrap();

        let calls = client.calls();
        assert_eq!(calls[0].method, "PATCH");
        assert_eq!(calls[0].path, "/repos/o/r/issues/2");
        assert_eq!(calls[0].body, Some(json!({"state": "closed"})));
    }

    #[tokio::test]
    async fn add_comment_requires_body() {
        let client = MockClient::new();
        let a = args_of(json!({"owner": "o", "repo": "r", "issue_number": 1, "body": ""}));
        let err = add_issue_comment(&client, &a).await.unwrap_err();
        assert!(matches!(err, GhxError::MissingParam(name) if name == "body"));
        assert!(client.calls().is_empty());
    }
}
