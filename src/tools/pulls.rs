use rmcp::model::{CallToolResult, Content, JsonObject};
use serde_json::Value;

use crate::args::{self, PaginationParams};
use crate::client::HubClient;
use crate::error::Result;
use crate::response;

pub async fn get_pull_request(client: &dyn HubClient, args: &JsonObject) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let pull_number = args::required_int(args, "pull_number")?;

    let pr = client
        .get_json(&format!("/repos/{owner}/{repo}/pulls/{pull_number}"))
        .await?;

    Ok(CallToolResult::success(vec![Content::text(
        response::format_pull_request(&pr),
    )]))
}

pub async fn list_pull_requests(
    client: &dyn HubClient,
    args: &JsonObject,
) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let state = args::optional_string_with_default(args, "state", "open")?;
    let head = args::optional_string(args, "head")?;
    let base = args::optional_string(args, "base")?;
    let sort = args::optional_string(args, "sort")?;
    let direction = args::optional_string(args, "direction")?;
    let pagination = PaginationParams::extract(args)?;

    let mut query: Vec<(&'static str, String)> = vec![("state", state)];
    if !head.is_empty() {
        query.push(("head", head));
    }
    if !base.is_empty() {
        query.push(("base", base));
    }
    if !sort.is_empty() {
        query.push(("sort", sort));
    }
    if !direction.is_empty() {
        query.push(("direction", direction));
    }
    pagination.apply(&mut query);

    let query_refs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let prs = client
        .get_json_with_query(&format!("/repos/{owner}/{repo}/pulls"), &query_refs)
        .await?;
    let prs = prs.as_array().cloned().unwrap_or_default();

    Ok(CallToolResult::success(vec![Content::text(
        response::format_pr_list(&prs),
    )]))
}

pub async fn get_pull_request_files(
    client: &dyn HubClient,
    args: &JsonObject,
) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let pull_number = args::required_int(args, "pull_number")?;
    let pagination = PaginationParams::extract(args)?;

    let mut query: Vec<(&'static str, String)> = Vec::new();
    pagination.apply(&mut query);
    let query_refs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();

    let files = client
        .get_json_with_query(
            &format!("/repos/{owner}/{repo}/pulls/{pull_number}/files"),
            &query_refs,
        )
        .await?;
    let files = files.as_array().cloned().unwrap_or_default();

    Ok(CallToolResult::success(vec![Content::text(
        response::format_pr_files(&files),
    )]))
}

pub async fn get_pull_request_comments(
    client: &dyn HubClient,
    args: &JsonObject,
) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let pull_number = args::required_int(args, "pull_number")?;
    let pagination = PaginationParams::extract(args)?;

    let mut query: Vec<(&'static str, String)> = Vec::new();
    pagination.apply(&mut query);
    let query_refs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();

    let comments = client
        .get_json_with_query(
            &format!("/repos/{owner}/{repo}/pulls/{pull_number}/comments"),
            &query_refs,
        )
        .await?;
    let comments = comments.as_array().cloned().unwrap_or_default();

    Ok(CallToolResult::success(vec![Content::text(
        response::format_comment_list(&comments),
    )]))
}

pub async fn get_pull_request_reviews(
    client: &dyn HubClient,
    args: &JsonObject,
) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let pull_number = args::required_int(args, "pull_number")?;

    let reviews = client
        .get_json(&format!(
            "/repos/{owner}/{repo}/pulls/{pull_number}/reviews"
        ))
        .await?;
    let reviews = reviews.as_array().cloned().unwrap_or_default();

    Ok(CallToolResult::success(vec![Content::text(
        response::format_review_list(&reviews),
    )]))
}

/// Combined status of the PR head commit. The head SHA is not part of the
/// request, so this is a two-call operation: pull lookup, then status.
pub async fn get_pull_request_status(
    client: &dyn HubClient,
    args: &JsonObject,
) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let pull_number = args::required_int(args, "pull_number")?;

    let pr = client
        .get_json(&format!("/repos/{owner}/{repo}/pulls/{pull_number}"))
        .await?;
    let head_sha = pr
        .get("head")
        .and_then(|v| v.get("sha"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            anyhow::anyhow!("pull request #{pull_number} response carries no head SHA")
        })?;

    let status = client
        .get_json(&format!("/repos/{owner}/{repo}/commits/{head_sha}/status"))
        .await?;

    Ok(CallToolResult::success(vec![Content::text(
        response::format_combined_status(&status),
    )]))
}

pub async fn create_pull_request(
    client: &dyn HubClient,
    args: &JsonObject,
) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let title = args::required_string(args, "title")?;
    let head = args::required_string(args, "head")?;
    let base = args::required_string(args, "base")?;
    let body_text = args::optional_string(args, "body")?;
    let draft = args::optional_bool(args, "draft")?;

    let mut body = serde_json::json!({
        "title": title,
        "head": head,
        "base": base,
    });
    if !body_text.is_empty() {
        body["body"] = Value::String(body_text);
    }
    if draft {
        body["draft"] = Value::Bool(true);
    }

    let pr = client
        .post_json(&format!("/repos/{owner}/{repo}/pulls"), &body)
        .await?;

    Ok(CallToolResult::success(vec![Content::text(
        response::format_pull_request(&pr),
    )]))
}

pub async fn merge_pull_request(
    client: &dyn HubClient,
    args: &JsonObject,
) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let pull_number = args::required_int(args, "pull_number")?;
    let commit_title = args::optional_string(args, "commit_title")?;
    let commit_message = args::optional_string(args, "commit_message")?;
    let merge_method = args::optional_string_with_default(args, "merge_method", "merge")?;

    let mut body = serde_json::json!({ "merge_method": merge_method });
    if !commit_title.is_empty() {
        body["commit_title"] = Value::String(commit_title);
    }
    if !commit_message.is_empty() {
        body["commit_message"] = Value::String(commit_message);
    }

    let result = client
        .put_json(
            &format!("/repos/{owner}/{repo}/pulls/{pull_number}/merge"),
            &body,
        )
        .await?;

    let message = result
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or("Pull request merged.");

    Ok(CallToolResult::success(vec![Content::text(format!(
        "PR #{pull_number}: {message}"
    ))]))
}

pub async fn update_pull_request_branch(
    client: &dyn HubClient,
    args: &JsonObject,
) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let pull_number = args::required_int(args, "pull_number")?;
    let expected_head_sha = args::optional_string(args, "expected_head_sha")?;

    let mut body = serde_json::json!({});
    if !expected_head_sha.is_empty() {
        body["expected_head_sha"] = Value::String(expected_head_sha);
    }

    let result = client
        .put_json(
            &format!("/repos/{owner}/{repo}/pulls/{pull_number}/update-branch"),
            &body,
        )
        .await?;

    let message = result
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap_or("Branch update queued.");

    Ok(CallToolResult::success(vec![Content::text(format!(
        "PR #{pull_number}: {message}"
    ))]))
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
    async fn status_resolves_head_before_status_fetch() {
        let client = MockClient::with_responses(vec![
            json!({"head": {"sha": "abc123"}}),
            json!({"state": "success", "statuses": []}),
        ]);
        let a = args_of(json!({"owner": "o", "repo": "r", "pull_number": 7}));
        get_pull_request_status(&client, &a).await.unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].path, "/repos/o/r/pulls/7");
        assert_eq!(calls[1].path, "/repos/o/r/commits/abc123/status");
    }

    #[tokio::test]
    async fn merge_defaults_to_merge_method() {
        let client = MockClient::with_responses(vec![json!({"merged": true, "message": "Pull Request successfully merged"})]);
        let a = args_of(json!({"owner": "o", "repo": "r", "pull_number": 5}));
        merge_pull_request(&client, &a).await.unwrap();

        let calls = client.calls();
        assert_eq!(calls[0].method, "PUT");
        assert_eq!(calls[0].path, "/repos/o/r/pulls/5/merge");
        assert_eq!(calls[0].body, Some(json!({"merge_method": "merge"})));
    }

    #[tokio::test]
    async fn update_branch_body_is_empty_without_expected_sha() {
        let client = MockClient::with_responses(vec![json!({"message": "Updating pull request branch."})]);
        let a = args_of(json!({"owner": "o", "repo": "r", "pull_number": 9}));
        update_pull_request_branch(&client, &a).await.unwrap();

        let calls = client.calls();
        assert_eq!(calls[0].path, "/repos/o/r/pulls/9/update-branch");
        assert_eq!(calls[0].body, Some(json!({})));
    }

    #[tokio::test]
    async fn create_requires_head_and_base() {
        let client = MockClient::new();
        let a = args_of(json!({"owner": "o", "repo": "r", "title": "t", "base": "main"}));
        let err = create_pull_request(&client, &a).await.unwrap_err();
        assert!(matches!(err, GhxError::MissingParam(name) if name == "head"));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn list_filters_pass_through() {
        let client = MockClient::with_responses(vec![json!([])]);
        let a = args_of(json!({
            "owner": "o",
            "repo": "r",
            "state": "closed",
            "base": "main",
        }));
        list_pull_requests(&client, &a).await.unwrap();

        let query = client.calls()[0].query.clone();
        assert!(query.contains(&("state".to_string(), "closed".to_string())));
        assert!(query.contains(&("base".to_string(), "main".to_string())));
        assert!(query.contains(&("per_page".to_string(), "30".to_string())));
    }
}
