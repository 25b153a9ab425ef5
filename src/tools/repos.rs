use base64::Engine;
use rmcp::model::{CallToolResult, Content, JsonObject};
use serde::Deserialize;
use serde_json::Value;

use crate::args::{self, PaginationParams};
use crate::client::HubClient;
use crate::error::{GhxError, Result};
use crate::response;

pub async fn get_file_contents(
    client: &dyn HubClient,
    args: &JsonObject,
) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let path = args::required_string(args, "path")?;
    let git_ref = args::optional_string(args, "ref")?;

    let path = path.trim_start_matches('/');
    let url = format!("/repos/{owner}/{repo}/contents/{path}");
    let content = if git_ref.is_empty() {
        client.get_json(&url).await?
    } else {
        client
            .get_json_with_query(&url, &[("ref", git_ref.as_str())])
            .await?
    };

    let text = match &content {
        Value::Array(entries) => response::format_file_list(entries),
        other => response::format_file_content(other),
    };

    Ok(CallToolResult::success(vec![Content::text(text)]))
}

pub async fn list_commits(client: &dyn HubClient, args: &JsonObject) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let sha = args::optional_string(args, "sha")?;
    let path = args::optional_string(args, "path")?;
    let pagination = PaginationParams::extract(args)?;

    let mut query: Vec<(&'static str, String)> = Vec::new();
    if !sha.is_empty() {
        query.push(("sha", sha));
    }
    if !path.is_empty() {
        query.push(("path", path));
    }
    pagination.apply(&mut query);

    let query_refs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let commits = client
        .get_json_with_query(&format!("/repos/{owner}/{repo}/commits"), &query_refs)
        .await?;
    let commits = commits.as_array().cloned().unwrap_or_default();

    Ok(CallToolResult::success(vec![Content::text(
        response::format_commit_list(&commits),
    )]))
}

pub async fn create_or_update_file(
    client: &dyn HubClient,
    args: &JsonObject,
) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let path = args::required_string(args, "path")?;
    let content = args::required_string(args, "content")?;
    let message = args::required_string(args, "message")?;
    let branch = args::required_string(args, "branch")?;
    let sha = args::optional_string(args, "sha")?;

    let path = path.trim_start_matches('/');
    let encoded = base64::engine::general_purpose::STANDARD.encode(content.as_bytes());

    let mut body = serde_json::json!({
        "message": message,
        "content": encoded,
        "branch": branch,
    });
    if !sha.is_empty() {
        body["sha"] = Value::String(sha);
    }

    let result = client
        .put_json(&format!("/repos/{owner}/{repo}/contents/{path}"), &body)
        .await?;

    let commit_sha = result
        .get("commit")
        .and_then(|v| v.get("sha"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");

    Ok(CallToolResult::success(vec![Content::text(format!(
        "File written: {path} (commit {commit_sha})"
    ))]))
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    path: String,
    content: String,
}

/// Push a set of files as one commit through the git data API:
/// resolve the branch ref, read its commit tree, write a new tree, commit
/// it, then fast-forward the ref.
pub async fn push_files(client: &dyn HubClient, args: &JsonObject) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let branch = args::required_string(args, "branch")?;
    let message = args::required_string(args, "message")?;

    let files: Vec<FileEntry> = match args.get("files") {
        None => return Err(GhxError::MissingParam("files".to_string())),
        Some(value) => {
            serde_json::from_value(value.clone()).map_err(|_| GhxError::TypeMismatch {
                name: "files".to_string(),
                expected: "array of {path, content} objects",
            })?
        }
    };
    if files.is_empty() {
        return Err(GhxError::MissingParam("files".to_string()));
    }

    let git_ref = client
        .get_json(&format!("/repos/{owner}/{repo}/git/refs/heads/{branch}"))
        .await?;
    let base_commit_sha = git_ref
        .get("object")
        .and_then(|v| v.get("sha"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("ref response for '{branch}' carries no SHA"))?
        .to_string();

    let base_commit = client
        .get_json(&format!(
            "/repos/{owner}/{repo}/git/commits/{base_commit_sha}"
        ))
        .await?;
    let base_tree_sha = base_commit
        .get("tree")
        .and_then(|v| v.get("sha"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("commit {base_commit_sha} carries no tree SHA"))?
        .to_string();

    let entries: Vec<Value> = files
        .iter()
        .map(|f| {
            serde_json::json!({
                "path": f.path.trim_start_matches('/'),
                "mode": "100644",
                "type": "blob",
                "content": f.content,
            })
        })
        .collect();
    let tree = client
        .post_json(
            &format!("/repos/{owner}/{repo}/git/trees"),
            &serde_json::json!({ "base_tree": base_tree_sha, "tree": entries }),
        )
        .await?;
    let tree_sha = tree
        .get("sha")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("tree response carries no SHA"))?
        .to_string();

    let commit = client
        .post_json(
            &format!("/repos/{owner}/{repo}/git/commits"),
            &serde_json::json!({
                "message": message,
                "tree": tree_sha,
                "parents": [base_commit_sha],
            }),
        )
        .await?;
    let commit_sha = commit
        .get("sha")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("commit response carries no SHA"))?
        .to_string();

    client
        .patch_json(
            &format!("/repos/{owner}/{repo}/git/refs/heads/{branch}"),
            &serde_json::json!({ "sha": commit_sha }),
        )
        .await?;

    Ok(CallToolResult::success(vec![Content::text(format!(
        "Pushed {} file(s) to {branch} (commit {commit_sha})",
        files.len()
    ))]))
}

pub async fn create_repository(
    client: &dyn HubClient,
    args: &JsonObject,
) -> Result<CallToolResult> {
    let name = args::required_string(args, "name")?;
    let description = args::optional_string(args, "description")?;
    let private = args::optional_bool(args, "private")?;
    let auto_init = args::optional_bool(args, "autoInit")?;

    let mut body = serde_json::json!({
        "name": name,
        "private": private,
        "auto_init": auto_init,
    });
    if !description.is_empty() {
        body["description"] = Value::String(description);
    }

    let repo = client.post_json("/user/repos", &body).await?;

    Ok(CallToolResult::success(vec![Content::text(
        response::format_repository(&repo),
    )]))
}

/// Create a branch from an existing one. When no source branch is given,
/// the repository default branch is looked up first.
pub async fn create_branch(client: &dyn HubClient, args: &JsonObject) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let branch = args::required_string(args, "branch")?;
    let mut from_branch = args::optional_string(args, "from_branch")?;

    if from_branch.is_empty() {
        let repo_info = client.get_json(&format!("/repos/{owner}/{repo}")).await?;
        from_branch = repo_info
            .get("default_branch")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("repository response carries no default branch"))?
            .to_string();
    }

    let source_ref = client
        .get_json(&format!(
            "/repos/{owner}/{repo}/git/refs/heads/{from_branch}"
        ))
        .await?;
    let sha = source_ref
        .get("object")
        .and_then(|v| v.get("sha"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("ref response for '{from_branch}' carries no SHA"))?;

    client
        .post_json(
            &format!("/repos/{owner}/{repo}/git/refs"),
            &serde_json::json!({
                "ref": format!("refs/heads/{branch}"),
                "sha": sha,
            }),
        )
        .await?;

    Ok(CallToolResult::success(vec![Content::text(format!(
        "Branch '{branch}' created from '{from_branch}' at {sha}"
    ))]))
}

pub async fn fork_repository(client: &dyn HubClient, args: &JsonObject) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let organization = args::optional_string(args, "organization")?;

    let mut body = serde_json::json!({});
    if !organization.is_empty() {
        body["organization"] = Value::String(organization);
    }

    let fork = client
        .post_json(&format!("/repos/{owner}/{repo}/forks"), &body)
        .await?;

    let full_name = fork
        .get("full_name")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");

    Ok(CallToolResult::success(vec![Content::text(format!(
        "Fork created: {full_name}"
    ))]))
}
