//! Resource URI templates for repository content.
//!
//! Five URI shapes map onto one content-fetch handler; matching picks the
//! ref to resolve against the GitHub API. Templates are tried most
//! specific first, and the first structural match wins.

use base64::Engine;
use rmcp::model::{
    AnnotateAble, RawResourceTemplate, ReadResourceResult, ResourceContents, ResourceTemplate,
};
use serde_json::{json, Value};

use crate::client::HubClient;
use crate::error::{GhxError, Result};

/// Which git reference a repository-content URI resolves against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefSelector {
    /// The repository's default branch.
    Default,
    /// A named branch.
    Branch(String),
    /// A tag.
    Tag(String),
    /// An explicit commit SHA.
    Sha(String),
    /// The head commit of a pull request; resolving it requires an
    /// auxiliary pull-request lookup before the content fetch.
    PullRequestHead(i64),
}

/// A resource URI rewritten into one canonical content-fetch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub owner: String,
    pub repo: String,
    pub selector: RefSelector,
    /// Path within the repository; may contain slashes, may be empty for
    /// the repository root.
    pub path: String,
}

/// The fixed template set, in matching order.
pub fn resource_templates() -> Vec<ResourceTemplate> {
    [
        (
            "repo://{owner}/{repo}/refs/heads/{branch}/contents{/path*}",
            "Repository content for a branch",
        ),
        (
            "repo://{owner}/{repo}/refs/tags/{tag}/contents{/path*}",
            "Repository content for a tag",
        ),
        (
            "repo://{owner}/{repo}/refs/pull/{prNumber}/head/contents{/path*}",
            "Repository content for a pull request head",
        ),
        (
            "repo://{owner}/{repo}/sha/{sha}/contents{/path*}",
            "Repository content for a commit",
        ),
        (
            "repo://{owner}/{repo}/contents{/path*}",
            "Repository content",
        ),
    ]
    .into_iter()
    .map(|(uri_template, name)| {
        RawResourceTemplate {
            uri_template: uri_template.to_string(),
            name: name.to_string(),
            title: None,
            description: Some(name.to_string()),
            mime_type: None,
            icons: None,
        }
        .no_annotation()
    })
    .collect()
}

/// Match a `repo://` URI against the template set and extract its bound
/// variables. No backtracking: once a shape matches, its variables stand.
pub fn match_uri(uri: &str) -> Result<ContentRequest> {
    let no_match = || GhxError::NoTemplateMatch(uri.to_string());

    let rest = uri.strip_prefix("repo://").ok_or_else(no_match)?;
    let segments: Vec<&str> = rest.split('/').collect();
    if segments.len() < 2 || segments[0].is_empty() || segments[1].is_empty() {
        return Err(no_match());
    }
    let owner = segments[0].to_string();
    let repo = segments[1].to_string();

    let (selector, path) = match &segments[2..] {
        ["refs", "heads", branch, "contents", path @ ..] if !branch.is_empty() => {
            (RefSelector::Branch(branch.to_string()), path.join("/"))
        }
        ["refs", "tags", tag, "contents", path @ ..] if !tag.is_empty() => {
            (RefSelector::Tag(tag.to_string()), path.join("/"))
        }
        ["refs", "pull", number, "head", "contents", path @ ..] => {
            let number: i64 = number.parse().map_err(|_| no_match())?;
            (RefSelector::PullRequestHead(number), path.join("/"))
        }
        ["sha", sha, "contents", path @ ..] if !sha.is_empty() => {
            (RefSelector::Sha(sha.to_string()), path.join("/"))
        }
        ["contents", path @ ..] => (RefSelector::Default, path.join("/")),
        _ => return Err(no_match()),
    };

    Ok(ContentRequest {
        owner,
        repo,
        selector,
        path,
    })
}

/// Shared content-fetch handler behind all five templates.
///
/// Files come back base64-encoded and are decoded to text; directories
/// come back as JSON listings.
pub async fn fetch_content(
    client: &dyn HubClient,
    uri: &str,
    req: &ContentRequest,
) -> Result<ReadResourceResult> {
    let ContentRequest {
        owner,
        repo,
        selector,
        path,
    } = req;

    let git_ref = match selector {
        RefSelector::Default => None,
        RefSelector::Branch(branch) => Some(format!("refs/heads/{branch}")),
        RefSelector::Tag(tag) => Some(format!("refs/tags/{tag}")),
        RefSelector::Sha(sha) => Some(sha.clone()),
        RefSelector::PullRequestHead(number) => {
            let pr = client
                .get_json(&format!("/repos/{owner}/{repo}/pulls/{number}"))
                .await?;
            let head_sha = pr
                .get("head")
                .and_then(|v| v.get("sha"))
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    anyhow::anyhow!("pull request #{number} response carries no head SHA")
                })?;
            Some(head_sha.to_string())
        }
    };

    let content_path = format!("/repos/{owner}/{repo}/contents/{path}");
    let content = match &git_ref {
        Some(r) => {
            client
                .get_json_with_query(&content_path, &[("ref", r.as_str())])
                .await?
        }
        None => client.get_json(&content_path).await?,
    };

    let text = match &content {
        // Directory listing: keep the structural fields, drop the noise.
        Value::Array(entries) => {
            let listing: Vec<Value> = entries
                .iter()
                .map(|e| {
                    json!({
                        "name": e.get("name").cloned().unwrap_or(Value::Null),
                        "path": e.get("path").cloned().unwrap_or(Value::Null),
                        "type": e.get("type").cloned().unwrap_or(Value::Null),
                        "size": e.get("size").cloned().unwrap_or(Value::Null),
                    })
                })
                .collect();
            serde_json::to_string_pretty(&listing)?
        }
        _ => decode_file_content(&content),
    };

    Ok(ReadResourceResult {
        contents: vec![ResourceContents::text(text, uri)],
    })
}

/// Decode the base64 `content` field of a file response.
fn decode_file_content(file: &Value) -> String {
    let encoded = file.get("content").and_then(|v| v.as_str()).unwrap_or("");
    if encoded.is_empty() {
        return "(empty file)".to_string();
    }
    let clean = encoded.replace('\n', "");
    base64::engine::general_purpose::STANDARD
        .decode(&clean)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| "(binary content)".to_string())
}
