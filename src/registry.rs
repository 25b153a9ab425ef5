//! The exposed tool set, assembled once at startup.
//!
//! Read tools are always registered; write tools only when the server is
//! not in read-only mode. Construction is purely additive and the
//! resulting descriptor list is immutable for the process lifetime. It is
//! the source of truth for both `tools/list` and the dispatch gate.

use std::sync::Arc;

use rmcp::model::{JsonObject, Tool, ToolAnnotations};
use serde_json::{json, Value};

/// Immutable tool descriptor set.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    /// Assemble the tool set for the given mode. Evaluated once; changing
    /// the mode requires a fresh instance.
    pub fn assemble(read_only: bool) -> Self {
        let mut tools = read_tools();
        if !read_only {
            tools.append(&mut write_tools());
        }
        Self { tools }
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.tools.clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Build one descriptor. `read_only` classifies the operation and is
/// surfaced to clients through the standard annotation hint.
fn tool(
    name: &'static str,
    description: &'static str,
    properties: Value,
    required: &[&str],
    read_only: bool,
) -> Tool {
    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), properties);
    if !required.is_empty() {
        schema.insert("required".to_string(), json!(required));
    }
    Tool {
        name: name.into(),
        title: None,
        description: Some(description.into()),
        input_schema: Arc::new(schema),
        output_schema: None,
        annotations: Some(ToolAnnotations {
            read_only_hint: Some(read_only),
            ..Default::default()
        }),
        execution: None,
        icons: None,
        meta: None,
    }
}

fn merge(base: Value, extra: Value) -> Value {
    match (base, extra) {
        (Value::Object(mut b), Value::Object(e)) => {
            b.extend(e);
            Value::Object(b)
        }
        (b, _) => b,
    }
}

fn repo_props() -> Value {
    json!({
        "owner": {"type": "string", "description": "Repository owner (username or organization)"},
        "repo": {"type": "string", "description": "Repository name"},
    })
}

fn pagination_props() -> Value {
    json!({
        "page": {"type": "number", "description": "Page number (1-based). Defaults to 1."},
        "perPage": {"type": "number", "description": "Results per page. Defaults to 30; the API caps at 100."},
    })
}

fn read_tools() -> Vec<Tool> {
    vec![
        // ── Identity ────────────────────────────────────────────────────
        tool(
            "get_me",
            "Get details of the authenticated user. Useful when a request refers to 'me' or 'my' resources.",
            json!({}),
            &[],
            true,
        ),
        // ── Issues ──────────────────────────────────────────────────────
        tool(
            "get_issue",
            "Get the full details of a specific issue including its body, labels, assignees, and milestone.",
            merge(repo_props(), json!({
                "issue_number": {"type": "number", "description": "Issue number"},
            })),
            &["owner", "repo", "issue_number"],
            true,
        ),
        tool(
            "list_issues",
            "List issues in a repository with filtering by state, labels, and sort order.",
            merge(repo_props(), merge(json!({
                "state": {"type": "string", "enum": ["open", "closed", "all"], "description": "Filter by state"},
                "labels": {"type": "string", "description": "Comma-separated list of label names to filter by"},
                "sort": {"type": "string", "enum": ["created", "updated", "comments"], "description": "Sort field"},
                "direction": {"type": "string", "enum": ["asc", "desc"], "description": "Sort direction"},
                "since": {"type": "string", "description": "Only issues updated at or after this ISO 8601 timestamp"},
            }), pagination_props())),
            &["owner", "repo"],
            true,
        ),
        tool(
            "get_issue_comments",
            "List comments on a specific issue, oldest first.",
            merge(repo_props(), merge(json!({
                "issue_number": {"type": "number", "description": "Issue number"},
            }), pagination_props())),
            &["owner", "repo", "issue_number"],
            true,
        ),
        tool(
            "search_issues",
            "Search for issues and pull requests using GitHub's issue search syntax.",
            merge(json!({
                "q": {"type": "string", "description": "Search query using GitHub issue search syntax"},
                "sort": {"type": "string", "description": "Sort field (e.g. comments, reactions, created, updated)"},
                "order": {"type": "string", "enum": ["asc", "desc"], "description": "Sort order"},
            }), pagination_props()),
            &["q"],
            true,
        ),
        // ── Pull Requests ───────────────────────────────────────────────
        tool(
            "get_pull_request",
            "Get the full details of a pull request including branches, mergeable state, and body.",
            merge(repo_props(), json!({
                "pull_number": {"type": "number", "description": "Pull request number"},
            })),
            &["owner", "repo", "pull_number"],
            true,
        ),
        tool(
            "list_pull_requests",
            "List pull requests in a repository with filtering by state, head, and base branch.",
            merge(repo_props(), merge(json!({
                "state": {"type": "string", "enum": ["open", "closed", "all"], "description": "Filter by state"},
                "head": {"type": "string", "description": "Filter by head user/branch in the form user:ref-name"},
                "base": {"type": "string", "description": "Filter by base branch name"},
                "sort": {"type": "string", "enum": ["created", "updated", "popularity", "long-running"], "description": "Sort field"},
                "direction": {"type": "string", "enum": ["asc", "desc"], "description": "Sort direction"},
            }), pagination_props())),
            &["owner", "repo"],
            true,
        ),
        tool(
            "get_pull_request_files",
            "List the files changed in a pull request with their status and diff stats.",
            merge(repo_props(), merge(json!({
                "pull_number": {"type": "number", "description": "Pull request number"},
            }), pagination_props())),
            &["owner", "repo", "pull_number"],
            true,
        ),
        tool(
            "get_pull_request_comments",
            "List the review comments on a pull request.",
            merge(repo_props(), merge(json!({
                "pull_number": {"type": "number", "description": "Pull request number"},
            }), pagination_props())),
            &["owner", "repo", "pull_number"],
            true,
        ),
        tool(
            "get_pull_request_reviews",
            "List the reviews on a pull request with reviewer and verdict.",
            merge(repo_props(), json!({
                "pull_number": {"type": "number", "description": "Pull request number"},
            })),
            &["owner", "repo", "pull_number"],
            true,
        ),
        tool(
            "get_pull_request_status",
            "Get the combined commit status of a pull request's head commit.",
            merge(repo_props(), json!({
                "pull_number": {"type": "number", "description": "Pull request number"},
            })),
            &["owner", "repo", "pull_number"],
            true,
        ),
        // ── Repository content ──────────────────────────────────────────
        tool(
            "get_file_contents",
            "Read the contents of a file or directory at a path, optionally at a specific ref.",
            merge(repo_props(), json!({
                "path": {"type": "string", "description": "Path to the file or directory"},
                "ref": {"type": "string", "description": "Git ref (branch, tag, or commit SHA). Defaults to the default branch."},
            })),
            &["owner", "repo", "path"],
            true,
        ),
        tool(
            "list_commits",
            "List commits in a repository, optionally limited to a ref or a file path.",
            merge(repo_props(), merge(json!({
                "sha": {"type": "string", "description": "Ref or SHA to start listing from. Defaults to the default branch."},
                "path": {"type": "string", "description": "Only commits touching this path"},
            }), pagination_props())),
            &["owner", "repo"],
            true,
        ),
        // ── Search ──────────────────────────────────────────────────────
        tool(
            "search_repositories",
            "Search for repositories using GitHub's repository search syntax.",
            merge(json!({
                "query": {"type": "string", "description": "Search query using GitHub repository search syntax"},
            }), pagination_props()),
            &["query"],
            true,
        ),
        tool(
            "search_code",
            "Search for code across repositories using GitHub's code search syntax.",
            merge(json!({
                "q": {"type": "string", "description": "Search query using GitHub code search syntax"},
                "sort": {"type": "string", "description": "Sort field ('indexed' only)"},
                "order": {"type": "string", "enum": ["asc", "desc"], "description": "Sort order"},
            }), pagination_props()),
            &["q"],
            true,
        ),
        tool(
            "search_users",
            "Search for users using GitHub's user search syntax.",
            merge(json!({
                "q": {"type": "string", "description": "Search query using GitHub user search syntax"},
                "sort": {"type": "string", "enum": ["followers", "repositories", "joined"], "description": "Sort field"},
                "order": {"type": "string", "enum": ["asc", "desc"], "description": "Sort order"},
            }), pagination_props()),
            &["q"],
            true,
        ),
        // ── Code scanning ───────────────────────────────────────────────
        tool(
            "list_code_scanning_alerts",
            "List code scanning alerts in a repository with filtering by ref, state, and severity.",
            merge(repo_props(), json!({
                "ref": {"type": "string", "description": "Git ref to list alerts for"},
                "state": {"type": "string", "description": "Filter by alert state. Defaults to open.", "default": "open"},
                "severity": {"type": "string", "description": "Filter by severity"},
            })),
            &["owner", "repo"],
            true,
        ),
        tool(
            "get_code_scanning_alert",
            "Get the details of a specific code scanning alert.",
            merge(repo_props(), json!({
                "alert_number": {"type": "number", "description": "Alert number"},
            })),
            &["owner", "repo", "alert_number"],
            true,
        ),
    ]
}

fn write_tools() -> Vec<Tool> {
    vec![
        // ── Issues ──────────────────────────────────────────────────────
        tool(
            "create_issue",
            "Create a new issue in a repository with optional body, assignees, labels, and milestone.",
            merge(repo_props(), json!({
                "title": {"type": "string", "description": "Issue title"},
                "body": {"type": "string", "description": "Issue body in markdown"},
                "assignees": {"type": "string", "description": "Comma-separated list of usernames to assign"},
                "labels": {"type": "string", "description": "Comma-separated list of label names"},
                "milestone": {"type": "number", "description": "Milestone number"},
            })),
            &["owner", "repo", "title"],
            false,
        ),
        tool(
            "update_issue",
            "Update an existing issue: title, body, state, labels, assignees, or milestone.",
            merge(repo_props(), json!({
                "issue_number": {"type": "number", "description": "Issue number"},
                "title": {"type": "string", "description": "New title"},
                "body": {"type": "string", "description": "New body"},
                "state": {"type": "string", "enum": ["open", "closed"], "description": "New state"},
                "labels": {"type": "string", "description": "Comma-separated label names, replaces existing"},
                "assignees": {"type": "string", "description": "Comma-separated usernames, replaces existing"},
                "milestone": {"type": "number", "description": "New milestone number"},
            })),
            &["owner", "repo", "issue_number"],
            false,
        ),
        tool(
            "add_issue_comment",
            "Add a comment to an existing issue.",
            merge(repo_props(), json!({
                "issue_number": {"type": "number", "description": "Issue number"},
                "body": {"type": "string", "description": "Comment body in markdown"},
            })),
            &["owner", "repo", "issue_number", "body"],
            false,
        ),
        // ── Pull Requests ───────────────────────────────────────────────
        tool(
            "create_pull_request",
            "Open a new pull request from a head branch into a base branch.",
            merge(repo_props(), json!({
                "title": {"type": "string", "description": "Pull request title"},
                "head": {"type": "string", "description": "Branch containing the changes"},
                "base": {"type": "string", "description": "Branch to merge into"},
                "body": {"type": "string", "description": "Pull request body in markdown"},
                "draft": {"type": "boolean", "description": "Open as a draft pull request"},
            })),
            &["owner", "repo", "title", "head", "base"],
            false,
        ),
        tool(
            "merge_pull_request",
            "Merge a pull request using the merge, squash, or rebase method.",
            merge(repo_props(), json!({
                "pull_number": {"type": "number", "description": "Pull request number"},
                "commit_title": {"type": "string", "description": "Title of the merge commit"},
                "commit_message": {"type": "string", "description": "Extra detail for the merge commit"},
                "merge_method": {"type": "string", "enum": ["merge", "squash", "rebase"], "description": "Merge method. Defaults to merge."},
            })),
            &["owner", "repo", "pull_number"],
            false,
        ),
        tool(
            "update_pull_request_branch",
            "Update a pull request branch with the latest changes from its base branch.",
            merge(repo_props(), json!({
                "pull_number": {"type": "number", "description": "Pull request number"},
                "expected_head_sha": {"type": "string", "description": "Expected SHA of the branch head; the update is rejected if it differs"},
            })),
            &["owner", "repo", "pull_number"],
            false,
        ),
        // ── Repository content ──────────────────────────────────────────
        tool(
            "create_or_update_file",
            "Create a new file or update an existing one, producing a commit on the given branch.",
            merge(repo_props(), json!({
                "path": {"type": "string", "description": "Path of the file to write"},
                "content": {"type": "string", "description": "File content as plain text; encoded automatically"},
                "message": {"type": "string", "description": "Commit message"},
                "branch": {"type": "string", "description": "Branch to commit to"},
                "sha": {"type": "string", "description": "Blob SHA of the file being replaced. Required when updating."},
            })),
            &["owner", "repo", "path", "content", "message", "branch"],
            false,
        ),
        tool(
            "push_files",
            "Push multiple files to a branch in a single commit via the git data API.",
            merge(repo_props(), json!({
                "branch": {"type": "string", "description": "Branch to push to"},
                "message": {"type": "string", "description": "Commit message"},
                "files": {
                    "type": "array",
                    "description": "Files to write",
                    "items": {
                        "type": "object",
                        "properties": {
                            "path": {"type": "string", "description": "Path of the file"},
                            "content": {"type": "string", "description": "File content as plain text"},
                        },
                        "required": ["path", "content"],
                    },
                },
            })),
            &["owner", "repo", "branch", "message", "files"],
            false,
        ),
        // ── Repositories ────────────────────────────────────────────────
        tool(
            "create_repository",
            "Create a new repository under the authenticated user's account.",
            json!({
                "name": {"type": "string", "description": "Repository name"},
                "description": {"type": "string", "description": "Repository description"},
                "private": {"type": "boolean", "description": "Create as private"},
                "autoInit": {"type": "boolean", "description": "Initialize with an empty README"},
            }),
            &["name"],
            false,
        ),
        tool(
            "create_branch",
            "Create a new branch pointing at the head of an existing branch.",
            merge(repo_props(), json!({
                "branch": {"type": "string", "description": "Name of the branch to create"},
                "from_branch": {"type": "string", "description": "Source branch. Defaults to the repository default branch."},
            })),
            &["owner", "repo", "branch"],
            false,
        ),
        tool(
            "fork_repository",
            "Fork a repository to the authenticated user's account or an organization.",
            merge(repo_props(), json!({
                "organization": {"type": "string", "description": "Organization to fork into. Defaults to the personal account."},
            })),
            &["owner", "repo"],
            false,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(registry: &ToolRegistry) -> Vec<String> {
        registry.tools().iter().map(|t| t.name.to_string()).collect()
    }

    #[test]
    fn read_only_set_has_no_mutating_tools() {
        let registry = ToolRegistry::assemble(true);
        let names = names(&registry);
        for forbidden in [
            "create_issue",
            "update_issue",
            "add_issue_comment",
            "create_pull_request",
            "merge_pull_request",
            "update_pull_request_branch",
            "create_or_update_file",
            "push_files",
            "create_repository",
            "create_branch",
            "fork_repository",
        ] {
            assert!(!names.contains(&forbidden.to_string()), "{forbidden} leaked into read-only set");
        }
        for tool in registry.tools() {
            let hint = tool.annotations.as_ref().and_then(|a| a.read_only_hint);
            assert_eq!(hint, Some(true), "{} is not annotated read-only", tool.name);
        }
    }

    #[test]
    fn writable_set_is_a_strict_superset() {
        let read_only = ToolRegistry::assemble(true);
        let writable = ToolRegistry::assemble(false);
        assert!(writable.len() > read_only.len());
        for name in names(&read_only) {
            assert!(writable.contains(&name), "{name} missing from writable set");
        }
        assert!(writable.contains("merge_pull_request"));
        assert!(writable.contains("push_files"));
    }

    #[test]
    fn assembly_is_deterministic() {
        let a = names(&ToolRegistry::assemble(false));
        let b = names(&ToolRegistry::assemble(false));
        assert_eq!(a, b);
        let a = names(&ToolRegistry::assemble(true));
        let b = names(&ToolRegistry::assemble(true));
        assert_eq!(a, b);
    }

    #[test]
    fn names_are_unique() {
        let mut all = names(&ToolRegistry::assemble(false));
        let before = all.len();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), before);
    }

    #[test]
    fn every_schema_is_an_object_with_consistent_required() {
        for tool in ToolRegistry::assemble(false).tools() {
            let schema = tool.input_schema.as_ref();
            assert_eq!(
                schema.get("type").and_then(|v| v.as_str()),
                Some("object"),
                "{} schema type",
                tool.name
            );
            let properties = schema
                .get("properties")
                .and_then(|v| v.as_object())
                .unwrap_or_else(|| panic!("{} has no properties object", tool.name));
            if let Some(required) = schema.get("required").and_then(|v| v.as_array()) {
                for r in required {
                    let r = r.as_str().expect("required entries are strings");
                    assert!(
                        properties.contains_key(r),
                        "{}: required '{r}' not among properties",
                        tool.name
                    );
                }
            }
        }
    }

    #[test]
    fn lookup_gate() {
        let registry = ToolRegistry::assemble(true);
        assert!(registry.contains("list_issues"));
        assert!(!registry.contains("create_issue"));
        assert!(!registry.contains("no_such_tool"));
    }
}
