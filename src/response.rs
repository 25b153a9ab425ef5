//! Format GitHub API JSON into readable markdown for agent consumption.

use serde_json::Value;

/// Format an issue object into readable markdown.
pub fn format_issue(issue: &Value) -> String {
    let mut parts = Vec::new();

    if let Some(number) = issue.get("number").and_then(|v| v.as_i64()) {
        let title = issue
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or("(untitled)");
        let state = issue
            .get("state")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        parts.push(format!("## #{number} {title} [{state}]"));
    }

    if let Some(user) = issue
        .get("user")
        .and_then(|v| v.get("login"))
        .and_then(|v| v.as_str())
    {
        parts.push(format!("**Author:** {user}"));
    }

    if let Some(labels) = issue.get("labels").and_then(|v| v.as_array()) {
        let label_names: Vec<&str> = labels
            .iter()
            .filter_map(|l| l.get("name").and_then(|v| v.as_str()))
            .collect();
        if !label_names.is_empty() {
            parts.push(format!("**Labels:** {}", label_names.join(", ")));
        }
    }

    if let Some(assignees) = issue.get("assignees").and_then(|v| v.as_array()) {
        let names: Vec<&str> = assignees
            .iter()
            .filter_map(|a| a.get("login").and_then(|v| v.as_str()))
            .collect();
        if !names.is_empty() {
            parts.push(format!("**Assignees:** {}", names.join(", ")));
        }
    }

    if let Some(milestone) = issue
        .get("milestone")
        .and_then(|v| v.get("title"))
        .and_then(|v| v.as_str())
    {
        parts.push(format!("**Milestone:** {milestone}"));
    }

    if let Some(created) = issue.get("created_at").and_then(|v| v.as_str()) {
        parts.push(format!("**Created:** {created}"));
    }

    if let Some(url) = issue.get("html_url").and_then(|v| v.as_str()) {
        parts.push(format!("**URL:** {url}"));
    }

    if let Some(body) = issue.get("body").and_then(|v| v.as_str()) {
        if !body.is_empty() {
            parts.push(format!("\n{body}"));
        }
    }

    parts.join("\n")
}

/// Format a list of issues into readable markdown.
pub fn format_issue_list(issues: &[Value]) -> String {
    if issues.is_empty() {
        return "No issues found.".to_string();
    }
    issues
        .iter()
        .map(|issue| {
            let number = issue.get("number").and_then(|v| v.as_i64()).unwrap_or(0);
            let title = issue
                .get("title")
                .and_then(|v| v.as_str())
                .unwrap_or("(untitled)");
            let state = issue
                .get("state")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            let labels = issue
                .get("labels")
                .and_then(|v| v.as_array())
                .map(|arr| {
                    arr.iter()
                        .filter_map(|l| l.get("name").and_then(|v| v.as_str()))
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            let label_str = if labels.is_empty() {
                String::new()
            } else {
                format!(" [{labels}]")
            };
            format!("- #{number} {title} ({state}){label_str}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a pull request object into readable markdown.
pub fn format_pull_request(pr: &Value) -> String {
    let mut parts = Vec::new();

    if let Some(number) = pr.get("number").and_then(|v| v.as_i64()) {
        let title = pr
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or("(untitled)");
        let state = pr
            .get("state")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        parts.push(format!("## PR #{number} {title} [{state}]"));
    }

    if let Some(user) = pr
        .get("user")
        .and_then(|v| v.get("login"))
        .and_then(|v| v.as_str())
    {
        parts.push(format!("**Author:** {user}"));
    }

    if let Some(head) = pr
        .get("head")
        .and_then(|v| v.get("label"))
        .and_then(|v| v.as_str())
    {
        let base = pr
            .get("base")
            .and_then(|v| v.get("label"))
            .and_then(|v| v.as_str())
            .unwrap_or("?");
        parts.push(format!("**Branch:** {head} -> {base}"));
    }

    if let Some(draft) = pr.get("draft").and_then(|v| v.as_bool()) {
        if draft {
            parts.push("**Draft:** yes".to_string());
        }
    }

    if let Some(mergeable) = pr.get("mergeable").and_then(|v| v.as_bool()) {
        parts.push(format!("**Mergeable:** {mergeable}"));
    }

    if let Some(merged) = pr.get("merged").and_then(|v| v.as_bool()) {
        if merged {
            parts.push("**Merged:** yes".to_string());
        }
    }

    if let Some(created) = pr.get("created_at").and_then(|v| v.as_str()) {
        parts.push(format!("**Created:** {created}"));
    }

    if let Some(url) = pr.get("html_url").and_then(|v| v.as_str()) {
        parts.push(format!("**URL:** {url}"));
    }

    if let Some(body) = pr.get("body").and_then(|v| v.as_str()) {
        if !body.is_empty() {
            parts.push(format!("\n{body}"));
        }
    }

    parts.join("\n")
}

/// Format a list of pull requests.
pub fn format_pr_list(prs: &[Value]) -> String {
    if prs.is_empty() {
        return "No pull requests found.".to_string();
    }
    prs.iter()
        .map(|pr| {
            let number = pr.get("number").and_then(|v| v.as_i64()).unwrap_or(0);
            let title = pr
                .get("title")
                .and_then(|v| v.as_str())
                .unwrap_or("(untitled)");
            let state = pr
                .get("state")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            format!("- PR #{number} {title} ({state})")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a comment object.
pub fn format_comment(comment: &Value) -> String {
    let user = comment
        .get("user")
        .and_then(|v| v.get("login"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    let created = comment
        .get("created_at")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let body = comment.get("body").and_then(|v| v.as_str()).unwrap_or("");
    let id = comment.get("id").and_then(|v| v.as_i64()).unwrap_or(0);

    format!("**Comment #{id}** by {user} ({created}):\n{body}")
}

/// Format a list of comments.
pub fn format_comment_list(comments: &[Value]) -> String {
    if comments.is_empty() {
        return "No comments found.".to_string();
    }
    comments
        .iter()
        .map(format_comment)
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// Format a pull request review.
pub fn format_review(review: &Value) -> String {
    let user = review
        .get("user")
        .and_then(|v| v.get("login"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    let state = review
        .get("state")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    let body = review.get("body").and_then(|v| v.as_str()).unwrap_or("");
    if body.is_empty() {
        format!("- {user}: {state}")
    } else {
        format!("- {user}: {state}\n  {body}")
    }
}

/// Format a list of pull request reviews.
pub fn format_review_list(reviews: &[Value]) -> String {
    if reviews.is_empty() {
        return "No reviews found.".to_string();
    }
    reviews
        .iter()
        .map(format_review)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the changed-files listing of a pull request.
pub fn format_pr_files(files: &[Value]) -> String {
    if files.is_empty() {
        return "No changed files found.".to_string();
    }
    files
        .iter()
        .map(|f| {
            let filename = f.get("filename").and_then(|v| v.as_str()).unwrap_or("?");
            let status = f.get("status").and_then(|v| v.as_str()).unwrap_or("?");
            let additions = f.get("additions").and_then(|v| v.as_i64()).unwrap_or(0);
            let deletions = f.get("deletions").and_then(|v| v.as_i64()).unwrap_or(0);
            format!("- {filename} ({status}, +{additions}/-{deletions})")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a combined commit status response.
pub fn format_combined_status(status: &Value) -> String {
    let mut parts = Vec::new();
    let state = status
        .get("state")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    parts.push(format!("**Overall status:** {state}"));

    if let Some(statuses) = status.get("statuses").and_then(|v| v.as_array()) {
        for s in statuses {
            let context = s.get("context").and_then(|v| v.as_str()).unwrap_or("?");
            let state = s.get("state").and_then(|v| v.as_str()).unwrap_or("?");
            parts.push(format!("- {context}: {state}"));
        }
    }

    parts.join("\n")
}

/// Format a commit object.
pub fn format_commit(commit: &Value) -> String {
    let mut parts = Vec::new();

    let sha = commit
        .get("sha")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    parts.push(format!("**Commit:** {sha}"));

    if let Some(msg) = commit
        .get("commit")
        .and_then(|v| v.get("message"))
        .and_then(|v| v.as_str())
    {
        parts.push(format!("**Message:** {msg}"));
    }

    if let Some(author) = commit
        .get("commit")
        .and_then(|v| v.get("author"))
        .and_then(|v| v.get("name"))
        .and_then(|v| v.as_str())
    {
        let date = commit
            .get("commit")
            .and_then(|v| v.get("author"))
            .and_then(|v| v.get("date"))
            .and_then(|v| v.as_str())
            .unwrap_or("");
        parts.push(format!("**Author:** {author} ({date})"));
    }

    parts.join("\n")
}

/// Format a list of commits.
pub fn format_commit_list(commits: &[Value]) -> String {
    if commits.is_empty() {
        return "No commits found.".to_string();
    }
    commits
        .iter()
        .map(|c| {
            let sha = c
                .get("sha")
                .and_then(|v| v.as_str())
                .map(|s| &s[..7.min(s.len())])
                .unwrap_or("???????");
            let msg = c
                .get("commit")
                .and_then(|v| v.get("message"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .lines()
                .next()
                .unwrap_or("");
            format!("- `{sha}` {msg}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a file content response (files come back base64-encoded).
pub fn format_file_content(file: &Value) -> String {
    let name = file
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    let path = file.get("path").and_then(|v| v.as_str()).unwrap_or(name);
    let file_type = file.get("type").and_then(|v| v.as_str()).unwrap_or("file");

    if file_type == "dir" {
        return format!("**{path}/** (directory)");
    }

    let content = file.get("content").and_then(|v| v.as_str()).unwrap_or("");

    let decoded = if !content.is_empty() {
        use base64::Engine;
        let clean = content.replace('\n', "");
        base64::engine::general_purpose::STANDARD
            .decode(&clean)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .unwrap_or_else(|| "(binary content)".to_string())
    } else {
        "(empty file)".to_string()
    };

    let size = file.get("size").and_then(|v| v.as_i64()).unwrap_or(0);
    let sha_line = file
        .get("sha")
        .and_then(|v| v.as_str())
        .map(|s| format!("\n**SHA:** {s}"))
        .unwrap_or_default();
    format!("**File:** {path} ({size} bytes){sha_line}\n\n```\n{decoded}\n```")
}

/// Format a directory listing.
pub fn format_file_list(entries: &[Value]) -> String {
    if entries.is_empty() {
        return "No files found.".to_string();
    }
    entries
        .iter()
        .map(|e| {
            let name = e.get("name").and_then(|v| v.as_str()).unwrap_or("?");
            let file_type = e.get("type").and_then(|v| v.as_str()).unwrap_or("file");
            let icon = if file_type == "dir" { "/" } else { "" };
            format!("- {name}{icon}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a repository search response.
pub fn format_repo_search(result: &Value) -> String {
    let total = result
        .get("total_count")
        .and_then(|v| v.as_i64())
        .unwrap_or(0);
    let repos = result
        .get("items")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    if repos.is_empty() {
        return "No repositories found.".to_string();
    }

    let lines: Vec<String> = repos
        .iter()
        .map(|r| {
            let full_name = r.get("full_name").and_then(|v| v.as_str()).unwrap_or("?");
            let desc = r.get("description").and_then(|v| v.as_str()).unwrap_or("");
            let stars = r
                .get("stargazers_count")
                .and_then(|v| v.as_i64())
                .unwrap_or(0);
            if desc.is_empty() {
                format!("- {full_name} ({stars} stars)")
            } else {
                format!("- {full_name} ({stars} stars) - {desc}")
            }
        })
        .collect();

    format!("{total} repositories matched.\n{}", lines.join("\n"))
}

/// Format a code search response.
pub fn format_code_search(result: &Value) -> String {
    let total = result
        .get("total_count")
        .and_then(|v| v.as_i64())
        .unwrap_or(0);
    let items = result
        .get("items")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    if items.is_empty() {
        return "No code matches found.".to_string();
    }

    let lines: Vec<String> = items
        .iter()
        .map(|item| {
            let repo = item
                .get("repository")
                .and_then(|v| v.get("full_name"))
                .and_then(|v| v.as_str())
                .unwrap_or("?");
            let path = item.get("path").and_then(|v| v.as_str()).unwrap_or("?");
            format!("- {repo}: {path}")
        })
        .collect();

    format!("{total} code matches.\n{}", lines.join("\n"))
}

/// Format a user search response.
pub fn format_user_search(result: &Value) -> String {
    let total = result
        .get("total_count")
        .and_then(|v| v.as_i64())
        .unwrap_or(0);
    let items = result
        .get("items")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    if items.is_empty() {
        return "No users found.".to_string();
    }

    let lines: Vec<String> = items
        .iter()
        .map(|u| {
            let login = u.get("login").and_then(|v| v.as_str()).unwrap_or("?");
            let kind = u.get("type").and_then(|v| v.as_str()).unwrap_or("User");
            format!("- {login} ({kind})")
        })
        .collect();

    format!("{total} users matched.\n{}", lines.join("\n"))
}

/// Format an issue search response (issues and PRs share the endpoint).
pub fn format_issue_search(result: &Value) -> String {
    let total = result
        .get("total_count")
        .and_then(|v| v.as_i64())
        .unwrap_or(0);
    let items = result
        .get("items")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    if items.is_empty() {
        return "No issues found.".to_string();
    }

    format!("{total} issues matched.\n{}", format_issue_list(&items))
}

/// Format a code scanning alert.
pub fn format_alert(alert: &Value) -> String {
    let mut parts = Vec::new();

    if let Some(number) = alert.get("number").and_then(|v| v.as_i64()) {
        let state = alert
            .get("state")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        parts.push(format!("## Alert #{number} [{state}]"));
    }

    if let Some(rule) = alert.get("rule") {
        if let Some(id) = rule.get("id").and_then(|v| v.as_str()) {
            parts.push(format!("**Rule:** {id}"));
        }
        if let Some(severity) = rule.get("severity").and_then(|v| v.as_str()) {
            parts.push(format!("**Severity:** {severity}"));
        }
        if let Some(desc) = rule.get("description").and_then(|v| v.as_str()) {
            parts.push(format!("**Description:** {desc}"));
        }
    }

    if let Some(instance) = alert.get("most_recent_instance") {
        if let Some(r) = instance.get("ref").and_then(|v| v.as_str()) {
            parts.push(format!("**Ref:** {r}"));
        }
        if let Some(location) = instance.get("location") {
            let path = location.get("path").and_then(|v| v.as_str()).unwrap_or("?");
            let line = location
                .get("start_line")
                .and_then(|v| v.as_i64())
                .unwrap_or(0);
            parts.push(format!("**Location:** {path}:{line}"));
        }
    }

    if let Some(url) = alert.get("html_url").and_then(|v| v.as_str()) {
        parts.push(format!("**URL:** {url}"));
    }

    parts.join("\n")
}

/// Format a list of code scanning alerts.
pub fn format_alert_list(alerts: &[Value]) -> String {
    if alerts.is_empty() {
        return "No code scanning alerts found.".to_string();
    }
    alerts
        .iter()
        .map(|a| {
            let number = a.get("number").and_then(|v| v.as_i64()).unwrap_or(0);
            let state = a.get("state").and_then(|v| v.as_str()).unwrap_or("unknown");
            let rule = a
                .get("rule")
                .and_then(|v| v.get("id"))
                .and_then(|v| v.as_str())
                .unwrap_or("?");
            let severity = a
                .get("rule")
                .and_then(|v| v.get("severity"))
                .and_then(|v| v.as_str())
                .unwrap_or("?");
            format!("- #{number} {rule} ({severity}, {state})")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the authenticated user.
pub fn format_user(user: &Value) -> String {
    let mut parts = Vec::new();

    let login = user
        .get("login")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    parts.push(format!("**Username:** {login}"));

    if let Some(name) = user.get("name").and_then(|v| v.as_str()) {
        if !name.is_empty() {
            parts.push(format!("**Name:** {name}"));
        }
    }

    if let Some(email) = user.get("email").and_then(|v| v.as_str()) {
        if !email.is_empty() {
            parts.push(format!("**Email:** {email}"));
        }
    }

    if let Some(company) = user.get("company").and_then(|v| v.as_str()) {
        if !company.is_empty() {
            parts.push(format!("**Company:** {company}"));
        }
    }

    if let Some(url) = user.get("html_url").and_then(|v| v.as_str()) {
        parts.push(format!("**Profile:** {url}"));
    }

    parts.join("\n")
}

/// Format a repository object.
pub fn format_repository(repo: &Value) -> String {
    let mut parts = Vec::new();

    let full_name = repo
        .get("full_name")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    parts.push(format!("## {full_name}"));

    if let Some(desc) = repo.get("description").and_then(|v| v.as_str()) {
        if !desc.is_empty() {
            parts.push(format!("**Description:** {desc}"));
        }
    }

    if let Some(branch) = repo.get("default_branch").and_then(|v| v.as_str()) {
        parts.push(format!("**Default branch:** {branch}"));
    }

    let private = repo
        .get("private")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    parts.push(format!(
        "**Visibility:** {}",
        if private { "private" } else { "public" }
    ));

    if let Some(url) = repo.get("html_url").and_then(|v| v.as_str()) {
        parts.push(format!("**URL:** {url}"));
    }

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn issue_list_formatting() {
        let issues = vec![json!({
            "number": 42,
            "title": "Crash on startup",
            "state": "open",
            "labels": [{"name": "bug"}, {"name": "p1"}],
        })];
        let text = format_issue_list(&issues);
        assert_eq!(text, "- #42 Crash on startup (open) [bug, p1]");
    }

    #[test]
    fn empty_lists_say_so() {
        assert_eq!(format_issue_list(&[]), "No issues found.");
        assert_eq!(format_pr_list(&[]), "No pull requests found.");
        assert_eq!(format_alert_list(&[]), "No code scanning alerts found.");
    }

    #[test]
    fn file_content_decodes_base64() {
        use base64::Engine;
        let file = json!({
            "name": "hello.txt",
            "path": "hello.txt",
            "type": "file",
            "size": 5,
            "sha": "abc",
            "content": base64::engine::general_purpose::STANDARD.encode("hello"),
        });
        let text = format_file_content(&file);
        assert!(text.contains("hello"));
        assert!(text.contains("**SHA:** abc"));
    }

    #[test]
    fn alert_summary_line() {
        let alerts = vec![json!({
            "number": 3,
            "state": "open",
            "rule": {"id": "js/sql-injection", "severity": "error"},
        })];
        assert_eq!(
            format_alert_list(&alerts),
            "- #3 js/sql-injection (error, open)"
        );
    }
}
