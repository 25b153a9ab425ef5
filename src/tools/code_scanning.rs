use rmcp::model::{CallToolResult, Content, JsonObject};

use crate::args;
use crate::client::HubClient;
use crate::error::Result;
use crate::response;

pub async fn list_code_scanning_alerts(
    client: &dyn HubClient,
    args: &JsonObject,
) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let git_ref = args::optional_string(args, "ref")?;
    let state = args::optional_string_with_default(args, "state", "open")?;
    let severity = args::optional_string(args, "severity")?;

    let mut query: Vec<(&'static str, String)> = vec![("state", state)];
    if !git_ref.is_empty() {
        query.push(("ref", git_ref));
    }
    if !severity.is_empty() {
        query.push(("severity", severity));
    }

    let query_refs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let alerts = client
        .get_json_with_query(
            &format!("/repos/{owner}/{repo}/code-scanning/alerts"),
            &query_refs,
        )
        .await?;
    let alerts = alerts.as_array().cloned().unwrap_or_default();

    Ok(CallToolResult::success(vec![Content::text(
        response::format_alert_list(&alerts),
    )]))
}

pub async fn get_code_scanning_alert(
    client: &dyn HubClient,
    args: &JsonObject,
) -> Result<CallToolResult> {
    let owner = args::required_string(args, "owner")?;
    let repo = args::required_string(args, "repo")?;
    let alert_number = args::required_int(args, "alert_number")?;

    let alert = client
        .get_json(&format!(
            "/repos/{owner}/{repo}/code-scanning/alerts/{alert_number}"
        ))
        .await?;

    Ok(CallToolResult::success(vec![Content::text(
        response::format_alert(&alert),
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockClient;
    use serde_json::{json, Value};

    fn args_of(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[tokio::test]
    async fn alert_list_defaults_to_open_state() {
        let client = MockClient::with_responses(vec![json!([])]);
        let a = args_of(json!({"owner": "o", "repo": "r"}));
        list_code_scanning_alerts(&client, &a).await.unwrap();

        let calls = client.calls();
        assert_eq!(calls[0].path, "/repos/o/r/code-scanning/alerts");
        assert_eq!(calls[0].query, vec![("state".to_string(), "open".to_string())]);
    }

    #[tokio::test]
    async fn alert_number_addresses_one_alert() {
        let client = MockClient::with_responses(vec![json!({
            "number": 42, "state": "open", "rule": {"id": "r", "severity": "warning"},
        })]);
        let a = args_of(json!({"owner": "o", "repo": "r", "alert_number": 42}));
        get_code_scanning_alert(&client, &a).await.unwrap();

        assert_eq!(client.calls()[0].path, "/repos/o/r/code-scanning/alerts/42");
    }
}
