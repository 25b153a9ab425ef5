use rmcp::model::{CallToolResult, Content};

use crate::client::HubClient;
use crate::error::Result;
use crate::response;

pub async fn get_me(client: &dyn HubClient) -> Result<CallToolResult> {
    let user = client.get_json("/user").await?;

    Ok(CallToolResult::success(vec![Content::text(
        response::format_user(&user),
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockClient;
    use serde_json::json;

    #[tokio::test]
    async fn identity_comes_from_the_user_endpoint() {
        let client = MockClient::with_responses(vec![json!({
            "login": "octocat", "name": "The Octocat",
        })]);
        get_me(&client).await.unwrap();
        assert_eq!(client.calls()[0].path, "/user");
    }
}
