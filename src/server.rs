use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ErrorData, Implementation, JsonObject,
    ListResourceTemplatesResult, ListResourcesResult, ListToolsResult, PaginatedRequestParams,
    ProtocolVersion, ReadResourceRequestParams, ReadResourceResult, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};

use crate::client::{GitHubClient, HubClient};
use crate::config::Config;
use crate::error::{GhxError, Result};
use crate::registry::ToolRegistry;
use crate::resources;
use crate::tools;

/// The ghx-mcp server. Holds the API client and the tool registry
/// assembled at startup.
#[derive(Debug, Clone)]
pub struct GhxMcp {
    client: Arc<dyn HubClient>,
    registry: Arc<ToolRegistry>,
}

/// Convert a handler outcome per the error policy: upstream API failures
/// become error-flagged results carrying the diagnostic, validation and
/// transport failures become protocol errors.
fn into_tool_response(result: Result<CallToolResult>) -> std::result::Result<CallToolResult, ErrorData> {
    match result {
        Ok(r) => Ok(r),
        Err(e) if e.is_upstream() => {
            tracing::warn!(error = %e, "GitHub API reported a failure");
            Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
        }
        Err(e) => Err(ErrorData::from(e)),
    }
}

impl GhxMcp {
    pub fn new(config: Config) -> Result<Self> {
        let client = GitHubClient::new(&config)?;
        Ok(Self::with_client(Arc::new(client), config.read_only))
    }

    /// Assemble a server around any client implementation. The registry is
    /// built exactly once; a different mode needs a fresh instance.
    pub fn with_client(client: Arc<dyn HubClient>, read_only: bool) -> Self {
        let registry = ToolRegistry::assemble(read_only);
        tracing::info!(
            tools = registry.len(),
            read_only,
            "tool registry assembled"
        );
        Self {
            client,
            registry: Arc::new(registry),
        }
    }

    async fn dispatch(&self, name: &str, args: &JsonObject) -> Result<CallToolResult> {
        let client = self.client.as_ref();
        match name {
            // Identity
            "get_me" => tools::users::get_me(client).await,
            // Issues
            "get_issue" => tools::issues::get_issue(client, args).await,
            "list_issues" => tools::issues::list_issues(client, args).await,
            "get_issue_comments" => tools::issues::get_issue_comments(client, args).await,
            "search_issues" => tools::issues::search_issues(client, args).await,
            "create_issue" => tools::issues::create_issue(client, args).await,
            "update_issue" => tools::issues::update_issue(client, args).await,
            "add_issue_comment" => tools::issues::add_issue_comment(client, args).await,
            // Pull requests
            "get_pull_request" => tools::pulls::get_pull_request(client, args).await,
            "list_pull_requests" => tools::pulls::list_pull_requests(client, args).await,
            "get_pull_request_files" => tools::pulls::get_pull_request_files(client, args).await,
            "get_pull_request_comments" => {
                tools::pulls::get_pull_request_comments(client, args).await
            }
            "get_pull_request_reviews" => {
                tools::pulls::get_pull_request_reviews(client, args).await
            }
            "get_pull_request_status" => tools::pulls::get_pull_request_status(client, args).await,
            "create_pull_request" => tools::pulls::create_pull_request(client, args).await,
            "merge_pull_request" => tools::pulls::merge_pull_request(client, args).await,
            "update_pull_request_branch" => {
                tools::pulls::update_pull_request_branch(client, args).await
            }
            // Repository content
            "get_file_contents" => tools::repos::get_file_contents(client, args).await,
            "list_commits" => tools::repos::list_commits(client, args).await,
            "create_or_update_file" => tools::repos::create_or_update_file(client, args).await,
            "push_files" => tools::repos::push_files(client, args).await,
            "create_repository" => tools::repos::create_repository(client, args).await,
            "create_branch" => tools::repos::create_branch(client, args).await,
            "fork_repository" => tools::repos::fork_repository(client, args).await,
            // Search
            "search_repositories" => tools::search::search_repositories(client, args).await,
            "search_code" => tools::search::search_code(client, args).await,
            "search_users" => tools::search::search_users(client, args).await,
            // Code scanning
            "list_code_scanning_alerts" => {
                tools::code_scanning::list_code_scanning_alerts(client, args).await
            }
            "get_code_scanning_alert" => {
                tools::code_scanning::get_code_scanning_alert(client, args).await
            }
            other => Err(GhxError::UnknownTool(other.to_string())),
        }
    }
}

impl ServerHandler for GhxMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "ghx-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "GitHub MCP server covering issues, pull requests, repository content, \
                 search, and code scanning alerts. Repository content is also exposed as \
                 repo:// resources addressable by branch, tag, commit SHA, or pull request \
                 head. Write tools are absent when the server runs in read-only mode."
                    .to_string(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<ListToolsResult, ErrorData>> + Send + '_
    {
        std::future::ready(Ok(ListToolsResult {
            tools: self.registry.tools(),
            next_cursor: None,
            meta: None,
        }))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<CallToolResult, ErrorData>> + Send + '_
    {
        Box::pin(async move {
            // The registry is the gate: tools excluded at assembly time do
            // not exist, whatever the dispatch table knows about.
            if !self.registry.contains(&request.name) {
                return Err(ErrorData::from(GhxError::UnknownTool(
                    request.name.to_string(),
                )));
            }
            let args = request.arguments.unwrap_or_default();
            into_tool_response(self.dispatch(&request.name, &args).await)
        })
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<ListResourcesResult, ErrorData>> + Send + '_
    {
        // Only templated resources are exposed; there is nothing to
        // enumerate without owner/repo bindings.
        std::future::ready(Ok(ListResourcesResult {
            resources: Vec::new(),
            next_cursor: None,
            meta: None,
        }))
    }

    fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<
        Output = std::result::Result<ListResourceTemplatesResult, ErrorData>,
    > + Send
           + '_ {
        std::future::ready(Ok(ListResourceTemplatesResult {
            resource_templates: resources::resource_templates(),
            next_cursor: None,
            meta: None,
        }))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<ReadResourceResult, ErrorData>> + Send + '_
    {
        Box::pin(async move {
            let content_req = resources::match_uri(&request.uri)?;
            resources::fetch_content(self.client.as_ref(), &request.uri, &content_req)
                .await
                .map_err(ErrorData::from)
        })
    }
}
