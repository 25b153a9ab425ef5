use rmcp::model::{ErrorCode, ErrorData};

/// All error types produced by the ghx-mcp server.
#[derive(Debug, thiserror::Error)]
pub enum GhxError {
    #[error("Missing required parameter: {0}")]
    MissingParam(String),

    #[error("Parameter '{name}' is not of type {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },

    #[error("Resource URI matches no known template: {0}")]
    NoTemplateMatch(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Authentication failed, check GITHUB_PERSONAL_ACCESS_TOKEN")]
    Auth,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("GitHub API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl GhxError {
    /// Domain-level failure reported by the GitHub API itself, as opposed to
    /// a malformed request or a transport failure. These become error-flagged
    /// tool results carrying the API diagnostic, never protocol errors.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            GhxError::Status { .. } | GhxError::NotFound(_) | GhxError::Auth
        )
    }

    /// Request-validation failure. Raised before any upstream call is made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GhxError::MissingParam(_)
                | GhxError::TypeMismatch { .. }
                | GhxError::NoTemplateMatch(_)
                | GhxError::UnknownTool(_)
        )
    }
}

impl From<GhxError> for ErrorData {
    fn from(err: GhxError) -> Self {
        let code = if err.is_validation() {
            ErrorCode::INVALID_PARAMS
        } else {
            ErrorCode::INTERNAL_ERROR
        };
        ErrorData::new(code, err.to_string(), None)
    }
}

pub type Result<T> = std::result::Result<T, GhxError>;
