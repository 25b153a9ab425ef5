use crate::error::{GhxError, Result};

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the GitHub instance (`https://github.com` or an
    /// Enterprise host)
    pub host: String,
    /// Personal access token for authentication
    pub token: String,
    /// When set, only non-mutating tools are registered
    pub read_only: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// - `GITHUB_PERSONAL_ACCESS_TOKEN` (or `GITHUB_TOKEN`) is required.
    /// - `GITHUB_HOST` selects an Enterprise instance; defaults to
    ///   `https://github.com`.
    /// - `GITHUB_READ_ONLY` (`1`/`true`/`yes`) restricts the tool set.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore missing .env

        let token = std::env::var("GITHUB_PERSONAL_ACCESS_TOKEN")
            .or_else(|_| std::env::var("GITHUB_TOKEN"))
            .map_err(|_| {
                GhxError::MissingParam(
                    "GITHUB_PERSONAL_ACCESS_TOKEN (or GITHUB_TOKEN) is not set".to_string(),
                )
            })?;

        let host = match std::env::var("GITHUB_HOST") {
            Ok(raw) => normalize_host(&raw)?,
            Err(_) => "https://github.com".to_string(),
        };

        let read_only = flag_enabled(std::env::var("GITHUB_READ_ONLY").ok());

        Ok(Config {
            host,
            token,
            read_only,
        })
    }
}

/// Validate and normalize a host URL: must parse as http(s), trailing
/// slashes are stripped.
fn normalize_host(raw: &str) -> Result<String> {
    let trimmed = raw.trim_end_matches('/');
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| GhxError::MissingParam(format!("GITHUB_HOST is not a valid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(GhxError::MissingParam(format!(
            "GITHUB_HOST must be http(s), got scheme '{other}'"
        ))),
    }
}

/// Interpret a boolean env flag. Absent or anything unrecognized is false.
fn flag_enabled(value: Option<String>) -> bool {
    match value {
        Some(v) => matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_parsing() {
        assert!(flag_enabled(Some("1".to_string())));
        assert!(flag_enabled(Some("true".to_string())));
        assert!(flag_enabled(Some("TRUE".to_string())));
        assert!(flag_enabled(Some("yes".to_string())));
        assert!(!flag_enabled(Some("0".to_string())));
        assert!(!flag_enabled(Some("no".to_string())));
        assert!(!flag_enabled(Some("".to_string())));
        assert!(!flag_enabled(None));
    }

    #[test]
    fn host_normalization() {
        assert_eq!(
            normalize_host("https://github.example.com/").unwrap(),
            "https://github.example.com"
        );
        assert_eq!(
            normalize_host("https://github.com").unwrap(),
            "https://github.com"
        );
        assert!(normalize_host("ftp://github.com").is_err());
        assert!(normalize_host("not a url").is_err());
    }
}
