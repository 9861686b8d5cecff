use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Zenodo access token required (set ZENODO_ACCESS_TOKEN or pass it as the second argument)")]
    MissingCredential,

    #[error("HTTP {status} from {url}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },

    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Source file not found: {path}")]
    MissingSource { path: String },

    #[error("Unexpected response from Zenodo: {message}")]
    UnexpectedResponse { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Credentials,
    Remote,
    Configuration,
    Source,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    High,
    Critical,
}

impl SyncError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::MissingCredential => ErrorCategory::Credentials,
            SyncError::Http { .. }
            | SyncError::Transport(_)
            | SyncError::UnexpectedResponse { .. } => ErrorCategory::Remote,
            SyncError::Toml(_)
            | SyncError::ConfigError { .. }
            | SyncError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            SyncError::MissingSource { .. } | SyncError::Io(_) => ErrorCategory::Source,
            SyncError::Serialization(_) => ErrorCategory::Internal,
        }
    }

    /// Nothing here is retried, so every error ends the run; `Critical` marks
    /// the ones raised before any remote call was attempted.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Credentials | ErrorCategory::Configuration | ErrorCategory::Source => {
                ErrorSeverity::Critical
            }
            ErrorCategory::Remote | ErrorCategory::Internal => ErrorSeverity::High,
        }
    }

    pub fn exit_code(&self) -> i32 {
        1
    }

    /// HTTP status of a rejected request, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SyncError::Http { status, .. } => Some(*status),
            SyncError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Response body of a rejected request, surfaced verbatim to the operator.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            SyncError::Http { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SyncError::MissingCredential => {
                "Create a token at https://zenodo.org/account/settings/applications/ and export ZENODO_ACCESS_TOKEN"
                    .to_string()
            }
            SyncError::Http { status: 403, .. } => {
                "Check that the token is valid, that you own this record, and that a published record gets a new version first"
                    .to_string()
            }
            SyncError::Http { status: 404, .. } => "Record not found. Check the record ID".to_string(),
            SyncError::Http { .. } | SyncError::UnexpectedResponse { .. } => {
                "Inspect the response body above; the request was not retried".to_string()
            }
            SyncError::Transport(_) => "Check network connectivity and the API base URL".to_string(),
            SyncError::MissingSource { .. } => {
                "Point --source-root at the replication repository checkout".to_string()
            }
            SyncError::Toml(_)
            | SyncError::ConfigError { .. }
            | SyncError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line arguments".to_string()
            }
            SyncError::Io(_) => "Check file permissions and paths".to_string(),
            SyncError::Serialization(_) => "The record JSON could not be processed".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SyncError::Http { status, url, .. } => {
                format!("HTTP Error: {} while calling {}", status, url)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> SyncError {
        SyncError::Http {
            status,
            url: "https://zenodo.org/api/records/1".to_string(),
            body: "{\"message\": \"denied\"}".to_string(),
        }
    }

    #[test]
    fn test_every_error_exits_with_one() {
        assert_eq!(SyncError::MissingCredential.exit_code(), 1);
        assert_eq!(http(500).exit_code(), 1);
    }

    #[test]
    fn test_http_error_keeps_body_and_status() {
        let err = http(403);
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.response_body(), Some("{\"message\": \"denied\"}"));
        assert!(err.recovery_suggestion().contains("token"));
        assert!(http(404).recovery_suggestion().contains("record ID"));
    }

    #[test]
    fn test_credential_errors_are_critical() {
        assert_eq!(SyncError::MissingCredential.severity(), ErrorSeverity::Critical);
        assert_eq!(http(500).severity(), ErrorSeverity::High);
        assert_eq!(
            SyncError::MissingSource { path: "x.tex".into() }.category(),
            ErrorCategory::Source
        );
    }
}
