use thiserror::Error;

pub type Result<T> = std::result::Result<T, GithubError>;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The blob sha sent with an update no longer matches the branch head.
    #[error("Conflict updating {path}: {message}")]
    Conflict { path: String, message: String },

    #[error("Invalid repository '{0}', expected owner/repo")]
    InvalidRepo(String),
}

impl From<reqwest::Error> for GithubError {
    fn from(err: reqwest::Error) -> Self {
        GithubError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for GithubError {
    fn from(err: serde_json::Error) -> Self {
        GithubError::Parse(err.to_string())
    }
}

impl From<base64::DecodeError> for GithubError {
    fn from(err: base64::DecodeError) -> Self {
        GithubError::Parse(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for GithubError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        GithubError::Parse(err.to_string())
    }
}
