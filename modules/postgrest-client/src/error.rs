use thiserror::Error;

pub type Result<T> = std::result::Result<T, PostgrestError>;

#[derive(Debug, Error)]
pub enum PostgrestError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error on {table} (status {status}): {message}")]
    Api {
        table: String,
        status: u16,
        message: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for PostgrestError {
    fn from(err: reqwest::Error) -> Self {
        PostgrestError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for PostgrestError {
    fn from(err: serde_json::Error) -> Self {
        PostgrestError::Parse(err.to_string())
    }
}
