use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherbotError {
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Deployment info error: {0}")]
    Deployment(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for WeatherbotError {
    fn from(err: anyhow::Error) -> Self {
        WeatherbotError::Other(format!("{:#}", err))
    }
}

impl From<String> for WeatherbotError {
    fn from(msg: String) -> Self {
        WeatherbotError::Other(msg)
    }
}

impl From<&str> for WeatherbotError {
    fn from(msg: &str) -> Self {
        WeatherbotError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WeatherbotError>;
