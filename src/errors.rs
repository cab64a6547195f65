use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx backend response, carrying the backend's `detail` message
    /// when it sent one, otherwise an HTTP-status-derived message.
    #[error("backend error: {0}")]
    Backend(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("habit name must not be empty")]
    EmptyName,

    #[error("not logged in")]
    NotAuthenticated,
}

pub type AppResult<T> = Result<T, AppError>;
