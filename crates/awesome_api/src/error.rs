use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be built. Programmer error, never retried.
    #[error("invalid quote request: {0}")]
    Config(String),

    #[error("Request timeout: the quote provider took too long to respond")]
    Timeout,

    #[error("quote provider unreachable: {0}")]
    Transport(String),

    /// Non-2xx answer, carries the status line.
    #[error("quote provider answered {0}")]
    Upstream(String),

    #[error("malformed quote payload: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            return FetchError::Timeout;
        }
        if err.is_builder() {
            return FetchError::Config(err.to_string());
        }
        FetchError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> FetchError {
        FetchError::Decode(err.to_string())
    }
}
