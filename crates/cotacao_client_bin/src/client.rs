use log::debug;
use quote_model::Quote;
use std::time::Duration;
use thiserror::Error;

pub const CLIENT_DEADLINE: Duration = Duration::from_millis(300);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid request: {0}")]
    Config(String),

    #[error("Request timeout: the server took too long to respond!")]
    Timeout,

    #[error("Reqwest error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status; `body` is kept raw.
    #[error("received status {status}")]
    Status { status: String, body: String },

    #[error("malformed quote: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            return ClientError::Timeout;
        }
        if err.is_builder() {
            return ClientError::Config(err.to_string());
        }
        ClientError::Transport(err.to_string())
    }
}

pub struct QuoteClient {
    url: String,
    client: reqwest::blocking::Client,
}

impl QuoteClient {
    /// `deadline` bounds the whole exchange, from connect to the last body byte.
    pub fn new(url: &str, deadline: Duration) -> Result<Self, ClientError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(deadline)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(QuoteClient {
            url: url.to_string(),
            client,
        })
    }

    pub fn request_quote(&self) -> Result<Quote, ClientError> {
        debug!("request_quote | url: {}", self.url);

        let request = self
            .client
            .get(&self.url)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        let response = self.client.execute(request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Status {
                status: status.to_string(),
                body,
            });
        }

        let body = response.bytes()?;
        Ok(serde_json::from_slice(&body)?)
    }
}
