use log::{debug, warn};
use quote_model::Quote;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::error::FetchError;

/// Upper bound for one provider round trip, body included.
pub const FETCH_DEADLINE: Duration = Duration::from_millis(200);
const AWESOME_BASE_API_URL: &str = "https://economia.awesomeapi.com.br";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyPair {
    pub base: &'static str,
    pub quote: &'static str,
}

impl CurrencyPair {
    pub const USD_BRL: CurrencyPair = CurrencyPair {
        base: "USD",
        quote: "BRL",
    };

    /// Path segment used by the provider, e.g. `USD-BRL`.
    pub fn path(&self) -> String {
        format!("{}-{}", self.base, self.quote)
    }

    /// Key wrapping the quote in the provider payload, e.g. `USDBRL`.
    pub fn envelope_key(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

#[derive(Clone)]
pub struct AwesomeAPI {
    base_url: String,
    client: reqwest::Client,
}

impl AwesomeAPI {
    pub fn new() -> Result<Self, FetchError> {
        AwesomeAPI::with_base_url(AWESOME_BASE_API_URL, FETCH_DEADLINE)
    }

    pub fn with_base_url(base_url: &str, deadline: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(deadline)
            .build()
            .map_err(|e| FetchError::Config(e.to_string()))?;

        Ok(AwesomeAPI {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub async fn get_quote(&self, pair: CurrencyPair) -> Result<Quote, FetchError> {
        let url = format!("{}/json/last/{}", self.base_url, pair.path());

        debug!("get_quote | url: {}", url);

        let request = self
            .client
            .get(&url)
            .build()
            .map_err(|e| FetchError::Config(e.to_string()))?;

        let response = self.client.execute(request).await.map_err(|e| {
            warn!("get_quote | request failed | url: {} | {}", url, e);
            FetchError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("get_quote | upstream status {} | url: {}", status, url);
            return Err(FetchError::Upstream(status.to_string()));
        }

        let body = response.bytes().await?;
        decode_envelope(&body, pair)
    }
}

fn decode_envelope(body: &[u8], pair: CurrencyPair) -> Result<Quote, FetchError> {
    let key = pair.envelope_key();
    let mut envelope: Map<String, Value> = serde_json::from_slice(body)?;

    let inner = envelope
        .remove(&key)
        .ok_or_else(|| FetchError::Decode(format!("missing `{}` entry", key)))?;

    Ok(serde_json::from_value(inner)?)
}
