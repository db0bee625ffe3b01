use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

/// A failed upstream lookup. Never turned into an HTTP error; the quote
/// service embeds it in the response as a soft error.
#[derive(Debug, Error)]
pub enum UpstreamFailure {
    // `quote` is public; the quote service checks the key before calling it
    #[error("api key not configured")]
    MissingKey,

    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Transport(reqwest::Error),

    #[error("{status} for {endpoint}")]
    Status {
        status: reqwest::StatusCode,
        endpoint: String,
    },
}

impl From<reqwest::Error> for UpstreamFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return UpstreamFailure::Timeout;
        }
        // the url carries the api key
        UpstreamFailure::Transport(e.without_url())
    }
}

#[derive(Clone)]
pub struct ItickClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl ItickClient {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn quotes_url(&self) -> String {
        format!("{}/v1/quotes", self.base_url)
    }

    /// One GET against the quotes endpoint. The JSON body is returned as-is.
    /// Without a key this fails without touching the network.
    pub async fn quote(&self, symbol: &str) -> Result<Value, UpstreamFailure> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(UpstreamFailure::MissingKey);
        };

        let res = self
            .http
            .get(self.quotes_url())
            .query(&[("symbol", symbol), ("apikey", key)])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(UpstreamFailure::Status {
                status,
                endpoint: "/v1/quotes".to_string(),
            });
        }

        Ok(res.json::<Value>().await?)
    }
}
