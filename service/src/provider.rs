//! Upstream quote providers.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use cambio_common::{Budget, Quote, QuoteError, Result};

/// Trait for upstream quote providers.
///
/// A provider performs at most one outbound call per invocation, entirely
/// under the caller's budget. No retries, no side effects beyond the call.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Fetch the latest USD-BRL quote under the given budget.
    async fn latest(&self, budget: &Budget) -> Result<Quote>;
}

/// Upstream envelope: `{"USDBRL": {"bid": "<string>", ...}}`.
#[derive(Debug, Deserialize)]
struct UsdBrlEnvelope {
    #[serde(rename = "USDBRL")]
    usd_brl: UsdBrlQuote,
}

#[derive(Debug, Deserialize)]
struct UsdBrlQuote {
    bid: String,
}

/// Extract the bid string from an upstream response body.
///
/// Pure: the same body always yields the same bid. The upstream is
/// untrusted, so any shape mismatch is a [`QuoteError::Decode`], never a
/// panic.
pub fn decode_bid(body: &[u8]) -> Result<String> {
    let envelope: UsdBrlEnvelope = serde_json::from_slice(body)
        .map_err(|e| QuoteError::Decode(format!("unexpected upstream body: {}", e)))?;
    Ok(envelope.usd_brl.bid)
}

/// Provider backed by the AwesomeAPI economia endpoint.
#[derive(Debug)]
pub struct AwesomeApiProvider {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl AwesomeApiProvider {
    /// Create a provider for the given endpoint, reusing the process-wide
    /// HTTP client.
    pub fn new(client: reqwest::Client, url: &str) -> Result<Self> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| QuoteError::RequestConstruction(format!("upstream url {:?}: {}", url, e)))?;
        Ok(Self { client, url })
    }

    fn classify(err: reqwest::Error) -> QuoteError {
        if err.is_builder() {
            QuoteError::RequestConstruction(err.to_string())
        } else {
            QuoteError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl QuoteProvider for AwesomeApiProvider {
    fn name(&self) -> &str {
        "awesomeapi"
    }

    async fn latest(&self, budget: &Budget) -> Result<Quote> {
        let body = budget
            .enforce("upstream fetch", async {
                let response = self
                    .client
                    .get(self.url.clone())
                    .send()
                    .await
                    .map_err(Self::classify)?;

                let status = response.status();
                if !status.is_success() {
                    return Err(QuoteError::Transport(format!(
                        "upstream returned {}",
                        status
                    )));
                }

                response.bytes().await.map_err(Self::classify)
            })
            .await?;

        let bid = decode_bid(&body)?;
        debug!(provider = self.name(), bid = %bid, "Got quote from upstream");
        Quote::new(bid)
    }
}

/// Mock quote provider for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockQuoteProvider {
    bid: Option<String>,
    delay: Option<std::time::Duration>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockQuoteProvider {
    /// Provider that always yields the given bid.
    pub fn returning(bid: impl Into<String>) -> Self {
        Self {
            bid: Some(bid.into()),
            delay: None,
        }
    }

    /// Provider that always fails with a transport error.
    pub fn failing() -> Self {
        Self {
            bid: None,
            delay: None,
        }
    }

    /// Add an artificial delay before answering.
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl QuoteProvider for MockQuoteProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn latest(&self, budget: &Budget) -> Result<Quote> {
        budget
            .enforce("upstream fetch", async {
                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }
                match &self.bid {
                    Some(bid) => Quote::new(bid.clone()),
                    None => Err(QuoteError::Transport("mock provider down".to_string())),
                }
            })
            .await
    }
}
