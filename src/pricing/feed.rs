//! Fiat rate sources.
//!
//! The HTTP source speaks the CoinGecko `simple/price` shape:
//! `GET {url}?ids=kaia&vs_currencies=usd` → `{ "kaia": { "usd": 0.2 } }`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::PriceConfig;
use crate::pricing::types::{CurrencyPair, PriceError, PriceQuote, PriceResult};
use crate::resilience::RetryPolicy;

/// Anything that can quote a fiat rate for the native currency.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Pair this source quotes.
    fn pair(&self) -> CurrencyPair;

    /// Fetch a fresh rate.
    async fn fetch(&self) -> PriceResult<PriceQuote>;
}

/// Extract `body[asset][vs]` as a usable rate.
pub fn parse_rate(body: &str, asset_id: &str, vs_currency: &str) -> PriceResult<f64> {
    let parsed: HashMap<String, HashMap<String, f64>> =
        serde_json::from_str(body).map_err(|e| PriceError::Malformed(e.to_string()))?;

    let rate = parsed
        .get(asset_id)
        .and_then(|rates| rates.get(vs_currency))
        .copied()
        .ok_or_else(|| PriceError::MissingRate {
            asset: asset_id.to_string(),
            vs: vs_currency.to_string(),
        })?;

    if !rate.is_finite() || rate <= 0.0 {
        return Err(PriceError::InvalidRate(rate));
    }
    Ok(rate)
}

/// Rate source backed by an HTTP price API.
#[derive(Debug, Clone)]
pub struct HttpPriceSource {
    client: reqwest::Client,
    url: String,
    asset_id: String,
    vs_currency: String,
    pair: CurrencyPair,
    retry: RetryPolicy,
    attempt_timeout_ms: u64,
}

impl HttpPriceSource {
    /// Build a source quoting `symbol` in the configured fiat currency.
    pub fn new(config: &PriceConfig, symbol: &str) -> PriceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.attempt_timeout_ms))
            .build()
            .map_err(|e| PriceError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            asset_id: config.asset_id.clone(),
            vs_currency: config.vs_currency.clone(),
            pair: CurrencyPair::new(symbol, &config.vs_currency),
            retry: RetryPolicy::from_price_config(config),
            attempt_timeout_ms: config.attempt_timeout_ms,
        })
    }

    async fn fetch_once(&self) -> PriceResult<f64> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("ids", &self.asset_id), ("vs_currencies", &self.vs_currency)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PriceError::Timeout(self.attempt_timeout_ms)
                } else {
                    PriceError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PriceError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PriceError::Network(e.to_string()))?;

        parse_rate(&body, &self.asset_id, &self.vs_currency)
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    fn pair(&self) -> CurrencyPair {
        self.pair.clone()
    }

    async fn fetch(&self) -> PriceResult<PriceQuote> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.fetch_once().await {
                Ok(rate) => {
                    tracing::debug!(pair = %self.pair, rate, attempt, "Price fetched");
                    return Ok(PriceQuote::from_feed(self.pair.clone(), rate));
                }
                Err(e) if e.is_retryable() && self.retry.should_retry(attempt) => {
                    let delay = self.retry.delay_after(attempt);
                    tracing::debug!(error = %e, attempt, delay = ?delay, "Retrying price fetch");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Source that always answers with the same rate.
#[derive(Debug, Clone)]
pub struct FixedPriceSource {
    pair: CurrencyPair,
    rate: f64,
}

impl FixedPriceSource {
    pub fn new(pair: CurrencyPair, rate: f64) -> Self {
        Self { pair, rate }
    }
}

#[async_trait]
impl PriceSource for FixedPriceSource {
    fn pair(&self) -> CurrencyPair {
        self.pair.clone()
    }

    async fn fetch(&self) -> PriceResult<PriceQuote> {
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Err(PriceError::InvalidRate(self.rate));
        }
        Ok(PriceQuote::from_feed(self.pair.clone(), self.rate))
    }
}
