//! Price feed types.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// A base/quote currency pair, e.g. KAIA/USD.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: String,
    pub quote: String,
}

impl CurrencyPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into().to_uppercase(),
            quote: quote.into().to_uppercase(),
        }
    }
}

impl std::fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Where a quote's rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    /// Returned by the external feed.
    Feed,
    /// Configured default used because the feed was unavailable.
    Fallback,
}

/// A single-use exchange rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub currency_pair: CurrencyPair,
    /// Quote currency per one unit of base currency.
    pub rate: f64,
    /// Unix timestamp (seconds) the rate was obtained.
    pub fetched_at: u64,
    pub source: QuoteSource,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

impl PriceQuote {
    /// A rate freshly returned by a feed.
    pub fn from_feed(currency_pair: CurrencyPair, rate: f64) -> Self {
        Self {
            currency_pair,
            rate,
            fetched_at: now_secs(),
            source: QuoteSource::Feed,
        }
    }

    /// The configured default rate.
    pub fn fallback(currency_pair: CurrencyPair, rate: f64) -> Self {
        Self {
            currency_pair,
            rate,
            fetched_at: now_secs(),
            source: QuoteSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == QuoteSource::Fallback
    }
}

/// Reasons a rate could not be obtained.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PriceError {
    /// Non-success HTTP status.
    #[error("Price feed returned status {0}")]
    Status(u16),

    /// Request could not be sent or the body not read.
    #[error("Price feed request failed: {0}")]
    Network(String),

    /// No answer within the budget.
    #[error("Price feed timed out after {0} ms")]
    Timeout(u64),

    /// Body is not the expected JSON shape.
    #[error("Malformed price feed response: {0}")]
    Malformed(String),

    /// The feed answered without a rate for our pair.
    #[error("Price feed has no {vs} rate for {asset}")]
    MissingRate { asset: String, vs: String },

    /// Zero, negative or non-finite rate.
    #[error("Price feed returned unusable rate {0}")]
    InvalidRate(f64),
}

impl PriceError {
    /// Label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::Malformed(_) => "malformed",
            Self::MissingRate { .. } => "missing_rate",
            Self::InvalidRate(_) => "invalid_rate",
        }
    }

    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status(code) => *code >= 500 || *code == 429,
            Self::Network(_) | Self::Timeout(_) => true,
            _ => false,
        }
    }
}

/// Result type for price lookups.
pub type PriceResult<T> = Result<T, PriceError>;
