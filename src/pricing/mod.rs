//! Fiat price lookup.

pub mod feed;
pub mod types;

pub use feed::{parse_rate, FixedPriceSource, HttpPriceSource, PriceSource};
pub use types::{CurrencyPair, PriceError, PriceQuote, PriceResult, QuoteSource};
