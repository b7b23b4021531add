//! Conversion from smallest on-chain units to human amounts.

use alloy::primitives::utils::format_units;
use alloy::primitives::U256;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Format a raw balance using the currency's decimal precision.
pub fn to_decimal_string(raw: U256, decimals: u8) -> BlockchainResult<String> {
    format_units(raw, decimals).map_err(|e| BlockchainError::Units(e.to_string()))
}

/// Convert a raw balance into a floating point amount for display math.
///
/// Lossy past 2^53 smallest units; keep the `U256` where exactness matters.
pub fn to_native_amount(raw: U256, decimals: u8) -> BlockchainResult<f64> {
    let formatted = to_decimal_string(raw, decimals)?;
    formatted
        .parse::<f64>()
        .map_err(|e| BlockchainError::Units(format!("{}: {}", formatted, e)))
}
