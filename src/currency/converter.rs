//! Code-level conversion entry points over a rate table.

use rust_decimal::Decimal;

use super::rates::RateTable;
use super::types::Currency;
use crate::error::{AmountError, ConversionError};

/// Convert `amount` between two currency codes using `table`.
///
/// Codes are matched case-insensitively. A negative amount is rejected before
/// the codes are looked up.
pub fn convert(
    table: &RateTable,
    amount: Decimal,
    from_code: &str,
    to_code: &str,
) -> Result<Decimal, ConversionError> {
    if amount < Decimal::ZERO {
        return Err(AmountError::Negative.into());
    }
    let from = Currency::parse_code(from_code)?;
    let to = Currency::parse_code(to_code)?;
    table.convert(amount, from, to)
}

/// Displayed exchange rate between two currency codes, four decimal places.
pub fn exchange_rate(
    table: &RateTable,
    from_code: &str,
    to_code: &str,
) -> Result<Decimal, ConversionError> {
    let from = Currency::parse_code(from_code)?;
    let to = Currency::parse_code(to_code)?;
    Ok(table.exchange_rate(from, to))
}

/// A single conversion as received from a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    /// Amount in the source currency.
    pub amount: Decimal,
    /// Source currency code, any case.
    pub from_code: String,
    /// Target currency code, any case.
    pub to_code: String,
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionResult {
    /// Converted amount, two decimal places unless no conversion happened.
    pub converted_amount: Decimal,
    /// Canonical source currency.
    pub from: Currency,
    /// Canonical target currency.
    pub to: Currency,
    /// `rate(to) / rate(from)`, four decimal places.
    pub exchange_rate: Decimal,
}

impl ConversionRequest {
    /// Create a new request.
    pub fn new(amount: Decimal, from_code: impl Into<String>, to_code: impl Into<String>) -> Self {
        Self {
            amount,
            from_code: from_code.into(),
            to_code: to_code.into(),
        }
    }

    /// Resolve both codes, then convert against `table`.
    ///
    /// Codes are resolved before the amount is checked, so a request that is
    /// wrong in both ways reports the currency first.
    pub fn execute(&self, table: &RateTable) -> Result<ConversionResult, ConversionError> {
        let from = Currency::parse_code(&self.from_code)?;
        let to = Currency::parse_code(&self.to_code)?;
        let converted_amount = table.convert(self.amount, from, to)?;

        Ok(ConversionResult {
            converted_amount,
            from,
            to,
            exchange_rate: table.exchange_rate(from, to),
        })
    }
}
