//! Unified error types for the engine service.

use thiserror::Error;

use crate::currency::Currency;

/// Unified error type for the engine service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Currency conversion error.
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Rate table construction error.
    #[error("rate table error: {0}")]
    RateTable(#[from] RateTableError),

    /// Metrics recorder could not be installed.
    #[error("metrics error: {0}")]
    Metrics(String),
}

/// Errors raised while converting an amount between currencies.
///
/// The display strings are returned verbatim to HTTP clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// Amount was below zero, or too large to carry through the pivot.
    #[error("{0}")]
    InvalidAmount(AmountError),

    /// Currency code is not part of the supported set.
    #[error("Invalid currency code: {code}")]
    UnsupportedCurrency {
        /// The offending code as supplied by the caller.
        code: String,
    },
}

impl ConversionError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionError::InvalidAmount(_) => "invalid_amount",
            ConversionError::UnsupportedCurrency { .. } => "unsupported_currency",
        }
    }
}

/// Why an amount was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    /// Below zero.
    #[error("Amount cannot be negative")]
    Negative,

    /// Outside the range of the decimal representation, on input or after
    /// the pivot multiplication.
    #[error("Amount is out of range")]
    OutOfRange,
}

impl From<AmountError> for ConversionError {
    fn from(err: AmountError) -> Self {
        ConversionError::InvalidAmount(err)
    }
}

/// Rate table invariant violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateTableError {
    /// A supported currency has no rate.
    #[error("missing rate for {0}")]
    MissingRate(Currency),

    /// A currency was given more than one rate.
    #[error("duplicate rate for {0}")]
    DuplicateRate(Currency),

    /// Rates must be strictly positive.
    #[error("rate for {currency} must be positive, got {rate}")]
    NonPositiveRate {
        /// Currency with the bad rate.
        currency: Currency,
        /// The rejected rate.
        rate: rust_decimal::Decimal,
    },

    /// The pivot currency must map to exactly one.
    #[error("pivot rate for USD must be 1, got {0}")]
    PivotNotOne(rust_decimal::Decimal),
}
