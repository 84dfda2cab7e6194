//! Fixed-rate currency conversion through a USD pivot.

pub mod converter;
pub mod rates;
pub mod types;


pub use converter::{convert, exchange_rate, ConversionRequest, ConversionResult};
pub use rates::{RateTable, AMOUNT_DECIMAL_PLACES, RATE_DECIMAL_PLACES};
pub use types::Currency;
