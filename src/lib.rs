//! Engine service: health checks and fixed-rate currency conversion.
//!
//! Conversions pivot through USD using a fixed table of units per dollar:
//!
//! ```text
//! 100 EUR / 0.85 (EUR per USD) = 117.647... USD
//! 117.647... USD * 1.00        = 117.65 USD  (rounded to 2 places)
//! ```
//!
//! Converting a currency to itself returns the amount untouched.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`currency`]: Currency codes, rate table, and conversion
//! - [`api`]: HTTP API for health, conversion, docs, and metrics
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod currency;
pub mod error;
pub mod metrics;
pub mod utils;

pub use config::Config;
pub use currency::{convert, exchange_rate, Currency, RateTable};
pub use error::{AmountError, ConversionError, RateTableError, ServiceError};
