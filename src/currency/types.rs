//! Supported currency codes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};
use utoipa::ToSchema;

use crate::error::ConversionError;

/// Currency supported by the fixed rate table.
///
/// Parsing is case-insensitive; the canonical form is the uppercase ISO code.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    EnumCount,
    IntoStaticStr,
    ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Currency {
    /// US dollar, the pivot currency.
    Usd,
    /// Euro.
    Eur,
    /// Pound sterling.
    Gbp,
    /// Japanese yen.
    Jpy,
    /// Canadian dollar.
    Cad,
    /// Australian dollar.
    Aud,
    /// Swiss franc.
    Chf,
    /// Chinese yuan.
    Cny,
}

impl Currency {
    /// The pivot every conversion passes through.
    pub const PIVOT: Currency = Currency::Usd;

    /// Canonical uppercase code.
    pub fn code(&self) -> &'static str {
        self.into()
    }

    /// Position of this currency in rate-table storage.
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Resolve a caller-supplied code, reporting the original text on failure.
    pub fn parse_code(code: &str) -> Result<Self, ConversionError> {
        Currency::from_str(code).map_err(|_| ConversionError::UnsupportedCurrency {
            code: code.to_string(),
        })
    }
}
