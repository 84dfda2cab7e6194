//! Fixed currency-to-USD rate table and pivot conversion.

use once_cell::sync::Lazy;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use strum::{EnumCount, IntoEnumIterator};

use super::types::Currency;
use crate::error::{AmountError, ConversionError, RateTableError};

/// Decimal places kept on converted amounts.
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Decimal places kept on the displayed exchange rate.
pub const RATE_DECIMAL_PLACES: u32 = 4;

/// Ties round to the even neighbour.
///
/// Rounding acts on the exact decimal quotient, so a result that sits on a
/// midpoint in decimal rounds to even here even where a binary float would
/// have landed just above it. `0.10 USD` is `0.08 EUR`, not `0.09`.
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointNearestEven;

/// Units of each currency per one USD.
const FIXED_RATES: [(Currency, Decimal); Currency::COUNT] = [
    (Currency::Usd, dec!(1.00)),
    (Currency::Eur, dec!(0.85)),
    (Currency::Gbp, dec!(0.73)),
    (Currency::Jpy, dec!(110.00)),
    (Currency::Cad, dec!(1.25)),
    (Currency::Aud, dec!(1.35)),
    (Currency::Chf, dec!(0.92)),
    (Currency::Cny, dec!(6.45)),
];

static FIXED_TABLE: Lazy<Result<RateTable, RateTableError>> =
    Lazy::new(|| RateTable::new(FIXED_RATES));

/// Immutable mapping from currency to units per USD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    rates: [Decimal; Currency::COUNT],
}

impl RateTable {
    /// Build a table, checking that every supported currency has exactly one
    /// strictly positive rate and that USD maps to one.
    pub fn new(
        entries: impl IntoIterator<Item = (Currency, Decimal)>,
    ) -> Result<Self, RateTableError> {
        let mut slots: [Option<Decimal>; Currency::COUNT] = [None; Currency::COUNT];

        for (currency, rate) in entries {
            if rate <= Decimal::ZERO {
                return Err(RateTableError::NonPositiveRate { currency, rate });
            }
            let slot = &mut slots[currency.index()];
            if slot.is_some() {
                return Err(RateTableError::DuplicateRate(currency));
            }
            *slot = Some(rate);
        }

        let mut rates = [Decimal::ZERO; Currency::COUNT];
        for currency in Currency::iter() {
            rates[currency.index()] =
                slots[currency.index()].ok_or(RateTableError::MissingRate(currency))?;
        }

        let pivot = rates[Currency::PIVOT.index()];
        if pivot != Decimal::ONE {
            return Err(RateTableError::PivotNotOne(pivot));
        }

        Ok(Self { rates })
    }

    /// The process-wide fixed table, validated on first use.
    pub fn fixed() -> Result<&'static RateTable, RateTableError> {
        FIXED_TABLE.as_ref().map_err(Clone::clone)
    }

    /// Units of `currency` per one USD.
    pub fn rate(&self, currency: Currency) -> Decimal {
        self.rates[currency.index()]
    }

    /// Iterate `(currency, rate)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, Decimal)> + '_ {
        Currency::iter().map(move |c| (c, self.rate(c)))
    }

    /// Convert `amount` from one currency to another through the USD pivot.
    ///
    /// Same-currency conversions return `amount` untouched, without rounding.
    /// Every other path rounds the result to two decimal places.
    pub fn convert(
        &self,
        amount: Decimal,
        from: Currency,
        to: Currency,
    ) -> Result<Decimal, ConversionError> {
        if amount < Decimal::ZERO {
            return Err(AmountError::Negative.into());
        }

        if from == to {
            return Ok(amount);
        }

        let usd = amount
            .checked_div(self.rate(from))
            .ok_or(AmountError::OutOfRange)?;
        let converted = usd
            .checked_mul(self.rate(to))
            .ok_or(AmountError::OutOfRange)?;

        Ok(converted.round_dp_with_strategy(AMOUNT_DECIMAL_PLACES, ROUNDING))
    }

    /// Effective rate `rate(to) / rate(from)`, rounded to four decimal places.
    pub fn exchange_rate(&self, from: Currency, to: Currency) -> Decimal {
        // Rates are positive and bounded by the table, so division cannot fail.
        (self.rate(to) / self.rate(from)).round_dp_with_strategy(RATE_DECIMAL_PLACES, ROUNDING)
    }
}
