//! Money
//!
//! An immutable, non-negative amount tagged with one of the storefront currencies.
//! Amounts are exact decimals; rounding to cents only happens on request.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::iso;
use serde::{Deserialize, Serialize, Serializer, ser::SerializeStruct};

use crate::errors::ValidationError;

/// Currencies accepted by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,

    /// Euro
    Eur,

    /// Russian Rouble
    Rub,
}

impl Currency {
    /// ISO 4217 definition backing this currency.
    pub fn iso(self) -> &'static iso::Currency {
        match self {
            Currency::Usd => iso::USD,
            Currency::Eur => iso::EUR,
            Currency::Rub => iso::RUB,
        }
    }

    /// Three letter ISO code, e.g. `USD`.
    pub fn code(self) -> &'static str {
        self.iso().iso_alpha_code
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code.trim() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "RUB" => Ok(Currency::Rub),
            other => Err(ValidationError::UnknownCurrency(other.to_string())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A non-negative amount of money in a single currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Money {
    inner: rusty_money::Money<'static, iso::Currency>,
    currency: Currency,
}

impl Money {
    /// Create money from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NegativeAmount`] if `amount` is below zero.
    pub fn create(amount: Decimal, currency: Currency) -> Result<Self, ValidationError> {
        if amount < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount(amount));
        }

        Ok(Self::from_valid(amount, currency))
    }

    /// Create money from a whole number of cents.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NegativeAmount`] if `cents` is below zero.
    pub fn from_cents(cents: i64, currency: Currency) -> Result<Self, ValidationError> {
        Self::create(Decimal::new(cents, 2), currency)
    }

    /// Zero in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::from_valid(Decimal::ZERO, currency)
    }

    fn from_valid(amount: Decimal, currency: Currency) -> Self {
        Self {
            inner: rusty_money::Money::from_decimal(amount, currency.iso()),
            currency,
        }
    }

    /// Exact decimal amount.
    pub fn amount(&self) -> Decimal {
        *self.inner.amount()
    }

    /// Currency of the amount.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount().is_zero()
    }

    /// Add two amounts of the same currency.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CurrencyMismatch`] if the currencies differ.
    pub fn add(self, other: Money) -> Result<Self, ValidationError> {
        self.ensure_same_currency(&other)?;

        let inner = self.inner.add(other.inner)?;

        Ok(Self { inner, ..self })
    }

    /// Subtract an amount of the same currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the currencies differ or the result would be negative.
    pub fn subtract(self, other: Money) -> Result<Self, ValidationError> {
        self.ensure_same_currency(&other)?;

        if other.amount() > self.amount() {
            return Err(ValidationError::NegativeDifference {
                minuend: self.amount(),
                subtrahend: other.amount(),
            });
        }

        let inner = self.inner.sub(other.inner)?;

        Ok(Self { inner, ..self })
    }

    /// Multiply by a non-negative factor.
    ///
    /// # Errors
    ///
    /// Returns an error if `factor` is negative or the product overflows.
    pub fn multiply(self, factor: Decimal) -> Result<Self, ValidationError> {
        if factor < Decimal::ZERO {
            return Err(ValidationError::NegativeFactor(factor));
        }

        let product = self
            .amount()
            .checked_mul(factor)
            .ok_or(ValidationError::AmountOverflow)?;

        Ok(Self::from_valid(product, self.currency))
    }

    /// Value equality between two amounts of the same currency.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CurrencyMismatch`] if the currencies differ.
    pub fn equals(&self, other: &Money) -> Result<bool, ValidationError> {
        self.ensure_same_currency(other)?;

        Ok(self.amount() == other.amount())
    }

    /// Whether this amount is strictly greater than `other`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CurrencyMismatch`] if the currencies differ.
    pub fn is_greater_than(&self, other: &Money) -> Result<bool, ValidationError> {
        self.ensure_same_currency(other)?;

        Ok(self.amount() > other.amount())
    }

    /// Whether this amount is strictly less than `other`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CurrencyMismatch`] if the currencies differ.
    pub fn is_less_than(&self, other: &Money) -> Result<bool, ValidationError> {
        self.ensure_same_currency(other)?;

        Ok(self.amount() < other.amount())
    }

    /// Whole cents, rounding half a cent away from zero.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::AmountOverflow`] if the cents do not fit an `i64`.
    pub fn to_cents(&self) -> Result<i64, ValidationError> {
        self.amount()
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|cents| cents.to_i64())
            .ok_or(ValidationError::AmountOverflow)
    }

    /// The same amount rounded to whole cents.
    #[must_use]
    pub fn round_to_cents(self) -> Self {
        let rounded = self
            .amount()
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        Self::from_valid(rounded, self.currency)
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), ValidationError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(ValidationError::CurrencyMismatch {
                expected: self.currency.code(),
                found: other.currency.code(),
            })
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Money", 2)?;

        state.serialize_field("amount", &self.amount())?;
        state.serialize_field("currency", &self.currency)?;
        state.end()
    }
}
