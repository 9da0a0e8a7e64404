//! Seasonal Modifiers

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;
use smallvec::SmallVec;

use crate::{errors::ValidationError, pizzas::PizzaSize};

/// A time-boxed price multiplier, optionally restricted to some sizes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalModifier {
    name: String,
    multiplier: Decimal,
    valid_from: Timestamp,
    valid_to: Timestamp,
    applicable_to_sizes: Option<SmallVec<[PizzaSize; 4]>>,
}

impl SeasonalModifier {
    /// Create a modifier active from `valid_from` to `valid_to`, both inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error if the multiplier is negative or the window ends before it starts.
    pub fn new(
        name: impl Into<String>,
        multiplier: Decimal,
        valid_from: Timestamp,
        valid_to: Timestamp,
    ) -> Result<Self, ValidationError> {
        let name = name.into();

        if multiplier < Decimal::ZERO {
            return Err(ValidationError::NegativeFactor(multiplier));
        }

        if valid_to < valid_from {
            return Err(ValidationError::InvalidSeasonalWindow(name));
        }

        Ok(Self {
            name,
            multiplier,
            valid_from,
            valid_to,
            applicable_to_sizes: None,
        })
    }

    /// Restrict the modifier to the given sizes.
    #[must_use]
    pub fn with_sizes(mut self, sizes: impl IntoIterator<Item = PizzaSize>) -> Self {
        self.applicable_to_sizes = Some(sizes.into_iter().collect());
        self
    }

    /// Modifier name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price multiplier
    pub fn multiplier(&self) -> Decimal {
        self.multiplier
    }

    /// Start of the window
    pub fn valid_from(&self) -> Timestamp {
        self.valid_from
    }

    /// End of the window
    pub fn valid_to(&self) -> Timestamp {
        self.valid_to
    }

    /// Sizes the modifier is restricted to, if any.
    pub fn applicable_to_sizes(&self) -> Option<&[PizzaSize]> {
        self.applicable_to_sizes.as_deref()
    }

    /// Whether `at` falls inside the window.
    pub fn is_active_at(&self, at: Timestamp) -> bool {
        self.valid_from <= at && at <= self.valid_to
    }

    /// Whether the modifier applies to a pizza of `size` ordered at `at`.
    pub fn applies_to(&self, at: Timestamp, size: PizzaSize) -> bool {
        self.is_active_at(at)
            && self
                .applicable_to_sizes
                .as_ref()
                .is_none_or(|sizes| sizes.contains(&size))
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    fn winter() -> Result<SeasonalModifier, Box<dyn std::error::Error>> {
        Ok(SeasonalModifier::new(
            "winter",
            dec!(1.1),
            "2026-12-01T00:00:00Z".parse()?,
            "2027-02-28T23:59:59Z".parse()?,
        )?)
    }

    #[test]
    fn window_is_inclusive() -> TestResult {
        let modifier = winter()?;

        assert!(modifier.is_active_at(modifier.valid_from()));
        assert!(modifier.is_active_at(modifier.valid_to()));
        assert!(!modifier.is_active_at(modifier.valid_from() - SignedDuration::from_secs(1)));
        assert!(!modifier.is_active_at(modifier.valid_to() + SignedDuration::from_secs(1)));

        Ok(())
    }

    #[test]
    fn size_restriction_limits_applicability() -> TestResult {
        let modifier = winter()?.with_sizes([PizzaSize::Large, PizzaSize::ExtraLarge]);
        let at: Timestamp = "2027-01-15T12:00:00Z".parse()?;

        assert!(modifier.applies_to(at, PizzaSize::Large));
        assert!(!modifier.applies_to(at, PizzaSize::Small));
        assert_eq!(
            modifier.applicable_to_sizes(),
            Some([PizzaSize::Large, PizzaSize::ExtraLarge].as_slice())
        );

        Ok(())
    }

    #[test]
    fn unrestricted_modifier_applies_to_every_size() -> TestResult {
        let modifier = winter()?;
        let at: Timestamp = "2027-01-15T12:00:00Z".parse()?;

        assert!(PizzaSize::ALL.into_iter().all(|size| modifier.applies_to(at, size)));

        Ok(())
    }

    #[test]
    fn rejects_negative_multiplier_and_inverted_window() -> TestResult {
        let from: Timestamp = "2026-12-01T00:00:00Z".parse()?;
        let to: Timestamp = "2026-11-01T00:00:00Z".parse()?;

        assert_eq!(
            SeasonalModifier::new("bad", dec!(-1), from, from),
            Err(ValidationError::NegativeFactor(dec!(-1)))
        );
        assert_eq!(
            SeasonalModifier::new("backwards", dec!(1), from, to),
            Err(ValidationError::InvalidSeasonalWindow("backwards".to_string()))
        );

        Ok(())
    }
}
