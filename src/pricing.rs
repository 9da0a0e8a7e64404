//! Pricing
//!
//! Prices move through an ordered pipeline of [`PricingRule`]s. Each rule adjusts the
//! price produced by the rule before it, using the [`PricingContext`] of the order line.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use serde::Deserialize;
use smallvec::{SmallVec, smallvec};
use tracing::debug;

use crate::{errors::ValidationError, money::Money};

pub mod context;
pub mod items;
pub mod seasonal;

pub use context::{CustomerType, PricingContext};

/// Default VIP discount.
pub const VIP_DISCOUNT: f64 = 0.10;

/// Default happy-hour discount.
pub const HAPPY_HOUR_DISCOUNT: f64 = 0.15;

/// A single price adjustment.
#[derive(Debug, Clone, Copy)]
pub enum PricingRule {
    /// Multiply by the size factor of the requested pizza.
    BaseSize,

    /// Take a percentage off for VIP customers.
    Vip(Percentage),

    /// Take a percentage off while happy hour runs.
    HappyHour(Percentage),

    /// Apply every active seasonal modifier, compounding in order.
    Seasonal,
}

impl PricingRule {
    /// VIP rule with the standard discount.
    pub fn vip() -> Self {
        PricingRule::Vip(Percentage::from(VIP_DISCOUNT))
    }

    /// Happy-hour rule with the standard discount.
    pub fn happy_hour() -> Self {
        PricingRule::HappyHour(Percentage::from(HAPPY_HOUR_DISCOUNT))
    }

    /// Short label used in logs and receipts.
    pub fn label(&self) -> &'static str {
        match self {
            PricingRule::BaseSize => "base-size",
            PricingRule::Vip(_) => "vip",
            PricingRule::HappyHour(_) => "happy-hour",
            PricingRule::Seasonal => "seasonal",
        }
    }

    /// Adjust `price` for the given line.
    ///
    /// # Errors
    ///
    /// Returns an error if the adjustment would make the price negative or overflow.
    pub fn apply(&self, price: Money, context: &PricingContext) -> Result<Money, ValidationError> {
        match self {
            PricingRule::BaseSize => price.multiply(context.size.price_factor()),
            PricingRule::Vip(discount) if context.customer_type == CustomerType::Vip => {
                price.multiply(remaining_after(*discount)?)
            }
            PricingRule::HappyHour(discount) if context.is_happy_hour => {
                price.multiply(remaining_after(*discount)?)
            }
            PricingRule::Vip(_) | PricingRule::HappyHour(_) => Ok(price),
            PricingRule::Seasonal => context
                .active_seasonal_modifiers()
                .try_fold(price, |acc, modifier| {
                    debug!(
                        modifier = modifier.name(),
                        multiplier = %modifier.multiplier(),
                        "applying seasonal modifier"
                    );

                    acc.multiply(modifier.multiplier())
                }),
        }
    }
}

/// Fraction of the price left once `discount` is taken off.
fn remaining_after(discount: Percentage) -> Result<Decimal, ValidationError> {
    // decimal_percentage doesn't expose the underlying Decimal
    let discount = discount * Decimal::ONE;

    Decimal::ONE
        .checked_sub(discount)
        .filter(|remaining| *remaining >= Decimal::ZERO)
        .ok_or(ValidationError::NegativeFactor(Decimal::ONE - discount))
}

/// Named rule stacks.
///
/// Each strategy includes every rule of the strategies before it, so choosing
/// [`PricingStrategy::Vip`] still applies base size pricing but skips happy hour
/// and seasonal modifiers. Only [`PricingStrategy::Seasonal`] runs the full stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingStrategy {
    /// Size pricing only
    Base,

    /// Size pricing and the VIP discount
    Vip,

    /// Size pricing, VIP and happy-hour discounts
    HappyHour,

    /// Every rule
    #[default]
    Seasonal,
}

/// An ordered list of pricing rules.
#[derive(Debug, Clone)]
pub struct PricingPipeline {
    rules: SmallVec<[PricingRule; 4]>,
}

impl PricingPipeline {
    /// Create a pipeline applying `rules` in the given order.
    pub fn new(rules: impl IntoIterator<Item = PricingRule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Pipeline running every rule with the standard discounts.
    pub fn full() -> Self {
        Self::for_strategy(PricingStrategy::Seasonal)
    }

    /// Pipeline for a named strategy.
    pub fn for_strategy(strategy: PricingStrategy) -> Self {
        let rules: SmallVec<[PricingRule; 4]> = match strategy {
            PricingStrategy::Base => smallvec![PricingRule::BaseSize],
            PricingStrategy::Vip => smallvec![PricingRule::BaseSize, PricingRule::vip()],
            PricingStrategy::HappyHour => smallvec![
                PricingRule::BaseSize,
                PricingRule::vip(),
                PricingRule::happy_hour()
            ],
            PricingStrategy::Seasonal => smallvec![
                PricingRule::BaseSize,
                PricingRule::vip(),
                PricingRule::happy_hour(),
                PricingRule::Seasonal
            ],
        };

        Self { rules }
    }

    /// Append a rule to the end of the pipeline.
    #[must_use]
    pub fn then(mut self, rule: PricingRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in application order.
    pub fn rules(&self) -> &[PricingRule] {
        &self.rules
    }

    /// Run `price` through every rule in order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a rule.
    pub fn apply(&self, price: Money, context: &PricingContext) -> Result<Money, ValidationError> {
        self.rules.iter().try_fold(price, |acc, rule| {
            let adjusted = rule.apply(acc, context)?;

            debug!(rule = rule.label(), from = %acc, to = %adjusted, "pricing rule applied");

            Ok(adjusted)
        })
    }
}

impl Default for PricingPipeline {
    fn default() -> Self {
        Self::full()
    }
}

impl From<PricingStrategy> for PricingPipeline {
    fn from(strategy: PricingStrategy) -> Self {
        Self::for_strategy(strategy)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;
    use crate::{money::Currency, pizzas::PizzaSize, pricing::seasonal::SeasonalModifier};

    fn usd(amount: Decimal) -> Result<Money, ValidationError> {
        Money::create(amount, Currency::Usd)
    }

    fn labels(pipeline: &PricingPipeline) -> Vec<&'static str> {
        pipeline.rules().iter().map(PricingRule::label).collect()
    }

    #[test]
    fn base_size_multiplies_by_size_factor() -> TestResult {
        let context = PricingContext::new(PizzaSize::Large, Timestamp::UNIX_EPOCH);

        let price = PricingRule::BaseSize.apply(usd(dec!(16.99))?, &context)?;

        assert_eq!(price.amount(), dec!(22.087));

        Ok(())
    }

    #[test]
    fn vip_discount_only_applies_to_vips() -> TestResult {
        let regular = PricingContext::new(PizzaSize::Medium, Timestamp::UNIX_EPOCH);
        let vip = regular.clone().with_customer_type(CustomerType::Vip);

        assert_eq!(
            PricingRule::vip().apply(usd(dec!(10))?, &regular)?.to_cents()?,
            1000
        );
        assert_eq!(PricingRule::vip().apply(usd(dec!(10))?, &vip)?.to_cents()?, 900);

        Ok(())
    }

    #[test]
    fn happy_hour_discount_only_applies_during_happy_hour() -> TestResult {
        let off_peak = PricingContext::new(PizzaSize::Medium, Timestamp::UNIX_EPOCH);
        let happy = off_peak.clone().with_happy_hour(true);

        assert_eq!(
            PricingRule::happy_hour()
                .apply(usd(dec!(20))?, &off_peak)?
                .to_cents()?,
            2000
        );
        assert_eq!(
            PricingRule::happy_hour().apply(usd(dec!(20))?, &happy)?.to_cents()?,
            1700
        );

        Ok(())
    }

    #[test]
    fn seasonal_modifiers_compound_in_order() -> TestResult {
        let from: Timestamp = "2026-01-01T00:00:00Z".parse()?;
        let to: Timestamp = "2026-12-31T00:00:00Z".parse()?;
        let at: Timestamp = "2026-06-01T00:00:00Z".parse()?;

        let context = PricingContext::new(PizzaSize::Medium, at).with_seasonal_modifiers(vec![
            SeasonalModifier::new("summer", dec!(1.1), from, to)?,
            SeasonalModifier::new("festival", dec!(0.5), from, to)?,
        ]);

        let price = PricingRule::Seasonal.apply(usd(dec!(10))?, &context)?;

        assert_eq!(price.amount(), dec!(5.5));

        Ok(())
    }

    #[test]
    fn strategies_stack_previous_rules() {
        assert_eq!(
            labels(&PricingPipeline::for_strategy(PricingStrategy::Base)),
            vec!["base-size"]
        );
        assert_eq!(
            labels(&PricingPipeline::for_strategy(PricingStrategy::Vip)),
            vec!["base-size", "vip"]
        );
        assert_eq!(
            labels(&PricingPipeline::for_strategy(PricingStrategy::HappyHour)),
            vec!["base-size", "vip", "happy-hour"]
        );
        assert_eq!(
            labels(&PricingPipeline::default()),
            vec!["base-size", "vip", "happy-hour", "seasonal"]
        );
    }

    #[test]
    fn vip_strategy_ignores_happy_hour() -> TestResult {
        let context = PricingContext::new(PizzaSize::Medium, Timestamp::UNIX_EPOCH)
            .with_customer_type(CustomerType::Vip)
            .with_happy_hour(true);

        let vip_only = PricingPipeline::from(PricingStrategy::Vip).apply(usd(dec!(10))?, &context)?;
        let full = PricingPipeline::full().apply(usd(dec!(10))?, &context)?;

        assert_eq!(vip_only.to_cents()?, 900);
        assert_eq!(full.to_cents()?, 765);

        Ok(())
    }

    #[test]
    fn custom_pipelines_run_in_declared_order() -> TestResult {
        let context = PricingContext::new(PizzaSize::Small, Timestamp::UNIX_EPOCH).with_happy_hour(true);
        let pipeline = PricingPipeline::new([PricingRule::happy_hour()]).then(PricingRule::BaseSize);

        assert_eq!(labels(&pipeline), vec!["happy-hour", "base-size"]);
        assert_eq!(pipeline.apply(usd(dec!(10))?, &context)?.to_cents()?, 680);

        Ok(())
    }

    #[test]
    fn discounts_above_one_hundred_percent_are_rejected() -> TestResult {
        let context = PricingContext::new(PizzaSize::Medium, Timestamp::UNIX_EPOCH).with_happy_hour(true);

        let result = PricingRule::HappyHour(Percentage::from(1.5)).apply(usd(dec!(10))?, &context);

        assert!(matches!(result, Err(ValidationError::NegativeFactor(_))));

        Ok(())
    }
}
