//! Order Policy

use decimal_percentage::Percentage;
use jiff::SignedDuration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    errors::ValidationError,
    money::{Currency, Money},
    orders::{DeliveryType, items::OrderItem},
};

/// Standard tax rate applied to the item subtotal.
pub const TAX_RATE: f64 = 0.10;

/// Longest any single kitchen or courier timing may be, in minutes.
pub const MAX_POLICY_MINUTES: i64 = 24 * 60;

/// Flat delivery charges, tax and kitchen timings used when placing and confirming orders.
///
/// Build custom policies with [`OrderPolicy::new`]; [`Order::place`](crate::orders::Order::place)
/// re-checks the settings so a struct literal cannot slip past validation.
#[derive(Debug, Clone, Copy)]
pub struct OrderPolicy {
    /// Tax charged on the item subtotal
    pub tax_rate: Percentage,

    /// Flat fee for delivery orders, in the order currency
    pub delivery_fee: Decimal,

    /// Kitchen minutes per pizza
    pub prep_minutes_per_pizza: i64,

    /// Courier minutes added to delivery orders
    pub delivery_minutes: i64,

    /// Slack added to every estimate, always at least a minute
    pub buffer_minutes: i64,

    /// Largest quantity allowed on a single order line
    pub max_item_quantity: u32,
}

impl OrderPolicy {
    /// Create a validated policy.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if any setting is out of range, see [`OrderPolicy::validate`].
    pub fn new(
        tax_rate: Percentage,
        delivery_fee: Decimal,
        prep_minutes_per_pizza: i64,
        delivery_minutes: i64,
        buffer_minutes: i64,
        max_item_quantity: u32,
    ) -> Result<Self, ValidationError> {
        let policy = Self {
            tax_rate,
            delivery_fee,
            prep_minutes_per_pizza,
            delivery_minutes,
            buffer_minutes,
            max_item_quantity,
        };

        policy.validate()?;

        Ok(policy)
    }

    /// Check every setting.
    ///
    /// Tax and fee must not be negative. Kitchen and courier minutes lie in
    /// `0..=MAX_POLICY_MINUTES` and the buffer in `1..=MAX_POLICY_MINUTES`, so every
    /// estimate lands strictly after confirmation. Lines must allow at least one pizza.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let rate = self.tax_rate * Decimal::ONE;

        if rate < Decimal::ZERO {
            return Err(ValidationError::NegativeFactor(rate));
        }

        if self.delivery_fee < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount(self.delivery_fee));
        }

        check_range("prep_minutes_per_pizza", self.prep_minutes_per_pizza, 0, MAX_POLICY_MINUTES)?;
        check_range("delivery_minutes", self.delivery_minutes, 0, MAX_POLICY_MINUTES)?;
        check_range("buffer_minutes", self.buffer_minutes, 1, MAX_POLICY_MINUTES)?;
        check_range(
            "max_item_quantity",
            i64::from(self.max_item_quantity),
            1,
            i64::from(u32::MAX),
        )?;

        Ok(())
    }

    /// Tax owed on `subtotal`, rounded to cents.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured rate is negative or the result overflows.
    pub fn tax_on(&self, subtotal: Money) -> Result<Money, ValidationError> {
        // decimal_percentage doesn't expose the underlying Decimal
        let rate = self.tax_rate * Decimal::ONE;

        Ok(subtotal.multiply(rate)?.round_to_cents())
    }

    /// Delivery fee for an order of the given type.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured fee is negative.
    pub fn delivery_fee_for(
        &self,
        delivery_type: DeliveryType,
        currency: Currency,
    ) -> Result<Money, ValidationError> {
        match delivery_type {
            DeliveryType::Pickup => Ok(Money::zero(currency)),
            DeliveryType::Delivery => Money::create(self.delivery_fee, currency),
        }
    }

    /// Time from confirmation until the order should reach the customer.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::FulfilmentTimeOverflow`] if the minutes do not fit a
    /// [`SignedDuration`], or a range error if the policy itself is invalid.
    pub fn fulfilment_time(
        &self,
        items: &[OrderItem],
        delivery_type: DeliveryType,
    ) -> Result<SignedDuration, ValidationError> {
        self.validate()?;

        let courier = match delivery_type {
            DeliveryType::Pickup => 0,
            DeliveryType::Delivery => self.delivery_minutes,
        };

        let seconds = items
            .iter()
            .try_fold(0_i64, |pizzas, item| pizzas.checked_add(i64::from(item.quantity())))
            .and_then(|pizzas| self.prep_minutes_per_pizza.checked_mul(pizzas))
            .and_then(|minutes| minutes.checked_add(courier))
            .and_then(|minutes| minutes.checked_add(self.buffer_minutes))
            .and_then(|minutes| minutes.checked_mul(60))
            .ok_or(ValidationError::FulfilmentTimeOverflow)?;

        Ok(SignedDuration::from_secs(seconds))
    }
}

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::SettingOutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl Default for OrderPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Percentage::from(TAX_RATE),
            delivery_fee: dec!(5.00),
            prep_minutes_per_pizza: 15,
            delivery_minutes: 30,
            buffer_minutes: 10,
            max_item_quantity: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use testresult::TestResult;

    use super::*;
    use crate::pizzas::{Crust, PizzaSize, RecipeId};

    fn item(quantity: u32) -> Result<OrderItem, ValidationError> {
        OrderItem::new(
            RecipeId::from("margherita"),
            PizzaSize::Medium,
            Crust::Thin,
            quantity,
            BTreeMap::new(),
            Money::create(dec!(10), Currency::Usd)?,
        )
    }

    #[test]
    fn tax_is_ten_percent_rounded_to_cents() -> TestResult {
        let policy = OrderPolicy::default();

        let tax = policy.tax_on(Money::create(dec!(22.09), Currency::Usd)?)?;

        assert_eq!(tax.to_cents()?, 221);

        Ok(())
    }

    #[test]
    fn delivery_fee_is_flat_for_delivery_and_free_for_pickup() -> TestResult {
        let policy = OrderPolicy::default();

        assert!(policy.delivery_fee_for(DeliveryType::Pickup, Currency::Eur)?.is_zero());
        assert_eq!(
            policy
                .delivery_fee_for(DeliveryType::Delivery, Currency::Eur)?
                .to_cents()?,
            500
        );

        Ok(())
    }

    #[test]
    fn fulfilment_time_counts_pizzas_courier_and_buffer() -> TestResult {
        let policy = OrderPolicy::default();
        let items = [item(2)?, item(1)?];

        assert_eq!(
            policy.fulfilment_time(&items, DeliveryType::Pickup)?,
            SignedDuration::from_mins(15 * 3 + 10)
        );
        assert_eq!(
            policy.fulfilment_time(&items, DeliveryType::Delivery)?,
            SignedDuration::from_mins(15 * 3 + 30 + 10)
        );

        Ok(())
    }

    #[test]
    fn new_rejects_out_of_range_settings() {
        let rate = Percentage::from(TAX_RATE);

        assert!(OrderPolicy::new(rate, dec!(5.00), 15, 30, 10, 50).is_ok());
        assert_eq!(
            OrderPolicy::new(rate, dec!(5.00), -1, 30, 10, 50).err(),
            Some(ValidationError::SettingOutOfRange {
                field: "prep_minutes_per_pizza",
                value: -1,
                min: 0,
                max: MAX_POLICY_MINUTES,
            })
        );
        assert!(matches!(
            OrderPolicy::new(rate, dec!(5.00), 15, 30, 0, 50),
            Err(ValidationError::SettingOutOfRange { field: "buffer_minutes", .. })
        ));
        assert!(matches!(
            OrderPolicy::new(rate, dec!(5.00), 15, 10_000_000_000, 10, 50),
            Err(ValidationError::SettingOutOfRange { field: "delivery_minutes", .. })
        ));
        assert!(matches!(
            OrderPolicy::new(rate, dec!(5.00), 15, 30, 10, 0),
            Err(ValidationError::SettingOutOfRange { field: "max_item_quantity", .. })
        ));
        assert!(matches!(
            OrderPolicy::new(rate, dec!(-1), 15, 30, 10, 50),
            Err(ValidationError::NegativeAmount(_))
        ));
        assert!(matches!(
            OrderPolicy::new(Percentage::from(-0.1), dec!(5.00), 15, 30, 10, 50),
            Err(ValidationError::NegativeFactor(_))
        ));
    }

    #[test]
    fn fulfilment_time_errors_instead_of_overflowing() -> TestResult {
        let items = [item(2)?];

        let huge = OrderPolicy {
            prep_minutes_per_pizza: i64::MAX / 2,
            ..OrderPolicy::default()
        };

        assert!(matches!(
            huge.fulfilment_time(&items, DeliveryType::Pickup),
            Err(ValidationError::SettingOutOfRange { field: "prep_minutes_per_pizza", .. })
        ));

        let early = OrderPolicy {
            buffer_minutes: -120,
            ..OrderPolicy::default()
        };

        assert!(early.fulfilment_time(&items, DeliveryType::Pickup).is_err());

        Ok(())
    }
}
