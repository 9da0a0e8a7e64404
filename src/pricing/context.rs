//! Pricing Context

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    pizzas::{IngredientId, PizzaSize},
    pricing::seasonal::SeasonalModifier,
};

/// Kind of customer placing the order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerType {
    /// Everyone without a loyalty status
    #[default]
    Regular,

    /// Loyalty customers eligible for the VIP discount
    Vip,
}

/// Everything the pricing rules need to know about a single order line.
///
/// Built per line by the calling use case and discarded after pricing.
#[derive(Debug, Clone)]
pub struct PricingContext {
    /// Requested size
    pub size: PizzaSize,

    /// Extra ingredients and how many portions of each
    pub custom_ingredients: BTreeMap<IngredientId, u32>,

    /// Number of pizzas on the line
    pub quantity: u32,

    /// Who is ordering
    pub customer_type: CustomerType,

    /// When the order is placed
    pub order_time: Timestamp,

    /// Whether the happy-hour discount is running
    pub is_happy_hour: bool,

    /// Seasonal modifiers to consider, in application order
    pub seasonal_modifiers: Vec<SeasonalModifier>,
}

impl PricingContext {
    /// A single regular-customer pizza of the given size with no extras.
    pub fn new(size: PizzaSize, order_time: Timestamp) -> Self {
        Self {
            size,
            custom_ingredients: BTreeMap::new(),
            quantity: 1,
            customer_type: CustomerType::Regular,
            order_time,
            is_happy_hour: false,
            seasonal_modifiers: Vec::new(),
        }
    }

    /// Set the number of pizzas.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the customer type.
    #[must_use]
    pub fn with_customer_type(mut self, customer_type: CustomerType) -> Self {
        self.customer_type = customer_type;
        self
    }

    /// Mark the order as placed during happy hour.
    #[must_use]
    pub fn with_happy_hour(mut self, is_happy_hour: bool) -> Self {
        self.is_happy_hour = is_happy_hour;
        self
    }

    /// Add portions of an extra ingredient.
    #[must_use]
    pub fn with_ingredient(mut self, ingredient: IngredientId, quantity: u32) -> Self {
        *self.custom_ingredients.entry(ingredient).or_insert(0) += quantity;
        self
    }

    /// Replace the seasonal modifiers.
    #[must_use]
    pub fn with_seasonal_modifiers(mut self, modifiers: impl Into<Vec<SeasonalModifier>>) -> Self {
        self.seasonal_modifiers = modifiers.into();
        self
    }

    /// Seasonal modifiers active for this line, in application order.
    pub fn active_seasonal_modifiers(&self) -> impl Iterator<Item = &SeasonalModifier> {
        self.seasonal_modifiers
            .iter()
            .filter(|modifier| modifier.applies_to(self.order_time, self.size))
    }
}
