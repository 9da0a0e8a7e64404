//! Item Pricing

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    errors::ValidationError,
    money::Money,
    pizzas::IngredientId,
    pricing::{PricingContext, PricingPipeline},
};

/// Source of ingredient prices.
pub trait IngredientPrices {
    /// Price of a single portion of `ingredient`, if it is sold.
    fn ingredient_price(&self, ingredient: &IngredientId) -> Option<Money>;
}

impl IngredientPrices for FxHashMap<IngredientId, Money> {
    fn ingredient_price(&self, ingredient: &IngredientId) -> Option<Money> {
        self.get(ingredient).copied()
    }
}

/// Unit and line prices for an order line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedItem {
    /// Price of one pizza, rounded to cents
    pub unit_price: Money,

    /// Unit price times quantity
    pub total_price: Money,
}

/// Total cost of the extra ingredients on one pizza.
///
/// # Errors
///
/// Returns an error if an ingredient has no price or the currencies differ.
pub fn extras_price(
    base_price: Money,
    custom_ingredients: &BTreeMap<IngredientId, u32>,
    prices: &impl IngredientPrices,
) -> Result<Money, ValidationError> {
    custom_ingredients.iter().try_fold(
        Money::zero(base_price.currency()),
        |acc, (ingredient, portions)| {
            let price = prices
                .ingredient_price(ingredient)
                .ok_or_else(|| ValidationError::UnknownIngredient(ingredient.to_string()))?;

            acc.add(price.multiply(Decimal::from(*portions))?)
        },
    )
}

/// Price one order line.
///
/// The recipe's base price plus its extra ingredients runs through `pipeline`, is
/// rounded to cents and then multiplied by the line quantity.
///
/// # Errors
///
/// Returns an error if an ingredient is unknown, currencies differ, or a rule fails.
pub fn price_item(
    base_price: Money,
    context: &PricingContext,
    prices: &impl IngredientPrices,
    pipeline: &PricingPipeline,
) -> Result<PricedItem, ValidationError> {
    let extras = extras_price(base_price, &context.custom_ingredients, prices)?;
    let unit_price = pipeline
        .apply(base_price.add(extras)?, context)?
        .round_to_cents();
    let total_price = unit_price.multiply(Decimal::from(context.quantity))?;

    debug!(
        size = %context.size,
        quantity = context.quantity,
        unit_price = %unit_price,
        total_price = %total_price,
        "priced order line"
    );

    Ok(PricedItem {
        unit_price,
        total_price,
    })
}
