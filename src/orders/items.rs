//! Order Items

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    errors::ValidationError,
    money::Money,
    pizzas::{Crust, IngredientId, PizzaSize, RecipeId},
    pricing::items::PricedItem,
};

/// A priced line on an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    pizza_recipe_id: RecipeId,
    size: PizzaSize,
    crust: Crust,
    quantity: u32,
    custom_ingredients: BTreeMap<IngredientId, u32>,
    unit_price: Money,
    total_price: Money,
}

impl OrderItem {
    /// Create a line from its unit price; the total is derived from the quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity or any ingredient portion count is zero.
    pub fn new(
        pizza_recipe_id: RecipeId,
        size: PizzaSize,
        crust: Crust,
        quantity: u32,
        custom_ingredients: BTreeMap<IngredientId, u32>,
        unit_price: Money,
    ) -> Result<Self, ValidationError> {
        if quantity == 0 {
            return Err(ValidationError::QuantityOutOfRange {
                field: "quantity",
                quantity,
                max: u32::MAX,
            });
        }

        if let Some(portions) = custom_ingredients.values().find(|portions| **portions == 0) {
            return Err(ValidationError::QuantityOutOfRange {
                field: "ingredient portions",
                quantity: *portions,
                max: u32::MAX,
            });
        }

        let total_price = unit_price.multiply(Decimal::from(quantity))?;

        Ok(Self {
            pizza_recipe_id,
            size,
            crust,
            quantity,
            custom_ingredients,
            unit_price,
            total_price,
        })
    }

    /// Create a line from the output of the pricing pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity or any ingredient portion count is zero.
    pub fn priced(
        pizza_recipe_id: RecipeId,
        size: PizzaSize,
        crust: Crust,
        quantity: u32,
        custom_ingredients: BTreeMap<IngredientId, u32>,
        priced: PricedItem,
    ) -> Result<Self, ValidationError> {
        Self::new(
            pizza_recipe_id,
            size,
            crust,
            quantity,
            custom_ingredients,
            priced.unit_price,
        )
    }

    /// Recipe the pizza is made from
    pub fn pizza_recipe_id(&self) -> &RecipeId {
        &self.pizza_recipe_id
    }

    /// Pizza size
    pub fn size(&self) -> PizzaSize {
        self.size
    }

    /// Pizza crust
    pub fn crust(&self) -> Crust {
        self.crust
    }

    /// Number of pizzas
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Extra ingredients and portions
    pub fn custom_ingredients(&self) -> &BTreeMap<IngredientId, u32> {
        &self.custom_ingredients
    }

    /// Price of one pizza
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Price of the whole line
    pub fn total_price(&self) -> Money {
        self.total_price
    }
}
