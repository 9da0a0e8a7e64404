//! Place Order
//!
//! Prices a customer's request against the menu and places the resulting order.

use std::collections::BTreeMap;

use jiff::Timestamp;

use crate::{
    errors::{DomainError, ValidationError},
    menu::Menu,
    orders::{
        Address, CustomerId, CustomerInfo, DeliveryType, NewOrder, Order, Transition,
        items::OrderItem, policy::OrderPolicy,
    },
    pizzas::{Crust, IngredientId, PizzaSize, RecipeId},
    pricing::{CustomerType, PricingContext, PricingPipeline, items::price_item},
};

/// A requested order line, before pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineRequest {
    /// Recipe to make
    pub recipe_id: RecipeId,

    /// Size
    pub size: PizzaSize,

    /// Crust
    pub crust: Crust,

    /// Number of pizzas
    pub quantity: u32,

    /// Extra ingredients and portions
    pub custom_ingredients: BTreeMap<IngredientId, u32>,
}

impl OrderLineRequest {
    /// One pizza with no extras.
    pub fn new(recipe_id: impl Into<RecipeId>, size: PizzaSize, crust: Crust) -> Self {
        Self {
            recipe_id: recipe_id.into(),
            size,
            crust,
            quantity: 1,
            custom_ingredients: BTreeMap::new(),
        }
    }

    /// Set the number of pizzas.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Add portions of an extra ingredient.
    #[must_use]
    pub fn with_extra(mut self, ingredient: impl Into<IngredientId>, portions: u32) -> Self {
        *self
            .custom_ingredients
            .entry(ingredient.into())
            .or_default() += portions;
        self
    }
}

/// Everything a customer submits when ordering.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    /// Registered customer, if signed in
    pub customer_id: Option<CustomerId>,

    /// Contact details
    pub customer_info: CustomerInfo,

    /// Loyalty status used for pricing
    pub customer_type: CustomerType,

    /// Whether the order falls in happy hour
    pub is_happy_hour: bool,

    /// Requested lines
    pub lines: Vec<OrderLineRequest>,

    /// Pickup or delivery
    pub delivery_type: DeliveryType,

    /// Required for deliveries
    pub delivery_address: Option<Address>,
}

/// Price every line of `request` through `pipeline` and place the order at `at`.
///
/// # Errors
///
/// Returns a [`DomainError`] if a recipe or ingredient is not on the menu, a line is
/// invalid, or the order fails validation.
#[tracing::instrument(
    skip_all,
    fields(lines = request.lines.len(), delivery_type = ?request.delivery_type)
)]
pub fn place_order(
    menu: &Menu,
    request: OrderRequest,
    pipeline: &PricingPipeline,
    policy: &OrderPolicy,
    at: Timestamp,
) -> Result<Transition, DomainError> {
    let OrderRequest {
        customer_id,
        customer_info,
        customer_type,
        is_happy_hour,
        lines,
        delivery_type,
        delivery_address,
    } = request;

    let items = lines
        .into_iter()
        .map(|line| price_line(menu, line, customer_type, is_happy_hour, pipeline, at))
        .collect::<Result<Vec<_>, _>>()?;

    let new_order = NewOrder {
        customer_id,
        customer_info,
        items,
        delivery_type,
        delivery_address,
    };

    Ok(Order::place(new_order, policy, at)?)
}

fn price_line(
    menu: &Menu,
    line: OrderLineRequest,
    customer_type: CustomerType,
    is_happy_hour: bool,
    pipeline: &PricingPipeline,
    at: Timestamp,
) -> Result<OrderItem, ValidationError> {
    let recipe = menu.recipe(&line.recipe_id)?;

    let context = PricingContext {
        size: line.size,
        custom_ingredients: line.custom_ingredients,
        quantity: line.quantity,
        customer_type,
        order_time: at,
        is_happy_hour,
        seasonal_modifiers: menu.seasonal_modifiers().to_vec(),
    };

    let priced = price_item(recipe.base_price, &context, menu, pipeline)?;

    OrderItem::priced(
        line.recipe_id,
        context.size,
        line.crust,
        context.quantity,
        context.custom_ingredients,
        priced,
    )
}
