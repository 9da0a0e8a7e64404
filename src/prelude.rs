//! Pizzeria prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    errors::{BusinessRuleViolation, DomainError, ValidationError},
    fixtures::{Fixture, FixtureError},
    menu::{Ingredient, Menu, Recipe},
    money::{Currency, Money},
    ordering::{OrderLineRequest, OrderRequest, place_order},
    orders::{
        Address, CustomerId, CustomerInfo, DeliveryType, Fulfilment, NewOrder, Order, OrderAction,
        OrderId, OrderStatus, PaymentStatus, Transition, events::OrderEvent, items::OrderItem,
        policy::OrderPolicy,
    },
    pizzas::{Crust, IngredientId, PizzaSize, RecipeId},
    pricing::{
        CustomerType, PricingContext, PricingPipeline, PricingRule, PricingStrategy,
        items::{IngredientPrices, PricedItem, price_item},
        seasonal::SeasonalModifier,
    },
    receipt::{Receipt, ReceiptError},
};
