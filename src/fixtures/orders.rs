//! Order Fixtures

use std::collections::BTreeMap;

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, parse_timestamp},
    ordering::{OrderLineRequest, OrderRequest},
    orders::{Address, CustomerInfo, DeliveryType},
    pizzas::{Crust, IngredientId, PizzaSize, RecipeId},
    pricing::{CustomerType, PricingStrategy},
};

/// Wrapper for orders in YAML
#[derive(Debug, Deserialize)]
pub struct OrdersFixture {
    /// Map of order key -> order fixture
    pub orders: FxHashMap<String, OrderFixture>,
}

/// Order Fixture
#[derive(Debug, Deserialize)]
pub struct OrderFixture {
    /// When the order is placed, RFC 3339
    pub placed_at: String,

    /// Pricing strategy, defaults to the full stack
    #[serde(default)]
    pub strategy: PricingStrategy,

    /// Who is ordering
    pub customer: CustomerFixture,

    /// Whether happy hour is running
    #[serde(default)]
    pub happy_hour: bool,

    /// Pickup or delivery
    pub delivery_type: DeliveryType,

    /// Delivery address
    #[serde(default)]
    pub address: Option<AddressFixture>,

    /// Requested pizzas
    pub items: Vec<OrderLineFixture>,
}

/// Customer Fixture
#[derive(Debug, Deserialize)]
pub struct CustomerFixture {
    /// Customer name
    pub name: String,

    /// Phone number
    pub phone: String,

    /// Email address
    #[serde(default)]
    pub email: Option<String>,

    /// Loyalty status
    #[serde(default, rename = "type")]
    pub customer_type: CustomerType,
}

/// Address Fixture
#[derive(Debug, Deserialize)]
pub struct AddressFixture {
    /// Street and house number
    pub street: String,

    /// City
    pub city: String,

    /// Postal code
    #[serde(default)]
    pub postal_code: Option<String>,

    /// Courier instructions
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Order Line Fixture
#[derive(Debug, Deserialize)]
pub struct OrderLineFixture {
    /// Recipe key
    pub recipe: String,

    /// Size
    pub size: PizzaSize,

    /// Crust
    pub crust: Crust,

    /// Number of pizzas
    #[serde(default = "one")]
    pub quantity: u32,

    /// Ingredient key -> portions
    #[serde(default)]
    pub extras: BTreeMap<String, u32>,
}

fn one() -> u32 {
    1
}

/// A loaded order request with the strategy and instant to place it with.
#[derive(Debug, Clone)]
pub struct FixtureOrder {
    /// The request itself
    pub request: OrderRequest,

    /// Pricing strategy to use
    pub strategy: PricingStrategy,

    /// When to place it
    pub placed_at: Timestamp,
}

impl TryFrom<OrderFixture> for FixtureOrder {
    type Error = FixtureError;

    fn try_from(fixture: OrderFixture) -> Result<Self, Self::Error> {
        let OrderFixture {
            placed_at,
            strategy,
            customer,
            happy_hour,
            delivery_type,
            address,
            items,
        } = fixture;

        let customer_info =
            CustomerInfo::new(&customer.name, &customer.phone, customer.email.as_deref())?;

        let delivery_address = address.map(Address::try_from).transpose()?;

        let lines = items
            .into_iter()
            .map(|line| OrderLineRequest {
                recipe_id: RecipeId::new(line.recipe),
                size: line.size,
                crust: line.crust,
                quantity: line.quantity,
                custom_ingredients: line
                    .extras
                    .into_iter()
                    .map(|(ingredient, portions)| (IngredientId::new(ingredient), portions))
                    .collect(),
            })
            .collect();

        Ok(FixtureOrder {
            request: OrderRequest {
                customer_id: None,
                customer_info,
                customer_type: customer.customer_type,
                is_happy_hour: happy_hour,
                lines,
                delivery_type,
                delivery_address,
            },
            strategy,
            placed_at: parse_timestamp(&placed_at)?,
        })
    }
}

impl TryFrom<AddressFixture> for Address {
    type Error = FixtureError;

    fn try_from(fixture: AddressFixture) -> Result<Self, Self::Error> {
        let mut address = Address::new(&fixture.street, &fixture.city)?;

        if let Some(postal_code) = fixture.postal_code.as_deref() {
            address = address.with_postal_code(postal_code);
        }

        if let Some(instructions) = fixture.instructions.as_deref() {
            address = address.with_instructions(instructions);
        }

        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::errors::ValidationError;

    const ORDERS: &str = r#"
orders:
  lunch:
    placed_at: "2026-10-18T12:15:00Z"
    strategy: VIP
    customer:
      name: Grace
      phone: "555 0101"
      type: VIP
    delivery_type: DELIVERY
    address:
      street: 1 Harbour Rd
      city: Arlington
      instructions: Leave at reception
    items:
      - recipe: pepperoni
        size: MEDIUM
        crust: THIN
        extras:
          olives: 2
"#;

    #[test]
    fn order_fixture_builds_request() -> TestResult {
        let fixture: OrdersFixture = serde_norway::from_str(ORDERS)?;
        let lunch = fixture.orders.into_iter().next().ok_or("missing order")?.1;
        let order = FixtureOrder::try_from(lunch)?;

        assert_eq!(order.strategy, PricingStrategy::Vip);
        assert_eq!(order.placed_at, "2026-10-18T12:15:00Z".parse::<Timestamp>()?);
        assert_eq!(order.request.customer_type, CustomerType::Vip);
        assert_eq!(order.request.customer_info.name(), "Grace");
        assert!(!order.request.is_happy_hour);

        let address = order.request.delivery_address.ok_or("missing address")?;

        assert_eq!(address.instructions(), Some("Leave at reception"));
        assert_eq!(address.postal_code(), None);

        let line = order.request.lines.first().ok_or("missing line")?;

        assert_eq!(line.quantity, 1);
        assert_eq!(line.custom_ingredients.get(&IngredientId::from("olives")), Some(&2));

        Ok(())
    }

    #[test]
    fn order_fixture_rejects_blank_contact_details() {
        let fixture = OrderFixture {
            placed_at: "2026-10-18T12:15:00Z".to_string(),
            strategy: PricingStrategy::default(),
            customer: CustomerFixture {
                name: "  ".to_string(),
                phone: "555".to_string(),
                email: None,
                customer_type: CustomerType::Regular,
            },
            happy_hour: false,
            delivery_type: DeliveryType::Pickup,
            address: None,
            items: Vec::new(),
        };

        assert!(matches!(
            FixtureOrder::try_from(fixture),
            Err(FixtureError::Validation(ValidationError::EmptyField("customer name")))
        ));
    }
}
