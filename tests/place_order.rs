//! Integration tests placing the orders from the `classic` fixture set.
//!
//! `family_delivery` (full pricing stack, autumn modifier active for LARGE):
//!
//! - 2 × Margherita LARGE: 16.99 × 1.3 × 1.1 = 24.2957 → $24.30 each, $48.60
//! - 1 × Pepperoni MEDIUM + mushrooms + extra mozzarella: 18.49 + 1.50 + 2.00 = $21.99
//! - Subtotal $70.59, tax $7.06, delivery $5.00, total $82.65
//!
//! `vip_happy_hour_pickup` (happy-hour strategy, VIP):
//!
//! - 3 × Marinara SMALL + 2 olives: (12.50 + 2.50) × 0.8 × 0.9 × 0.85 = $9.18 each, $27.54
//! - Subtotal $27.54, tax $2.75, no delivery fee, total $30.29

use jiff::SignedDuration;
use testresult::TestResult;

use pizzeria::{
    errors::{DomainError, ValidationError},
    fixtures::Fixture,
    ordering::{OrderLineRequest, place_order},
    orders::{OrderStatus, events::OrderEvent},
    pizzas::{Crust, PizzaSize},
    pricing::PricingPipeline,
    receipt::Receipt,
};

#[test]
fn family_delivery_is_priced_with_the_full_stack() -> TestResult {
    let fixture = Fixture::from_set("classic")?;
    let menu = fixture.menu()?;
    let entry = fixture.order("family_delivery")?;

    let placed = place_order(
        menu,
        entry.request.clone(),
        &PricingPipeline::for_strategy(entry.strategy),
        fixture.policy(),
        entry.placed_at,
    )?;

    let order = placed.order;
    let unit_prices = order
        .items()
        .iter()
        .map(|item| item.unit_price().to_cents())
        .collect::<Result<Vec<_>, _>>()?;

    assert_eq!(unit_prices, [2430, 2199]);
    assert_eq!(order.subtotal().to_cents()?, 7059);
    assert_eq!(order.tax().to_cents()?, 706);
    assert_eq!(order.delivery_fee().to_cents()?, 500);
    assert_eq!(order.total_amount().to_cents()?, 8265);
    assert_eq!(order.created_at(), entry.placed_at);
    assert_eq!(
        order.delivery_address().map(|address| address.city()),
        Some("Springfield")
    );
    assert_eq!(
        placed.events.as_slice(),
        [OrderEvent::OrderPlaced {
            order_id: order.id(),
            total: order.total_amount(),
            at: entry.placed_at,
        }]
    );

    let confirmed = order.confirm(entry.placed_at)?.order;

    assert_eq!(
        confirmed.estimated_delivery_time(),
        Some(entry.placed_at.checked_add(SignedDuration::from_mins(3 * 15 + 30 + 10))?)
    );

    Ok(())
}

#[test]
fn vip_happy_hour_pickup_skips_seasonal_pricing() -> TestResult {
    let fixture = Fixture::from_set("classic")?;
    let entry = fixture.order("vip_happy_hour_pickup")?;

    let order = place_order(
        fixture.menu()?,
        entry.request.clone(),
        &PricingPipeline::for_strategy(entry.strategy),
        fixture.policy(),
        entry.placed_at,
    )?
    .order;

    let item = order.items().first().ok_or("missing item")?;

    assert_eq!(item.unit_price().to_cents()?, 918);
    assert_eq!(order.subtotal().to_cents()?, 2754);
    assert_eq!(order.tax().to_cents()?, 275);
    assert!(order.delivery_fee().is_zero());
    assert_eq!(order.total_amount().to_cents()?, 3029);
    assert_eq!(order.status(), OrderStatus::Pending);

    Ok(())
}

#[test]
fn unknown_recipes_surface_as_domain_errors() -> TestResult {
    let fixture = Fixture::from_set("classic")?;
    let entry = fixture.order("vip_happy_hour_pickup")?;

    let mut request = entry.request.clone();
    request.lines.push(OrderLineRequest::new(
        "hawaiian",
        PizzaSize::Medium,
        Crust::Thin,
    ));

    let result = place_order(
        fixture.menu()?,
        request,
        &PricingPipeline::default(),
        fixture.policy(),
        entry.placed_at,
    );

    assert!(matches!(
        result,
        Err(DomainError::Validation(ValidationError::UnknownRecipe(recipe))) if recipe == "hawaiian"
    ));

    Ok(())
}

#[test]
fn receipt_prints_fixture_order() -> TestResult {
    let fixture = Fixture::from_set("classic")?;
    let menu = fixture.menu()?;
    let entry = fixture.order("family_delivery")?;

    let order = place_order(
        menu,
        entry.request.clone(),
        &PricingPipeline::for_strategy(entry.strategy),
        fixture.policy(),
        entry.placed_at,
    )?
    .order;

    let mut out = Vec::new();
    Receipt::new(&order).write_to(&mut out, menu)?;

    let printed = String::from_utf8(out)?;

    assert!(printed.contains("Pepperoni"), "recipe name missing");
    assert!(printed.contains("Extra mozzarella ×1"), "extras missing");
    assert!(printed.contains("82.65"), "total missing");

    Ok(())
}
