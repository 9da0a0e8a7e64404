//! Place Order Example
//!
//! Loads a fixture set, places one of its orders, walks it through the kitchen and
//! prints the receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-o` to pick an order from the set
//! Use `-l` to set the tracing filter, e.g. `-l pizzeria=debug`

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use jiff::SignedDuration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pizzeria::{
    fixtures::Fixture,
    ordering::place_order,
    orders::{DeliveryType, OrderAction},
    pricing::PricingPipeline,
    receipt::Receipt,
    utils::ExampleOrderArgs,
};

/// Place Order Example
pub fn main() -> Result<()> {
    let args = ExampleOrderArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log_level)?)
        .init();

    let fixture = Fixture::from_set(&args.fixture)?;
    let menu = fixture.menu()?;

    let key = match args.order.as_deref() {
        Some(key) => key,
        None => fixture
            .order_keys()
            .first()
            .copied()
            .context("fixture set has no orders")?,
    };

    let entry = fixture.order(key)?;
    let pipeline = PricingPipeline::for_strategy(entry.strategy);
    let mut at = entry.placed_at;

    let placed = place_order(
        menu,
        entry.request.clone(),
        &pipeline,
        fixture.policy(),
        at,
    )?;

    let mut order = placed.order;
    let mut events = placed.events.into_vec();

    let mut actions = vec![
        OrderAction::MarkPaymentAsPaid,
        OrderAction::Confirm,
        OrderAction::StartPreparation,
        OrderAction::MarkAsReady,
    ];

    if order.delivery_type() == DeliveryType::Delivery {
        actions.push(OrderAction::StartDelivery);
    }

    actions.push(OrderAction::MarkAsDelivered);

    for action in actions {
        at = at.checked_add(SignedDuration::from_mins(5))?;

        let transition = order.perform(action, at)?;

        order = transition.order;
        events.extend(transition.events);
    }

    for event in &events {
        info!(order_id = %event.order_id(), at = %event.at(), ?event, "event");
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::new(&order).write_to(&mut handle, menu)?;

    Ok(())
}
