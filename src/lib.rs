//! Pizzeria
//!
//! Order pricing and order lifecycle engine for a pizza storefront: money arithmetic,
//! a pipeline of pricing rules, and an immutable order aggregate whose transitions
//! return the next order together with the events they produced.

pub mod errors;
pub mod fixtures;
pub mod menu;
pub mod money;
pub mod ordering;
pub mod orders;
pub mod pizzas;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod utils;
