//! Errors

use rust_decimal::Decimal;
use rusty_money::MoneyError;
use thiserror::Error;

use crate::orders::{OrderAction, OrderStatus, PaymentStatus};

/// Malformed input rejected before it can reach an order or a price.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Monetary amounts must not be negative.
    #[error("amount must not be negative, got {0}")]
    NegativeAmount(Decimal),

    /// Multiplication factors must not be negative.
    #[error("factor must not be negative, got {0}")]
    NegativeFactor(Decimal),

    /// Subtracting would take the amount below zero.
    #[error("cannot subtract {subtrahend} from {minuend}: result would be negative")]
    NegativeDifference {
        /// Amount being subtracted from
        minuend: Decimal,
        /// Amount being subtracted
        subtrahend: Decimal,
    },

    /// The amount no longer fits the numeric range.
    #[error("amount overflowed")]
    AmountOverflow,

    /// Two amounts carry different currencies.
    #[error("currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// Currency of the left-hand operand
        expected: &'static str,
        /// Currency of the right-hand operand
        found: &'static str,
    },

    /// Currency code is not one the storefront accepts.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A required text field was empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// A quantity fell outside its permitted range.
    #[error("{field} must be between 1 and {max}, got {quantity}")]
    QuantityOutOfRange {
        /// Field being validated
        field: &'static str,
        /// Quantity supplied
        quantity: u32,
        /// Largest permitted quantity
        max: u32,
    },

    /// Delivery orders need somewhere to deliver to.
    #[error("delivery orders require a delivery address")]
    MissingDeliveryAddress,

    /// Pickup orders must not carry a delivery address.
    #[error("pickup orders must not have a delivery address")]
    UnexpectedDeliveryAddress,

    /// Orders need at least one item.
    #[error("an order needs at least one item")]
    NoItems,

    /// The recipe is not on the menu.
    #[error("unknown recipe: {0}")]
    UnknownRecipe(String),

    /// The ingredient has no price.
    #[error("unknown ingredient: {0}")]
    UnknownIngredient(String),

    /// A seasonal window ends before it starts.
    #[error("seasonal modifier {0} ends before it starts")]
    InvalidSeasonalWindow(String),

    /// An order policy setting falls outside its permitted range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    SettingOutOfRange {
        /// Setting being validated
        field: &'static str,
        /// Value supplied
        value: i64,
        /// Smallest permitted value
        min: i64,
        /// Largest permitted value
        max: i64,
    },

    /// The kitchen and courier minutes for an order no longer fit a duration.
    #[error("fulfilment time overflowed")]
    FulfilmentTimeOverflow,

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A lifecycle rule forbids the requested change in the order's current state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BusinessRuleViolation {
    /// The action is not allowed from the current status.
    #[error("cannot {action}: order is {status}")]
    InvalidTransition {
        /// Attempted action
        action: OrderAction,
        /// Status the order was in
        status: OrderStatus,
    },

    /// Preparation only starts once the order is paid for.
    #[error("cannot start preparation while payment is {payment}")]
    PaymentRequired {
        /// Payment status at the time of the attempt
        payment: PaymentStatus,
    },

    /// Pickup orders never go out with a courier.
    #[error("pickup orders cannot be sent out for delivery")]
    NotADeliveryOrder,

    /// The payment status does not allow the requested change.
    #[error("cannot {action} while payment is {payment}")]
    PaymentConflict {
        /// Attempted action
        action: OrderAction,
        /// Payment status at the time of the attempt
        payment: PaymentStatus,
    },

    /// The delivery estimate falls outside the representable time range.
    #[error("delivery estimate is out of range")]
    EstimateOutOfRange,
}

/// Umbrella error for use cases that both validate input and move orders along.
#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A lifecycle rule was violated.
    #[error(transparent)]
    BusinessRule(#[from] BusinessRuleViolation),
}
