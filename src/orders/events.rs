//! Order Events
//!
//! Facts produced by order transitions. Dispatching them is left to the caller.

use jiff::Timestamp;
use serde::Serialize;

use crate::{
    money::Money,
    orders::{OrderId, OrderStatus, PaymentStatus},
};

/// Something that happened to an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    /// A new order was placed.
    OrderPlaced {
        /// Order identity
        order_id: OrderId,
        /// Amount owed
        total: Money,
        /// When it happened
        at: Timestamp,
    },

    /// The order moved to a new status.
    StatusChanged {
        /// Order identity
        order_id: OrderId,
        /// Status before the change
        old: OrderStatus,
        /// Status after the change
        new: OrderStatus,
        /// When it happened
        at: Timestamp,
    },

    /// The payment status changed.
    PaymentStatusChanged {
        /// Order identity
        order_id: OrderId,
        /// Payment status before the change
        old: PaymentStatus,
        /// Payment status after the change
        new: PaymentStatus,
        /// When it happened
        at: Timestamp,
    },
}

impl OrderEvent {
    /// Order the event belongs to.
    pub fn order_id(&self) -> OrderId {
        match self {
            OrderEvent::OrderPlaced { order_id, .. }
            | OrderEvent::StatusChanged { order_id, .. }
            | OrderEvent::PaymentStatusChanged { order_id, .. } => *order_id,
        }
    }

    /// When the event happened.
    pub fn at(&self) -> Timestamp {
        match self {
            OrderEvent::OrderPlaced { at, .. }
            | OrderEvent::StatusChanged { at, .. }
            | OrderEvent::PaymentStatusChanged { at, .. } => *at,
        }
    }
}
