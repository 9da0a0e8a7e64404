//! Order Lifecycle
//!
//! `PENDING → CONFIRMED → PREPARING → READY → OUT_FOR_DELIVERY → DELIVERED`, where
//! pickup orders go straight from `READY` to `DELIVERED`. Orders can be cancelled
//! until they are out for delivery.
//!
//! Every transition borrows the current order and, if its preconditions hold, returns
//! the next order with the events describing the change. The input is never modified.

use std::fmt;

use jiff::Timestamp;
use smallvec::{SmallVec, smallvec};
use tracing::{info, warn};

use crate::{
    errors::BusinessRuleViolation,
    orders::{DeliveryType, Order, OrderStatus, PaymentStatus, events::OrderEvent},
};

/// Operations that change an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderAction {
    /// Accept a pending order
    Confirm,

    /// Send a paid, confirmed order to the kitchen
    StartPreparation,

    /// Finish cooking
    MarkAsReady,

    /// Hand a delivery order to the courier
    StartDelivery,

    /// Hand the order to the customer
    MarkAsDelivered,

    /// Cancel the order
    Cancel,

    /// Record a successful payment
    MarkPaymentAsPaid,

    /// Record a failed payment attempt
    MarkPaymentAsFailed,
}

impl OrderAction {
    /// Every action.
    pub const ALL: [OrderAction; 8] = [
        OrderAction::Confirm,
        OrderAction::StartPreparation,
        OrderAction::MarkAsReady,
        OrderAction::StartDelivery,
        OrderAction::MarkAsDelivered,
        OrderAction::Cancel,
        OrderAction::MarkPaymentAsPaid,
        OrderAction::MarkPaymentAsFailed,
    ];
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrderAction::Confirm => "confirm",
            OrderAction::StartPreparation => "start preparation",
            OrderAction::MarkAsReady => "mark as ready",
            OrderAction::StartDelivery => "start delivery",
            OrderAction::MarkAsDelivered => "mark as delivered",
            OrderAction::Cancel => "cancel",
            OrderAction::MarkPaymentAsPaid => "mark payment as paid",
            OrderAction::MarkPaymentAsFailed => "mark payment as failed",
        })
    }
}

/// The order after a transition, with the events it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The updated order
    pub order: Order,

    /// Events in the order they happened
    pub events: SmallVec<[OrderEvent; 2]>,
}

impl Transition {
    /// Split into the order and its events.
    pub fn into_parts(self) -> (Order, SmallVec<[OrderEvent; 2]>) {
        (self.order, self.events)
    }
}

impl Order {
    /// Perform `action` at `at`.
    ///
    /// # Errors
    ///
    /// Returns a [`BusinessRuleViolation`] if the action is not allowed right now.
    pub fn perform(
        &self,
        action: OrderAction,
        at: Timestamp,
    ) -> Result<Transition, BusinessRuleViolation> {
        match action {
            OrderAction::Confirm => self.confirm(at),
            OrderAction::StartPreparation => self.start_preparation(at),
            OrderAction::MarkAsReady => self.mark_as_ready(at),
            OrderAction::StartDelivery => self.start_delivery(at),
            OrderAction::MarkAsDelivered => self.mark_as_delivered(at),
            OrderAction::Cancel => self.cancel(at),
            OrderAction::MarkPaymentAsPaid => self.mark_payment_as_paid(at),
            OrderAction::MarkPaymentAsFailed => self.mark_payment_as_failed(at),
        }
    }

    /// Accept the order and estimate when it reaches the customer.
    ///
    /// # Errors
    ///
    /// Returns a [`BusinessRuleViolation`] unless the order is `PENDING`, or if the
    /// estimate would fall outside the supported time range.
    pub fn confirm(&self, at: Timestamp) -> Result<Transition, BusinessRuleViolation> {
        self.require_status(OrderAction::Confirm, &[OrderStatus::Pending])?;

        let eta = at
            .checked_add(self.fulfilment_time)
            .map_err(|_| self.rejected(BusinessRuleViolation::EstimateOutOfRange))?;

        let mut next = self.clone();
        next.estimated_delivery_time = Some(eta);

        Ok(next.move_to(OrderStatus::Confirmed, at))
    }

    /// Send the order to the kitchen.
    ///
    /// # Errors
    ///
    /// Returns a [`BusinessRuleViolation`] unless the order is `CONFIRMED` and paid.
    pub fn start_preparation(&self, at: Timestamp) -> Result<Transition, BusinessRuleViolation> {
        self.require_status(OrderAction::StartPreparation, &[OrderStatus::Confirmed])?;

        if self.payment_status != PaymentStatus::Paid {
            return Err(self.rejected(BusinessRuleViolation::PaymentRequired {
                payment: self.payment_status,
            }));
        }

        Ok(self.clone().move_to(OrderStatus::Preparing, at))
    }

    /// Finish cooking.
    ///
    /// # Errors
    ///
    /// Returns a [`BusinessRuleViolation`] unless the order is `PREPARING`.
    pub fn mark_as_ready(&self, at: Timestamp) -> Result<Transition, BusinessRuleViolation> {
        self.require_status(OrderAction::MarkAsReady, &[OrderStatus::Preparing])?;

        Ok(self.clone().move_to(OrderStatus::Ready, at))
    }

    /// Hand the order to the courier.
    ///
    /// # Errors
    ///
    /// Returns a [`BusinessRuleViolation`] for pickup orders, or unless the order is `READY`.
    pub fn start_delivery(&self, at: Timestamp) -> Result<Transition, BusinessRuleViolation> {
        if self.delivery_type() == DeliveryType::Pickup {
            return Err(self.rejected(BusinessRuleViolation::NotADeliveryOrder));
        }

        self.require_status(OrderAction::StartDelivery, &[OrderStatus::Ready])?;

        Ok(self.clone().move_to(OrderStatus::OutForDelivery, at))
    }

    /// Hand the order to the customer.
    ///
    /// # Errors
    ///
    /// Returns a [`BusinessRuleViolation`] unless a pickup order is `READY` or a
    /// delivery order is `OUT_FOR_DELIVERY`.
    pub fn mark_as_delivered(&self, at: Timestamp) -> Result<Transition, BusinessRuleViolation> {
        let expected = match self.delivery_type() {
            DeliveryType::Pickup => OrderStatus::Ready,
            DeliveryType::Delivery => OrderStatus::OutForDelivery,
        };

        self.require_status(OrderAction::MarkAsDelivered, &[expected])?;

        Ok(self.clone().move_to(OrderStatus::Delivered, at))
    }

    /// Cancel the order, refunding it if it was paid.
    ///
    /// # Errors
    ///
    /// Returns a [`BusinessRuleViolation`] once the order is out for delivery,
    /// delivered or already cancelled.
    pub fn cancel(&self, at: Timestamp) -> Result<Transition, BusinessRuleViolation> {
        self.require_status(
            OrderAction::Cancel,
            &[
                OrderStatus::Pending,
                OrderStatus::Confirmed,
                OrderStatus::Preparing,
                OrderStatus::Ready,
            ],
        )?;

        let mut next = self.clone();
        let refund = (next.payment_status == PaymentStatus::Paid)
            .then(|| next.set_payment_status(PaymentStatus::Refunded, at));

        let mut transition = next.move_to(OrderStatus::Cancelled, at);
        transition.events.extend(refund);

        Ok(transition)
    }

    /// Record a successful payment.
    ///
    /// # Errors
    ///
    /// Returns a [`BusinessRuleViolation`] if the order is cancelled or already paid.
    pub fn mark_payment_as_paid(&self, at: Timestamp) -> Result<Transition, BusinessRuleViolation> {
        self.require_payment(
            OrderAction::MarkPaymentAsPaid,
            &[PaymentStatus::Pending, PaymentStatus::Failed],
        )?;

        Ok(self.clone().move_payment_to(PaymentStatus::Paid, at))
    }

    /// Record a failed payment attempt.
    ///
    /// # Errors
    ///
    /// Returns a [`BusinessRuleViolation`] if the order is cancelled or payment is not pending.
    pub fn mark_payment_as_failed(&self, at: Timestamp) -> Result<Transition, BusinessRuleViolation> {
        self.require_payment(OrderAction::MarkPaymentAsFailed, &[PaymentStatus::Pending])?;

        Ok(self.clone().move_payment_to(PaymentStatus::Failed, at))
    }

    fn require_status(
        &self,
        action: OrderAction,
        allowed: &[OrderStatus],
    ) -> Result<(), BusinessRuleViolation> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(self.rejected(BusinessRuleViolation::InvalidTransition {
                action,
                status: self.status,
            }))
        }
    }

    fn require_payment(
        &self,
        action: OrderAction,
        allowed: &[PaymentStatus],
    ) -> Result<(), BusinessRuleViolation> {
        if self.status == OrderStatus::Cancelled {
            return Err(self.rejected(BusinessRuleViolation::InvalidTransition {
                action,
                status: self.status,
            }));
        }

        if allowed.contains(&self.payment_status) {
            Ok(())
        } else {
            Err(self.rejected(BusinessRuleViolation::PaymentConflict {
                action,
                payment: self.payment_status,
            }))
        }
    }

    fn rejected(&self, violation: BusinessRuleViolation) -> BusinessRuleViolation {
        warn!(order_id = %self.id, status = %self.status, %violation, "order transition rejected");

        violation
    }

    fn move_to(mut self, status: OrderStatus, at: Timestamp) -> Transition {
        let old = self.status;

        self.status = status;
        self.updated_at = at;

        info!(order_id = %self.id, from = %old, to = %status, "order status changed");

        let event = OrderEvent::StatusChanged {
            order_id: self.id,
            old,
            new: status,
            at,
        };

        Transition {
            order: self,
            events: smallvec![event],
        }
    }

    fn move_payment_to(mut self, payment_status: PaymentStatus, at: Timestamp) -> Transition {
        let event = self.set_payment_status(payment_status, at);

        Transition {
            order: self,
            events: smallvec![event],
        }
    }

    fn set_payment_status(&mut self, payment_status: PaymentStatus, at: Timestamp) -> OrderEvent {
        let old = self.payment_status;

        self.payment_status = payment_status;
        self.updated_at = at;

        info!(order_id = %self.id, from = %old, to = %payment_status, "payment status changed");

        OrderEvent::PaymentStatusChanged {
            order_id: self.id,
            old,
            new: payment_status,
            at,
        }
    }
}
