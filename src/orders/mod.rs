//! Orders
//!
//! The order aggregate. Orders are created through [`Order::place`] and only change
//! through the transition functions in [`lifecycle`], each of which returns a new
//! order together with the events it produced.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use serde::Serialize;
use smallvec::smallvec;
use tracing::info;
use uuid::Uuid;

use crate::{
    errors::ValidationError,
    money::{Currency, Money},
    orders::{events::OrderEvent, items::OrderItem, policy::OrderPolicy},
};

pub mod events;
pub mod items;
pub mod lifecycle;
pub mod policy;

pub use lifecycle::{OrderAction, Transition};

/// Order identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Generate a fresh random identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for OrderId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered customer identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CustomerId(Uuid);

impl From<Uuid> for CustomerId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Where an order is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed, waiting for the shop to accept it
    Pending,

    /// Accepted by the shop
    Confirmed,

    /// In the kitchen
    Preparing,

    /// Ready for pickup or for the courier
    Ready,

    /// With the courier
    OutForDelivery,

    /// Handed to the customer
    Delivered,

    /// Cancelled before completion
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        })
    }
}

/// Payment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Not paid yet
    Pending,

    /// Paid in full
    Paid,

    /// The payment attempt failed
    Failed,

    /// Paid, then returned after cancellation
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Refunded => "REFUNDED",
        })
    }
}

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    /// Customer collects from the shop
    Pickup,

    /// A courier brings it to the customer
    Delivery,
}

/// Customer contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerInfo {
    name: String,
    phone: String,
    email: Option<String>,
}

impl CustomerInfo {
    /// Validate and trim contact details.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] if the name or phone is blank.
    pub fn new(
        name: impl AsRef<str>,
        phone: impl AsRef<str>,
        email: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required(name.as_ref(), "customer name")?,
            phone: required(phone.as_ref(), "customer phone")?,
            email: optional(email),
        })
    }

    /// Customer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Customer phone number
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Customer email, if given
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// Delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    street: String,
    city: String,
    postal_code: Option<String>,
    instructions: Option<String>,
}

impl Address {
    /// Validate and trim an address.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] if the street or city is blank.
    pub fn new(street: impl AsRef<str>, city: impl AsRef<str>) -> Result<Self, ValidationError> {
        Ok(Self {
            street: required(street.as_ref(), "street")?,
            city: required(city.as_ref(), "city")?,
            postal_code: None,
            instructions: None,
        })
    }

    /// Attach a postal code.
    #[must_use]
    pub fn with_postal_code(mut self, postal_code: &str) -> Self {
        self.postal_code = optional(Some(postal_code));
        self
    }

    /// Attach courier instructions.
    #[must_use]
    pub fn with_instructions(mut self, instructions: &str) -> Self {
        self.instructions = optional(Some(instructions));
        self
    }

    /// Street and house number
    pub fn street(&self) -> &str {
        &self.street
    }

    /// City
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Postal code, if given
    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }

    /// Courier instructions, if given
    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(value.to_string())
    }
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Pickup, or delivery to an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "delivery_type", content = "delivery_address")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Fulfilment {
    /// Customer collects from the shop
    Pickup,

    /// A courier brings it to the address
    Delivery(Address),
}

impl Fulfilment {
    /// Pair a delivery type with an optional address.
    ///
    /// # Errors
    ///
    /// Returns an error if a delivery has no address or a pickup has one.
    pub fn new(
        delivery_type: DeliveryType,
        delivery_address: Option<Address>,
    ) -> Result<Self, ValidationError> {
        match (delivery_type, delivery_address) {
            (DeliveryType::Pickup, None) => Ok(Fulfilment::Pickup),
            (DeliveryType::Pickup, Some(_)) => Err(ValidationError::UnexpectedDeliveryAddress),
            (DeliveryType::Delivery, Some(address)) => Ok(Fulfilment::Delivery(address)),
            (DeliveryType::Delivery, None) => Err(ValidationError::MissingDeliveryAddress),
        }
    }

    /// Delivery type
    pub fn delivery_type(&self) -> DeliveryType {
        match self {
            Fulfilment::Pickup => DeliveryType::Pickup,
            Fulfilment::Delivery(_) => DeliveryType::Delivery,
        }
    }

    /// Delivery address, for deliveries
    pub fn address(&self) -> Option<&Address> {
        match self {
            Fulfilment::Pickup => None,
            Fulfilment::Delivery(address) => Some(address),
        }
    }
}

/// Unvalidated input for [`Order::place`].
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Registered customer, if signed in
    pub customer_id: Option<CustomerId>,

    /// Contact details
    pub customer_info: CustomerInfo,

    /// Priced lines
    pub items: Vec<OrderItem>,

    /// Pickup or delivery
    pub delivery_type: DeliveryType,

    /// Required for deliveries, forbidden for pickups
    pub delivery_address: Option<Address>,
}

/// Order aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    id: OrderId,
    customer_id: Option<CustomerId>,
    customer_info: CustomerInfo,
    items: Vec<OrderItem>,
    #[serde(flatten)]
    fulfilment: Fulfilment,
    subtotal: Money,
    tax: Money,
    delivery_fee: Money,
    total_amount: Money,
    status: OrderStatus,
    payment_status: PaymentStatus,
    estimated_delivery_time: Option<Timestamp>,
    #[serde(skip)]
    fulfilment_time: SignedDuration,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Order {
    /// Validate a new order, compute its totals and place it as `PENDING`.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no items, an item quantity exceeds the policy
    /// limit, the items use different currencies, or the delivery address does not
    /// match the delivery type. Invalid policy settings are rejected too.
    pub fn place(
        new_order: NewOrder,
        policy: &OrderPolicy,
        at: Timestamp,
    ) -> Result<Transition, ValidationError> {
        let NewOrder {
            customer_id,
            customer_info,
            items,
            delivery_type,
            delivery_address,
        } = new_order;

        policy.validate()?;

        let currency = items
            .first()
            .map(|item| item.unit_price().currency())
            .ok_or(ValidationError::NoItems)?;

        if let Some(item) = items
            .iter()
            .find(|item| item.quantity() > policy.max_item_quantity)
        {
            return Err(ValidationError::QuantityOutOfRange {
                field: "quantity",
                quantity: item.quantity(),
                max: policy.max_item_quantity,
            });
        }

        let fulfilment = Fulfilment::new(delivery_type, delivery_address)?;
        let subtotal = subtotal(&items, currency)?;
        let tax = policy.tax_on(subtotal)?;
        let delivery_fee = policy.delivery_fee_for(delivery_type, currency)?;
        let total_amount = subtotal.add(tax)?.add(delivery_fee)?;
        let fulfilment_time = policy.fulfilment_time(&items, delivery_type)?;

        let order = Order {
            id: OrderId::new(),
            customer_id,
            customer_info,
            items,
            fulfilment,
            subtotal,
            tax,
            delivery_fee,
            total_amount,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            estimated_delivery_time: None,
            fulfilment_time,
            created_at: at,
            updated_at: at,
        };

        info!(
            order_id = %order.id,
            total = %order.total_amount,
            delivery_type = ?delivery_type,
            "order placed"
        );

        let event = OrderEvent::OrderPlaced {
            order_id: order.id,
            total: order.total_amount,
            at,
        };

        Ok(Transition {
            order,
            events: smallvec![event],
        })
    }

    /// Order identity
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Registered customer, if any
    pub fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id
    }

    /// Contact details
    pub fn customer_info(&self) -> &CustomerInfo {
        &self.customer_info
    }

    /// Order lines
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Pickup or delivery, with the address for deliveries
    pub fn fulfilment(&self) -> &Fulfilment {
        &self.fulfilment
    }

    /// Pickup or delivery
    pub fn delivery_type(&self) -> DeliveryType {
        self.fulfilment.delivery_type()
    }

    /// Delivery address, for deliveries
    pub fn delivery_address(&self) -> Option<&Address> {
        self.fulfilment.address()
    }

    /// Currency every amount on the order is in
    pub fn currency(&self) -> Currency {
        self.total_amount.currency()
    }

    /// Sum of the line totals
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    /// Tax on the subtotal
    pub fn tax(&self) -> Money {
        self.tax
    }

    /// Delivery fee
    pub fn delivery_fee(&self) -> Money {
        self.delivery_fee
    }

    /// Subtotal plus tax plus delivery fee
    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// Lifecycle status
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Payment status
    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Expected hand-over time, set on confirmation
    pub fn estimated_delivery_time(&self) -> Option<Timestamp> {
        self.estimated_delivery_time
    }

    /// When the order was placed
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// When the order last changed
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

/// Sum of the line totals, rounded to cents.
fn subtotal(items: &[OrderItem], currency: Currency) -> Result<Money, ValidationError> {
    let total = items
        .iter()
        .try_fold(Money::zero(currency), |acc, item| acc.add(item.total_price()))?;

    Ok(total.round_to_cents())
}
