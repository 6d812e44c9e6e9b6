//! Order entities and lifecycle predicates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OrderStatus represents the current state of an order.
///
/// `Cancelled` and `Shipped` are terminal: once reached, no further
/// transitions are offered. The server is the only authority on transitions;
/// the client only requests them and re-fetches the order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Sentinel for an uninitialized status. Never a transition target.
    #[default]
    #[serde(rename = "-")]
    Unset,
    /// Order has been placed by the user.
    #[serde(rename = "PLACED")]
    Placed,
    /// Payment has been confirmed.
    #[serde(rename = "PAID")]
    Paid,
    /// The vendor has started shipment.
    #[serde(rename = "SHIPPING")]
    Shipping,
    /// The order has been delivered (terminal).
    #[serde(rename = "SHIPPED")]
    Shipped,
    /// The order was cancelled before shipment (terminal).
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Unset => "-",
            OrderStatus::Placed => "PLACED",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipping => "SHIPPING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

/// Order as returned by the order endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique identifier assigned by the server.
    pub id: u64,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
    /// When the status last changed.
    pub status_change_time: DateTime<Utc>,
    /// Total price across all line items.
    pub total_price: Decimal,
    /// Payment method reference.
    pub payment_method_id: String,
    /// Human-readable payment method name.
    #[serde(default)]
    pub payment_method_name: Option<String>,
    /// Shipping destination.
    pub shipping_address: String,
    /// Recipient name.
    pub recipient_name: String,
    /// Recipient phone number.
    pub recipient_phone: String,
    /// Vendor fulfilling this order.
    pub vendor_id: u64,
    /// Vendor display name.
    pub vendor_name: String,
    /// Line items; omitted by list endpoints.
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// A single line item within an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: u64,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl Order {
    /// Returns true if the user may still cancel this order.
    /// Cancellation is only offered before shipment begins.
    pub fn is_cancellable(&self) -> bool {
        !matches!(
            self.status,
            OrderStatus::Cancelled | OrderStatus::Shipping | OrderStatus::Shipped
        )
    }

    /// Returns true if a vendor may push this order to its next status.
    /// Any non-terminal order qualifies; the server computes what the next
    /// status actually is.
    pub fn is_advanceable(&self) -> bool {
        !matches!(self.status, OrderStatus::Cancelled | OrderStatus::Shipped)
    }
}

/// Request body for `POST /orders`: one sub-order per vendor plus a shared
/// payment/recipient payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersCreate {
    // The backend marshals this field with a capitalized key.
    #[serde(rename = "Orders")]
    pub orders: Vec<OrderCreate>,
    pub payment_method_id: String,
    pub recipient_address: String,
    pub recipient_name: String,
    pub recipient_phone: String,
}

/// A single vendor's sub-order within an [`OrdersCreate`] request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderItem>,
}
