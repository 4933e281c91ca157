//! Order records.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use atelier_core::{Email, OrderId, OrderStatus, PaymentStatus, Price};

use super::CartItem;

/// A recorded order.
///
/// Everything except `status` is fixed at creation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Owner identity; orders are only visible to this user and the admin.
    pub customer_id: Email,
    pub customer_email: Email,
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: String,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub items: Vec<CartItem>,
    pub total: Price,
    pub shipping_address: Map<String, Value>,
}

/// An order awaiting its id and timestamp from the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer: Email,
    pub payment_status: PaymentStatus,
    pub payment_method: String,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub items: Vec<CartItem>,
    pub total: Price,
    pub shipping_address: Map<String, Value>,
}

impl NewOrder {
    /// Build the stored record. New orders always start `Pending`.
    #[must_use]
    pub fn into_order(self, id: OrderId, date: DateTime<Utc>) -> Order {
        Order {
            id,
            customer_id: self.customer.clone(),
            customer_email: self.customer,
            date,
            status: OrderStatus::Pending,
            payment_status: self.payment_status,
            payment_method: self.payment_method,
            razorpay_order_id: self.razorpay_order_id,
            razorpay_payment_id: self.razorpay_payment_id,
            items: self.items,
            total: self.total,
            shipping_address: self.shipping_address,
        }
    }
}
