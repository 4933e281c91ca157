//! Order service.
//!
//! Turns a cart snapshot and the checkout form into a ledger entry, and
//! scopes order reads to their owner.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::instrument;

use atelier_core::{Email, OrderStatus, PaymentStatus, Price, PriceError};

use crate::db::{OrderRepository, RepositoryError};
use crate::models::{CartItem, NewOrder, Order};

/// Payment method recorded when the client does not name one.
pub const DEFAULT_PAYMENT_METHOD: &str = "razorpay";

/// Order errors.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Total must be a number between 0 and 999999")]
    InvalidTotal(#[source] PriceError),

    #[error("Invalid order status: {0}")]
    InvalidStatus(String),

    #[error("Order not found")]
    NotFound,

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Checkout form submitted with `POST /api/orders`.
///
/// Line items always come from the session cart, never from this body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Number or numeric string; the cart subtotal when absent.
    #[serde(default)]
    pub total: Option<Value>,
    #[serde(default)]
    pub shipping_address: Option<Map<String, Value>>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
}

/// Order service over the ledger.
pub struct OrderService<'a> {
    orders: &'a dyn OrderRepository,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(orders: &'a dyn OrderRepository) -> Self {
        Self { orders }
    }

    /// Record an order for `customer` from the given cart lines.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyCart` when `items` is empty and
    /// `OrderError::InvalidTotal` for a malformed total.
    #[instrument(skip(self, items, request), fields(customer = %customer, lines = items.len()))]
    pub fn place(
        &self,
        customer: &Email,
        items: Vec<CartItem>,
        request: CheckoutRequest,
    ) -> Result<Order, OrderError> {
        if items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let total = match request.total {
            None | Some(Value::Null) => {
                Price::new(items.iter().map(CartItem::line_total).sum())
            }
            Some(value) => Price::from_json(&value),
        }
        .map_err(OrderError::InvalidTotal)?;

        let payment_method = request
            .payment_method
            .map(|m| m.trim().to_owned())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_owned());

        let order = self.orders.create(NewOrder {
            customer: customer.clone(),
            payment_status: request.payment_status.unwrap_or_default(),
            payment_method,
            razorpay_order_id: request.razorpay_order_id,
            razorpay_payment_id: request.razorpay_payment_id,
            items,
            total,
            shipping_address: request.shipping_address.unwrap_or_default(),
        })?;

        tracing::info!(order_id = %order.id, total = %order.total, "order recorded");
        Ok(order)
    }

    /// Orders owned by `customer`.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the ledger fails.
    pub fn list_for(&self, customer: &Email) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_for_customer(customer)?)
    }

    /// One order, only if `customer` owns it.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the id is unknown or owned by
    /// someone else.
    pub fn get_for(&self, id: &str, customer: &Email) -> Result<Order, OrderError> {
        self.orders
            .get_for_customer(id, customer)?
            .ok_or(OrderError::NotFound)
    }

    /// The whole ledger.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the ledger fails.
    pub fn list_all(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list()?)
    }

    /// Move an order to a new fulfilment status.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::InvalidStatus` for unknown statuses and
    /// `OrderError::NotFound` for unknown orders.
    pub fn update_status(&self, id: &str, status: &str) -> Result<Order, OrderError> {
        let status: OrderStatus = status
            .parse()
            .map_err(|_| OrderError::InvalidStatus(status.trim().to_owned()))?;

        let order = self
            .orders
            .update_status(id, status)?
            .ok_or(OrderError::NotFound)?;

        tracing::info!(order_id = %order.id, status = %order.status, "order status changed");
        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use atelier_core::ProductId;
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::db::InMemoryOrders;

    fn line(id: u64, price: i64, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::new(Decimal::from(price)).unwrap(),
            size: "M".to_string(),
            quantity,
            image: None,
        }
    }

    fn customer() -> Email {
        Email::parse("shopper@example.com").unwrap()
    }

    #[test]
    fn test_place_defaults() {
        let ledger = InMemoryOrders::new();
        let service = OrderService::new(&ledger);

        let order = service
            .place(
                &customer(),
                vec![line(1, 100, 2), line(2, 50, 1)],
                CheckoutRequest::default(),
            )
            .unwrap();

        assert_eq!(order.total.amount(), Decimal::from(250));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.payment_method, "razorpay");
        assert!(order.shipping_address.is_empty());
        assert_eq!(order.customer_id, customer());
        assert_eq!(order.customer_email, customer());
    }

    #[test]
    fn test_place_uses_submitted_fields() {
        let ledger = InMemoryOrders::new();
        let service = OrderService::new(&ledger);

        let request: CheckoutRequest = serde_json::from_value(json!({
            "total": "310",
            "paymentStatus": "completed",
            "razorpayOrderId": "order_123",
            "shippingAddress": {"city": "Pune"}
        }))
        .unwrap();

        let order = service
            .place(&customer(), vec![line(1, 295, 1)], request)
            .unwrap();

        assert_eq!(order.total.amount(), Decimal::from(310));
        assert_eq!(order.payment_status, PaymentStatus::Completed);
        assert_eq!(order.razorpay_order_id.as_deref(), Some("order_123"));
        assert_eq!(order.shipping_address["city"], "Pune");
    }

    #[test]
    fn test_place_rejects_empty_cart_and_bad_total() {
        let ledger = InMemoryOrders::new();
        let service = OrderService::new(&ledger);

        assert!(matches!(
            service.place(&customer(), vec![], CheckoutRequest::default()),
            Err(OrderError::EmptyCart)
        ));

        let request = CheckoutRequest {
            total: Some(json!(-1)),
            ..CheckoutRequest::default()
        };
        let err = service
            .place(&customer(), vec![line(1, 10, 1)], request)
            .unwrap_err();
        assert_eq!(err.to_string(), "Total must be a number between 0 and 999999");
        assert!(ledger.list().unwrap().is_empty());
    }

    #[test]
    fn test_get_for_other_customer_is_not_found() {
        let ledger = InMemoryOrders::new();
        let service = OrderService::new(&ledger);
        let order = service
            .place(&customer(), vec![line(1, 10, 1)], CheckoutRequest::default())
            .unwrap();

        let other = Email::parse("other@example.com").unwrap();
        assert!(matches!(
            service.get_for(order.id.as_str(), &other),
            Err(OrderError::NotFound)
        ));
        assert!(service.list_for(&other).unwrap().is_empty());
    }

    #[test]
    fn test_update_status() {
        let ledger = InMemoryOrders::new();
        let service = OrderService::new(&ledger);
        let order = service
            .place(&customer(), vec![line(1, 10, 1)], CheckoutRequest::default())
            .unwrap();

        let shipped = service.update_status(order.id.as_str(), "Shipped").unwrap();
        assert_eq!(shipped.status, OrderStatus::Shipped);

        assert!(matches!(
            service.update_status(order.id.as_str(), "lost"),
            Err(OrderError::InvalidStatus(_))
        ));
        assert!(matches!(
            service.update_status("ORD-0-0", "shipped"),
            Err(OrderError::NotFound)
        ));
    }
}
