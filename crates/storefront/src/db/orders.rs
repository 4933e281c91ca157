//! Order ledger.
//!
//! Orders are appended and never removed. Only the fulfilment status of a
//! stored order can change afterwards.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use atelier_core::{Email, OrderId, OrderStatus};

use super::{RepositoryError, read_guard, write_guard};
use crate::models::{NewOrder, Order};

const STORE: &str = "orders";

/// Order storage.
pub trait OrderRepository: Send + Sync {
    /// Append an order, assigning its id and creation time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::LockPoisoned` if the store is unusable.
    fn create(&self, order: NewOrder) -> Result<Order, RepositoryError>;

    /// Every order in creation order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::LockPoisoned` if the store is unusable.
    fn list(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Orders owned by `customer`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::LockPoisoned` if the store is unusable.
    fn list_for_customer(&self, customer: &Email) -> Result<Vec<Order>, RepositoryError>;

    /// Get an order only if `customer` owns it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::LockPoisoned` if the store is unusable.
    fn get_for_customer(
        &self,
        id: &str,
        customer: &Email,
    ) -> Result<Option<Order>, RepositoryError>;

    /// Set the fulfilment status. `None` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::LockPoisoned` if the store is unusable.
    fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError>;
}

/// In-memory order ledger.
#[derive(Default)]
pub struct InMemoryOrders {
    orders: RwLock<Vec<Order>>,
    sequence: AtomicU64,
}

impl InMemoryOrders {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self, now: DateTime<Utc>) -> OrderId {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        order_id(now, seq)
    }
}

/// `ORD-<YYYYMMDDHHMMSS>-<seq>`.
fn order_id(at: DateTime<Utc>, seq: u64) -> OrderId {
    OrderId::new(format!("ORD-{}-{seq}", at.format("%Y%m%d%H%M%S")))
}

impl OrderRepository for InMemoryOrders {
    fn create(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let now = Utc::now();
        let order = order.into_order(self.next_id(now), now);

        write_guard(self.orders.write(), STORE)?.push(order.clone());
        Ok(order)
    }

    fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(read_guard(self.orders.read(), STORE)?.clone())
    }

    fn list_for_customer(&self, customer: &Email) -> Result<Vec<Order>, RepositoryError> {
        Ok(read_guard(self.orders.read(), STORE)?
            .iter()
            .filter(|o| &o.customer_id == customer)
            .cloned()
            .collect())
    }

    fn get_for_customer(
        &self,
        id: &str,
        customer: &Email,
    ) -> Result<Option<Order>, RepositoryError> {
        Ok(read_guard(self.orders.read(), STORE)?
            .iter()
            .find(|o| o.id.as_str() == id && &o.customer_id == customer)
            .cloned())
    }

    fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut orders = write_guard(self.orders.write(), STORE)?;
        let Some(order) = orders.iter_mut().find(|o| o.id.as_str() == id) else {
            return Ok(None);
        };

        order.status = status;
        Ok(Some(order.clone()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use atelier_core::{PaymentStatus, Price};
    use chrono::TimeZone;
    use serde_json::Map;

    use super::*;

    fn new_order(customer: &str) -> NewOrder {
        NewOrder {
            customer: Email::parse(customer).unwrap(),
            payment_status: PaymentStatus::Pending,
            payment_method: "razorpay".to_string(),
            razorpay_order_id: None,
            razorpay_payment_id: None,
            items: vec![],
            total: Price::ZERO,
            shipping_address: Map::new(),
        }
    }

    #[test]
    fn test_order_id_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(order_id(at, 12).as_str(), "ORD-20240309140507-12");
    }

    #[test]
    fn test_same_second_orders_get_distinct_ids() {
        let ledger = InMemoryOrders::new();
        let a = ledger.create(new_order("a@example.com")).unwrap();
        let b = ledger.create(new_order("a@example.com")).unwrap();

        assert_ne!(a.id, b.id);
        assert!(a.id.as_str().starts_with("ORD-"));
        assert_eq!(a.status, OrderStatus::Pending);
    }

    #[test]
    fn test_reads_are_scoped_to_owner() {
        let ledger = InMemoryOrders::new();
        let alice = Email::parse("alice@example.com").unwrap();
        let bob = Email::parse("bob@example.com").unwrap();

        let order = ledger.create(new_order("alice@example.com")).unwrap();
        ledger.create(new_order("bob@example.com")).unwrap();

        assert_eq!(ledger.list_for_customer(&alice).unwrap().len(), 1);
        assert!(
            ledger
                .get_for_customer(order.id.as_str(), &alice)
                .unwrap()
                .is_some()
        );
        assert!(
            ledger
                .get_for_customer(order.id.as_str(), &bob)
                .unwrap()
                .is_none()
        );
        assert_eq!(ledger.list().unwrap().len(), 2);
    }

    #[test]
    fn test_update_status() {
        let ledger = InMemoryOrders::new();
        let order = ledger.create(new_order("a@example.com")).unwrap();

        let updated = ledger
            .update_status(order.id.as_str(), OrderStatus::Shipped)
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Shipped);
        assert!(
            ledger
                .update_status("ORD-missing", OrderStatus::Shipped)
                .unwrap()
                .is_none()
        );
    }
}
