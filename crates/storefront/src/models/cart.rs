//! Session cart.
//!
//! A cart is an ordered list of line items. The pair (product id, size) is
//! unique within a cart: adding an existing pair merges quantities instead of
//! appending a second line.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use atelier_core::{Price, ProductId};

/// Size used when the client does not pick one.
pub const DEFAULT_SIZE: &str = "One Size";

/// A cart line with the product details captured when it was added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    /// Product id.
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub size: String,
    pub quantity: u32,
    pub image: Option<String>,
}

impl CartItem {
    /// Line total (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.amount() * Decimal::from(self.quantity)
    }

    fn matches(&self, id: ProductId, size: &str) -> bool {
        self.id == id && self.size == size
    }
}

/// The per-visitor cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Add a line, merging with an existing (id, size) line.
    pub fn add(&mut self, item: CartItem) {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.matches(item.id, &item.size))
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            self.items.push(item);
        }
    }

    /// Remove every line for `id`, whatever the size.
    ///
    /// Returns the number of lines removed.
    pub fn remove(&mut self, id: ProductId) -> usize {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        before - self.items.len()
    }

    /// Replace the quantity of the exact (id, size) line.
    ///
    /// A quantity of zero or less deletes the line. Returns `false` when no
    /// such line exists.
    pub fn update_quantity(&mut self, id: ProductId, size: &str, quantity: i64) -> bool {
        let Some(pos) = self.items.iter().position(|i| i.matches(id, size)) else {
            return false;
        };

        if quantity <= 0 {
            self.items.remove(pos);
            return true;
        }

        if let Some(line) = self.items.get_mut(pos) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        true
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Move every line out, leaving the cart empty.
    pub fn take_items(&mut self) -> Vec<CartItem> {
        std::mem::take(&mut self.items)
    }
}
