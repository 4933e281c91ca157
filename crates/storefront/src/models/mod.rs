//! Domain models for storefront.
//!
//! These types are the in-memory records behind the repositories and the
//! values stored in the visitor session.

pub mod cart;
pub mod collection;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartItem};
pub use collection::Collection;
pub use order::{NewOrder, Order};
pub use product::{NewProduct, Product, ProductChanges};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
