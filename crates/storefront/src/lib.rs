//! Atelier storefront library.
//!
//! Catalog, session cart, password auth, the Razorpay payment bridge, the
//! order ledger, and the admin API, served by axum. The library exposes the
//! router so it can be driven in-process by the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod razorpay;
pub mod routes;
pub mod services;
pub mod state;
