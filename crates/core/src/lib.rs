//! Atelier Core - Shared types library.
//!
//! This crate provides the domain types shared by the Atelier components:
//! - `storefront` - Public JSON API, admin catalog editor, and page shells
//! - `integration-tests` - In-process HTTP tests against the storefront router
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
