//! Kiosk Core - Shared types library.
//!
//! This crate provides common types used across all Kiosk components:
//! - `storefront` - Headless storefront client (catalog, cart, account, orders)
//! - `cli` - Terminal front end driving the storefront client
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no persistence. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for opaque IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
