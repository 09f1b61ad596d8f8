//! Business logic services for the storefront client.
//!
//! # Services
//!
//! - `account` - Login, signup, profile and order history
//! - `checkout` - Checkout form validation and order placement

pub mod account;
pub mod checkout;
