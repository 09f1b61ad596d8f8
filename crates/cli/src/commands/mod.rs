//! Command implementations.
//!
//! Each command drives `AppState` and prints for the shopper; errors are
//! returned to `main`, which reports them once.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod shop;
