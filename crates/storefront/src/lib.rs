//! Kiosk storefront library.
//!
//! A headless client for a Shopify store: the catalog and its browsing
//! rules, a persisted cart, customer accounts with order history, and a
//! client-side checkout. Front ends (the `kiosk` CLI, tests) drive it
//! through [`state::AppState`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod orders;
pub mod services;
pub mod session;
pub mod shopify;
pub mod state;
pub mod storage;
