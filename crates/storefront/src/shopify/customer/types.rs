//! Types for Storefront API customer accounts.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use kiosk_core::{CustomerId, OrderId};

use crate::shopify::types::Money;

// ─────────────────────────────────────────────────────────────────────────────
// Access Tokens
// ─────────────────────────────────────────────────────────────────────────────

/// Customer access token returned by `customerAccessTokenCreate`.
#[derive(Debug, Clone)]
pub struct CustomerAccessToken {
    /// The token sent with customer-scoped queries.
    pub access_token: SecretString,
    /// When Shopify stops accepting the token.
    pub expires_at: Option<DateTime<Utc>>,
}

impl CustomerAccessToken {
    /// Whether the token has expired (with 60s buffer).
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|at| Utc::now() >= at - chrono::Duration::seconds(60))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawAccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<RawAccessToken> for CustomerAccessToken {
    fn from(raw: RawAccessToken) -> Self {
        Self {
            access_token: SecretString::from(raw.access_token),
            expires_at: raw.expires_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Customer Types
// ─────────────────────────────────────────────────────────────────────────────

/// A Shopify customer with their address book and recent orders.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// The customer's unique ID.
    pub id: CustomerId,
    /// The customer's first name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// The customer's last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// The customer's email address.
    #[serde(default)]
    pub email: Option<String>,
    /// The customer's phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// The customer's default address.
    #[serde(default)]
    pub default_address: Option<Address>,
    /// First address in the address book.
    #[serde(default, deserialize_with = "nodes")]
    pub addresses: Vec<Address>,
    /// Most recent orders, newest first.
    #[serde(default, deserialize_with = "nodes")]
    pub orders: Vec<Order>,
}

impl Customer {
    /// Get the customer's full name.
    #[must_use]
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        }
    }

    /// Default address, falling back to the first address on file.
    #[must_use]
    pub fn primary_address(&self) -> Option<&Address> {
        self.default_address.as_ref().or_else(|| self.addresses.first())
    }
}

/// A customer mailing address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street address line.
    pub address1: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Province or state.
    pub province: Option<String>,
    /// Country name.
    pub country: Option<String>,
    /// Postal code.
    pub zip: Option<String>,
}

impl Address {
    /// Format the address as lines for display.
    #[must_use]
    pub fn format_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(address1) = self.address1.as_deref().filter(|s| !s.is_empty()) {
            lines.push(address1.to_string());
        }
        let locality: Vec<&str> = [self.city.as_deref(), self.zip.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        if !locality.is_empty() {
            lines.push(locality.join(", "));
        }
        if let Some(country) = self.country.as_deref().filter(|s| !s.is_empty()) {
            lines.push(country.to_string());
        }
        lines
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Order Types
// ─────────────────────────────────────────────────────────────────────────────

/// An order as returned by the customer query.
///
/// Statuses are kept as raw strings; `crate::orders` derives the
/// customer-facing status from them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order ID.
    pub id: OrderId,
    /// Sequential order number.
    pub order_number: i64,
    /// When the order was processed.
    pub processed_at: DateTime<Utc>,
    /// Financial status (e.g. `PAID`, `REFUNDED`).
    #[serde(default)]
    pub financial_status: Option<String>,
    /// Fulfillment status (e.g. `FULFILLED`).
    #[serde(default)]
    pub fulfillment_status: Option<String>,
    /// Order total.
    #[serde(default)]
    pub total_price: Money,
    /// First few line items.
    #[serde(default, deserialize_with = "nodes")]
    pub line_items: Vec<OrderLineItem>,
}

/// A purchased line summary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderLineItem {
    /// Product title at time of purchase.
    pub title: String,
    /// Quantity purchased.
    pub quantity: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Mutation Inputs
// ─────────────────────────────────────────────────────────────────────────────

/// Input for `customerCreate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreateInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Input for `customerAddressCreate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailingAddressInput {
    pub address1: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub zip: String,
}

/// A user-facing error returned by customer mutations.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct CustomerUserError {
    #[allow(dead_code)]
    pub code: Option<String>,
    #[allow(dead_code)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Flatten a Relay connection into its nodes.
fn nodes<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    struct Connection<T> {
        edges: Vec<Edge<T>>,
    }

    #[derive(Deserialize)]
    struct Edge<T> {
        node: T,
    }

    let connection = Option::<Connection<T>>::deserialize(deserializer)?;
    Ok(connection
        .map(|c| c.edges.into_iter().map(|e| e.node).collect())
        .unwrap_or_default())
}
