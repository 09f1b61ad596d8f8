//! Status enums for orders.
//!
//! Shopify reports two independent statuses per order. Customers only see a
//! single derived [`OrderStatus`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
///
/// Maps to Shopify's `OrderFulfillmentStatus` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    #[default]
    Unfulfilled,
    PartiallyFulfilled,
    Fulfilled,
    Restocked,
    PendingFulfillment,
    Open,
    InProgress,
    OnHold,
    Scheduled,
}

/// Order financial status.
///
/// Maps to Shopify's `OrderFinancialStatus` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinancialStatus {
    #[default]
    Pending,
    Authorized,
    PartiallyPaid,
    Paid,
    PartiallyRefunded,
    Refunded,
    Voided,
    Expired,
}

impl FromStr for FulfillmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UNFULFILLED" => Ok(Self::Unfulfilled),
            "PARTIALLY_FULFILLED" => Ok(Self::PartiallyFulfilled),
            "FULFILLED" => Ok(Self::Fulfilled),
            "RESTOCKED" => Ok(Self::Restocked),
            "PENDING_FULFILLMENT" => Ok(Self::PendingFulfillment),
            "OPEN" => Ok(Self::Open),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "ON_HOLD" => Ok(Self::OnHold),
            "SCHEDULED" => Ok(Self::Scheduled),
            _ => Err(format!("invalid fulfillment status: {s}")),
        }
    }
}

impl FromStr for FinancialStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "AUTHORIZED" => Ok(Self::Authorized),
            "PARTIALLY_PAID" => Ok(Self::PartiallyPaid),
            "PAID" => Ok(Self::Paid),
            "PARTIALLY_REFUNDED" => Ok(Self::PartiallyRefunded),
            "REFUNDED" => Ok(Self::Refunded),
            "VOIDED" => Ok(Self::Voided),
            "EXPIRED" => Ok(Self::Expired),
            _ => Err(format!("invalid financial status: {s}")),
        }
    }
}

/// Customer-facing order status.
///
/// A closed three-state classification; see [`OrderStatus::derive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Delivered,
    Processing,
    Cancelled,
}

impl OrderStatus {
    /// Derive the customer-facing status. First match wins:
    ///
    /// 1. refunded or voided payment → `Cancelled`
    /// 2. fulfilled → `Delivered`
    /// 3. anything else, including unknown or missing statuses → `Processing`
    #[must_use]
    pub const fn derive(
        financial: Option<FinancialStatus>,
        fulfillment: Option<FulfillmentStatus>,
    ) -> Self {
        match (financial, fulfillment) {
            (Some(FinancialStatus::Refunded | FinancialStatus::Voided), _) => Self::Cancelled,
            (_, Some(FulfillmentStatus::Fulfilled)) => Self::Delivered,
            _ => Self::Processing,
        }
    }

    /// Derive from raw API strings, compared case-insensitively.
    #[must_use]
    pub fn from_raw(financial: Option<&str>, fulfillment: Option<&str>) -> Self {
        Self::derive(
            financial.and_then(|s| s.parse().ok()),
            fulfillment.and_then(|s| s.parse().ok()),
        )
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Delivered => "Delivered",
            Self::Processing => "Processing",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refund_beats_fulfillment() {
        assert_eq!(
            OrderStatus::from_raw(Some("REFUNDED"), Some("FULFILLED")),
            OrderStatus::Cancelled
        );
        assert_eq!(
            OrderStatus::from_raw(Some("VOIDED"), Some("UNFULFILLED")),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn test_paid_and_fulfilled_is_delivered() {
        assert_eq!(
            OrderStatus::from_raw(Some("PAID"), Some("FULFILLED")),
            OrderStatus::Delivered
        );
    }

    #[test]
    fn test_paid_and_unfulfilled_is_processing() {
        assert_eq!(
            OrderStatus::from_raw(Some("PAID"), Some("UNFULFILLED")),
            OrderStatus::Processing
        );
    }

    #[test]
    fn test_status_strings_are_case_insensitive() {
        assert_eq!(
            OrderStatus::from_raw(Some("refunded"), None),
            OrderStatus::Cancelled
        );
        assert_eq!(
            OrderStatus::from_raw(None, Some("fulfilled")),
            OrderStatus::Delivered
        );
    }

    #[test]
    fn test_unknown_or_missing_is_processing() {
        assert_eq!(OrderStatus::from_raw(None, None), OrderStatus::Processing);
        assert_eq!(
            OrderStatus::from_raw(Some("SOMETHING_NEW"), Some("???")),
            OrderStatus::Processing
        );
        // Partial refunds are not cancellations.
        assert_eq!(
            OrderStatus::from_raw(Some("PARTIALLY_REFUNDED"), Some("FULFILLED")),
            OrderStatus::Delivered
        );
    }

    #[test]
    fn test_status_serde_uses_shopify_names() {
        let status: FinancialStatus = serde_json::from_str("\"PARTIALLY_REFUNDED\"").unwrap_or_default();
        assert_eq!(status, FinancialStatus::PartiallyRefunded);
    }
}
