//! Order history display records.

use chrono::{DateTime, Utc};
use kiosk_core::{OrderId, OrderStatus, Price};

use crate::shopify::{Order, OrderLineItem};

/// An order as shown in the order history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub id: OrderId,
    pub order_number: i64,
    pub total: Price,
    pub processed_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub items: Vec<OrderLineItem>,
}

impl OrderSummary {
    /// `₹250.00` for INR; other currencies are prefixed with their code.
    #[must_use]
    pub fn total_display(&self) -> String {
        format!(
            "{}{:.2}",
            currency_prefix(&self.total),
            self.total.amount
        )
    }

    /// Date in `Mon Jan 01 2024` form.
    #[must_use]
    pub fn date_display(&self) -> String {
        self.processed_at.format("%a %b %d %Y").to_string()
    }

    /// `2x Protein Bar, 1x Muesli`.
    #[must_use]
    pub fn items_summary(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("{}x {}", item.quantity, item.title))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn currency_prefix(price: &Price) -> String {
    match price.currency_code {
        kiosk_core::CurrencyCode::INR => "₹".to_string(),
        ref other => format!("{} ", other.code()),
    }
}

/// Map a raw order into its display record.
#[must_use]
pub fn map_order(order: &Order) -> OrderSummary {
    OrderSummary {
        id: order.id.clone(),
        order_number: order.order_number,
        total: order.total_price.to_price(),
        processed_at: order.processed_at,
        status: OrderStatus::from_raw(
            order.financial_status.as_deref(),
            order.fulfillment_status.as_deref(),
        ),
        items: order.line_items.clone(),
    }
}

/// Map orders, preserving their order.
#[must_use]
pub fn map_orders(orders: &[Order]) -> Vec<OrderSummary> {
    orders.iter().map(map_order).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shopify::Money;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn order(financial: Option<&str>, fulfillment: Option<&str>) -> Order {
        Order {
            id: OrderId::new("gid://shopify/Order/1"),
            order_number: 1001,
            processed_at: "2024-01-01T10:00:00Z".parse().unwrap(),
            financial_status: financial.map(str::to_string),
            fulfillment_status: fulfillment.map(str::to_string),
            total_price: Money {
                amount: json!("250.0"),
                currency_code: Some("INR".to_string()),
            },
            line_items: vec![
                OrderLineItem {
                    title: "Protein Bar".to_string(),
                    quantity: 2,
                },
                OrderLineItem {
                    title: "Muesli".to_string(),
                    quantity: 1,
                },
            ],
        }
    }

    #[test]
    fn test_status_derivation() {
        assert_eq!(
            map_order(&order(Some("REFUNDED"), Some("FULFILLED"))).status,
            OrderStatus::Cancelled
        );
        assert_eq!(
            map_order(&order(Some("PAID"), Some("FULFILLED"))).status,
            OrderStatus::Delivered
        );
        assert_eq!(
            map_order(&order(Some("PAID"), Some("UNFULFILLED"))).status,
            OrderStatus::Processing
        );
    }

    #[test]
    fn test_display_helpers() {
        let summary = map_order(&order(Some("PAID"), None));
        assert_eq!(summary.total.amount, Decimal::from(250));
        assert_eq!(summary.total_display(), "₹250.00");
        assert_eq!(summary.date_display(), "Mon Jan 01 2024");
        assert_eq!(summary.items_summary(), "2x Protein Bar, 1x Muesli");
    }

    #[test]
    fn test_foreign_currency_shows_code() {
        let mut raw = order(None, None);
        raw.total_price = Money {
            amount: json!("12.5"),
            currency_code: Some("USD".to_string()),
        };
        assert_eq!(map_order(&raw).total_display(), "USD 12.50");
    }
}
