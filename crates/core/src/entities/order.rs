//! Order entity: transaction record with snapshotted line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderStatus, ProductId, UserId};

/// A line in an order.
///
/// A snapshot of the product's name/price/image taken at the moment of
/// purchase; later catalog edits never affect an existing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
}

impl OrderLine {
    /// Price × quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Shipping destination captured at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// A stored order record.
///
/// An order references its user and products by id value only; there is no
/// cross-document integrity check, and deleting a product leaves past orders
/// intact through their snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Apply a partial update. Fields absent from the patch are retained.
    pub fn apply_patch(&mut self, patch: OrderPatch) {
        let OrderPatch {
            status,
            payment_reference,
        } = patch;
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(payment_reference) = payment_reference {
            self.payment_reference = Some(payment_reference);
        }
    }
}

/// Input for creating an order. The repository assigns the id and timestamp.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<OrderLine>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub payment_reference: Option<String>,
}

/// Partial update for an [`Order`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
}

impl OrderPatch {
    /// Patch that changes only the status.
    #[must_use]
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sample_address() -> ShippingAddress {
        ShippingAddress {
            name: "Ada Lovelace".to_owned(),
            address: "12 Analytical Way".to_owned(),
            city: "London".to_owned(),
            state: "LDN".to_owned(),
            zip: "E1 6AN".to_owned(),
            country: "GB".to_owned(),
        }
    }

    #[test]
    fn test_line_total() {
        let line = OrderLine {
            product_id: ProductId::new("product_1_a"),
            name: "Aurora Smartwatch".to_owned(),
            price: dec("100"),
            image: "https://img.example.com/aurora.jpg".to_owned(),
            quantity: 3,
        };
        assert_eq!(line.line_total(), dec("300"));
    }

    #[test]
    fn test_status_patch_keeps_other_fields() {
        let mut order = Order {
            id: OrderId::new("order_1_a"),
            user_id: UserId::new("user_1_a"),
            items: Vec::new(),
            total: dec("300"),
            status: OrderStatus::Pending,
            shipping_address: sample_address(),
            payment_method: "card".to_owned(),
            payment_reference: Some("pi_123".to_owned()),
            created_at: Utc::now(),
        };
        order.apply_patch(OrderPatch::status(OrderStatus::Shipped));
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.total, dec("300"));
        assert_eq!(order.payment_reference.as_deref(), Some("pi_123"));
    }

    #[test]
    fn test_stored_json_shape() {
        let order = Order {
            id: OrderId::new("order_1_a"),
            user_id: UserId::new("user_1_a"),
            items: Vec::new(),
            total: dec("42.5"),
            status: OrderStatus::Processing,
            shipping_address: sample_address(),
            payment_method: "card".to_owned(),
            payment_reference: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json.get("userId").unwrap(), "user_1_a");
        assert_eq!(json.get("status").unwrap(), "processing");
        assert!(json.get("total").unwrap().is_f64());
        assert!(json.get("shippingAddress").unwrap().get("zip").is_some());
        // absent payment reference is omitted from the document
        assert!(json.get("paymentReference").is_none());
    }
}
