//! Order Model and Status State Machine
//!
//! An order is placed by a customer (pickup or delivery), confirmed by an
//! operator (which issues the hand-off OTP), prepared, and finally either
//! delivered against the OTP or cancelled. Line items are snapshotted at
//! order time and persisted as a JSON text blob (`orderItems` on the wire),
//! so later menu edits never rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Lifecycle status of an order.
///
/// ```text
/// pending ──> confirmed ──> preparing ──> ready ──> delivered
///    │            │             │           │
///    └────────────┴─────────────┴───────────┴──> cancelled
/// ```
///
/// `delivered` and `cancelled` are terminal. Confirmation issues the OTP, so
/// re-entering `confirmed` is forbidden: it would silently rotate a code the
/// customer already received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether an order in this status must carry an OTP.
    ///
    /// The OTP is issued on confirmation and retained through delivery for
    /// audit; pending and cancelled orders carry none.
    pub fn requires_otp(self) -> bool {
        matches!(
            self,
            Self::Confirmed | Self::Preparing | Self::Ready | Self::Delivered
        )
    }

    /// Statuses in which a courier may be assigned to the order.
    pub fn is_assignable(self) -> bool {
        matches!(self, Self::Confirmed | Self::Preparing | Self::Ready)
    }

    /// Transition table for `update_status`.
    ///
    /// Forward-only along the preparation pipeline, cancellation from any
    /// non-terminal state, no self-transitions.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Pending, Confirmed) => true,
            (Confirmed, Preparing) | (Confirmed, Ready) => true,
            (Preparing, Ready) => true,
            (Ready, Delivered) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    #[default]
    Pickup,
    Delivery,
}

/// A single line item, snapshotted from the menu at order time.
///
/// `price` is the per-unit amount in whole rupees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct OrderItem {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0))]
    pub price: i64,
    #[validate(range(min = 1))]
    pub quantity: u32,
}

impl OrderItem {
    /// `price * quantity`, or `None` when the product overflows `i64`.
    pub fn line_total(&self) -> Option<i64> {
        self.price.checked_mul(i64::from(self.quantity))
    }
}

/// Persisted order.
///
/// `order_items` holds the line items JSON-encoded; [`Order::items`] parses
/// them back. `otp` is present exactly while the status requires it, and
/// `assigned_courier` is a weak reference (the courier record may be deleted
/// later without touching the order).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<String>,
    /// JSON-encoded `Vec<OrderItem>`.
    pub order_items: String,
    pub total_amount: i64,
    pub status: OrderStatus,
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_courier: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Parse the persisted line items back into structured form.
    pub fn items(&self) -> Result<Vec<OrderItem>, serde_json::Error> {
        serde_json::from_str(&self.order_items)
    }
}

/// Customer-supplied order draft, prior to id/timestamp assignment.
///
/// Items arrive structured; the server re-derives the total from them and
/// rejects drafts whose claimed `total_amount` disagrees.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(length(min = 1, max = 100))]
    pub customer_phone: String,
    #[validate(length(max = 500))]
    pub customer_address: Option<String>,
    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderItem>,
    pub total_amount: i64,
    #[serde(default)]
    pub order_type: OrderType,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

impl OrderDraft {
    /// Sum of `price * quantity` over the draft's items, or `None` when any
    /// step overflows `i64`. Client-supplied prices are unbounded, so the
    /// arithmetic must not be trusted to stay in range.
    pub fn computed_total(&self) -> Option<i64> {
        self.items
            .iter()
            .try_fold(0i64, |acc, item| acc.checked_add(item.line_total()?))
    }

    /// Serialize the items for persistence.
    pub fn encode_items(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> OrderDraft {
        OrderDraft {
            customer_name: "Priya Sharma".to_string(),
            customer_phone: "9876543210".to_string(),
            customer_address: Some("12 MG Road".to_string()),
            items: vec![
                OrderItem {
                    name: "Veg Sandwich".to_string(),
                    price: 40,
                    quantity: 2,
                },
                OrderItem {
                    name: "Lassi".to_string(),
                    price: 30,
                    quantity: 1,
                },
            ],
            total_amount: 110,
            order_type: OrderType::Delivery,
            notes: None,
        }
    }

    #[test]
    fn computed_total_sums_line_items() {
        assert_eq!(draft().computed_total(), Some(110));
    }

    #[test]
    fn computed_total_detects_overflow() {
        let mut d = draft();
        d.items[0].price = i64::MAX;
        d.items[0].quantity = 2;
        assert_eq!(d.items[0].line_total(), None);
        assert_eq!(d.computed_total(), None);

        // Overflow in the sum rather than a single line
        let mut d = draft();
        d.items[0].price = i64::MAX;
        d.items[0].quantity = 1;
        d.items[1].price = i64::MAX;
        d.items[1].quantity = 1;
        assert_eq!(d.computed_total(), None);
    }

    #[test]
    fn items_round_trip_through_text_encoding() {
        let d = draft();
        let encoded = d.encode_items().unwrap();
        let parsed: Vec<OrderItem> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(parsed, d.items);
    }

    #[test]
    fn forward_transitions_allowed() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Preparing));
        assert!(Confirmed.can_transition_to(Ready));
        assert!(Preparing.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Delivered));
    }

    #[test]
    fn cancellation_from_non_terminal_only() {
        use OrderStatus::*;
        for from in [Pending, Confirmed, Preparing, Ready] {
            assert!(from.can_transition_to(Cancelled), "{from} should cancel");
        }
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn no_reconfirmation_or_backward_moves() {
        use OrderStatus::*;
        assert!(!Confirmed.can_transition_to(Confirmed));
        assert!(!Preparing.can_transition_to(Confirmed));
        assert!(!Ready.can_transition_to(Pending));
        assert!(!Delivered.can_transition_to(Ready));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Pending.can_transition_to(Delivered));
    }

    #[test]
    fn otp_requirement_follows_status() {
        use OrderStatus::*;
        assert!(!Pending.requires_otp());
        assert!(!Cancelled.requires_otp());
        for s in [Confirmed, Preparing, Ready, Delivered] {
            assert!(s.requires_otp(), "{s} should require otp");
        }
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Preparing).unwrap();
        assert_eq!(json, "\"preparing\"");
        let back: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(back, OrderStatus::Cancelled);
    }

    #[test]
    fn draft_validation_rejects_empty_fields() {
        let mut d = draft();
        d.customer_name.clear();
        assert!(validator::Validate::validate(&d).is_err());

        let mut d = draft();
        d.items.clear();
        assert!(validator::Validate::validate(&d).is_err());

        let mut d = draft();
        d.items[0].quantity = 0;
        assert!(validator::Validate::validate(&d).is_err());
    }
}
