//! Order Model
//!
//! Server-owned orders (already submitted) and the wire payloads used to
//! create them and move them through their status lifecycle.

use super::payment::{AppPayment, BankPayment};
use crate::types::Timestamp;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 订单类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// 堂食
    #[default]
    Onsite,
    /// 外送
    Delivery,
    /// 预订
    Reservation,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Onsite => "onsite",
            Self::Delivery => "delivery",
            Self::Reservation => "reservation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Onsite => "En el local",
            Self::Delivery => "Domicilio",
            Self::Reservation => "Reserva",
        }
    }

    /// Delivery and reservation orders name the person receiving them
    pub fn requires_guest_name(&self) -> bool {
        matches!(self, Self::Delivery | Self::Reservation)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order status
///
/// Declaration order follows the canonical forward sequence, with
/// `Cancelled` last.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Taken,
    InPreparation,
    Ready,
    OnTheWay,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Forward sequence every non-cancelled order walks through
    pub const CANONICAL_SEQUENCE: [OrderStatus; 5] = [
        OrderStatus::Taken,
        OrderStatus::InPreparation,
        OrderStatus::Ready,
        OrderStatus::OnTheWay,
        OrderStatus::Delivered,
    ];

    /// All statuses, including `Cancelled`
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Taken,
        OrderStatus::InPreparation,
        OrderStatus::Ready,
        OrderStatus::OnTheWay,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Position in [`Self::CANONICAL_SEQUENCE`]; `None` for `Cancelled`
    pub fn sequence_index(&self) -> Option<usize> {
        Self::CANONICAL_SEQUENCE.iter().position(|s| s == self)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether an order of the given type may ever be in this status
    ///
    /// Onsite orders skip `on_the_way`.
    pub fn allowed_for(&self, order_type: OrderType) -> bool {
        !(order_type == OrderType::Onsite && *self == Self::OnTheWay)
    }

    /// Next status along the forward path for the given order type
    pub fn next(&self, order_type: OrderType) -> Option<OrderStatus> {
        match self {
            Self::Taken => Some(Self::InPreparation),
            Self::InPreparation => Some(Self::Ready),
            Self::Ready if order_type == OrderType::Onsite => Some(Self::Delivered),
            Self::Ready => Some(Self::OnTheWay),
            Self::OnTheWay => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Taken => "taken",
            Self::InPreparation => "in_preparation",
            Self::Ready => "ready",
            Self::OnTheWay => "on_the_way",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Taken => "Tomado",
            Self::InPreparation => "En preparación",
            Self::Ready => "Listo",
            Self::OnTheWay => "En camino",
            Self::Delivered => "Entregado",
            Self::Cancelled => "Cancelado",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order detail line (persisted)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(default)]
    pub id: Option<i64>,
    pub product_id: i64,
    #[serde(default)]
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Order entity (server-owned)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    #[serde(default)]
    pub branch_id: i64,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub status: OrderStatus,
    /// Timestamp (Unix millis) at which the order entered each status
    #[serde(default)]
    pub status_times: BTreeMap<OrderStatus, Timestamp>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub address_id: Option<i64>,
    #[serde(default)]
    pub address_description: Option<String>,
    #[serde(default)]
    pub delivery_fee: f64,
    #[serde(default)]
    pub reserved_for: Option<DateTime<Utc>>,
    #[serde(default)]
    pub taken_by_id: Option<i64>,
    #[serde(default)]
    pub deliveryman_id: Option<i64>,
    #[serde(default)]
    pub deliveryman_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub details: Vec<OrderDetail>,
    #[serde(default)]
    pub bank_payments: Vec<BankPayment>,
    #[serde(default)]
    pub app_payments: Vec<AppPayment>,
    /// Creation timestamp (Unix millis)
    pub created_at: Timestamp,
}

impl Order {
    /// Sum of every persisted payment
    ///
    /// Summed in `Decimal` and rounded to cents so 0.1 + 0.2 stays 0.3.
    pub fn paid_amount(&self) -> f64 {
        self.bank_payments
            .iter()
            .map(|p| p.amount)
            .chain(self.app_payments.iter().map(|p| p.amount))
            .map(|amount| Decimal::from_f64(amount).unwrap_or_default())
            .fold(Decimal::ZERO, Decimal::saturating_add)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or_default()
    }

    pub fn payment_count(&self) -> usize {
        self.bank_payments.len() + self.app_payments.len()
    }

    pub fn has_deliveryman(&self) -> bool {
        self.deliveryman_id.is_some()
    }
}

/// Detail line of the create-order payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderDetail {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: f64,
    pub discount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Bank payment of the create-order payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderBankPayment {
    pub bank_account_id: i64,
    pub amount: f64,
}

/// App payment of the create-order payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderAppPayment {
    pub app_id: i64,
    pub amount: f64,
}

/// Create order payload
///
/// Fields that do not apply to the order type are left out of the JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub branch_id: i64,
    pub taken_by_id: i64,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_for: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub details: Vec<CreateOrderDetail>,
    pub bank_payments: Vec<CreateOrderBankPayment>,
    pub app_payments: Vec<CreateOrderAppPayment>,
}

/// Update status request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Assign deliveryman request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssignDeliverymanRequest {
    pub deliveryman_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_status_depends_on_type() {
        assert_eq!(
            OrderStatus::Ready.next(OrderType::Onsite),
            Some(OrderStatus::Delivered)
        );
        assert_eq!(
            OrderStatus::Ready.next(OrderType::Delivery),
            Some(OrderStatus::OnTheWay)
        );
        assert_eq!(
            OrderStatus::Ready.next(OrderType::Reservation),
            Some(OrderStatus::OnTheWay)
        );
        assert_eq!(OrderStatus::Delivered.next(OrderType::Delivery), None);
        assert_eq!(OrderStatus::Cancelled.next(OrderType::Onsite), None);
    }

    #[test]
    fn test_sequence_index() {
        assert_eq!(OrderStatus::Taken.sequence_index(), Some(0));
        assert_eq!(OrderStatus::Delivered.sequence_index(), Some(4));
        assert_eq!(OrderStatus::Cancelled.sequence_index(), None);
    }

    #[test]
    fn test_onsite_never_on_the_way() {
        assert!(!OrderStatus::OnTheWay.allowed_for(OrderType::Onsite));
        assert!(OrderStatus::OnTheWay.allowed_for(OrderType::Delivery));
        assert!(OrderStatus::Delivered.allowed_for(OrderType::Onsite));
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InPreparation).unwrap(),
            "\"in_preparation\""
        );
        assert_eq!(
            serde_json::to_string(&OrderType::Reservation).unwrap(),
            "\"reservation\""
        );
    }

    #[test]
    fn test_order_deserialize_with_status_times() {
        let json = r#"{
            "id": 12,
            "type": "delivery",
            "status": "on_the_way",
            "statusTimes": {"taken": 1000, "on_the_way": 5000},
            "deliverymanId": 4,
            "total": 25000,
            "bankPayments": [{"id": 1, "orderId": 12, "bankAccountId": 2, "amount": 25000}],
            "createdAt": 1000
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_type, OrderType::Delivery);
        assert_eq!(order.status_times.get(&OrderStatus::OnTheWay), Some(&5000));
        assert!(order.has_deliveryman());
        assert_eq!(order.paid_amount(), 25000.0);
        assert_eq!(order.payment_count(), 1);
    }

    #[test]
    fn test_paid_amount_has_no_float_drift() {
        let json = r#"{
            "id": 13,
            "type": "onsite",
            "status": "taken",
            "total": 0.3,
            "bankPayments": [{"id": 1, "orderId": 13, "bankAccountId": 2, "amount": 0.1}],
            "appPayments": [{"id": 2, "orderId": 13, "appId": 1, "amount": 0.2}],
            "createdAt": 1000
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.paid_amount(), 0.3);
        assert_eq!(order.payment_count(), 2);
    }

    #[test]
    fn test_create_payload_omits_absent_fields() {
        let payload = CreateOrderPayload {
            branch_id: 1,
            taken_by_id: 2,
            order_type: OrderType::Onsite,
            customer_id: None,
            address_id: None,
            delivery_fee: None,
            reserved_for: None,
            guest_name: None,
            notes: None,
            details: vec![],
            bank_payments: vec![],
            app_payments: vec![],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "onsite");
        assert!(json.get("customerId").is_none());
        assert!(json.get("deliveryFee").is_none());
        assert!(json.get("reservedFor").is_none());
    }
}
