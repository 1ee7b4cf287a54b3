//! Draft order types
//!
//! Locally-owned orders under construction. Serialized camelCase so the
//! persisted snapshot keeps the same shape as the backend's orders.

use crate::money::{self, MAX_PRICE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::OrderType;
use shared::types::Timestamp;

/// Line item of a draft
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrderItem {
    /// Client-unique line id
    pub temp_id: String,
    pub product_id: i64,
    pub product_name: String,
    pub unit_price: f64,
    /// Always >= 1
    pub quantity: i32,
    /// Line discount, >= 0
    pub discount: f64,
    /// `quantity * unit_price - discount`
    pub subtotal: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Bank transfer attached to a draft
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DraftBankPayment {
    pub temp_id: String,
    pub bank_account_id: i64,
    #[serde(default)]
    pub bank_account_name: Option<String>,
    pub amount: f64,
    /// Set once the operator typed the amount; stops auto-adjustment
    #[serde(default)]
    pub manually_edited: bool,
}

/// App payment attached to a draft (at most one per draft)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DraftAppPayment {
    pub app_id: i64,
    #[serde(default)]
    pub app_name: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub manually_edited: bool,
}

/// Partial update of a draft payment
///
/// A present `amount` marks the payment as manually edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftPaymentUpdate {
    pub amount: Option<f64>,
    /// Bank account id or app id, depending on the payment kind
    pub target_id: Option<i64>,
    pub target_name: Option<String>,
}

impl DraftPaymentUpdate {
    pub fn amount(amount: f64) -> Self {
        Self {
            amount: Some(amount),
            ..Default::default()
        }
    }
}

/// In-progress order owned by one tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DraftOrder {
    pub tab_id: String,
    pub tab_name: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,

    // === Customer ===
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    /// Person receiving a delivery or reservation
    #[serde(default)]
    pub guest_name: Option<String>,

    // === Delivery ===
    #[serde(default)]
    pub address_id: Option<i64>,
    #[serde(default)]
    pub address_description: Option<String>,
    /// Fee suggested by the selected address, kept across type switches
    #[serde(default)]
    pub address_delivery_fee: Option<f64>,
    #[serde(default)]
    pub delivery_fee: f64,
    #[serde(default)]
    pub delivery_fee_manually_edited: bool,

    // === Reservation ===
    #[serde(default)]
    pub reserved_for: Option<DateTime<Utc>>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(rename = "orderItems", default)]
    pub items: Vec<DraftOrderItem>,
    #[serde(default)]
    pub app_payment: Option<DraftAppPayment>,
    #[serde(default)]
    pub bank_payments: Vec<DraftBankPayment>,

    // === Derived totals ===
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub discount_total: f64,
    #[serde(default)]
    pub total: f64,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DraftOrder {
    /// Empty onsite draft
    pub fn new(tab_id: impl Into<String>, tab_name: impl Into<String>, now: Timestamp) -> Self {
        Self {
            tab_id: tab_id.into(),
            tab_name: tab_name.into(),
            order_type: OrderType::Onsite,
            customer_id: None,
            customer_name: None,
            customer_phone: None,
            guest_name: None,
            address_id: None,
            address_description: None,
            address_delivery_fee: None,
            delivery_fee: 0.0,
            delivery_fee_manually_edited: false,
            reserved_for: None,
            notes: None,
            items: Vec::new(),
            app_payment: None,
            bank_payments: Vec::new(),
            subtotal: 0.0,
            discount_total: 0.0,
            total: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Number of payments of any kind
    pub fn payment_count(&self) -> usize {
        self.bank_payments.len() + usize::from(self.app_payment.is_some())
    }

    /// Sum of every payment amount
    pub fn paid_amount(&self) -> f64 {
        money::to_f64(money::sum(
            self.bank_payments
                .iter()
                .map(|p| p.amount)
                .chain(self.app_payment.as_ref().map(|p| p.amount)),
        ))
    }

    /// Total units across all lines
    pub fn item_count(&self) -> i32 {
        self.items
            .iter()
            .fold(0i32, |acc, i| acc.saturating_add(i.quantity))
    }

    pub fn find_item(&self, temp_id: &str) -> Option<&DraftOrderItem> {
        self.items.iter().find(|i| i.temp_id == temp_id)
    }

    /// Every line and amount is one the store itself could have produced
    fn is_within_bounds(&self) -> bool {
        let amount_ok = |v: f64| v.is_finite() && v >= 0.0;
        let fee_ok = |v: f64| amount_ok(v) && v <= MAX_PRICE;

        self.items.iter().all(|i| {
            money::is_valid_quantity(i.quantity)
                && fee_ok(i.unit_price)
                && amount_ok(i.discount)
        }) && fee_ok(self.delivery_fee)
            && self.address_delivery_fee.is_none_or(fee_ok)
            && self.bank_payments.iter().all(|p| amount_ok(p.amount))
            && self.app_payment.as_ref().is_none_or(|p| amount_ok(p.amount))
    }
}

/// Tab-bar projection of a draft
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderTab {
    pub id: String,
    pub name: String,
    pub item_count: i32,
    pub total: f64,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub customer_name: Option<String>,
    pub is_active: bool,
}

impl OrderTab {
    pub fn from_draft(draft: &DraftOrder, is_active: bool) -> Self {
        Self {
            id: draft.tab_id.clone(),
            name: draft.tab_name.clone(),
            item_count: draft.item_count(),
            total: draft.total,
            order_type: draft.order_type,
            customer_name: draft
                .customer_name
                .clone()
                .or_else(|| draft.guest_name.clone()),
            is_active,
        }
    }
}

/// Highest tab counter accepted from a snapshot
pub const MAX_TAB_NUMBER: u32 = 1_000_000;

/// Persisted snapshot of the draft store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDrafts {
    pub draft_orders: Vec<DraftOrder>,
    pub current_tab_id: Option<String>,
    pub next_tab_number: u32,
    /// When the snapshot was written (Unix millis)
    pub last_saved: Timestamp,
}

impl PersistedDrafts {
    /// Counter and every draft inside the ranges the store enforces
    pub fn is_within_bounds(&self) -> bool {
        self.next_tab_number <= MAX_TAB_NUMBER
            && self.draft_orders.iter().all(DraftOrder::is_within_bounds)
    }
}
