//! Payment Models
//!
//! Bank transfers and delivery-app payments recorded against submitted orders.

use serde::{Deserialize, Serialize};

/// Bank account that can receive transfers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub bank_name: Option<String>,
}

/// Delivery/payment app (e.g. Rappi, Nequi)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentApp {
    pub id: i64,
    pub name: String,
}

/// Bank payment entity (persisted)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BankPayment {
    pub id: i64,
    pub order_id: i64,
    pub bank_account_id: i64,
    #[serde(default)]
    pub bank_account_name: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub is_verified: bool,
}

/// App payment entity (persisted)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppPayment {
    pub id: i64,
    pub order_id: i64,
    pub app_id: i64,
    #[serde(default)]
    pub app_name: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub is_verified: bool,
}

/// Create bank payment payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BankPaymentCreate {
    pub order_id: i64,
    pub bank_account_id: i64,
    pub amount: f64,
}

/// Create app payment payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppPaymentCreate {
    pub order_id: i64,
    pub app_id: i64,
    pub amount: f64,
}

/// Update payment payload (bank or app)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<i64>,
}

impl PaymentUpdate {
    pub fn amount(amount: f64) -> Self {
        Self {
            amount: Some(amount),
            ..Default::default()
        }
    }
}
