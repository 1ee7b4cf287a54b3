//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

/// Delivery address of a customer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: i64,
    pub customer_id: i64,
    pub description: String,
    #[serde(default)]
    pub neighborhood: Option<String>,
    /// Suggested delivery fee for this address
    #[serde(default)]
    pub delivery_fee: Option<f64>,
    #[serde(default)]
    pub is_primary: bool,
}

impl Address {
    /// Suggested fee, treating a missing value as zero
    pub fn suggested_fee(&self) -> f64 {
        self.delivery_fee.unwrap_or(0.0).max(0.0)
    }
}
