//! Draft validation
//!
//! Re-derived on every call; nothing is cached on the draft.

use super::types::DraftOrder;
use crate::money;
use serde::Serialize;
use shared::models::OrderType;

pub const MSG_NO_ITEMS: &str = "Debe agregar al menos un producto";
pub const MSG_NO_CUSTOMER: &str = "Debe seleccionar un cliente para el domicilio";
pub const MSG_NO_ADDRESS: &str = "Debe seleccionar una dirección de entrega";
pub const MSG_NO_RESERVATION_TIME: &str = "Debe indicar la fecha y hora de la reserva";
pub const MSG_NO_GUEST_NAME: &str = "Debe indicar el nombre de quien recibe el pedido";
pub const MSG_PAYMENTS_EXCEED_TOTAL: &str = "La suma de los pagos supera el total del pedido";

/// Outcome of a validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Errors joined for a single notification
    pub fn message(&self) -> String {
        self.errors.join(". ")
    }
}

/// Check whether a draft can be submitted
pub fn validate_draft(draft: &DraftOrder) -> ValidationResult {
    let mut errors = Vec::new();

    if draft.items.is_empty() {
        errors.push(MSG_NO_ITEMS.to_string());
    }

    if draft.order_type == OrderType::Delivery {
        if draft.customer_id.is_none() {
            errors.push(MSG_NO_CUSTOMER.to_string());
        }
        if draft.address_id.is_none() {
            errors.push(MSG_NO_ADDRESS.to_string());
        }
    }

    if draft.order_type == OrderType::Reservation && draft.reserved_for.is_none() {
        errors.push(MSG_NO_RESERVATION_TIME.to_string());
    }

    if draft.order_type.requires_guest_name()
        && draft
            .guest_name
            .as_deref()
            .is_none_or(|name| name.trim().is_empty())
    {
        errors.push(MSG_NO_GUEST_NAME.to_string());
    }

    if money::exceeds(draft.paid_amount(), draft.total) {
        errors.push(MSG_PAYMENTS_EXCEED_TOTAL.to_string());
    }

    ValidationResult::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::totals::recalculate_totals;
    use crate::draft::types::{DraftBankPayment, DraftOrderItem};
    use chrono::{TimeZone, Utc};

    fn item() -> DraftOrderItem {
        DraftOrderItem {
            temp_id: "i1".into(),
            product_id: 1,
            product_name: "Arroz chino".into(),
            unit_price: 10000.0,
            quantity: 1,
            discount: 0.0,
            subtotal: 10000.0,
            notes: None,
        }
    }

    fn draft(order_type: OrderType) -> DraftOrder {
        let mut d = DraftOrder::new("tab-1", "Pedido 1", 0);
        d.order_type = order_type;
        d.items.push(item());
        recalculate_totals(&mut d);
        d
    }

    #[test]
    fn test_empty_draft_is_invalid() {
        let d = DraftOrder::new("tab-1", "Pedido 1", 0);
        let result = validate_draft(&d);
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec![MSG_NO_ITEMS.to_string()]);
    }

    #[test]
    fn test_onsite_with_item_is_valid() {
        let result = validate_draft(&draft(OrderType::Onsite));
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_delivery_requires_customer() {
        let mut d = draft(OrderType::Delivery);
        d.guest_name = Some("Laura".into());

        let result = validate_draft(&d);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("cliente")));
    }

    #[test]
    fn test_delivery_requires_address() {
        let mut d = draft(OrderType::Delivery);
        d.guest_name = Some("Laura".into());
        d.customer_id = Some(4);

        let result = validate_draft(&d);
        assert!(!result.is_valid);
        assert!(!result.errors.iter().any(|e| e.contains("cliente")));
        assert!(result.errors.iter().any(|e| e.contains("dirección")));

        d.address_id = Some(9);
        assert!(validate_draft(&d).is_valid);
    }

    #[test]
    fn test_reservation_requires_time_and_guest() {
        let mut d = draft(OrderType::Reservation);
        let result = validate_draft(&d);
        assert_eq!(
            result.errors,
            vec![
                MSG_NO_RESERVATION_TIME.to_string(),
                MSG_NO_GUEST_NAME.to_string()
            ]
        );

        d.reserved_for = Some(Utc.with_ymd_and_hms(2026, 10, 20, 19, 0, 0).unwrap());
        d.guest_name = Some("   ".into());
        assert_eq!(validate_draft(&d).errors, vec![MSG_NO_GUEST_NAME.to_string()]);

        d.guest_name = Some("Familia Ríos".into());
        assert!(validate_draft(&d).is_valid);
    }

    #[test]
    fn test_payments_cannot_exceed_total() {
        let mut d = draft(OrderType::Onsite);
        d.bank_payments.push(DraftBankPayment {
            temp_id: "p1".into(),
            bank_account_id: 1,
            bank_account_name: None,
            amount: 10000.5,
            manually_edited: true,
        });

        let result = validate_draft(&d);
        assert_eq!(result.errors, vec![MSG_PAYMENTS_EXCEED_TOTAL.to_string()]);

        d.bank_payments[0].amount = 10000.0;
        assert!(validate_draft(&d).is_valid);
    }

    #[test]
    fn test_message_joins_errors() {
        let result = ValidationResult::from_errors(vec!["a".into(), "b".into()]);
        assert_eq!(result.message(), "a. b");
    }
}
