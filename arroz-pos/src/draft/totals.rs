//! Draft totals and single-payment auto-adjustment

use super::types::DraftOrder;
use crate::money::{line_subtotal, sum, to_decimal, to_f64};

/// Recompute line subtotals and the draft's derived totals
///
/// `total = subtotal + delivery_fee`. The single-payment rule is applied
/// afterwards, see [`auto_adjust_single_payment`].
pub fn recalculate_totals(draft: &mut DraftOrder) {
    for item in &mut draft.items {
        item.subtotal = line_subtotal(item.quantity, item.unit_price, item.discount);
    }

    let subtotal = sum(draft.items.iter().map(|i| i.subtotal));
    let discount_total = sum(draft.items.iter().map(|i| i.discount));

    draft.subtotal = to_f64(subtotal);
    draft.discount_total = to_f64(discount_total);
    draft.total = to_f64(subtotal.saturating_add(to_decimal(draft.delivery_fee)));

    auto_adjust_single_payment(draft);
}

/// Force the only payment's amount to the draft total
///
/// Applies only when exactly one payment exists across both kinds and it
/// has not been manually edited. Returns whether an amount changed.
pub fn auto_adjust_single_payment(draft: &mut DraftOrder) -> bool {
    if draft.payment_count() != 1 {
        return false;
    }

    let total = draft.total;
    let (amount, manually_edited) = if let Some(app) = draft.app_payment.as_mut() {
        (&mut app.amount, app.manually_edited)
    } else if let Some(bank) = draft.bank_payments.first_mut() {
        (&mut bank.amount, bank.manually_edited)
    } else {
        return false;
    };

    if manually_edited || *amount == total {
        return false;
    }
    tracing::debug!(tab_id = %draft.tab_id, from = *amount, to = total, "Auto-adjusting single payment");
    *amount = total;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::types::{DraftAppPayment, DraftBankPayment, DraftOrderItem};

    fn item(temp_id: &str, quantity: i32, unit_price: f64, discount: f64) -> DraftOrderItem {
        DraftOrderItem {
            temp_id: temp_id.into(),
            product_id: 1,
            product_name: "Arroz chino".into(),
            unit_price,
            quantity,
            discount,
            subtotal: 0.0,
            notes: None,
        }
    }

    fn bank(amount: f64, manually_edited: bool) -> DraftBankPayment {
        DraftBankPayment {
            temp_id: "pay-1".into(),
            bank_account_id: 1,
            bank_account_name: None,
            amount,
            manually_edited,
        }
    }

    #[test]
    fn test_totals_include_delivery_fee() {
        let mut draft = DraftOrder::new("tab-1", "Pedido 1", 0);
        draft.items = vec![item("a", 2, 10000.0, 0.0), item("b", 1, 8000.0, 500.0)];
        draft.delivery_fee = 3000.0;

        recalculate_totals(&mut draft);

        assert_eq!(draft.items[1].subtotal, 7500.0);
        assert_eq!(draft.subtotal, 27500.0);
        assert_eq!(draft.discount_total, 500.0);
        assert_eq!(draft.total, 30500.0);
    }

    #[test]
    fn test_single_payment_follows_total() {
        let mut draft = DraftOrder::new("tab-1", "Pedido 1", 0);
        draft.items = vec![item("a", 1, 12000.0, 0.0)];
        draft.bank_payments = vec![bank(1.0, false)];

        recalculate_totals(&mut draft);
        assert_eq!(draft.bank_payments[0].amount, 12000.0);
    }

    #[test]
    fn test_single_app_payment_follows_total() {
        let mut draft = DraftOrder::new("tab-1", "Pedido 1", 0);
        draft.items = vec![item("a", 2, 9000.0, 0.0)];
        draft.app_payment = Some(DraftAppPayment {
            app_id: 2,
            app_name: Some("Rappi".into()),
            amount: 0.0,
            manually_edited: false,
        });

        recalculate_totals(&mut draft);
        assert_eq!(draft.app_payment.as_ref().unwrap().amount, 18000.0);
    }

    #[test]
    fn test_manually_edited_payment_is_kept() {
        let mut draft = DraftOrder::new("tab-1", "Pedido 1", 0);
        draft.items = vec![item("a", 1, 12000.0, 0.0)];
        draft.bank_payments = vec![bank(5000.0, true)];

        recalculate_totals(&mut draft);
        assert_eq!(draft.bank_payments[0].amount, 5000.0);
    }

    #[test]
    fn test_two_payments_are_never_adjusted() {
        let mut draft = DraftOrder::new("tab-1", "Pedido 1", 0);
        draft.items = vec![item("a", 3, 10000.0, 0.0)];
        draft.bank_payments = vec![bank(20000.0, false)];
        draft.app_payment = Some(DraftAppPayment {
            app_id: 2,
            app_name: None,
            amount: 0.0,
            manually_edited: false,
        });

        recalculate_totals(&mut draft);
        assert_eq!(draft.bank_payments[0].amount, 20000.0);
        assert_eq!(draft.app_payment.as_ref().unwrap().amount, 0.0);
    }
}
