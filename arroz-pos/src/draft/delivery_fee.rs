//! Delivery fee suggestion
//!
//! The fee is filled from the selected address until the operator types a
//! value; from then on it is left alone.

use super::types::DraftOrder;
use shared::models::Address;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeliveryFeeSuggestion {
    pub delivery_fee: f64,
    pub manually_edited: bool,
}

impl DeliveryFeeSuggestion {
    pub fn new(delivery_fee: f64, manually_edited: bool) -> Self {
        Self {
            delivery_fee: delivery_fee.max(0.0),
            manually_edited,
        }
    }

    /// Fee state currently held by a draft
    pub fn of(draft: &DraftOrder) -> Self {
        Self::new(draft.delivery_fee, draft.delivery_fee_manually_edited)
    }

    /// Write the fee state back into a draft
    pub fn apply_to(&self, draft: &mut DraftOrder) {
        draft.delivery_fee = self.delivery_fee;
        draft.delivery_fee_manually_edited = self.manually_edited;
    }

    /// Copy the address fee when the current fee is unset and untouched
    ///
    /// Returns whether the fee changed.
    pub fn auto_complete_from_address(&mut self, address: &Address) -> bool {
        self.auto_complete(address.suggested_fee())
    }

    /// Same as [`Self::auto_complete_from_address`] with a remembered fee
    pub fn auto_complete(&mut self, suggested: f64) -> bool {
        if self.manually_edited || self.delivery_fee > 0.0 {
            return false;
        }
        if !suggested.is_finite() || suggested == self.delivery_fee {
            return false;
        }
        self.delivery_fee = suggested.max(0.0);
        true
    }

    /// Operator-entered value; negative input is clamped to zero
    pub fn set_value(&mut self, value: f64) {
        self.delivery_fee = if value.is_finite() { value.max(0.0) } else { 0.0 };
        self.manually_edited = true;
    }

    pub fn mark_as_manually_edited(&mut self) {
        self.manually_edited = true;
    }

    /// Re-enable suggestions
    pub fn reset_manual_edit(&mut self) {
        self.manually_edited = false;
    }

    /// Drop a previous suggestion so the next address can fill the fee
    ///
    /// No effect on a manually entered fee.
    pub fn clear_suggestion(&mut self) {
        if !self.manually_edited {
            self.delivery_fee = 0.0;
        }
    }

    /// Value came from an address, not from the operator
    pub fn is_suggested_value(&self) -> bool {
        !self.manually_edited && self.delivery_fee > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(fee: Option<f64>) -> Address {
        Address {
            id: 7,
            customer_id: 1,
            description: "Cra 45 #10-20".into(),
            neighborhood: Some("Laureles".into()),
            delivery_fee: fee,
            is_primary: true,
        }
    }

    #[test]
    fn test_auto_complete_only_when_unset() {
        let mut fee = DeliveryFeeSuggestion::default();
        assert!(fee.auto_complete_from_address(&address(Some(4000.0))));
        assert_eq!(fee.delivery_fee, 4000.0);
        assert!(fee.is_suggested_value());

        // Already holds a value
        assert!(!fee.auto_complete_from_address(&address(Some(6000.0))));
        assert_eq!(fee.delivery_fee, 4000.0);
    }

    #[test]
    fn test_manual_value_wins() {
        let mut fee = DeliveryFeeSuggestion::default();
        fee.set_value(0.0);
        assert!(fee.manually_edited);
        assert!(!fee.auto_complete_from_address(&address(Some(4000.0))));
        assert_eq!(fee.delivery_fee, 0.0);
        assert!(!fee.is_suggested_value());
    }

    #[test]
    fn test_set_value_clamps() {
        let mut fee = DeliveryFeeSuggestion::default();
        fee.set_value(-500.0);
        assert_eq!(fee.delivery_fee, 0.0);
        fee.set_value(f64::NAN);
        assert_eq!(fee.delivery_fee, 0.0);
    }

    #[test]
    fn test_reset_reenables_suggestion() {
        let mut fee = DeliveryFeeSuggestion::default();
        fee.set_value(5000.0);
        fee.reset_manual_edit();
        fee.clear_suggestion();
        assert!(fee.auto_complete_from_address(&address(Some(3500.0))));
        assert_eq!(fee.delivery_fee, 3500.0);
    }

    #[test]
    fn test_auto_complete_from_remembered_fee() {
        let mut fee = DeliveryFeeSuggestion::default();
        assert!(!fee.auto_complete(f64::NAN));
        assert!(fee.auto_complete(4000.0));
        assert_eq!(fee.delivery_fee, 4000.0);
    }

    #[test]
    fn test_address_without_fee() {
        let mut fee = DeliveryFeeSuggestion::default();
        assert!(!fee.auto_complete_from_address(&address(None)));
        assert_eq!(fee.delivery_fee, 0.0);
        assert!(!fee.is_suggested_value());
    }
}
