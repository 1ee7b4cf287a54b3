//! Draft orders
//!
//! Multi-tab order builder: the tab store with its persisted snapshot,
//! totals and single-payment auto-adjustment, delivery fee suggestion,
//! validation and submission.

pub mod delivery_fee;
pub mod store;
pub mod submission;
pub mod totals;
pub mod types;
pub mod validation;

pub use delivery_fee::DeliveryFeeSuggestion;
pub use store::{DRAFTS_STORAGE_KEY, DraftOrderStore};
pub use submission::{build_payload, submit_order};
pub use totals::{auto_adjust_single_payment, recalculate_totals};
pub use types::{
    DraftAppPayment, DraftBankPayment, DraftOrder, DraftOrderItem, DraftPaymentUpdate, OrderTab,
    PersistedDrafts,
};
pub use validation::{ValidationResult, validate_draft};
