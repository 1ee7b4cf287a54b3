//! Submitted orders
//!
//! Role permissions, status changes with the courier-assignment flow, and
//! payment reconciliation against the backend.

pub mod payments;
pub mod permissions;
pub mod status;

pub use payments::OrderPaymentsEditor;
pub use permissions::{
    OrderPermissions, available_transitions, can_cancel, can_change_status, can_edit_items,
    can_edit_order, can_edit_payments, can_transition,
};
pub use status::{
    OrderStatusController, StatusChangeFlow, StatusChangeOutcome, requires_courier,
    stamp_status_time,
};
