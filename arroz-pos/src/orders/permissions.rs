//! Order permission rules
//!
//! Pure functions over (role, status, same-day). Superadmin is exempt from
//! the same-day restriction everywhere.
//!
//! ## 编辑权限矩阵
//!
//! | Role | Order fields | Items | Payments | Cancel |
//! |------|--------------|-------|----------|--------|
//! | Superadmin | always | always | always | not cancelled |
//! | Admin | not cancelled; delivered same day | not cancelled; delivered same day | not cancelled, same day | not terminal, same day |
//! | Cashier | not terminal | taken / in_preparation | not cancelled, same day | taken, same day |
//! | Deliveryman | - | - | on_the_way, same day | - |
//! | Kitchen | - | - | - | - |

use crate::utils::time::is_same_day;
use chrono_tz::Tz;
use serde::Serialize;
use shared::models::{Order, OrderStatus, OrderType, Role};
use shared::types::Timestamp;

/// Whether `role` may move an order of `order_type` from `from` to `to`
///
/// Staying on the same status is never a transition. Onsite orders never
/// enter `on_the_way`. Cancelling also goes through [`can_cancel`].
pub fn can_transition(
    role: Role,
    from: OrderStatus,
    to: OrderStatus,
    order_type: OrderType,
) -> bool {
    if from == to || !to.allowed_for(order_type) {
        return false;
    }

    match role {
        Role::Superadmin => true,
        Role::Admin => !from.is_terminal(),
        Role::Cashier => match (from.sequence_index(), to.sequence_index()) {
            (Some(f), Some(t)) => from != OrderStatus::Delivered && t > f,
            _ => false,
        },
        Role::Kitchen => matches!(
            (from, to),
            (OrderStatus::Taken, OrderStatus::InPreparation)
                | (OrderStatus::InPreparation, OrderStatus::Ready)
        ),
        Role::Deliveryman => matches!(
            (from, to),
            (OrderStatus::Ready, OrderStatus::OnTheWay)
                | (OrderStatus::OnTheWay, OrderStatus::Delivered)
        ),
        Role::Unknown => false,
    }
}

/// Edit customer, address, notes and other general fields
pub fn can_edit_order(role: Role, status: OrderStatus, same_day: bool) -> bool {
    match role {
        Role::Superadmin => true,
        Role::Admin => match status {
            OrderStatus::Cancelled => false,
            OrderStatus::Delivered => same_day,
            _ => true,
        },
        Role::Cashier => !status.is_terminal(),
        _ => false,
    }
}

/// Add, remove or change line items
pub fn can_edit_items(role: Role, status: OrderStatus, same_day: bool) -> bool {
    match role {
        Role::Superadmin => true,
        Role::Admin => match status {
            OrderStatus::Cancelled => false,
            OrderStatus::Delivered => same_day,
            _ => true,
        },
        Role::Cashier => matches!(status, OrderStatus::Taken | OrderStatus::InPreparation),
        _ => false,
    }
}

/// Add, change or delete payments
pub fn can_edit_payments(role: Role, status: OrderStatus, same_day: bool) -> bool {
    match role {
        Role::Superadmin => true,
        Role::Admin | Role::Cashier => status != OrderStatus::Cancelled && same_day,
        Role::Deliveryman => status == OrderStatus::OnTheWay && same_day,
        _ => false,
    }
}

pub fn can_cancel(role: Role, status: OrderStatus, same_day: bool) -> bool {
    match role {
        Role::Superadmin => status != OrderStatus::Cancelled,
        Role::Admin => !status.is_terminal() && same_day,
        Role::Cashier => status == OrderStatus::Taken && same_day,
        _ => false,
    }
}

/// Whether `role` may set `to` on the order, cancel included
pub fn can_change_status(role: Role, order: &Order, to: OrderStatus, same_day: bool) -> bool {
    if to == OrderStatus::Cancelled {
        can_cancel(role, order.status, same_day)
    } else {
        can_transition(role, order.status, to, order.order_type)
    }
}

/// Every status `role` may pick for the order at `now`, in canonical order
pub fn available_transitions(
    role: Role,
    order: &Order,
    now: Timestamp,
    tz: Tz,
) -> Vec<OrderStatus> {
    let same_day = is_same_day(order.created_at, now, tz);
    transitions_for(role, order, same_day)
}

fn transitions_for(role: Role, order: &Order, same_day: bool) -> Vec<OrderStatus> {
    OrderStatus::ALL
        .into_iter()
        .filter(|to| can_change_status(role, order, *to, same_day))
        .collect()
}

/// Everything an operator may do with one order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPermissions {
    pub same_day: bool,
    pub can_edit_order: bool,
    pub can_edit_items: bool,
    pub can_edit_payments: bool,
    pub can_cancel: bool,
    pub transitions: Vec<OrderStatus>,
}

impl OrderPermissions {
    /// Resolve permissions at `now` in the operator's timezone
    pub fn resolve(role: Role, order: &Order, now: Timestamp, tz: Tz) -> Self {
        let same_day = is_same_day(order.created_at, now, tz);
        Self {
            same_day,
            can_edit_order: can_edit_order(role, order.status, same_day),
            can_edit_items: can_edit_items(role, order.status, same_day),
            can_edit_payments: can_edit_payments(role, order.status, same_day),
            can_cancel: can_cancel(role, order.status, same_day),
            transitions: transitions_for(role, order, same_day),
        }
    }

    pub fn can_set(&self, status: OrderStatus) -> bool {
        self.transitions.contains(&status)
    }
}
