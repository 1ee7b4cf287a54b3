//! Order status changes
//!
//! Permission-gated status updates against the backend. Moving a delivery
//! order to `on_the_way` without a courier parks the request until a
//! deliveryman is assigned:
//!
//! ```text
//! Idle ──request(on_the_way, no courier)──▶ AwaitingCourierAssignment
//!   ▲                                              │
//!   └──── assign_courier_and_continue / cancel ────┘
//! ```

use super::permissions::can_change_status;
use crate::utils::time::is_same_day;
use arroz_client::OrderApi;
use chrono_tz::Tz;
use shared::client::UserInfo;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderStatus, OrderType};
use shared::types::Timestamp;
use shared::util::now_millis;
use std::sync::Arc;

/// Pending-status state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusChangeFlow {
    #[default]
    Idle,
    AwaitingCourierAssignment {
        order_id: i64,
        pending_status: OrderStatus,
    },
}

impl StatusChangeFlow {
    pub fn is_awaiting_courier(&self) -> bool {
        matches!(self, Self::AwaitingCourierAssignment { .. })
    }

    pub fn pending_status(&self) -> Option<OrderStatus> {
        match self {
            Self::Idle => None,
            Self::AwaitingCourierAssignment { pending_status, .. } => Some(*pending_status),
        }
    }
}

/// Result of a status change request
#[derive(Debug, Clone, PartialEq)]
pub enum StatusChangeOutcome {
    /// Backend accepted the new status
    Updated(Order),
    /// A deliveryman must be assigned first; the change is pending
    CourierRequired {
        order_id: i64,
        pending_status: OrderStatus,
    },
}

/// Whether moving to `to` needs a courier the order does not have yet
pub fn requires_courier(order: &Order, to: OrderStatus) -> bool {
    order.order_type == OrderType::Delivery
        && to == OrderStatus::OnTheWay
        && !order.has_deliveryman()
}

/// Record the transition time when the backend left it out
pub fn stamp_status_time(order: &mut Order, now: Timestamp) {
    order.status_times.entry(order.status).or_insert(now);
}

pub struct OrderStatusController {
    api: Arc<dyn OrderApi>,
    tz: Tz,
    flow: StatusChangeFlow,
}

impl OrderStatusController {
    pub fn new(api: Arc<dyn OrderApi>, tz: Tz) -> Self {
        Self {
            api,
            tz,
            flow: StatusChangeFlow::Idle,
        }
    }

    pub fn flow(&self) -> StatusChangeFlow {
        self.flow
    }

    /// Request a status change
    ///
    /// Permission is checked before any network call. A delivery order
    /// without a courier moving to `on_the_way` is parked and reported as
    /// [`StatusChangeOutcome::CourierRequired`].
    pub async fn request_status_change(
        &mut self,
        actor: &UserInfo,
        order: &Order,
        to: OrderStatus,
    ) -> AppResult<StatusChangeOutcome> {
        let same_day = is_same_day(order.created_at, now_millis(), self.tz);
        if !can_change_status(actor.role, order, to, same_day) {
            tracing::warn!(
                order_id = order.id,
                role = %actor.role,
                from = %order.status,
                to = %to,
                "Status change denied"
            );
            return Err(denied(order.status, to));
        }

        if requires_courier(order, to) {
            self.flow = StatusChangeFlow::AwaitingCourierAssignment {
                order_id: order.id,
                pending_status: to,
            };
            tracing::info!(order_id = order.id, "Status change waiting for deliveryman");
            return Ok(StatusChangeOutcome::CourierRequired {
                order_id: order.id,
                pending_status: to,
            });
        }

        let updated = self.apply(order.id, to).await?;
        self.flow = StatusChangeFlow::Idle;
        Ok(StatusChangeOutcome::Updated(updated))
    }

    /// Assign a deliveryman and apply the parked status
    pub async fn assign_courier_and_continue(&mut self, deliveryman_id: i64) -> AppResult<Order> {
        let StatusChangeFlow::AwaitingCourierAssignment {
            order_id,
            pending_status,
        } = self.flow
        else {
            return Err(AppError::invalid_request(
                "No hay un cambio de estado pendiente",
            ));
        };

        self.api
            .assign_deliveryman(order_id, deliveryman_id)
            .await
            .map_err(AppError::from)?;
        tracing::info!(order_id, deliveryman_id, "Deliveryman assigned");

        let updated = self.apply(order_id, pending_status).await?;
        self.flow = StatusChangeFlow::Idle;
        Ok(updated)
    }

    /// Drop the parked status change
    pub fn cancel_pending(&mut self) {
        if let StatusChangeFlow::AwaitingCourierAssignment { order_id, .. } = self.flow {
            tracing::debug!(order_id, "Pending status change cancelled");
        }
        self.flow = StatusChangeFlow::Idle;
    }

    async fn apply(&self, order_id: i64, to: OrderStatus) -> AppResult<Order> {
        let mut updated = self.api.update_status(order_id, to).await.map_err(|e| {
            tracing::warn!(order_id, to = %to, error = %e, "Status update failed");
            AppError::from(e)
        })?;
        stamp_status_time(&mut updated, now_millis());
        tracing::info!(order_id, status = %updated.status, "Order status changed");
        Ok(updated)
    }
}

fn denied(from: OrderStatus, to: OrderStatus) -> AppError {
    let message = if to == OrderStatus::Cancelled {
        "No tiene permiso para cancelar este pedido".to_string()
    } else {
        format!(
            "No puede cambiar el pedido de «{}» a «{}»",
            from.label(),
            to.label()
        )
    };
    AppError::with_message(ErrorCode::PermissionDenied, message)
        .with_detail("from", from.as_str())
        .with_detail("to", to.as_str())
}
