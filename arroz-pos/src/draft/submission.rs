//! Draft → create-order payload, and submission

use super::types::DraftOrder;
use super::validation::validate_draft;
use arroz_client::OrderApi;
use shared::client::UserInfo;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    CreateOrderAppPayment, CreateOrderBankPayment, CreateOrderDetail, CreateOrderPayload, Order,
    OrderType,
};

/// Build the wire payload for a draft
///
/// Delivery-only fields are sent for delivery orders and `reservedFor` for
/// reservations; blank guest names and notes are dropped.
pub fn build_payload(draft: &DraftOrder, taken_by_id: i64, branch_id: i64) -> CreateOrderPayload {
    let is_delivery = draft.order_type == OrderType::Delivery;
    let is_reservation = draft.order_type == OrderType::Reservation;

    CreateOrderPayload {
        branch_id,
        taken_by_id,
        order_type: draft.order_type,
        customer_id: draft.customer_id.filter(|_| is_delivery),
        address_id: draft.address_id.filter(|_| is_delivery),
        delivery_fee: is_delivery.then_some(draft.delivery_fee),
        reserved_for: draft.reserved_for.filter(|_| is_reservation),
        guest_name: non_blank(draft.guest_name.as_deref()),
        notes: non_blank(draft.notes.as_deref()),
        details: draft
            .items
            .iter()
            .map(|item| CreateOrderDetail {
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
                discount: item.discount,
                notes: non_blank(item.notes.as_deref()),
            })
            .collect(),
        bank_payments: draft
            .bank_payments
            .iter()
            .map(|p| CreateOrderBankPayment {
                bank_account_id: p.bank_account_id,
                amount: p.amount,
            })
            .collect(),
        app_payments: draft
            .app_payment
            .iter()
            .map(|p| CreateOrderAppPayment {
                app_id: p.app_id,
                amount: p.amount,
            })
            .collect(),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validate and submit a draft
///
/// `branch_id` falls back to the operator's branch. The draft is left
/// untouched; closing its tab is up to the caller.
pub async fn submit_order(
    api: &dyn OrderApi,
    draft: &DraftOrder,
    actor: Option<&UserInfo>,
    branch_id: Option<i64>,
) -> AppResult<Order> {
    let actor = actor.ok_or_else(AppError::not_authenticated)?;
    let branch_id = branch_id.or(actor.branch_id).ok_or_else(|| {
        AppError::business_rule(
            ErrorCode::BranchRequired,
            "Debe seleccionar una sede antes de crear el pedido",
        )
    })?;

    let validation = validate_draft(draft);
    if !validation.is_valid {
        return Err(AppError::validation(validation.message())
            .with_detail("errors", validation.errors));
    }

    let payload = build_payload(draft, actor.id, branch_id);
    let order = api.create_order(&payload).await.map_err(|e| {
        tracing::warn!(tab_id = %draft.tab_id, error = %e, "Order submission failed");
        AppError::from(e)
    })?;

    tracing::info!(
        tab_id = %draft.tab_id,
        order_id = order.id,
        order_type = %order.order_type,
        total = order.total,
        "Order submitted"
    );
    Ok(order)
}
