//! Payment reconciliation for submitted orders
//!
//! Payment CRUD goes straight to the backend. On success the local copy of
//! the order is patched in place; on failure nothing is rolled back and the
//! caller decides whether to [`OrderPaymentsEditor::refresh`].

use super::permissions::can_edit_payments;
use crate::money;
use crate::utils::time::is_same_day;
use arroz_client::OrderApi;
use chrono_tz::Tz;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AppPayment, AppPaymentCreate, BankPayment, BankPaymentCreate, Order, PaymentUpdate, Role,
};
use shared::util::now_millis;
use std::sync::Arc;

pub struct OrderPaymentsEditor {
    api: Arc<dyn OrderApi>,
    order: Order,
    role: Role,
    tz: Tz,
}

impl OrderPaymentsEditor {
    pub fn new(api: Arc<dyn OrderApi>, order: Order, role: Role, tz: Tz) -> Self {
        Self {
            api,
            order,
            role,
            tz,
        }
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn into_order(self) -> Order {
        self.order
    }

    pub fn can_edit(&self) -> bool {
        let same_day = is_same_day(self.order.created_at, now_millis(), self.tz);
        can_edit_payments(self.role, self.order.status, same_day)
    }

    /// Uncovered part of the total, never negative
    pub fn remaining(&self) -> f64 {
        money::remaining(self.order.total, self.order.paid_amount())
    }

    /// Amount to prefill for a new payment
    pub fn suggested_amount(&self) -> f64 {
        if self.order.payment_count() == 0 {
            self.order.total
        } else {
            self.remaining()
        }
    }

    // ========== Bank payments ==========

    pub async fn add_bank_payment(
        &mut self,
        bank_account_id: i64,
        amount: Option<f64>,
    ) -> AppResult<BankPayment> {
        self.ensure_can_edit()?;
        let amount = amount.unwrap_or_else(|| self.suggested_amount());
        self.ensure_fits(amount, 0.0)?;

        let created = self
            .api
            .create_bank_payment(&BankPaymentCreate {
                order_id: self.order.id,
                bank_account_id,
                amount,
            })
            .await?;
        tracing::info!(
            order_id = self.order.id,
            payment_id = created.id,
            amount,
            "Bank payment added"
        );
        self.order.bank_payments.push(created.clone());
        Ok(created)
    }

    pub async fn update_bank_payment(
        &mut self,
        payment_id: i64,
        update: PaymentUpdate,
    ) -> AppResult<BankPayment> {
        self.ensure_can_edit()?;
        let current = self
            .order
            .bank_payments
            .iter()
            .find(|p| p.id == payment_id)
            .map(|p| p.amount)
            .ok_or_else(|| payment_not_found(payment_id))?;
        if let Some(amount) = update.amount {
            self.ensure_fits(amount, current)?;
        }

        let updated = self.api.update_bank_payment(payment_id, &update).await?;
        if let Some(slot) = self
            .order
            .bank_payments
            .iter_mut()
            .find(|p| p.id == payment_id)
        {
            *slot = updated.clone();
        }
        tracing::debug!(order_id = self.order.id, payment_id, "Bank payment updated");
        Ok(updated)
    }

    pub async fn delete_bank_payment(&mut self, payment_id: i64) -> AppResult<()> {
        self.ensure_can_edit()?;
        self.api.delete_bank_payment(payment_id).await?;
        self.order.bank_payments.retain(|p| p.id != payment_id);
        tracing::info!(order_id = self.order.id, payment_id, "Bank payment deleted");
        Ok(())
    }

    // ========== App payment ==========

    pub async fn add_app_payment(
        &mut self,
        app_id: i64,
        amount: Option<f64>,
    ) -> AppResult<AppPayment> {
        self.ensure_can_edit()?;
        if !self.order.app_payments.is_empty() {
            tracing::warn!(order_id = self.order.id, "Order already has an app payment");
            return Err(AppError::business_rule(
                ErrorCode::AppPaymentAlreadyExists,
                "El pedido ya tiene un pago por aplicación",
            ));
        }
        let amount = amount.unwrap_or_else(|| self.suggested_amount());
        self.ensure_fits(amount, 0.0)?;

        let created = self
            .api
            .create_app_payment(&AppPaymentCreate {
                order_id: self.order.id,
                app_id,
                amount,
            })
            .await?;
        tracing::info!(
            order_id = self.order.id,
            payment_id = created.id,
            amount,
            "App payment added"
        );
        self.order.app_payments = vec![created.clone()];
        Ok(created)
    }

    pub async fn update_app_payment(
        &mut self,
        payment_id: i64,
        update: PaymentUpdate,
    ) -> AppResult<AppPayment> {
        self.ensure_can_edit()?;
        let current = self
            .order
            .app_payments
            .iter()
            .find(|p| p.id == payment_id)
            .map(|p| p.amount)
            .ok_or_else(|| payment_not_found(payment_id))?;
        if let Some(amount) = update.amount {
            self.ensure_fits(amount, current)?;
        }

        let updated = self.api.update_app_payment(payment_id, &update).await?;
        if let Some(slot) = self
            .order
            .app_payments
            .iter_mut()
            .find(|p| p.id == payment_id)
        {
            *slot = updated.clone();
        }
        tracing::debug!(order_id = self.order.id, payment_id, "App payment updated");
        Ok(updated)
    }

    pub async fn delete_app_payment(&mut self, payment_id: i64) -> AppResult<()> {
        self.ensure_can_edit()?;
        self.api.delete_app_payment(payment_id).await?;
        self.order.app_payments.retain(|p| p.id != payment_id);
        tracing::info!(order_id = self.order.id, payment_id, "App payment deleted");
        Ok(())
    }

    // ========== Sync ==========

    /// Re-sync a lone payment to the order total
    ///
    /// Returns `true` when an update was sent. Nothing happens when the order
    /// has zero or several payments, or the lone payment already matches.
    pub async fn auto_adjust_single_payment(&mut self) -> AppResult<bool> {
        if self.order.payment_count() != 1 {
            return Ok(false);
        }
        let total = self.order.total;

        if let Some(payment) = self.order.bank_payments.first() {
            if money::same_amount(payment.amount, total) {
                return Ok(false);
            }
            let id = payment.id;
            self.update_bank_payment(id, PaymentUpdate::amount(total))
                .await?;
        } else if let Some(payment) = self.order.app_payments.first() {
            if money::same_amount(payment.amount, total) {
                return Ok(false);
            }
            let id = payment.id;
            self.update_app_payment(id, PaymentUpdate::amount(total))
                .await?;
        }

        tracing::info!(order_id = self.order.id, total, "Single payment synced to total");
        Ok(true)
    }

    /// Replace the local copy with the backend's
    pub async fn refresh(&mut self) -> AppResult<&Order> {
        self.order = self.api.get_order(self.order.id).await?;
        Ok(&self.order)
    }

    fn ensure_can_edit(&self) -> AppResult<()> {
        if self.can_edit() {
            return Ok(());
        }
        tracing::warn!(
            order_id = self.order.id,
            role = %self.role,
            status = %self.order.status,
            "Payment edit denied"
        );
        Err(AppError::permission_denied(
            "No tiene permiso para modificar los pagos de este pedido",
        ))
    }

    /// `amount` replaces `previous` in the paid sum
    fn ensure_fits(&self, amount: f64, previous: f64) -> AppResult<()> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(AppError::validation("El monto debe ser mayor a cero"));
        }
        if amount > money::MAX_PAYMENT_AMOUNT {
            return Err(AppError::validation("El monto excede el máximo permitido")
                .with_detail("max", money::MAX_PAYMENT_AMOUNT));
        }
        let paid = money::to_f64(
            money::to_decimal(self.order.paid_amount())
                .saturating_sub(money::to_decimal(previous))
                .saturating_add(money::to_decimal(amount)),
        );
        if money::exceeds(paid, self.order.total) {
            return Err(AppError::business_rule(
                ErrorCode::PaymentExceedsTotal,
                "La suma de los pagos excede el total del pedido",
            )
            .with_detail("paid", paid)
            .with_detail("total", self.order.total));
        }
        Ok(())
    }
}

fn payment_not_found(payment_id: i64) -> AppError {
    AppError::with_message(ErrorCode::PaymentNotFound, "Pago no encontrado")
        .with_detail("payment_id", payment_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockOrderApi, order};
    use crate::utils::time::DEFAULT_TIMEZONE;
    use shared::models::{OrderStatus, OrderType};
    use shared::types::HOUR_MILLIS;

    fn setup(role: Role, o: Order) -> (Arc<MockOrderApi>, OrderPaymentsEditor) {
        let api = Arc::new(MockOrderApi::new().with_order(o.clone()));
        let editor = OrderPaymentsEditor::new(api.clone(), o, role, DEFAULT_TIMEZONE);
        (api, editor)
    }

    fn today(status: OrderStatus) -> Order {
        order(1, OrderType::Delivery, status, now_millis())
    }

    #[tokio::test]
    async fn test_first_payment_takes_total() {
        let (api, mut editor) = setup(Role::Cashier, today(OrderStatus::Taken));
        assert_eq!(editor.suggested_amount(), 20000.0);

        let payment = editor.add_bank_payment(3, None).await.unwrap();
        assert_eq!(payment.amount, 20000.0);
        assert_eq!(editor.order().bank_payments.len(), 1);
        assert_eq!(api.order(1).unwrap().bank_payments.len(), 1);
        assert_eq!(editor.suggested_amount(), 0.0);
    }

    #[tokio::test]
    async fn test_suggests_remaining_balance() {
        let (_, mut editor) = setup(Role::Cashier, today(OrderStatus::Taken));
        editor.add_bank_payment(3, Some(12000.0)).await.unwrap();
        assert_eq!(editor.remaining(), 8000.0);

        let app = editor.add_app_payment(2, None).await.unwrap();
        assert_eq!(app.amount, 8000.0);
        assert_eq!(editor.order().paid_amount(), 20000.0);
    }

    #[tokio::test]
    async fn test_second_app_payment_rejected_locally() {
        let (api, mut editor) = setup(Role::Cashier, today(OrderStatus::Taken));
        editor.add_app_payment(2, Some(5000.0)).await.unwrap();

        let err = editor.add_app_payment(4, Some(1000.0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AppPaymentAlreadyExists);
        assert_eq!(api.calls(), vec!["create_app_payment".to_string()]);
    }

    #[tokio::test]
    async fn test_overpayment_rejected() {
        let (api, mut editor) = setup(Role::Cashier, today(OrderStatus::Taken));
        editor.add_bank_payment(3, Some(15000.0)).await.unwrap();

        let err = editor.add_bank_payment(3, Some(6000.0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentExceedsTotal);

        let id = editor.order().bank_payments[0].id;
        let updated = editor
            .update_bank_payment(id, PaymentUpdate::amount(20000.0))
            .await
            .unwrap();
        assert_eq!(updated.amount, 20000.0);
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_zero_amount_rejected() {
        let (api, mut editor) = setup(Role::Cashier, today(OrderStatus::Taken));
        editor.add_bank_payment(3, None).await.unwrap();

        let err = editor.add_bank_payment(3, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_non_finite_amount_rejected() {
        let (api, mut editor) = setup(Role::Cashier, today(OrderStatus::Taken));

        for amount in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = editor.add_bank_payment(3, Some(amount)).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationFailed);
            let err = editor.add_app_payment(2, Some(amount)).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationFailed);
        }

        let err = editor
            .add_bank_payment(3, Some(money::MAX_PAYMENT_AMOUNT * 10.0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_permission_checked_first() {
        let (api, mut editor) = setup(Role::Kitchen, today(OrderStatus::Taken));
        let err = editor.add_bank_payment(3, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert!(api.calls().is_empty());

        let yesterday = now_millis() - 30 * HOUR_MILLIS;
        let old = order(1, OrderType::Delivery, OrderStatus::Delivered, yesterday);
        let (api, mut editor) = setup(Role::Admin, old.clone());
        assert!(!editor.can_edit());
        assert!(editor.add_bank_payment(3, None).await.is_err());
        assert!(api.calls().is_empty());

        let (_, mut editor) = setup(Role::Superadmin, old);
        assert!(editor.add_bank_payment(3, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_deliveryman_only_while_on_the_way() {
        let (_, mut editor) = setup(Role::Deliveryman, today(OrderStatus::OnTheWay));
        assert!(editor.add_app_payment(2, None).await.is_ok());

        let (_, editor) = setup(Role::Deliveryman, today(OrderStatus::Delivered));
        assert!(!editor.can_edit());
    }

    #[tokio::test]
    async fn test_delete_payments() {
        let (api, mut editor) = setup(Role::Admin, today(OrderStatus::Ready));
        let bank = editor.add_bank_payment(3, Some(5000.0)).await.unwrap();
        let app = editor.add_app_payment(2, Some(5000.0)).await.unwrap();

        editor.delete_bank_payment(bank.id).await.unwrap();
        editor.delete_app_payment(app.id).await.unwrap();
        assert_eq!(editor.order().payment_count(), 0);
        assert_eq!(api.order(1).unwrap().payment_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_is_not_rolled_back_or_applied() {
        let (api, mut editor) = setup(Role::Cashier, today(OrderStatus::Taken));
        let bank = editor.add_bank_payment(3, Some(5000.0)).await.unwrap();

        api.fail_next(ErrorCode::InternalError, "Error del servidor");
        let err = editor.delete_bank_payment(bank.id).await.unwrap_err();
        assert_eq!(err.message, "Error del servidor");
        assert_eq!(editor.order().bank_payments.len(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_payment() {
        let (api, mut editor) = setup(Role::Cashier, today(OrderStatus::Taken));
        let err = editor
            .update_app_payment(77, PaymentUpdate::amount(100.0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentNotFound);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_auto_adjust_single_payment() {
        let (api, mut editor) = setup(Role::Cashier, today(OrderStatus::Taken));
        editor.add_bank_payment(3, Some(15000.0)).await.unwrap();

        assert!(editor.auto_adjust_single_payment().await.unwrap());
        assert_eq!(editor.order().bank_payments[0].amount, 20000.0);
        assert_eq!(api.order(1).unwrap().bank_payments[0].amount, 20000.0);

        assert!(!editor.auto_adjust_single_payment().await.unwrap());
        assert_eq!(
            api.calls(),
            vec![
                "create_bank_payment".to_string(),
                "update_bank_payment".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_auto_adjust_app_payment() {
        let (_, mut editor) = setup(Role::Cashier, today(OrderStatus::Taken));
        editor.add_app_payment(2, Some(1000.0)).await.unwrap();
        assert!(editor.auto_adjust_single_payment().await.unwrap());
        assert_eq!(editor.order().app_payments[0].amount, 20000.0);
    }

    #[tokio::test]
    async fn test_auto_adjust_skips_multiple_payments() {
        let (api, mut editor) = setup(Role::Cashier, today(OrderStatus::Taken));
        editor.add_bank_payment(3, Some(5000.0)).await.unwrap();
        editor.add_bank_payment(4, Some(5000.0)).await.unwrap();

        assert!(!editor.auto_adjust_single_payment().await.unwrap());
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_replaces_local_copy() {
        let (api, mut editor) = setup(Role::Cashier, today(OrderStatus::Taken));
        editor.add_bank_payment(3, Some(5000.0)).await.unwrap();
        api.fail_next(ErrorCode::InternalError, "Error del servidor");
        let _ = editor.add_app_payment(2, Some(1000.0)).await;

        let refreshed = editor.refresh().await.unwrap();
        assert_eq!(refreshed.payment_count(), 1);
    }
}
