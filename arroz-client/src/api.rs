// arroz-client/src/api.rs
// 订单 API - 下单、状态流转、付款

use crate::{ClientResult, NetworkHttpClient};
use async_trait::async_trait;
use shared::models::{
    AppPayment, AppPaymentCreate, AssignDeliverymanRequest, BankPayment, BankPaymentCreate,
    CreateOrderPayload, Order, OrderStatus, PaymentUpdate, UpdateStatusRequest,
};

/// Order endpoints used by the POS
///
/// Implemented by [`NetworkHttpClient`] against the real backend and by
/// in-memory doubles in tests.
#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn create_order(&self, payload: &CreateOrderPayload) -> ClientResult<Order>;
    async fn get_order(&self, order_id: i64) -> ClientResult<Order>;
    async fn update_status(&self, order_id: i64, status: OrderStatus) -> ClientResult<Order>;
    async fn assign_deliveryman(&self, order_id: i64, deliveryman_id: i64) -> ClientResult<Order>;

    async fn create_bank_payment(&self, payment: &BankPaymentCreate) -> ClientResult<BankPayment>;
    async fn update_bank_payment(
        &self,
        payment_id: i64,
        update: &PaymentUpdate,
    ) -> ClientResult<BankPayment>;
    async fn delete_bank_payment(&self, payment_id: i64) -> ClientResult<()>;

    async fn create_app_payment(&self, payment: &AppPaymentCreate) -> ClientResult<AppPayment>;
    async fn update_app_payment(
        &self,
        payment_id: i64,
        update: &PaymentUpdate,
    ) -> ClientResult<AppPayment>;
    async fn delete_app_payment(&self, payment_id: i64) -> ClientResult<()>;
}

#[async_trait]
impl OrderApi for NetworkHttpClient {
    async fn create_order(&self, payload: &CreateOrderPayload) -> ClientResult<Order> {
        tracing::debug!(
            order_type = %payload.order_type,
            details = payload.details.len(),
            "Creating order"
        );
        self.post("api/orders", payload).await
    }

    async fn get_order(&self, order_id: i64) -> ClientResult<Order> {
        self.get(&format!("api/orders/{}", order_id)).await
    }

    async fn update_status(&self, order_id: i64, status: OrderStatus) -> ClientResult<Order> {
        tracing::debug!(order_id, status = %status, "Updating order status");
        self.put(
            &format!("api/orders/{}/status", order_id),
            &UpdateStatusRequest { status },
        )
        .await
    }

    async fn assign_deliveryman(&self, order_id: i64, deliveryman_id: i64) -> ClientResult<Order> {
        tracing::debug!(order_id, deliveryman_id, "Assigning deliveryman");
        self.put(
            &format!("api/orders/{}/deliveryman", order_id),
            &AssignDeliverymanRequest { deliveryman_id },
        )
        .await
    }

    // ========== Bank payments ==========

    async fn create_bank_payment(&self, payment: &BankPaymentCreate) -> ClientResult<BankPayment> {
        self.post("api/bank-payments", payment).await
    }

    async fn update_bank_payment(
        &self,
        payment_id: i64,
        update: &PaymentUpdate,
    ) -> ClientResult<BankPayment> {
        self.put(&format!("api/bank-payments/{}", payment_id), update)
            .await
    }

    async fn delete_bank_payment(&self, payment_id: i64) -> ClientResult<()> {
        self.delete(&format!("api/bank-payments/{}", payment_id))
            .await
    }

    // ========== App payments ==========

    async fn create_app_payment(&self, payment: &AppPaymentCreate) -> ClientResult<AppPayment> {
        self.post("api/app-payments", payment).await
    }

    async fn update_app_payment(
        &self,
        payment_id: i64,
        update: &PaymentUpdate,
    ) -> ClientResult<AppPayment> {
        self.put(&format!("api/app-payments/{}", payment_id), update)
            .await
    }

    async fn delete_app_payment(&self, payment_id: i64) -> ClientResult<()> {
        self.delete(&format!("api/app-payments/{}", payment_id))
            .await
    }
}
