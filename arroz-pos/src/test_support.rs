//! Test doubles shared by the unit tests

use arroz_client::{ClientError, ClientResult, OrderApi};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared::client::UserInfo;
use shared::error::ErrorCode;
use shared::models::{
    AppPayment, AppPaymentCreate, BankPayment, BankPaymentCreate, CreateOrderPayload, Order,
    OrderDetail, OrderStatus, OrderType, PaymentUpdate, Role,
};
use shared::types::Timestamp;
use shared::util::now_millis;
use std::collections::{BTreeMap, HashMap};

pub fn user(role: Role) -> UserInfo {
    UserInfo {
        id: 8,
        username: format!("{}-1", role.as_str().to_lowercase()),
        name: Some("Operador".into()),
        role,
        branch_id: Some(1),
    }
}

pub fn order(id: i64, order_type: OrderType, status: OrderStatus, created_at: Timestamp) -> Order {
    Order {
        id,
        branch_id: 1,
        order_type,
        status,
        status_times: BTreeMap::from([(OrderStatus::Taken, created_at)]),
        customer_id: None,
        customer_name: None,
        customer_phone: None,
        guest_name: None,
        address_id: None,
        address_description: None,
        delivery_fee: 0.0,
        reserved_for: None,
        taken_by_id: Some(8),
        deliveryman_id: None,
        deliveryman_name: None,
        notes: None,
        subtotal: 20000.0,
        total: 20000.0,
        details: vec![],
        bank_payments: vec![],
        app_payments: vec![],
        created_at,
    }
}

#[derive(Default)]
struct MockState {
    orders: HashMap<i64, Order>,
    calls: Vec<String>,
    next_id: i64,
    failure: Option<(ErrorCode, String)>,
}

/// In-memory stand-in for the backend
///
/// Records every call by name. Status updates do not stamp `statusTimes`.
#[derive(Default)]
pub struct MockOrderApi {
    state: Mutex<MockState>,
}

impl MockOrderApi {
    pub fn new() -> Self {
        let api = Self::default();
        api.state.lock().next_id = 100;
        api
    }

    pub fn with_order(self, order: Order) -> Self {
        self.state.lock().orders.insert(order.id, order);
        self
    }

    /// Make the next call fail with a structured API error
    pub fn fail_next(&self, code: ErrorCode, message: &str) {
        self.state.lock().failure = Some((code, message.to_string()));
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn order(&self, id: i64) -> Option<Order> {
        self.state.lock().orders.get(&id).cloned()
    }

    fn begin(&self, call: &str) -> ClientResult<parking_lot::MutexGuard<'_, MockState>> {
        let mut state = self.state.lock();
        state.calls.push(call.to_string());
        match state.failure.take() {
            Some((code, message)) => Err(ClientError::Api {
                code,
                message,
                details: None,
            }),
            None => Ok(state),
        }
    }
}

fn not_found(what: &str, id: i64) -> ClientError {
    ClientError::NotFound(format!("{} {} no encontrado", what, id))
}

fn order_mut(state: &mut MockState, id: i64) -> ClientResult<&mut Order> {
    state.orders.get_mut(&id).ok_or_else(|| not_found("Pedido", id))
}

#[async_trait]
impl OrderApi for MockOrderApi {
    async fn create_order(&self, payload: &CreateOrderPayload) -> ClientResult<Order> {
        let mut state = self.begin("create_order")?;
        state.next_id += 1;
        let id = state.next_id;
        let now = now_millis();

        let details: Vec<OrderDetail> = payload
            .details
            .iter()
            .map(|d| OrderDetail {
                id: None,
                product_id: d.product_id,
                product_name: String::new(),
                quantity: d.quantity,
                unit_price: d.unit_price,
                discount: d.discount,
                subtotal: f64::from(d.quantity) * d.unit_price - d.discount,
                notes: d.notes.clone(),
            })
            .collect();
        let subtotal: f64 = details.iter().map(|d| d.subtotal).sum();
        let fee = payload.delivery_fee.unwrap_or(0.0);

        let mut created = order(id, payload.order_type, OrderStatus::Taken, now);
        created.branch_id = payload.branch_id;
        created.taken_by_id = Some(payload.taken_by_id);
        created.customer_id = payload.customer_id;
        created.address_id = payload.address_id;
        created.guest_name = payload.guest_name.clone();
        created.delivery_fee = fee;
        created.reserved_for = payload.reserved_for;
        created.subtotal = subtotal;
        created.total = subtotal + fee;
        created.details = details;

        state.orders.insert(id, created.clone());
        Ok(created)
    }

    async fn get_order(&self, order_id: i64) -> ClientResult<Order> {
        let mut state = self.begin("get_order")?;
        order_mut(&mut state, order_id).map(|o| o.clone())
    }

    async fn update_status(&self, order_id: i64, status: OrderStatus) -> ClientResult<Order> {
        let mut state = self.begin("update_status")?;
        let order = order_mut(&mut state, order_id)?;
        order.status = status;
        Ok(order.clone())
    }

    async fn assign_deliveryman(&self, order_id: i64, deliveryman_id: i64) -> ClientResult<Order> {
        let mut state = self.begin("assign_deliveryman")?;
        let order = order_mut(&mut state, order_id)?;
        order.deliveryman_id = Some(deliveryman_id);
        order.deliveryman_name = Some(format!("Domiciliario {}", deliveryman_id));
        Ok(order.clone())
    }

    async fn create_bank_payment(&self, payment: &BankPaymentCreate) -> ClientResult<BankPayment> {
        let mut state = self.begin("create_bank_payment")?;
        state.next_id += 1;
        let created = BankPayment {
            id: state.next_id,
            order_id: payment.order_id,
            bank_account_id: payment.bank_account_id,
            bank_account_name: None,
            amount: payment.amount,
            is_verified: false,
        };
        order_mut(&mut state, payment.order_id)?
            .bank_payments
            .push(created.clone());
        Ok(created)
    }

    async fn update_bank_payment(
        &self,
        payment_id: i64,
        update: &PaymentUpdate,
    ) -> ClientResult<BankPayment> {
        let mut state = self.begin("update_bank_payment")?;
        let payment = state
            .orders
            .values_mut()
            .flat_map(|o| o.bank_payments.iter_mut())
            .find(|p| p.id == payment_id)
            .ok_or_else(|| not_found("Pago", payment_id))?;
        if let Some(amount) = update.amount {
            payment.amount = amount;
        }
        if let Some(account) = update.bank_account_id {
            payment.bank_account_id = account;
        }
        Ok(payment.clone())
    }

    async fn delete_bank_payment(&self, payment_id: i64) -> ClientResult<()> {
        let mut state = self.begin("delete_bank_payment")?;
        for order in state.orders.values_mut() {
            order.bank_payments.retain(|p| p.id != payment_id);
        }
        Ok(())
    }

    async fn create_app_payment(&self, payment: &AppPaymentCreate) -> ClientResult<AppPayment> {
        let mut state = self.begin("create_app_payment")?;
        state.next_id += 1;
        let created = AppPayment {
            id: state.next_id,
            order_id: payment.order_id,
            app_id: payment.app_id,
            app_name: None,
            amount: payment.amount,
            is_verified: false,
        };
        order_mut(&mut state, payment.order_id)?
            .app_payments
            .push(created.clone());
        Ok(created)
    }

    async fn update_app_payment(
        &self,
        payment_id: i64,
        update: &PaymentUpdate,
    ) -> ClientResult<AppPayment> {
        let mut state = self.begin("update_app_payment")?;
        let payment = state
            .orders
            .values_mut()
            .flat_map(|o| o.app_payments.iter_mut())
            .find(|p| p.id == payment_id)
            .ok_or_else(|| not_found("Pago", payment_id))?;
        if let Some(amount) = update.amount {
            payment.amount = amount;
        }
        if let Some(app) = update.app_id {
            payment.app_id = app;
        }
        Ok(payment.clone())
    }

    async fn delete_app_payment(&self, payment_id: i64) -> ClientResult<()> {
        let mut state = self.begin("delete_app_payment")?;
        for order in state.orders.values_mut() {
            order.app_payments.retain(|p| p.id != payment_id);
        }
        Ok(())
    }
}
