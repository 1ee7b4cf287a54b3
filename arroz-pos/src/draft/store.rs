//! Draft order store
//!
//! Owns every open tab, the active tab id and the tab counter. Mutations
//! target the active draft, silently do nothing when the tab, item or
//! payment they reference is missing, recompute totals, and persist the
//! whole store. Persistence failures are logged and swallowed.

use super::delivery_fee::DeliveryFeeSuggestion;
use super::totals::recalculate_totals;
use super::types::{
    DraftAppPayment, DraftBankPayment, DraftOrder, DraftOrderItem, DraftPaymentUpdate, OrderTab,
    PersistedDrafts,
};
use crate::config::DraftConfig;
use crate::money::{self, MAX_PAYMENT_AMOUNT, MAX_PRICE};
use crate::storage::{KeyValueStore, read_json, write_json};
use chrono::{DateTime, Utc};
use shared::models::{Address, Customer, OrderType, Product};
use shared::types::Timestamp;
use shared::util::now_millis;

/// Storage key of the persisted snapshot
pub const DRAFTS_STORAGE_KEY: &str = "senor-arroz-draft-orders";

fn new_temp_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn clean_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Bounded money input; out-of-range values are logged and rejected
fn accept_amount(op: &'static str, value: f64, max: f64) -> Option<f64> {
    let accepted = money::bounded(value, max);
    if accepted.is_none() {
        tracing::warn!(op, value, max, "Out-of-range amount ignored");
    }
    accepted
}

fn accept_quantity(op: &'static str, quantity: i32) -> bool {
    let valid = money::is_valid_quantity(quantity);
    if !valid && quantity > 0 {
        tracing::warn!(op, quantity, max = money::MAX_QUANTITY, "Out-of-range quantity ignored");
    }
    valid
}

pub struct DraftOrderStore<S: KeyValueStore> {
    storage: S,
    config: DraftConfig,
    /// Insertion order is tab order
    drafts: Vec<DraftOrder>,
    current_tab_id: Option<String>,
    next_tab_number: u32,
}

impl<S: KeyValueStore> DraftOrderStore<S> {
    /// Empty store; call [`Self::load_from_storage`] to restore a snapshot
    pub fn new(storage: S, config: DraftConfig) -> Self {
        Self {
            storage,
            config,
            drafts: Vec::new(),
            current_tab_id: None,
            next_tab_number: 1,
        }
    }

    /// Store restored from its persisted snapshot
    pub fn open(storage: S, config: DraftConfig) -> Self {
        let mut store = Self::new(storage, config);
        store.load_from_storage();
        store
    }

    // ========== Queries ==========

    pub fn drafts(&self) -> &[DraftOrder] {
        &self.drafts
    }

    pub fn draft(&self, tab_id: &str) -> Option<&DraftOrder> {
        self.drafts.iter().find(|d| d.tab_id == tab_id)
    }

    pub fn current_tab_id(&self) -> Option<&str> {
        self.current_tab_id.as_deref()
    }

    pub fn next_tab_number(&self) -> u32 {
        self.next_tab_number
    }

    pub fn active_draft(&self) -> Option<&DraftOrder> {
        self.current_tab_id.as_deref().and_then(|id| self.draft(id))
    }

    pub fn tab_count(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_at_capacity(&self) -> bool {
        self.drafts.len() >= self.config.max_tabs
    }

    /// Tab-bar projections in tab order
    pub fn tabs(&self) -> Vec<OrderTab> {
        self.drafts
            .iter()
            .map(|d| OrderTab::from_draft(d, self.current_tab_id.as_deref() == Some(&d.tab_id)))
            .collect()
    }

    // ========== Tabs ==========

    /// Open a new empty tab and make it active
    ///
    /// Returns `None` when the tab limit is reached.
    pub fn create_new_tab(&mut self) -> Option<String> {
        if self.is_at_capacity() {
            tracing::warn!(max_tabs = self.config.max_tabs, "Tab limit reached");
            return None;
        }

        let now = now_millis();
        let number = self.next_tab_number;
        let tab_id = format!("tab-{}-{}", now, number);
        self.next_tab_number = number.checked_add(1).unwrap_or(1);

        self.drafts
            .push(DraftOrder::new(tab_id.clone(), format!("Pedido {}", number), now));
        self.current_tab_id = Some(tab_id.clone());
        tracing::info!(tab_id = %tab_id, "Draft tab created");

        self.save_to_storage();
        Some(tab_id)
    }

    pub fn switch_tab(&mut self, tab_id: &str) {
        if self.draft(tab_id).is_none() {
            tracing::debug!(tab_id, "Switch to unknown tab ignored");
            return;
        }
        self.current_tab_id = Some(tab_id.to_string());
        self.save_to_storage();
    }

    /// Close a tab; an active tab hands over to the first remaining one
    pub fn close_tab(&mut self, tab_id: &str) {
        let Some(pos) = self.drafts.iter().position(|d| d.tab_id == tab_id) else {
            return;
        };
        self.drafts.remove(pos);

        if self.current_tab_id.as_deref() == Some(tab_id) {
            self.current_tab_id = self.drafts.first().map(|d| d.tab_id.clone());
        }
        tracing::info!(tab_id, remaining = self.drafts.len(), "Draft tab closed");
        self.save_to_storage();
    }

    pub fn rename_tab(&mut self, tab_id: &str, name: &str) {
        let Some(name) = clean_text(name) else {
            return;
        };
        let Some(draft) = self.drafts.iter_mut().find(|d| d.tab_id == tab_id) else {
            return;
        };
        draft.tab_name = name;
        draft.updated_at = now_millis();
        self.save_to_storage();
    }

    /// Drop every tab and the persisted snapshot
    pub fn clear_all(&mut self) {
        self.drafts.clear();
        self.current_tab_id = None;
        self.next_tab_number = 1;
        if let Err(e) = self.storage.remove(DRAFTS_STORAGE_KEY) {
            tracing::error!(error = %e, "Failed to clear stored drafts");
        }
        tracing::info!("All draft tabs cleared");
    }

    // ========== Active draft mutation ==========

    /// Apply `f` to the active draft; `f` reports whether it changed anything
    fn mutate_active<F>(&mut self, op: &'static str, f: F) -> bool
    where
        F: FnOnce(&mut DraftOrder) -> bool,
    {
        let Some(tab_id) = self.current_tab_id.clone() else {
            tracing::debug!(op, "No active tab");
            return false;
        };
        let Some(draft) = self.drafts.iter_mut().find(|d| d.tab_id == tab_id) else {
            tracing::debug!(op, tab_id = %tab_id, "Active tab missing");
            return false;
        };

        if !f(draft) {
            return false;
        }
        recalculate_totals(draft);
        draft.updated_at = now_millis();
        tracing::debug!(op, tab_id = %tab_id, total = draft.total, "Draft updated");

        self.save_to_storage();
        true
    }

    /// Switch the order type
    ///
    /// Leaving delivery drops the delivery fee so the total stays
    /// consistent with what will be submitted. Returning to delivery with an
    /// address still selected restores that address's fee.
    pub fn update_order_type(&mut self, order_type: OrderType) {
        self.mutate_active("update_order_type", |d| {
            if d.order_type == order_type {
                return false;
            }
            d.order_type = order_type;
            if order_type != OrderType::Delivery {
                DeliveryFeeSuggestion::default().apply_to(d);
            } else if let Some(suggested) = d.address_delivery_fee {
                let mut fee = DeliveryFeeSuggestion::of(d);
                fee.auto_complete(suggested);
                fee.apply_to(d);
            }
            true
        });
    }

    /// Set or clear the customer
    ///
    /// Clearing the customer, or picking a different one, also clears the
    /// selected address.
    pub fn update_customer(&mut self, customer: Option<&Customer>) {
        self.mutate_active("update_customer", |d| {
            let next_id = customer.map(|c| c.id);
            if d.customer_id != next_id {
                clear_address(d);
            }
            match customer {
                Some(c) => {
                    d.customer_id = Some(c.id);
                    d.customer_name = Some(c.name.clone());
                    d.customer_phone = c.phone.clone();
                }
                None => {
                    d.customer_id = None;
                    d.customer_name = None;
                    d.customer_phone = None;
                }
            }
            true
        });
    }

    /// Set or clear the delivery address
    ///
    /// On delivery orders the fee follows the address unless the operator
    /// typed it.
    pub fn update_address(&mut self, address: Option<&Address>) {
        self.mutate_active("update_address", |d| {
            match address {
                Some(a) => {
                    d.address_id = Some(a.id);
                    d.address_description = Some(a.description.clone());
                    d.address_delivery_fee = Some(a.suggested_fee());
                    if d.order_type == OrderType::Delivery {
                        let mut fee = DeliveryFeeSuggestion::of(d);
                        fee.clear_suggestion();
                        fee.auto_complete_from_address(a);
                        fee.apply_to(d);
                    }
                }
                None => clear_address(d),
            }
            true
        });
    }

    /// Operator-entered fee, clamped to >= 0; delivery orders only
    pub fn update_delivery_fee(&mut self, fee: f64) {
        let Some(fee) = accept_amount("update_delivery_fee", fee, MAX_PRICE) else {
            return;
        };
        self.mutate_active("update_delivery_fee", |d| {
            if d.order_type != OrderType::Delivery {
                return false;
            }
            let mut suggestion = DeliveryFeeSuggestion::of(d);
            suggestion.set_value(fee);
            suggestion.apply_to(d);
            true
        });
    }

    /// Let the fee follow the address again
    pub fn reset_delivery_fee_manual_edit(&mut self) {
        self.mutate_active("reset_delivery_fee_manual_edit", |d| {
            if !d.delivery_fee_manually_edited {
                return false;
            }
            d.delivery_fee_manually_edited = false;
            true
        });
    }

    pub fn update_guest_name(&mut self, name: &str) {
        self.mutate_active("update_guest_name", |d| {
            d.guest_name = clean_text(name);
            true
        });
    }

    pub fn update_order_notes(&mut self, notes: &str) {
        self.mutate_active("update_order_notes", |d| {
            d.notes = clean_text(notes);
            true
        });
    }

    pub fn update_reserved_for(&mut self, reserved_for: Option<DateTime<Utc>>) {
        self.mutate_active("update_reserved_for", |d| {
            d.reserved_for = reserved_for;
            true
        });
    }

    // ========== Items ==========

    /// Add a product, merging into the existing line for the same product
    ///
    /// Ignored when the price is out of range or the merged quantity would
    /// pass [`money::MAX_QUANTITY`].
    pub fn add_product(&mut self, product: &Product, quantity: i32) {
        if !accept_quantity("add_product", quantity) {
            return;
        }
        let Some(unit_price) = accept_amount("add_product", product.price, MAX_PRICE) else {
            return;
        };
        self.mutate_active("add_product", |d| {
            match d.items.iter_mut().find(|i| i.product_id == product.id) {
                Some(existing) => {
                    let Some(merged) = existing
                        .quantity
                        .checked_add(quantity)
                        .filter(|q| money::is_valid_quantity(*q))
                    else {
                        tracing::warn!(
                            product_id = product.id,
                            quantity = existing.quantity,
                            added = quantity,
                            "Merged quantity out of range"
                        );
                        return false;
                    };
                    existing.quantity = merged;
                }
                None => d.items.push(DraftOrderItem {
                    temp_id: new_temp_id(),
                    product_id: product.id,
                    product_name: product.name.clone(),
                    unit_price,
                    quantity,
                    discount: 0.0,
                    subtotal: 0.0,
                    notes: None,
                }),
            }
            true
        });
    }

    pub fn remove_item(&mut self, temp_id: &str) {
        self.mutate_active("remove_item", |d| {
            let before = d.items.len();
            d.items.retain(|i| i.temp_id != temp_id);
            d.items.len() != before
        });
    }

    /// Quantities outside `1..=MAX_QUANTITY` are ignored
    pub fn update_quantity(&mut self, temp_id: &str, quantity: i32) {
        if !accept_quantity("update_quantity", quantity) {
            return;
        }
        self.mutate_item("update_quantity", temp_id, |item| item.quantity = quantity);
    }

    /// Negative prices clamp to zero; non-finite or oversized ones are ignored
    pub fn update_price(&mut self, temp_id: &str, unit_price: f64) {
        let Some(unit_price) = accept_amount("update_price", unit_price, MAX_PRICE) else {
            return;
        };
        self.mutate_item("update_price", temp_id, |item| item.unit_price = unit_price);
    }

    /// Discount is clamped between zero and the line's gross amount
    pub fn update_discount(&mut self, temp_id: &str, discount: f64) {
        self.mutate_item("update_discount", temp_id, |item| {
            let gross = money::line_subtotal(item.quantity, item.unit_price, 0.0);
            item.discount = sanitize_amount(discount).min(gross);
        });
    }

    pub fn update_notes(&mut self, temp_id: &str, notes: &str) {
        self.mutate_item("update_notes", temp_id, |item| item.notes = clean_text(notes));
    }

    fn mutate_item<F>(&mut self, op: &'static str, temp_id: &str, f: F)
    where
        F: FnOnce(&mut DraftOrderItem),
    {
        self.mutate_active(op, |d| match d.items.iter_mut().find(|i| i.temp_id == temp_id) {
            Some(item) => {
                f(item);
                true
            }
            None => false,
        });
    }

    // ========== Payments ==========

    /// Amount for a payment added without one
    ///
    /// The full total for the first payment, the uncovered balance after.
    fn default_payment_amount(draft: &DraftOrder) -> f64 {
        if draft.payment_count() == 0 {
            draft.total
        } else {
            money::remaining(draft.total, draft.paid_amount())
        }
    }

    /// Attach the app payment
    ///
    /// Returns `false` when the draft already has one or the amount is out
    /// of range.
    pub fn add_app_payment(
        &mut self,
        app_id: i64,
        app_name: Option<String>,
        amount: Option<f64>,
    ) -> bool {
        let Some(amount) = accept_payment("add_app_payment", amount) else {
            return false;
        };
        self.mutate_active("add_app_payment", |d| {
            if d.app_payment.is_some() {
                tracing::warn!(tab_id = %d.tab_id, "Draft already has an app payment");
                return false;
            }
            d.app_payment = Some(DraftAppPayment {
                app_id,
                app_name,
                amount: amount.unwrap_or_else(|| Self::default_payment_amount(d)),
                manually_edited: amount.is_some(),
            });
            true
        })
    }

    /// Out-of-range amounts reject the whole update
    pub fn update_app_payment(&mut self, update: DraftPaymentUpdate) {
        let Some(amount) = accept_payment("update_app_payment", update.amount) else {
            return;
        };
        self.mutate_active("update_app_payment", |d| {
            let Some(payment) = d.app_payment.as_mut() else {
                return false;
            };
            if let Some(amount) = amount {
                payment.amount = amount;
                payment.manually_edited = true;
            }
            if let Some(app_id) = update.target_id {
                payment.app_id = app_id;
                payment.app_name = update.target_name;
            }
            true
        });
    }

    pub fn remove_app_payment(&mut self) {
        self.mutate_active("remove_app_payment", |d| d.app_payment.take().is_some());
    }

    /// Attach a bank payment; returns its temp id
    pub fn add_bank_payment(
        &mut self,
        bank_account_id: i64,
        bank_account_name: Option<String>,
        amount: Option<f64>,
    ) -> Option<String> {
        let amount = accept_payment("add_bank_payment", amount)?;
        let temp_id = new_temp_id();
        let added = self.mutate_active("add_bank_payment", |d| {
            d.bank_payments.push(DraftBankPayment {
                temp_id: temp_id.clone(),
                bank_account_id,
                bank_account_name,
                amount: amount.unwrap_or_else(|| Self::default_payment_amount(d)),
                manually_edited: amount.is_some(),
            });
            true
        });
        added.then_some(temp_id)
    }

    pub fn update_bank_payment(&mut self, temp_id: &str, update: DraftPaymentUpdate) {
        let Some(amount) = accept_payment("update_bank_payment", update.amount) else {
            return;
        };
        self.mutate_active("update_bank_payment", |d| {
            let Some(payment) = d.bank_payments.iter_mut().find(|p| p.temp_id == temp_id) else {
                return false;
            };
            if let Some(amount) = amount {
                payment.amount = amount;
                payment.manually_edited = true;
            }
            if let Some(account_id) = update.target_id {
                payment.bank_account_id = account_id;
                payment.bank_account_name = update.target_name;
            }
            true
        });
    }

    pub fn remove_bank_payment(&mut self, temp_id: &str) {
        self.mutate_active("remove_bank_payment", |d| {
            let before = d.bank_payments.len();
            d.bank_payments.retain(|p| p.temp_id != temp_id);
            d.bank_payments.len() != before
        });
    }

    // ========== Persistence ==========

    /// Persist the whole store
    ///
    /// Failures are logged; in-memory state stays authoritative.
    pub fn save_to_storage(&self) {
        self.save_at(now_millis());
    }

    fn save_at(&self, now: Timestamp) {
        let snapshot = PersistedDrafts {
            draft_orders: self.drafts.clone(),
            current_tab_id: self.current_tab_id.clone(),
            next_tab_number: self.next_tab_number,
            last_saved: now,
        };
        if let Err(e) = write_json(&self.storage, DRAFTS_STORAGE_KEY, &snapshot) {
            tracing::error!(error = %e, tabs = self.drafts.len(), "Failed to persist drafts");
        }
    }

    /// Restore the persisted snapshot
    ///
    /// Snapshots older than the TTL are discarded; missing or corrupt
    /// snapshots leave the store empty. Returns whether state was restored.
    pub fn load_from_storage(&mut self) -> bool {
        self.load_at(now_millis())
    }

    fn load_at(&mut self, now: Timestamp) -> bool {
        let Some(snapshot) = read_json::<PersistedDrafts>(&self.storage, DRAFTS_STORAGE_KEY) else {
            return false;
        };

        if !snapshot.is_within_bounds() {
            tracing::warn!(
                next_tab_number = snapshot.next_tab_number,
                tabs = snapshot.draft_orders.len(),
                "Discarding out-of-range drafts"
            );
            self.remove_snapshot();
            return false;
        }

        // Clock skew either way counts as age
        let age = now.saturating_sub(snapshot.last_saved);
        if age.saturating_abs() > self.config.ttl_millis() {
            tracing::info!(age_ms = age, "Discarding expired drafts");
            self.remove_snapshot();
            return false;
        }

        self.drafts = snapshot.draft_orders;
        self.next_tab_number = snapshot.next_tab_number.max(1);
        self.current_tab_id = snapshot
            .current_tab_id
            .filter(|id| self.drafts.iter().any(|d| &d.tab_id == id))
            .or_else(|| self.drafts.first().map(|d| d.tab_id.clone()));

        tracing::info!(
            tabs = self.drafts.len(),
            current_tab_id = ?self.current_tab_id,
            "Drafts restored"
        );
        true
    }

    fn remove_snapshot(&self) {
        if let Err(e) = self.storage.remove(DRAFTS_STORAGE_KEY) {
            tracing::error!(error = %e, "Failed to clear stored drafts");
        }
    }
}

/// `Some(None)` for "no amount given", `None` when the given amount is rejected
fn accept_payment(op: &'static str, amount: Option<f64>) -> Option<Option<f64>> {
    match amount {
        None => Some(None),
        Some(value) => accept_amount(op, value, MAX_PAYMENT_AMOUNT).map(Some),
    }
}

fn clear_address(d: &mut DraftOrder) {
    d.address_id = None;
    d.address_description = None;
    d.address_delivery_fee = None;
    let mut fee = DeliveryFeeSuggestion::of(d);
    fee.clear_suggestion();
    fee.apply_to(d);
}
