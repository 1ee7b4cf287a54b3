//! 终端运行状态
//!
//! Wires configuration, local storage and the backend client into the
//! draft store, preferences and the submitted-order helpers.

use crate::config::PosConfig;
use crate::draft::{DraftOrderStore, submit_order};
use crate::orders::{OrderPaymentsEditor, OrderPermissions, OrderStatusController};
use crate::preferences::Preferences;
use crate::storage::{KeyValueStore, RedbStore};
use arroz_client::{NetworkHttpClient, OrderApi};
use shared::client::UserInfo;
use shared::error::{AppError, AppResult};
use shared::models::{Order, Role};
use shared::util::now_millis;
use std::sync::Arc;

pub struct PosState<S: KeyValueStore> {
    pub config: PosConfig,
    pub drafts: DraftOrderStore<Arc<S>>,
    pub preferences: Preferences<Arc<S>>,
    api: Arc<dyn OrderApi>,
}

impl PosState<RedbStore> {
    /// Open the redb file under the data dir and connect the HTTP client
    pub fn initialize(config: PosConfig) -> AppResult<Self> {
        let storage = RedbStore::open_in_dir(&config.data_dir)?;
        let client = NetworkHttpClient::new(&config.client_config())?;
        tracing::info!(
            data_dir = %config.data_dir.display(),
            api_url = %config.api_url,
            "POS state initialized"
        );
        Ok(Self::new(config, storage, Arc::new(client)))
    }
}

impl<S: KeyValueStore> PosState<S> {
    /// Build from parts; persisted drafts are restored immediately
    pub fn new(config: PosConfig, storage: S, api: Arc<dyn OrderApi>) -> Self {
        let storage = Arc::new(storage);
        let drafts = DraftOrderStore::open(storage.clone(), config.drafts);
        let preferences = Preferences::new(storage);
        Self {
            config,
            drafts,
            preferences,
            api,
        }
    }

    pub fn api(&self) -> Arc<dyn OrderApi> {
        self.api.clone()
    }

    /// Submit the active draft and close its tab once the backend accepts it
    pub async fn submit_active_draft(&mut self, actor: Option<&UserInfo>) -> AppResult<Order> {
        let draft = self
            .drafts
            .active_draft()
            .cloned()
            .ok_or_else(|| AppError::invalid_request("No hay un pedido activo"))?;

        let order = submit_order(self.api.as_ref(), &draft, actor, self.config.branch_id).await?;
        self.drafts.close_tab(&draft.tab_id);
        Ok(order)
    }

    pub fn permissions(&self, role: Role, order: &Order) -> OrderPermissions {
        OrderPermissions::resolve(role, order, now_millis(), self.config.timezone)
    }

    pub fn status_controller(&self) -> OrderStatusController {
        OrderStatusController::new(self.api(), self.config.timezone)
    }

    pub fn payments_editor(&self, order: Order, role: Role) -> OrderPaymentsEditor {
        OrderPaymentsEditor::new(self.api(), order, role, self.config.timezone)
    }
}
