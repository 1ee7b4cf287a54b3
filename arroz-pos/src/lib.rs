//! Señor Arroz POS core
//!
//! # 模块结构
//!
//! ```text
//! arroz-pos/src/
//! ├── config.rs       # 环境变量配置
//! ├── logger.rs       # tracing 初始化
//! ├── storage/        # 键值存储 (内存 / redb)
//! ├── draft/          # 草稿订单、多标签页、提交
//! ├── orders/         # 权限、状态流转、已提交订单的支付
//! ├── preferences.rs  # 分类收藏、排序、搜索历史
//! ├── money.rs        # 金额计算 (rust_decimal)
//! └── utils/          # 格式化、过滤、时区
//! ```

pub mod config;
pub mod draft;
pub mod logger;
pub mod money;
pub mod orders;
pub mod preferences;
pub mod state;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export 公共类型
pub use config::{DraftConfig, LogConfig, PosConfig};
pub use draft::{DraftOrder, DraftOrderStore};
pub use logger::init_logger;
pub use orders::{OrderPaymentsEditor, OrderPermissions, OrderStatusController};
pub use preferences::{CategorySort, Preferences};
pub use state::PosState;
pub use storage::{KeyValueStore, MemoryStore, RedbStore, StorageError};
