//! Shared types for Señor Arroz
//!
//! Domain models, wire payloads and the unified error system used by both
//! the REST client and the POS core.

pub mod client;
pub mod error;
pub mod models;
pub mod types;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
