//! Señor Arroz Client - REST client for the Señor Arroz backend
//!
//! Provides the network operations the POS core depends on: order
//! creation, status changes, deliveryman assignment and payment CRUD.

pub mod api;
pub mod config;
pub mod error;
pub mod http;

pub use api::OrderApi;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::NetworkHttpClient;

// Re-export shared types for convenience
pub use shared::client::{LoginResponse, UserInfo};
