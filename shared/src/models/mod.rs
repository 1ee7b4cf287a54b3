//! Data models
//!
//! Shared between the REST client and the POS core.
//! All IDs are `i64`; timestamps are Unix millis unless noted.

pub mod customer;
pub mod order;
pub mod payment;
pub mod product;
pub mod role;

// Re-exports
pub use customer::*;
pub use order::*;
pub use payment::*;
pub use product::*;
pub use role::*;
