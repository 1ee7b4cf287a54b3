//! Common types for the shared crate

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Milliseconds in one hour
pub const HOUR_MILLIS: Timestamp = 60 * 60 * 1000;
