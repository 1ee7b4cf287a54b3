//! Utility functions
//!
//! Formatting, list filtering and timezone helpers.

pub mod filter;
pub mod format;
pub mod time;

pub use filter::{OrderFilter, filter_customers, filter_orders, filter_products, normalize_search};
pub use format::{format_currency, format_date, format_date_time, format_phone};
pub use time::{DEFAULT_TIMEZONE, is_same_day, parse_timezone};
