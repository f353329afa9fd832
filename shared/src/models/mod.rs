//! Data models
//!
//! Shared between booking-server and API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY) and serialize as JSON
//! strings; timestamps are Unix millis in the database and RFC 3339 strings
//! on the wire.

pub mod reservation;
pub mod serde_helpers;
pub mod table;

// Re-exports
pub use reservation::*;
pub use table::*;
