//! Shared types for the table-booking service
//!
//! Data models and utility types used by the booking server and its tests.
//! DB row derives are feature-gated behind `db` so API consumers can depend
//! on the models without pulling in sqlx.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
