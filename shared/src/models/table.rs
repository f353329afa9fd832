//! Dining Table Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};

/// Restaurant floor area a table belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TableArea {
    Floor1,
    Floor2,
    Outdoor,
    Vip,
}

impl TableArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableArea::Floor1 => "floor1",
            TableArea::Floor2 => "floor2",
            TableArea::Outdoor => "outdoor",
            TableArea::Vip => "vip",
        }
    }

    /// Parse from the wire form, e.g. "outdoor"
    pub fn parse_str(value: &str) -> Option<Self> {
        match value {
            "floor1" => Some(TableArea::Floor1),
            "floor2" => Some(TableArea::Floor2),
            "outdoor" => Some(TableArea::Outdoor),
            "vip" => Some(TableArea::Vip),
            _ => None,
        }
    }
}

impl Default for TableArea {
    fn default() -> Self {
        Self::Floor1
    }
}

/// Operational state of a physical table, distinct from any reservation's state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TableStatus {
    Available,
    Booked,
    Serving,
    Cleaning,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Booked => "booked",
            TableStatus::Serving => "serving",
            TableStatus::Cleaning => "cleaning",
        }
    }

    pub fn parse_str(value: &str) -> Option<Self> {
        match value {
            "available" => Some(TableStatus::Available),
            "booked" => Some(TableStatus::Booked),
            "serving" => Some(TableStatus::Serving),
            "cleaning" => Some(TableStatus::Cleaning),
            _ => None,
        }
    }
}

impl Default for TableStatus {
    fn default() -> Self {
        Self::Available
    }
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    #[serde(with = "serde_helpers::id_string")]
    pub id: i64,
    /// Human label, e.g. "B01"
    pub code: String,
    pub capacity: i32,
    pub area: TableArea,
    pub status: TableStatus,
    #[serde(with = "serde_helpers::datetime_millis")]
    pub created_at: i64,
    #[serde(with = "serde_helpers::datetime_millis")]
    pub updated_at: i64,
}

/// Create dining table payload
///
/// Fields are optional so a missing/empty value surfaces as a 400 with a
/// field-level message instead of a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableCreate {
    #[serde(rename = "tableName", default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub capacity: Option<i32>,
    /// Defaults to floor1 when absent
    #[serde(default)]
    pub area: Option<String>,
}

/// Status update payload (PATCH /api/tables/{id})
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableStatusUpdate {
    #[serde(default)]
    pub status: Option<String>,
}
