//! Reservation Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};

/// Mock deposit collected per reservation, in VND
pub const DEFAULT_DEPOSIT_AMOUNT: i64 = 50_000;

/// Reservation status
///
/// `confirmed` is the initial state; `served` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ReservationStatus {
    Confirmed,
    Served,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Served => "served",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse_str(value: &str) -> Option<Self> {
        match value {
            "confirmed" => Some(ReservationStatus::Confirmed),
            "served" => Some(ReservationStatus::Served),
            "cancelled" => Some(ReservationStatus::Cancelled),
            _ => None,
        }
    }

    /// Served and cancelled reservations admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReservationStatus::Served | ReservationStatus::Cancelled)
    }
}

impl Default for ReservationStatus {
    fn default() -> Self {
        Self::Confirmed
    }
}

/// Table association row (a reservation can span multiple tables)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ReservationTable {
    #[serde(with = "serde_helpers::id_string")]
    pub reservation_id: i64,
    #[serde(with = "serde_helpers::id_string")]
    pub table_id: i64,
}

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    #[serde(with = "serde_helpers::id_string")]
    pub id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(with = "serde_helpers::datetime_millis")]
    pub checkin_time: i64,
    #[serde(with = "serde_helpers::option_datetime_millis")]
    pub checkout_time: Option<i64>,
    pub number_of_people: i32,
    /// Booked window length in hours (default 1.0)
    pub duration_hours: f64,
    pub note: Option<String>,
    pub status: ReservationStatus,
    /// Set on cancellation, never cleared
    pub cancel_reason: Option<String>,
    #[serde(with = "serde_helpers::option_datetime_millis")]
    pub cancelled_at: Option<i64>,
    /// Frozen at the moment of cancellation (see the refund rule)
    pub deposit_refunded: Option<bool>,
    /// Mock deposit in VND
    pub deposit_amount: i64,
    #[serde(with = "serde_helpers::datetime_millis")]
    pub created_at: i64,
    #[serde(with = "serde_helpers::datetime_millis")]
    pub updated_at: i64,
    /// Join rows, attached by the repository
    #[serde(default)]
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub tables: Vec<ReservationTable>,
}

/// Table reference inside a create payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationTableInput {
    #[serde(with = "serde_helpers::id_string")]
    pub table_id: i64,
}

/// Create reservation payload (POST /api/reservations)
///
/// Datetime fields arrive as RFC 3339 strings and are parsed at the handler
/// layer so a bad format maps to a 400 instead of a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationCreate {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub checkin_time: Option<String>,
    #[serde(default)]
    pub checkout_time: Option<String>,
    #[serde(default)]
    pub number_of_people: Option<i32>,
    /// Hours, defaults to 1.0
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
    /// Mock deposit in VND, defaults to [`DEFAULT_DEPOSIT_AMOUNT`]
    #[serde(default)]
    pub deposit_amount: Option<i64>,
    #[serde(default)]
    pub reservation_tables: Vec<ReservationTableInput>,
}

/// Full update payload (PUT /api/reservations/{id})
///
/// Overwrites the customer/time/party fields; absent optionals clear the
/// stored value. Status is owned by the lifecycle endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationUpdate {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub checkin_time: Option<String>,
    #[serde(default)]
    pub checkout_time: Option<String>,
    #[serde(default)]
    pub number_of_people: Option<i32>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Partial update payload (PATCH /api/reservations/{id})
///
/// Absent fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationPatch {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub checkin_time: Option<String>,
    #[serde(default)]
    pub checkout_time: Option<String>,
    #[serde(default)]
    pub number_of_people: Option<i32>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Status transition payload (PATCH /api/reservations/{id}/status)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationStatusUpdate {
    #[serde(default)]
    pub status: Option<String>,
    /// Required when status is "cancelled"
    #[serde(default)]
    pub cancel_reason: Option<String>,
}

/// Table association payload (POST /api/reservations/{id}/tables)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationTableAdd {
    #[serde(default, with = "serde_helpers::option_id_string")]
    pub table_id: Option<i64>,
}
