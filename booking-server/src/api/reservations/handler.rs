//! Reservation API handlers
//!
//! Handlers parse and validate the wire payloads (RFC 3339 datetimes,
//! required fields) and hand parsed values to the repository; the lifecycle
//! rules themselves live in `booking::lifecycle`.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::reservation::{
    self, NewReservation, ReservationChanges, ReservationFilter, ReservationOverwrite,
};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_positive,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, time};
use shared::models::{
    DEFAULT_DEPOSIT_AMOUNT, Reservation, ReservationCreate, ReservationPatch,
    ReservationStatus, ReservationStatusUpdate, ReservationTable, ReservationTableAdd,
    ReservationUpdate,
};

/// Query parameters for the reservation list
#[derive(Debug, Deserialize)]
pub struct ReservationListQuery {
    pub status: Option<String>,
    /// YYYY-MM-DD, filters checkin_time >= that day's start (UTC)
    pub date: Option<String>,
    pub customer_phone: Option<String>,
}

/// GET /api/reservations - list, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ReservationListQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    let status = match query.status.as_deref() {
        Some(value) => Some(ReservationStatus::parse_str(value).ok_or_else(|| {
            AppError::validation(format!("Invalid reservation status: {value}"))
        })?),
        None => None,
    };

    let checkin_from = match query.date.as_deref() {
        Some(value) => Some(time::day_start_millis(time::parse_date(value)?)),
        None => None,
    };

    let filter = ReservationFilter {
        status,
        checkin_from,
        customer_phone: query.customer_phone,
    };

    let reservations = reservation::find_all(&state.pool, &filter).await?;
    Ok(Json(reservations))
}

/// GET /api/reservations/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let found = reservation::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reservation {id} not found")))?;
    Ok(Json(found))
}

/// POST /api/reservations - create a confirmed reservation with its table
/// associations; every table must seat the party
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let name = payload.customer_name.as_deref().unwrap_or_default();
    validate_required_text(name, "customer_name", MAX_NAME_LEN)?;
    let phone = payload.customer_phone.as_deref().unwrap_or_default();
    validate_required_text(phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;

    let checkin_time = match payload.checkin_time.as_deref() {
        Some(value) => time::parse_rfc3339_millis(value, "checkin_time")?,
        None => return Err(AppError::validation("checkin_time is required")),
    };
    let checkout_time = payload
        .checkout_time
        .as_deref()
        .map(|value| time::parse_rfc3339_millis(value, "checkout_time"))
        .transpose()?;

    let number_of_people = validate_positive(payload.number_of_people, "number_of_people")?;

    let duration_hours = payload.duration.unwrap_or(1.0);
    if duration_hours <= 0.0 {
        return Err(AppError::validation("duration must be positive"));
    }

    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let deposit_amount = payload.deposit_amount.unwrap_or(DEFAULT_DEPOSIT_AMOUNT);
    if deposit_amount < 0 {
        return Err(AppError::validation("deposit_amount must not be negative"));
    }

    let data = NewReservation {
        customer_name: name.trim().to_string(),
        customer_phone: phone.trim().to_string(),
        checkin_time,
        checkout_time,
        number_of_people,
        duration_hours,
        note: payload.note,
        deposit_amount,
        table_ids: payload.reservation_tables.iter().map(|t| t.table_id).collect(),
    };

    let created = reservation::create(&state.pool, data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/reservations/{id} - full update of the customer/time/party fields
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<Reservation>> {
    let name = payload.customer_name.as_deref().unwrap_or_default();
    validate_required_text(name, "customer_name", MAX_NAME_LEN)?;
    let phone = payload.customer_phone.as_deref().unwrap_or_default();
    validate_required_text(phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;

    let checkin_time = match payload.checkin_time.as_deref() {
        Some(value) => time::parse_rfc3339_millis(value, "checkin_time")?,
        None => return Err(AppError::validation("checkin_time is required")),
    };
    let checkout_time = payload
        .checkout_time
        .as_deref()
        .map(|value| time::parse_rfc3339_millis(value, "checkout_time"))
        .transpose()?;

    let number_of_people = validate_positive(payload.number_of_people, "number_of_people")?;

    let duration_hours = payload.duration.unwrap_or(1.0);
    if duration_hours <= 0.0 {
        return Err(AppError::validation("duration must be positive"));
    }

    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let data = ReservationOverwrite {
        customer_name: name.trim().to_string(),
        customer_phone: phone.trim().to_string(),
        checkin_time,
        checkout_time,
        number_of_people,
        duration_hours,
        note: payload.note,
    };

    let updated = reservation::update(&state.pool, id, data).await?;
    Ok(Json(updated))
}

/// PATCH /api/reservations/{id} - partial update; absent fields keep their
/// stored values
pub async fn patch(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReservationPatch>,
) -> AppResult<Json<Reservation>> {
    if let Some(name) = &payload.customer_name {
        validate_required_text(name, "customer_name", MAX_NAME_LEN)?;
    }
    if let Some(phone) = &payload.customer_phone {
        validate_required_text(phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(duration) = payload.duration
        && duration <= 0.0
    {
        return Err(AppError::validation("duration must be positive"));
    }
    if let Some(people) = payload.number_of_people {
        validate_positive(Some(people), "number_of_people")?;
    }
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let checkin_time = payload
        .checkin_time
        .as_deref()
        .map(|value| time::parse_rfc3339_millis(value, "checkin_time"))
        .transpose()?;
    let checkout_time = payload
        .checkout_time
        .as_deref()
        .map(|value| time::parse_rfc3339_millis(value, "checkout_time"))
        .transpose()?;

    let data = ReservationChanges {
        customer_name: payload.customer_name.map(|v| v.trim().to_string()),
        customer_phone: payload.customer_phone.map(|v| v.trim().to_string()),
        checkin_time,
        checkout_time,
        number_of_people: payload.number_of_people,
        duration_hours: payload.duration,
        note: payload.note,
    };

    let updated = reservation::patch(&state.pool, id, data).await?;
    Ok(Json(updated))
}

/// PATCH /api/reservations/{id}/status - lifecycle transitions.
///
/// `served` marks completion; `cancelled` requires a reason and freezes the
/// deposit-refund decision. There is no transition back to `confirmed`.
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReservationStatusUpdate>,
) -> AppResult<Json<Reservation>> {
    let status = payload
        .status
        .as_deref()
        .ok_or_else(|| AppError::validation("status is required"))?;
    let now = shared::util::now_millis();

    let updated = match status {
        "served" => reservation::mark_served(&state.pool, id, now).await?,
        "cancelled" => {
            let reason = payload.cancel_reason.as_deref().unwrap_or_default();
            validate_required_text(reason, "cancel_reason", MAX_NOTE_LEN)?;
            reservation::cancel(&state.pool, id, reason, now).await?
        }
        other => {
            return Err(AppError::validation(format!(
                "Invalid reservation status transition: {other}"
            )));
        }
    };

    Ok(Json(updated))
}

/// DELETE /api/reservations/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = reservation::delete(&state.pool, id).await?;
    Ok(Json(result))
}

/// POST /api/reservations/{id}/tables - associate another table
pub async fn add_table(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReservationTableAdd>,
) -> AppResult<(StatusCode, Json<ReservationTable>)> {
    let table_id = payload
        .table_id
        .ok_or_else(|| AppError::validation("table_id is required"))?;

    let now = shared::util::now_millis();
    let assoc = reservation::add_table(&state.pool, id, table_id, now).await?;
    Ok((StatusCode::CREATED, Json(assoc)))
}

/// DELETE /api/reservations/{id}/tables/{table_id} - drop an association
pub async fn remove_table(
    State(state): State<ServerState>,
    Path((id, table_id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    let now = shared::util::now_millis();
    let result = reservation::remove_table(&state.pool, id, table_id, now).await?;
    Ok(Json(result))
}
