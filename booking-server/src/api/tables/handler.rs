//! Table registry API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::dining_table;
use crate::utils::validation::{MAX_NAME_LEN, validate_positive, validate_required_text};
use crate::utils::{AppError, AppResult, time};
use shared::models::{
    DiningTable, DiningTableCreate, DiningTableStatusUpdate, TableArea, TableStatus,
};

/// GET /api/tables - all tables
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = dining_table::find_all(&state.pool).await?;
    Ok(Json(tables))
}

/// Query parameters for the availability lookup
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub guests: Option<i32>,
    /// RFC 3339; without it the lookup falls back to the status flag
    pub checkin_time: Option<String>,
    /// Hours, defaults to 1.0
    pub duration: Option<f64>,
}

/// GET /api/tables/available - candidate tables for a party
pub async fn available(
    State(state): State<ServerState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<DiningTable>>> {
    let guests = validate_positive(query.guests, "guests")?;

    let window = match &query.checkin_time {
        Some(value) => {
            let start = time::parse_rfc3339_millis(value, "checkin_time")?;
            let duration = query.duration.unwrap_or(1.0);
            if duration <= 0.0 {
                return Err(AppError::validation("duration must be positive"));
            }
            Some((start, start + time::hours_to_millis(duration)))
        }
        None => None,
    };

    let tables = dining_table::find_available(&state.pool, guests, window).await?;
    Ok(Json(tables))
}

/// POST /api/tables - create a table (status starts as `available`)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<(StatusCode, Json<DiningTable>)> {
    let name = payload.table_name.as_deref().unwrap_or_default();
    validate_required_text(name, "tableName", MAX_NAME_LEN)?;
    let capacity = validate_positive(payload.capacity, "capacity")?;

    let area = match payload.area.as_deref() {
        Some(value) => TableArea::parse_str(value)
            .ok_or_else(|| AppError::validation(format!("Invalid area: {value}")))?,
        None => TableArea::default(),
    };

    let table = dining_table::create(&state.pool, name.trim(), capacity, area).await?;
    Ok((StatusCode::CREATED, Json(table)))
}

/// PATCH /api/tables/{id} - staff sets the table status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DiningTableStatusUpdate>,
) -> AppResult<Json<DiningTable>> {
    let status = payload
        .status
        .as_deref()
        .ok_or_else(|| AppError::validation("status is required"))?;
    let status = TableStatus::parse_str(status)
        .ok_or_else(|| AppError::validation(format!("Invalid table status: {status}")))?;

    let table = dining_table::update_status(&state.pool, id, status).await?;
    Ok(Json(table))
}

/// DELETE /api/tables/{id} - restricted while confirmed reservations reference it
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = dining_table::delete(&state.pool, id).await?;
    Ok(Json(result))
}
