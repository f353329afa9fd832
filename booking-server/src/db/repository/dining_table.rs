//! Dining Table Repository

use super::{RepoError, RepoResult};
use shared::models::{DiningTable, TableArea, TableStatus};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, code, capacity, area, status, created_at, updated_at";

/// Find all tables, ordered by code
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<DiningTable>> {
    let tables = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_table ORDER BY code"
    ))
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

/// Find table by id
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_table WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(table)
}

/// Find table by its human code ("B01")
pub async fn find_by_code(pool: &SqlitePool, code: &str) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_table WHERE code = ? LIMIT 1"
    ))
    .bind(code)
    .fetch_optional(pool)
    .await?;
    Ok(table)
}

/// Candidate tables for a party.
///
/// With a requested `[start, end)` window, a table qualifies when it seats
/// the party, is not being cleaned, and has no confirmed reservation whose
/// own window overlaps the requested one. Without a window this degrades to
/// the plain status-flag filter.
pub async fn find_available(
    pool: &SqlitePool,
    guests: i32,
    window: Option<(i64, i64)>,
) -> RepoResult<Vec<DiningTable>> {
    let tables = match window {
        Some((start, end)) => {
            sqlx::query_as::<_, DiningTable>(&format!(
                "SELECT {COLUMNS} FROM dining_table t \
                 WHERE t.capacity >= ?1 AND t.status != 'cleaning' \
                   AND NOT EXISTS (\
                     SELECT 1 FROM reservation r \
                     JOIN reservation_table rt ON rt.reservation_id = r.id \
                     WHERE rt.table_id = t.id \
                       AND r.status = 'confirmed' \
                       AND r.checkin_time < ?3 \
                       AND r.checkin_time + CAST(r.duration_hours * 3600000.0 AS INTEGER) > ?2\
                   ) \
                 ORDER BY t.code"
            ))
            .bind(guests)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, DiningTable>(&format!(
                "SELECT {COLUMNS} FROM dining_table \
                 WHERE status = 'available' AND capacity >= ? ORDER BY code"
            ))
            .bind(guests)
            .fetch_all(pool)
            .await?
        }
    };
    Ok(tables)
}

/// Create a new table with status `available`
pub async fn create(
    pool: &SqlitePool,
    code: &str,
    capacity: i32,
    area: TableArea,
) -> RepoResult<DiningTable> {
    // Check duplicate code
    if find_by_code(pool, code).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Table '{}' already exists",
            code
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO dining_table (id, code, capacity, area, status, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, 'available', ?5, ?5)",
    )
    .bind(id)
    .bind(code)
    .bind(capacity)
    .bind(area)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dining table".into()))
}

/// Update a table's status (staff action)
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: TableStatus,
) -> RepoResult<DiningTable> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE dining_table SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Table {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {id} not found")))
}

/// Delete a table.
///
/// Restricted while any confirmed reservation references it; association
/// rows belonging to terminal reservations are removed with the table.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;

    let confirmed_refs: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reservation_table rt \
         JOIN reservation r ON r.id = rt.reservation_id \
         WHERE rt.table_id = ? AND r.status = 'confirmed'",
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    if confirmed_refs > 0 {
        return Err(RepoError::Conflict(format!(
            "Cannot delete table: {confirmed_refs} active reservation(s) reference it"
        )));
    }

    sqlx::query("DELETE FROM reservation_table WHERE table_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM dining_table WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}
