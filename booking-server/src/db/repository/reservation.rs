//! Reservation Repository
//!
//! Creation, lifecycle transitions and table associations each run inside a
//! single transaction so reservation state and table status cannot drift
//! apart (two confirmed bookings can never land on one table for
//! overlapping windows).

use super::{RepoError, RepoResult};
use crate::booking::lifecycle::{self, LifecycleError};
use crate::utils::time::hours_to_millis;
use shared::models::{Reservation, ReservationStatus, ReservationTable};
use sqlx::{Sqlite, SqlitePool, Transaction};

const COLUMNS: &str = "id, customer_name, customer_phone, checkin_time, checkout_time, \
number_of_people, duration_hours, note, status, cancel_reason, cancelled_at, \
deposit_refunded, deposit_amount, created_at, updated_at";

/// Parsed input for creating a reservation
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub customer_name: String,
    pub customer_phone: String,
    pub checkin_time: i64,
    pub checkout_time: Option<i64>,
    pub number_of_people: i32,
    pub duration_hours: f64,
    pub note: Option<String>,
    pub deposit_amount: i64,
    pub table_ids: Vec<i64>,
}

/// Full overwrite of the customer/time/party fields (PUT)
#[derive(Debug, Clone)]
pub struct ReservationOverwrite {
    pub customer_name: String,
    pub customer_phone: String,
    pub checkin_time: i64,
    pub checkout_time: Option<i64>,
    pub number_of_people: i32,
    pub duration_hours: f64,
    pub note: Option<String>,
}

/// Partial update of the customer/time/party fields (PATCH)
#[derive(Debug, Clone, Default)]
pub struct ReservationChanges {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub checkin_time: Option<i64>,
    pub checkout_time: Option<i64>,
    pub number_of_people: Option<i32>,
    pub duration_hours: Option<f64>,
    pub note: Option<String>,
}

/// List filters (GET /api/reservations)
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub status: Option<ReservationStatus>,
    /// Lower bound on checkin_time (start of the requested day)
    pub checkin_from: Option<i64>,
    pub customer_phone: Option<String>,
}

fn lifecycle_err(id: i64, e: LifecycleError) -> RepoError {
    match e {
        LifecycleError::EmptyCancelReason => RepoError::Validation(e.to_string()),
        LifecycleError::AlreadyTerminal(_) => {
            RepoError::InvalidState(format!("Reservation {id}: {e}"))
        }
    }
}

/// Association rows for one reservation
pub async fn find_tables(pool: &SqlitePool, reservation_id: i64) -> RepoResult<Vec<ReservationTable>> {
    let tables = sqlx::query_as::<_, ReservationTable>(
        "SELECT reservation_id, table_id FROM reservation_table WHERE reservation_id = ?",
    )
    .bind(reservation_id)
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

/// List reservations, newest first, with association rows attached
pub async fn find_all(pool: &SqlitePool, filter: &ReservationFilter) -> RepoResult<Vec<Reservation>> {
    let mut sql = format!("SELECT {COLUMNS} FROM reservation");
    let mut clauses: Vec<&str> = Vec::new();
    if filter.status.is_some() {
        clauses.push("status = ?");
    }
    if filter.checkin_from.is_some() {
        clauses.push("checkin_time >= ?");
    }
    if filter.customer_phone.is_some() {
        clauses.push("customer_phone = ?");
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC");

    let mut query = sqlx::query_as::<_, Reservation>(&sql);
    if let Some(status) = filter.status {
        query = query.bind(status);
    }
    if let Some(from) = filter.checkin_from {
        query = query.bind(from);
    }
    if let Some(phone) = &filter.customer_phone {
        query = query.bind(phone.clone());
    }

    let mut reservations = query.fetch_all(pool).await?;
    for r in &mut reservations {
        r.tables = find_tables(pool, r.id).await?;
    }
    Ok(reservations)
}

/// Find reservation by id, with association rows attached
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Reservation>> {
    let mut reservation =
        sqlx::query_as::<_, Reservation>(&format!("SELECT {COLUMNS} FROM reservation WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

    if let Some(ref mut r) = reservation {
        r.tables = find_tables(pool, r.id).await?;
    }
    Ok(reservation)
}

async fn fetch_in_tx(tx: &mut Transaction<'_, Sqlite>, id: i64) -> RepoResult<Reservation> {
    sqlx::query_as::<_, Reservation>(&format!("SELECT {COLUMNS} FROM reservation WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reservation {id} not found")))
}

/// Guard one table for a party: it must exist, seat everyone, and have no
/// confirmed reservation overlapping the requested window.
async fn check_table_bookable(
    tx: &mut Transaction<'_, Sqlite>,
    table_id: i64,
    number_of_people: i32,
    window: (i64, i64),
) -> RepoResult<()> {
    let row: Option<(String, i32)> =
        sqlx::query_as("SELECT code, capacity FROM dining_table WHERE id = ?")
            .bind(table_id)
            .fetch_optional(&mut **tx)
            .await?;

    let (code, capacity) =
        row.ok_or_else(|| RepoError::NotFound(format!("Table {table_id} not found")))?;

    if number_of_people > capacity {
        return Err(RepoError::Validation(format!(
            "Party of {number_of_people} exceeds capacity {capacity} of table {code}"
        )));
    }

    let (start, end) = window;
    let overlapping: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reservation r \
         JOIN reservation_table rt ON rt.reservation_id = r.id \
         WHERE rt.table_id = ?1 AND r.status = 'confirmed' \
           AND r.checkin_time < ?3 \
           AND r.checkin_time + CAST(r.duration_hours * 3600000.0 AS INTEGER) > ?2",
    )
    .bind(table_id)
    .bind(start)
    .bind(end)
    .fetch_one(&mut **tx)
    .await?;

    if overlapping > 0 {
        return Err(RepoError::Conflict(format!(
            "Table {code} already has a confirmed reservation for an overlapping window"
        )));
    }

    Ok(())
}

/// Create a confirmed reservation and book its tables, atomically
pub async fn create(pool: &SqlitePool, data: NewReservation) -> RepoResult<Reservation> {
    if data.table_ids.is_empty() {
        return Err(RepoError::Validation(
            "At least one table is required".into(),
        ));
    }

    let window = (
        data.checkin_time,
        data.checkin_time + hours_to_millis(data.duration_hours),
    );

    let mut tx = pool.begin().await?;

    for table_id in &data.table_ids {
        check_table_bookable(&mut tx, *table_id, data.number_of_people, window).await?;
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO reservation (id, customer_name, customer_phone, checkin_time, \
         checkout_time, number_of_people, duration_hours, note, status, deposit_amount, \
         created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'confirmed', ?9, ?10, ?10)",
    )
    .bind(id)
    .bind(&data.customer_name)
    .bind(&data.customer_phone)
    .bind(data.checkin_time)
    .bind(data.checkout_time)
    .bind(data.number_of_people)
    .bind(data.duration_hours)
    .bind(&data.note)
    .bind(data.deposit_amount)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for table_id in &data.table_ids {
        sqlx::query("INSERT INTO reservation_table (reservation_id, table_id) VALUES (?1, ?2)")
            .bind(id)
            .bind(table_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE dining_table SET status = 'booked', updated_at = ?1 WHERE id = ?2")
            .bind(now)
            .bind(table_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create reservation".into()))
}

/// Overwrite the customer/time/party fields (status untouched)
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: ReservationOverwrite,
) -> RepoResult<Reservation> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE reservation SET customer_name = ?1, customer_phone = ?2, checkin_time = ?3, \
         checkout_time = ?4, number_of_people = ?5, duration_hours = ?6, note = ?7, \
         updated_at = ?8 WHERE id = ?9",
    )
    .bind(&data.customer_name)
    .bind(&data.customer_phone)
    .bind(data.checkin_time)
    .bind(data.checkout_time)
    .bind(data.number_of_people)
    .bind(data.duration_hours)
    .bind(&data.note)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Reservation {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reservation {id} not found")))
}

/// Partial update of the customer/time/party fields (status untouched)
pub async fn patch(
    pool: &SqlitePool,
    id: i64,
    data: ReservationChanges,
) -> RepoResult<Reservation> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE reservation SET customer_name = COALESCE(?1, customer_name), \
         customer_phone = COALESCE(?2, customer_phone), \
         checkin_time = COALESCE(?3, checkin_time), \
         checkout_time = COALESCE(?4, checkout_time), \
         number_of_people = COALESCE(?5, number_of_people), \
         duration_hours = COALESCE(?6, duration_hours), \
         note = COALESCE(?7, note), updated_at = ?8 WHERE id = ?9",
    )
    .bind(&data.customer_name)
    .bind(&data.customer_phone)
    .bind(data.checkin_time)
    .bind(data.checkout_time)
    .bind(data.number_of_people)
    .bind(data.duration_hours)
    .bind(&data.note)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Reservation {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reservation {id} not found")))
}

/// `confirmed → cancelled`, freezing the refund decision and freeing tables
/// that no other confirmed reservation still holds
pub async fn cancel(pool: &SqlitePool, id: i64, reason: &str, now: i64) -> RepoResult<Reservation> {
    let mut tx = pool.begin().await?;

    let existing = fetch_in_tx(&mut tx, id).await?;
    let outcome = lifecycle::cancel(existing.status, existing.checkin_time, reason, now)
        .map_err(|e| lifecycle_err(id, e))?;

    sqlx::query(
        "UPDATE reservation SET status = 'cancelled', cancel_reason = ?1, cancelled_at = ?2, \
         deposit_refunded = ?3, updated_at = ?4 WHERE id = ?5",
    )
    .bind(&outcome.reason)
    .bind(outcome.cancelled_at)
    .bind(outcome.deposit_refunded)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    // Free this reservation's tables unless another confirmed reservation
    // still references them
    sqlx::query(
        "UPDATE dining_table SET status = 'available', updated_at = ?1 \
         WHERE id IN (SELECT table_id FROM reservation_table WHERE reservation_id = ?2) \
           AND status = 'booked' \
           AND NOT EXISTS (\
             SELECT 1 FROM reservation_table rt \
             JOIN reservation r ON r.id = rt.reservation_id \
             WHERE rt.table_id = dining_table.id AND r.status = 'confirmed')",
    )
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reservation {id} not found")))
}

/// `confirmed → served` (staff marks completion; table status stays a
/// manual staff action)
pub async fn mark_served(pool: &SqlitePool, id: i64, now: i64) -> RepoResult<Reservation> {
    let mut tx = pool.begin().await?;

    let existing = fetch_in_tx(&mut tx, id).await?;
    lifecycle::mark_served(existing.status).map_err(|e| lifecycle_err(id, e))?;

    sqlx::query("UPDATE reservation SET status = 'served', updated_at = ?1 WHERE id = ?2")
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reservation {id} not found")))
}

/// Hard delete (association rows cascade)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM reservation WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Associate another table with a confirmed reservation
pub async fn add_table(
    pool: &SqlitePool,
    id: i64,
    table_id: i64,
    now: i64,
) -> RepoResult<ReservationTable> {
    let mut tx = pool.begin().await?;

    let existing = fetch_in_tx(&mut tx, id).await?;
    if existing.status.is_terminal() {
        return Err(RepoError::InvalidState(format!(
            "Reservation {id}: reservation is already {}",
            existing.status.as_str()
        )));
    }

    let duplicate: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reservation_table WHERE reservation_id = ?1 AND table_id = ?2",
    )
    .bind(id)
    .bind(table_id)
    .fetch_one(&mut *tx)
    .await?;
    if duplicate > 0 {
        return Err(RepoError::Duplicate(format!(
            "Table {table_id} is already associated with reservation {id}"
        )));
    }

    let window = (
        existing.checkin_time,
        existing.checkin_time + hours_to_millis(existing.duration_hours),
    );
    check_table_bookable(&mut tx, table_id, existing.number_of_people, window).await?;

    sqlx::query("INSERT INTO reservation_table (reservation_id, table_id) VALUES (?1, ?2)")
        .bind(id)
        .bind(table_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE dining_table SET status = 'booked', updated_at = ?1 WHERE id = ?2")
        .bind(now)
        .bind(table_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(ReservationTable {
        reservation_id: id,
        table_id,
    })
}

/// Remove a table association; frees the table when no other confirmed
/// reservation still holds it
pub async fn remove_table(
    pool: &SqlitePool,
    id: i64,
    table_id: i64,
    now: i64,
) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "DELETE FROM reservation_table WHERE reservation_id = ?1 AND table_id = ?2",
    )
    .bind(id)
    .bind(table_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() > 0 {
        sqlx::query(
            "UPDATE dining_table SET status = 'available', updated_at = ?1 \
             WHERE id = ?2 AND status = 'booked' \
               AND NOT EXISTS (\
                 SELECT 1 FROM reservation_table rt \
                 JOIN reservation r ON r.id = rt.reservation_id \
                 WHERE rt.table_id = ?2 AND r.status = 'confirmed')",
        )
        .bind(now)
        .bind(table_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::HOUR_MS;
    use crate::db::DbService;
    use crate::db::repository::dining_table;
    use shared::models::{TableArea, TableStatus};

    async fn test_pool() -> SqlitePool {
        DbService::open_in_memory().await.unwrap().pool
    }

    fn new_reservation(table_ids: Vec<i64>, people: i32, checkin: i64) -> NewReservation {
        NewReservation {
            customer_name: "Nguyen Van A".into(),
            customer_phone: "0901234567".into(),
            checkin_time: checkin,
            checkout_time: None,
            number_of_people: people,
            duration_hours: 1.0,
            note: None,
            deposit_amount: 50_000,
            table_ids,
        }
    }

    #[tokio::test]
    async fn create_books_tables_and_starts_confirmed() {
        let pool = test_pool().await;
        let table = dining_table::create(&pool, "B01", 4, TableArea::Floor1)
            .await
            .unwrap();

        let checkin = shared::util::now_millis() + 4 * HOUR_MS;
        let r = create(&pool, new_reservation(vec![table.id], 2, checkin))
            .await
            .unwrap();

        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert_eq!(r.tables.len(), 1);
        assert_eq!(r.tables[0].table_id, table.id);
        assert_eq!(r.deposit_refunded, None);

        let table = dining_table::find_by_id(&pool, table.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(table.status, TableStatus::Booked);
    }

    #[tokio::test]
    async fn create_rejects_party_larger_than_capacity() {
        let pool = test_pool().await;
        let table = dining_table::create(&pool, "B01", 4, TableArea::Floor1)
            .await
            .unwrap();

        let checkin = shared::util::now_millis() + 4 * HOUR_MS;
        let err = create(&pool, new_reservation(vec![table.id], 6, checkin))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        // a full table is still fine
        assert!(create(&pool, new_reservation(vec![table.id], 4, checkin))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn create_rejects_unknown_table_and_empty_association() {
        let pool = test_pool().await;
        let checkin = shared::util::now_millis() + 4 * HOUR_MS;

        let err = create(&pool, new_reservation(vec![], 2, checkin))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        let err = create(&pool, new_reservation(vec![12345], 2, checkin))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn overlapping_confirmed_windows_conflict() {
        let pool = test_pool().await;
        let table = dining_table::create(&pool, "B01", 4, TableArea::Floor1)
            .await
            .unwrap();

        let checkin = shared::util::now_millis() + 24 * HOUR_MS;
        create(&pool, new_reservation(vec![table.id], 2, checkin))
            .await
            .unwrap();

        // 30 minutes into the existing window
        let err = create(
            &pool,
            new_reservation(vec![table.id], 2, checkin + HOUR_MS / 2),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));

        // back-to-back booking is fine ([start, end) windows)
        assert!(
            create(&pool, new_reservation(vec![table.id], 2, checkin + HOUR_MS))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn cancel_more_than_one_hour_before_refunds_deposit() {
        let pool = test_pool().await;
        let table = dining_table::create(&pool, "B01", 4, TableArea::Floor1)
            .await
            .unwrap();

        let checkin = shared::util::now_millis() + 24 * HOUR_MS;
        let r = create(&pool, new_reservation(vec![table.id], 2, checkin))
            .await
            .unwrap();

        let cancelled = cancel(&pool, r.id, "change of plans", checkin - 2 * HOUR_MS)
            .await
            .unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);
        assert_eq!(cancelled.deposit_refunded, Some(true));
        assert_eq!(cancelled.cancel_reason.as_deref(), Some("change of plans"));
        assert!(cancelled.cancelled_at.is_some());

        // the table is free again
        let table = dining_table::find_by_id(&pool, table.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(table.status, TableStatus::Available);
    }

    #[tokio::test]
    async fn cancel_within_one_hour_keeps_deposit() {
        let pool = test_pool().await;
        let table = dining_table::create(&pool, "B01", 4, TableArea::Floor1)
            .await
            .unwrap();

        let checkin = shared::util::now_millis() + 24 * HOUR_MS;
        let r = create(&pool, new_reservation(vec![table.id], 2, checkin))
            .await
            .unwrap();

        let cancelled = cancel(&pool, r.id, "running late", checkin - HOUR_MS / 4)
            .await
            .unwrap();
        assert_eq!(cancelled.deposit_refunded, Some(false));
    }

    #[tokio::test]
    async fn cancel_guards_reason_and_terminal_states() {
        let pool = test_pool().await;
        let table = dining_table::create(&pool, "B01", 4, TableArea::Floor1)
            .await
            .unwrap();

        let checkin = shared::util::now_millis() + 24 * HOUR_MS;
        let r = create(&pool, new_reservation(vec![table.id], 2, checkin))
            .await
            .unwrap();
        let now = shared::util::now_millis();

        let err = cancel(&pool, r.id, "   ", now).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        let err = cancel(&pool, 99999, "no such booking", now).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));

        cancel(&pool, r.id, "first time", now).await.unwrap();
        let err = cancel(&pool, r.id, "second time", now).await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidState(_)));
        let err = mark_served(&pool, r.id, now).await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidState(_)));
    }

    #[tokio::test]
    async fn mark_served_is_terminal() {
        let pool = test_pool().await;
        let table = dining_table::create(&pool, "B01", 4, TableArea::Floor1)
            .await
            .unwrap();

        let checkin = shared::util::now_millis() + 4 * HOUR_MS;
        let r = create(&pool, new_reservation(vec![table.id], 2, checkin))
            .await
            .unwrap();
        let now = shared::util::now_millis();

        let served = mark_served(&pool, r.id, now).await.unwrap();
        assert_eq!(served.status, ReservationStatus::Served);

        let err = cancel(&pool, r.id, "too late", now).await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidState(_)));
    }

    #[tokio::test]
    async fn filters_by_status_phone_and_date() {
        let pool = test_pool().await;
        let t1 = dining_table::create(&pool, "B01", 4, TableArea::Floor1)
            .await
            .unwrap();
        let t2 = dining_table::create(&pool, "B02", 4, TableArea::Floor1)
            .await
            .unwrap();

        let base = shared::util::now_millis() + 24 * HOUR_MS;
        let r1 = create(&pool, new_reservation(vec![t1.id], 2, base))
            .await
            .unwrap();
        let mut other = new_reservation(vec![t2.id], 2, base + 48 * HOUR_MS);
        other.customer_phone = "0987654321".into();
        let r2 = create(&pool, other).await.unwrap();

        cancel(&pool, r1.id, "test", shared::util::now_millis())
            .await
            .unwrap();

        let cancelled = find_all(
            &pool,
            &ReservationFilter {
                status: Some(ReservationStatus::Cancelled),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, r1.id);

        let by_phone = find_all(
            &pool,
            &ReservationFilter {
                customer_phone: Some("0987654321".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_phone.len(), 1);
        assert_eq!(by_phone[0].id, r2.id);

        let later = find_all(
            &pool,
            &ReservationFilter {
                checkin_from: Some(base + 24 * HOUR_MS),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(later.len(), 1);
        assert_eq!(later[0].id, r2.id);

        // newest first
        let all = find_all(&pool, &ReservationFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].created_at >= all[1].created_at);
    }

    #[tokio::test]
    async fn delete_cascades_association_rows() {
        let pool = test_pool().await;
        let table = dining_table::create(&pool, "B01", 4, TableArea::Floor1)
            .await
            .unwrap();

        let checkin = shared::util::now_millis() + 4 * HOUR_MS;
        let r = create(&pool, new_reservation(vec![table.id], 2, checkin))
            .await
            .unwrap();

        assert!(delete(&pool, r.id).await.unwrap());
        assert!(find_tables(&pool, r.id).await.unwrap().is_empty());
        assert!(!delete(&pool, r.id).await.unwrap());
    }

    #[tokio::test]
    async fn add_and_remove_table_associations() {
        let pool = test_pool().await;
        let t1 = dining_table::create(&pool, "B01", 4, TableArea::Floor1)
            .await
            .unwrap();
        let t2 = dining_table::create(&pool, "B02", 4, TableArea::Floor1)
            .await
            .unwrap();
        let tiny = dining_table::create(&pool, "B03", 2, TableArea::Floor1)
            .await
            .unwrap();

        let checkin = shared::util::now_millis() + 4 * HOUR_MS;
        let r = create(&pool, new_reservation(vec![t1.id], 4, checkin))
            .await
            .unwrap();
        let now = shared::util::now_millis();

        let assoc = add_table(&pool, r.id, t2.id, now).await.unwrap();
        assert_eq!(assoc.table_id, t2.id);
        let t2_row = dining_table::find_by_id(&pool, t2.id).await.unwrap().unwrap();
        assert_eq!(t2_row.status, TableStatus::Booked);

        let err = add_table(&pool, r.id, t2.id, now).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        // the party of 4 does not fit the 2-seat table
        let err = add_table(&pool, r.id, tiny.id, now).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        assert!(remove_table(&pool, r.id, t2.id, now).await.unwrap());
        let t2_row = dining_table::find_by_id(&pool, t2.id).await.unwrap().unwrap();
        assert_eq!(t2_row.status, TableStatus::Available);
        assert!(!remove_table(&pool, r.id, t2.id, now).await.unwrap());
    }

    #[tokio::test]
    async fn table_delete_restricted_while_reservation_confirmed() {
        let pool = test_pool().await;
        let table = dining_table::create(&pool, "B01", 4, TableArea::Floor1)
            .await
            .unwrap();

        let checkin = shared::util::now_millis() + 24 * HOUR_MS;
        let r = create(&pool, new_reservation(vec![table.id], 2, checkin))
            .await
            .unwrap();

        let err = dining_table::delete(&pool, table.id).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(_)));

        cancel(&pool, r.id, "plans changed", shared::util::now_millis())
            .await
            .unwrap();
        assert!(dining_table::delete(&pool, table.id).await.unwrap());
    }

    #[tokio::test]
    async fn availability_reflects_overlapping_reservations() {
        let pool = test_pool().await;
        let table = dining_table::create(&pool, "B01", 4, TableArea::Floor1)
            .await
            .unwrap();

        let checkin = shared::util::now_millis() + 24 * HOUR_MS;
        let r = create(&pool, new_reservation(vec![table.id], 2, checkin))
            .await
            .unwrap();

        let window = Some((checkin, checkin + HOUR_MS));
        assert!(
            dining_table::find_available(&pool, 2, window)
                .await
                .unwrap()
                .is_empty()
        );

        // a disjoint window still sees the table
        let later = Some((checkin + 2 * HOUR_MS, checkin + 3 * HOUR_MS));
        assert_eq!(
            dining_table::find_available(&pool, 2, later)
                .await
                .unwrap()
                .len(),
            1
        );

        cancel(&pool, r.id, "freed up", shared::util::now_millis())
            .await
            .unwrap();
        assert_eq!(
            dining_table::find_available(&pool, 2, window)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
