use super::lifecycle::{self, Cancellation, HOUR_MS, LifecycleError, deposit_refundable};
use chrono::{TimeZone, Utc};
use shared::models::ReservationStatus;

fn millis(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> i64 {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .unwrap()
        .timestamp_millis()
}

// ========================================================================
// Refund rule boundaries
// ========================================================================

#[test]
fn refund_granted_strictly_more_than_one_hour_before() {
    let checkin = millis(2025, 6, 1, 19, 0);
    assert!(deposit_refundable(checkin, checkin - HOUR_MS - 1));
}

#[test]
fn refund_denied_at_exactly_one_hour() {
    let checkin = millis(2025, 6, 1, 19, 0);
    assert!(!deposit_refundable(checkin, checkin - HOUR_MS));
}

#[test]
fn refund_denied_within_one_hour() {
    let checkin = millis(2025, 6, 1, 19, 0);
    assert!(!deposit_refundable(checkin, checkin - HOUR_MS + 1));
    // even after check-in has passed
    assert!(!deposit_refundable(checkin, checkin + HOUR_MS));
}

#[test]
fn refund_scenario_19_00_booking() {
    let checkin = millis(2025, 6, 1, 19, 0);

    // Cancelled at 17:30 (1.5h before): deposit comes back
    assert!(deposit_refundable(checkin, millis(2025, 6, 1, 17, 30)));

    // Cancelled at 18:45 (0.25h before): deposit is kept
    assert!(!deposit_refundable(checkin, millis(2025, 6, 1, 18, 45)));
}

// ========================================================================
// Cancellation
// ========================================================================

#[test]
fn cancel_freezes_refund_decision_and_trims_reason() {
    let checkin = millis(2025, 6, 1, 19, 0);
    let now = millis(2025, 6, 1, 17, 30);

    let outcome =
        lifecycle::cancel(ReservationStatus::Confirmed, checkin, "  change of plans ", now)
            .unwrap();

    assert_eq!(
        outcome,
        Cancellation {
            reason: "change of plans".to_string(),
            cancelled_at: now,
            deposit_refunded: true,
        }
    );
}

#[test]
fn cancel_requires_a_reason() {
    let checkin = millis(2025, 6, 1, 19, 0);
    let now = checkin - 2 * HOUR_MS;

    let err = lifecycle::cancel(ReservationStatus::Confirmed, checkin, "", now).unwrap_err();
    assert_eq!(err, LifecycleError::EmptyCancelReason);

    // whitespace-only is still empty
    let err = lifecycle::cancel(ReservationStatus::Confirmed, checkin, "   ", now).unwrap_err();
    assert_eq!(err, LifecycleError::EmptyCancelReason);
}

#[test]
fn cancel_rejects_terminal_states() {
    let checkin = millis(2025, 6, 1, 19, 0);
    let now = checkin - 2 * HOUR_MS;

    let err =
        lifecycle::cancel(ReservationStatus::Cancelled, checkin, "again", now).unwrap_err();
    assert_eq!(err, LifecycleError::AlreadyTerminal("cancelled"));

    let err = lifecycle::cancel(ReservationStatus::Served, checkin, "too late", now).unwrap_err();
    assert_eq!(err, LifecycleError::AlreadyTerminal("served"));
}

// ========================================================================
// Serving
// ========================================================================

#[test]
fn mark_served_from_confirmed() {
    assert_eq!(
        lifecycle::mark_served(ReservationStatus::Confirmed).unwrap(),
        ReservationStatus::Served
    );
}

#[test]
fn mark_served_rejects_terminal_states() {
    let err = lifecycle::mark_served(ReservationStatus::Served).unwrap_err();
    assert_eq!(err, LifecycleError::AlreadyTerminal("served"));

    let err = lifecycle::mark_served(ReservationStatus::Cancelled).unwrap_err();
    assert_eq!(err, LifecycleError::AlreadyTerminal("cancelled"));
}
