//! Lifecycle transitions and the deposit-refund policy

use shared::models::ReservationStatus;
use thiserror::Error;

/// One hour in millis, the refund cutoff
pub const HOUR_MS: i64 = 3_600_000;

/// Lifecycle rule violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Cancel reason must not be empty")]
    EmptyCancelReason,

    #[error("reservation is already {0}")]
    AlreadyTerminal(&'static str),
}

/// Deposit refund rule.
///
/// Refund the deposit when the cancellation lands strictly more than one
/// hour before check-in; at exactly one hour (or later) the deposit is kept.
pub fn deposit_refundable(checkin_time: i64, now: i64) -> bool {
    checkin_time - now > HOUR_MS
}

/// Outcome of a cancellation, frozen into the record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancellation {
    /// Trimmed cancel reason
    pub reason: String,
    pub cancelled_at: i64,
    pub deposit_refunded: bool,
}

/// `confirmed → cancelled`.
///
/// The refund decision is evaluated once, here, against `now`, and never
/// recomputed afterwards.
pub fn cancel(
    status: ReservationStatus,
    checkin_time: i64,
    reason: &str,
    now: i64,
) -> Result<Cancellation, LifecycleError> {
    if status.is_terminal() {
        return Err(LifecycleError::AlreadyTerminal(status.as_str()));
    }

    let reason = reason.trim();
    if reason.is_empty() {
        return Err(LifecycleError::EmptyCancelReason);
    }

    Ok(Cancellation {
        reason: reason.to_string(),
        cancelled_at: now,
        deposit_refunded: deposit_refundable(checkin_time, now),
    })
}

/// `confirmed → served` (staff marks completion)
pub fn mark_served(status: ReservationStatus) -> Result<ReservationStatus, LifecycleError> {
    if status.is_terminal() {
        return Err(LifecycleError::AlreadyTerminal(status.as_str()));
    }
    Ok(ReservationStatus::Served)
}
