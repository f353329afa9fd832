//! Reservation lifecycle
//!
//! Pure transition logic for bookings, kept free of persistence so the
//! policy can be tested on its own:
//!
//! - `confirmed` is the initial state; `served` and `cancelled` are terminal
//! - cancellation requires a reason and freezes the deposit-refund decision
//!
//! Repositories call into this module inside their transactions.

pub mod lifecycle;

#[cfg(test)]
mod tests;

pub use lifecycle::{Cancellation, LifecycleError, deposit_refundable, HOUR_MS};
