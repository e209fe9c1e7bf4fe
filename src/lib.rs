#![doc(test(attr(deny(warnings))))]

//! Hydration Core keeps a per-day ledger of liquid intake, totals the trailing
//! week, and classifies each day against a daily goal.

pub mod cli;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod tracking;
pub mod utils;

pub use errors::{IntakeError, Result};
pub use ledger::{DailyGoal, DateKey, Status};
pub use tracking::{DaySummary, IntakeTracker, WeeklyReport};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Hydration Core tracing initialized.");
    });
}
