#![allow(dead_code)]

use hydration_core::{
    storage::json_backend::JsonFileStore, tracking::FixedClock, DailyGoal, DateKey, IntakeTracker,
};
use tempfile::TempDir;

pub fn day(raw: &str) -> DateKey {
    DateKey::parse(raw).expect("valid date key")
}

/// Tracker over a file store in a fresh temp directory. Keep the `TempDir` alive
/// for as long as the tracker is used.
pub fn file_tracker(goal_ml: u64, today: &str) -> (TempDir, IntakeTracker<JsonFileStore>) {
    let temp = TempDir::new().expect("create temp dir");
    let store = JsonFileStore::open(temp.path().join("intake.json")).expect("open store");
    let tracker = IntakeTracker::with_clock(
        store,
        DailyGoal::new(goal_ml).expect("positive goal"),
        Box::new(FixedClock::new(day(today))),
    );
    (temp, tracker)
}
