pub mod time;
pub mod tracker;

pub use time::{Clock, FixedClock, SystemClock};
pub use tracker::{DaySummary, IntakeTracker, WeeklyReport};
