pub mod date_key;
pub mod engine;
pub mod status;
pub mod store;

pub use date_key::DateKey;
pub use engine::{
    classify, week_window, weekly_total, window_total, DailyGoal, WeekWindow, WEEK_LEN,
};
pub use status::Status;
pub use store::{parse_amount, IntakeLedger};
