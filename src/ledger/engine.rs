//! Trailing-week aggregation and goal classification.
//!
//! Nothing here writes to the ledger or keeps state between calls.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    errors::{IntakeError, Result},
    storage::KeyValueStore,
};

use super::{DateKey, IntakeLedger, Status};

pub const WEEK_LEN: usize = 7;

/// Positive daily target in milliliters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct DailyGoal(u64);

impl DailyGoal {
    pub const DEFAULT_ML: u64 = 2000;

    pub fn new(milliliters: u64) -> Result<Self> {
        if milliliters == 0 {
            return Err(IntakeError::InvalidAmount(
                "daily goal must be greater than zero".into(),
            ));
        }
        Ok(Self(milliliters))
    }

    pub fn milliliters(&self) -> u64 {
        self.0
    }
}

impl Default for DailyGoal {
    fn default() -> Self {
        Self(Self::DEFAULT_ML)
    }
}

impl TryFrom<u64> for DailyGoal {
    type Error = IntakeError;

    fn try_from(value: u64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<DailyGoal> for u64 {
    fn from(value: DailyGoal) -> Self {
        value.0
    }
}

impl fmt::Display for DailyGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ml", self.0)
    }
}

/// Seven consecutive calendar days ending at the anchor, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekWindow {
    days: [DateKey; WEEK_LEN],
}

impl WeekWindow {
    pub fn days(&self) -> &[DateKey; WEEK_LEN] {
        &self.days
    }

    pub fn start(&self) -> DateKey {
        self.days[0]
    }

    pub fn anchor(&self) -> DateKey {
        self.days[WEEK_LEN - 1]
    }

    pub fn contains(&self, date: DateKey) -> bool {
        date >= self.start() && date <= self.anchor()
    }

    pub fn iter(&self) -> impl Iterator<Item = DateKey> + '_ {
        self.days.iter().copied()
    }
}

impl fmt::Display for WeekWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start(), self.anchor())
    }
}

/// Builds the trailing window for `anchor` by subtracting 6, 5, ..., 0 calendar days.
pub fn week_window(anchor: DateKey) -> Result<WeekWindow> {
    let mut days = [anchor; WEEK_LEN];
    for (slot, back) in days.iter_mut().zip((0..WEEK_LEN as u32).rev()) {
        *slot = anchor.minus_days(back).ok_or_else(|| {
            IntakeError::InvalidDate(format!("no full week precedes {anchor}"))
        })?;
    }
    Ok(WeekWindow { days })
}

/// Sum of the ledger's totals across the window ending at `anchor`.
pub fn weekly_total<S: KeyValueStore>(ledger: &IntakeLedger<S>, anchor: DateKey) -> Result<u64> {
    let window = week_window(anchor)?;
    Ok(window_total(ledger, &window))
}

/// Sum of the ledger's totals across an already built window.
pub fn window_total<S: KeyValueStore>(ledger: &IntakeLedger<S>, window: &WeekWindow) -> u64 {
    window
        .iter()
        .map(|day| ledger.get_intake(day))
        .fold(0u64, u64::saturating_add)
}

type Band = (fn(u128, u128) -> bool, Status);

// Evaluated top to bottom, first match wins. Overshoot is checked ahead of
// GoalMet so that totals above 120% of the goal are reported as such; with
// GoalMet first the overshoot band could never be reached.
const BANDS: [Band; 4] = [
    (|total, _| total == 0, Status::Empty),
    (|total, goal| total * 5 <= goal * 4, Status::InProgress),
    (|total, goal| total < goal, Status::NearGoal),
    (|total, goal| total * 5 > goal * 6, Status::Overshoot),
];

/// Maps a day's total to its [`Status`] relative to `goal`.
pub fn classify(total: u64, goal: DailyGoal) -> Status {
    let total = u128::from(total);
    let goal = u128::from(goal.milliliters());
    BANDS
        .iter()
        .find(|(matches, _)| matches(total, goal))
        .map(|(_, status)| *status)
        .unwrap_or(Status::GoalMet)
}
