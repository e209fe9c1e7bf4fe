//! Entry points invoked by a front end in response to user actions.

use serde::Serialize;
use tracing::debug;

use crate::{
    errors::Result,
    ledger::{
        classify, week_window, window_total, DailyGoal, DateKey, IntakeLedger, Status,
        WeekWindow,
    },
    storage::KeyValueStore,
};

use super::time::{Clock, SystemClock};

/// A day's total and its classification against the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: DateKey,
    pub total: u64,
    pub goal: DailyGoal,
    pub status: Status,
}

impl DaySummary {
    /// Milliliters still needed to reach the goal.
    pub fn remaining(&self) -> u64 {
        self.goal.milliliters().saturating_sub(self.total)
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.status.notice()
    }

    pub fn progress_line(&self) -> String {
        format!(
            "Consumed {} ml of {} ml.",
            self.total,
            self.goal.milliliters()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyReport {
    pub window: WeekWindow,
    pub total: u64,
}

impl WeeklyReport {
    pub fn anchor(&self) -> DateKey {
        self.window.anchor()
    }
}

/// Couples the ledger with the configured goal and a clock.
pub struct IntakeTracker<S> {
    ledger: IntakeLedger<S>,
    goal: DailyGoal,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> IntakeTracker<S> {
    pub fn new(store: S, goal: DailyGoal) -> Self {
        Self::with_clock(store, goal, Box::new(SystemClock))
    }

    pub fn with_clock(store: S, goal: DailyGoal, clock: Box<dyn Clock>) -> Self {
        Self {
            ledger: IntakeLedger::new(store),
            goal,
            clock,
        }
    }

    pub fn ledger(&self) -> &IntakeLedger<S> {
        &self.ledger
    }

    pub fn goal(&self) -> DailyGoal {
        self.goal
    }

    pub fn today(&self) -> DateKey {
        self.clock.today()
    }

    /// Reports the stored total and status for `date`.
    pub fn on_date_selected(&self, date: DateKey) -> DaySummary {
        let total = self.ledger.get_intake(date);
        debug!(date = %date, total, "date selected");
        self.summarize(date, total)
    }

    /// Records raw user input for `date`. Invalid input leaves the ledger untouched.
    pub fn on_amount_submitted(&self, date: DateKey, raw_input: &str) -> Result<DaySummary> {
        let total = self.ledger.add_raw_intake(date, raw_input)?;
        Ok(self.summarize(date, total))
    }

    /// Totals the seven days ending at `anchor`.
    pub fn on_weekly_report_requested(&self, anchor: DateKey) -> Result<WeeklyReport> {
        let window = week_window(anchor)?;
        let total = window_total(&self.ledger, &window);
        Ok(WeeklyReport { window, total })
    }

    fn summarize(&self, date: DateKey, total: u64) -> DaySummary {
        DaySummary {
            date,
            total,
            goal: self.goal,
            status: classify(total, self.goal),
        }
    }
}
