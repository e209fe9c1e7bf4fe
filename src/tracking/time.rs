use chrono::Local;

use crate::ledger::DateKey;

/// Clock abstracts access to the current date so callers remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns today's date in the local calendar.
    fn today(&self) -> DateKey;
}

/// Real-time clock backed by the system local time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> DateKey {
        DateKey::new(Local::now().date_naive())
    }
}

/// Clock pinned to a single day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: DateKey,
}

impl FixedClock {
    pub fn new(today: DateKey) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> DateKey {
        self.today
    }
}
