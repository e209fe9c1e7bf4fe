use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a day's total sits relative to the daily goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Empty,
    InProgress,
    NearGoal,
    GoalMet,
    Overshoot,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Empty => "Empty",
            Status::InProgress => "In progress",
            Status::NearGoal => "Near goal",
            Status::GoalMet => "Goal met",
            Status::Overshoot => "Overshoot",
        }
    }

    /// Notice shown to the user after an update, if the status warrants one.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Status::Empty | Status::InProgress => None,
            Status::NearGoal => Some("You have almost reached your goal! Nearly there!"),
            Status::GoalMet => Some("Congratulations, you drank enough water today!"),
            Status::Overshoot => Some("Careful! You drank too much water!"),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
