//! Time windows for activity views

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Trailing window of activity ending at "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "24h", alias = "day")]
    Day,
    #[serde(rename = "7d", alias = "week")]
    Week,
    #[serde(rename = "30d", alias = "month")]
    Month,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 3] = [TimeWindow::Day, TimeWindow::Week, TimeWindow::Month];

    pub fn duration(&self) -> Duration {
        match self {
            TimeWindow::Day => Duration::hours(24),
            TimeWindow::Week => Duration::days(7),
            TimeWindow::Month => Duration::days(30),
        }
    }

    /// Start of the window that ends at `now`
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "24h",
            TimeWindow::Week => "7d",
            TimeWindow::Month => "30d",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "24h" | "1d" | "day" => Ok(TimeWindow::Day),
            "7d" | "week" => Ok(TimeWindow::Week),
            "30d" | "month" => Ok(TimeWindow::Month),
            other => Err(DomainError::invalid_input(format!(
                "Unknown time window '{}', expected one of 24h, 7d, 30d",
                other
            ))),
        }
    }
}
