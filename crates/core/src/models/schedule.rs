//! Recurring playbook runs.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::result::Result;

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Whether a schedule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    #[default]
    Active,
    Paused,
}

impl ScheduleStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
        }
    }

    /// The other status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Paused,
            Self::Paused => Self::Active,
        }
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            other => Err(Error::validation(format!("unknown schedule status '{other}'"))),
        }
    }
}

/// How often a schedule repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(Error::validation(format!("unknown frequency '{other}'"))),
        }
    }
}

/// A schedule row as listed by the schedule manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: i64,
    pub name: String,
    pub playbook: String,
    pub target: String,
    pub schedule: String,
    #[serde(default, alias = "lastRun")]
    pub last_run: String,
    #[serde(default, alias = "nextRun")]
    pub next_run: String,
    #[serde(default)]
    pub status: ScheduleStatus,
    #[serde(default, alias = "createdBy")]
    pub created_by: String,
}

/// Payload for `POST /schedules/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSchedule {
    pub name: String,
    pub playbook: String,
    pub target: String,
    pub frequency: Frequency,
    /// Wall clock time, `HH:MM`.
    pub time: String,
    /// 0 is Sunday.
    pub day_of_week: u8,
    pub day_of_month: u8,
    pub status: ScheduleStatus,
    /// Human readable form of the recurrence, filled by [`NewSchedule::describe`].
    #[serde(default)]
    pub schedule: String,
}

impl Default for NewSchedule {
    fn default() -> Self {
        Self {
            name: String::new(),
            playbook: String::new(),
            target: String::new(),
            frequency: Frequency::Daily,
            time: "00:00".to_string(),
            day_of_week: 1,
            day_of_month: 1,
            status: ScheduleStatus::Active,
            schedule: String::new(),
        }
    }
}

impl NewSchedule {
    /// Check required fields and ranges.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("schedule name is required"));
        }
        if self.playbook.trim().is_empty() {
            return Err(Error::validation("playbook is required"));
        }
        if self.target.trim().is_empty() {
            return Err(Error::validation("target is required"));
        }
        self.parsed_time()?;
        if self.frequency == Frequency::Weekly && usize::from(self.day_of_week) >= WEEKDAYS.len() {
            return Err(Error::validation("day of week must be 0-6"));
        }
        if self.frequency == Frequency::Monthly && !(1..=31).contains(&self.day_of_month) {
            return Err(Error::validation("day of month must be 1-31"));
        }
        Ok(())
    }

    /// Human readable recurrence, e.g. `Every Monday at 03:00`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.frequency {
            Frequency::Daily => format!("Every day at {}", self.time),
            Frequency::Weekly => {
                let day = WEEKDAYS
                    .get(usize::from(self.day_of_week))
                    .copied()
                    .unwrap_or("?");
                format!("Every {day} at {}", self.time)
            }
            Frequency::Monthly => format!(
                "{}{} day of month at {}",
                self.day_of_month,
                ordinal_suffix(self.day_of_month),
                self.time
            ),
        }
    }

    /// Copy of the request with `schedule` filled from [`NewSchedule::describe`].
    #[must_use]
    pub fn described(mut self) -> Self {
        self.schedule = self.describe();
        self
    }

    /// First run strictly after `now`, or `None` when the request is invalid.
    #[must_use]
    pub fn next_run_after(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let time = self.parsed_time().ok()?;
        let today = now.date();
        match self.frequency {
            Frequency::Daily => (0..=1)
                .filter_map(|offset| today.checked_add_days(Days::new(offset)))
                .map(|date| date.and_time(time))
                .find(|candidate| *candidate > now),
            Frequency::Weekly => (0..=7)
                .filter_map(|offset| today.checked_add_days(Days::new(offset)))
                .filter(|date| {
                    date.weekday().num_days_from_sunday() == u32::from(self.day_of_week)
                })
                .map(|date| date.and_time(time))
                .find(|candidate| *candidate > now),
            Frequency::Monthly => {
                let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?;
                (0..=12)
                    .filter_map(|offset| first.checked_add_months(Months::new(offset)))
                    .filter_map(|month| month.with_day(u32::from(self.day_of_month)))
                    .map(|date| date.and_time(time))
                    .find(|candidate| *candidate > now)
            }
        }
    }

    fn parsed_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.time, "%H:%M")
            .map_err(|_| Error::validation(format!("time '{}' must be HH:MM", self.time)))
    }
}

const fn ordinal_suffix(day: u8) -> &'static str {
    match day {
        11..=13 => "th",
        d if d % 10 == 1 => "st",
        d if d % 10 == 2 => "nd",
        d if d % 10 == 3 => "rd",
        _ => "th",
    }
}
