use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::DomainError;

const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl ReminderDay {
    pub const ALL: [ReminderDay; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub fn short_name(self) -> &'static str {
        match self {
            Self::Monday => "mon",
            Self::Tuesday => "tue",
            Self::Wednesday => "wed",
            Self::Thursday => "thu",
            Self::Friday => "fri",
            Self::Saturday => "sat",
            Self::Sunday => "sun",
        }
    }
}

impl From<Weekday> for ReminderDay {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

impl Display for ReminderDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for ReminderDay {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let weekday = lowered
            .parse::<Weekday>()
            .map_err(|_| DomainError::UnknownWeekday(lowered.clone()))?;
        Ok(weekday.into())
    }
}

/// Weekday -> "HH:MM". A missing or empty entry means the day is disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderSchedule(BTreeMap<ReminderDay, String>);

impl ReminderSchedule {
    pub fn set(&mut self, day: ReminderDay, time: Option<&str>) -> Result<(), DomainError> {
        match time.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => {
                let parsed = parse_time(value)?;
                self.0
                    .insert(day, parsed.format(TIME_FORMAT).to_string());
            }
            None => {
                self.0.remove(&day);
            }
        }
        Ok(())
    }

    /// Entries that fail to parse are treated as disabled.
    pub fn time_for(&self, day: ReminderDay) -> Option<NaiveTime> {
        self.0
            .get(&day)
            .and_then(|value| parse_time(value).ok())
    }

    pub fn enabled(&self) -> Vec<(ReminderDay, NaiveTime)> {
        ReminderDay::ALL
            .into_iter()
            .filter_map(|day| self.time_for(day).map(|time| (day, time)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled().is_empty()
    }

    /// Returns the scheduled slot when `now` falls in the same weekday and minute.
    pub fn due_at(&self, now: NaiveDateTime) -> Option<(ReminderDay, NaiveTime)> {
        let day = ReminderDay::from(now.weekday());
        let time = self.time_for(day)?;
        (time.hour() == now.hour() && time.minute() == now.minute()).then_some((day, time))
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, DomainError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| DomainError::InvalidReminderTime(value.to_string()))
}
