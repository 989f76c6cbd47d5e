use booklog_domain::{ReminderDay, ReminderSchedule};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderDue {
    pub day: ReminderDay,
    pub time: NaiveTime,
    pub date: NaiveDate,
}

/// Remembers the last slot it fired so repeated polls inside the same minute
/// stay quiet. A minute that no poll lands in is skipped, not replayed.
#[derive(Debug, Clone, Default)]
pub struct ReminderPoller {
    last_fired: Option<(NaiveDate, NaiveTime)>,
}

impl ReminderPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, schedule: &ReminderSchedule, now: NaiveDateTime) -> Option<ReminderDue> {
        let (day, time) = schedule.due_at(now)?;
        let slot = (now.date(), time);
        if self.last_fired == Some(slot) {
            return None;
        }
        self.last_fired = Some(slot);
        Some(ReminderDue {
            day,
            time,
            date: now.date(),
        })
    }
}
