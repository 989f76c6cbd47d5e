/// Fixed-interval tick driven by the caller's clock in milliseconds.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval_ms: u64,
    last_fired_ms: Option<u64>,
}

impl IntervalTimer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fired_ms: None,
        }
    }

    /// The first call is always due.
    pub fn due(&mut self, now_ms: u64) -> bool {
        let due = match self.last_fired_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
            None => true,
        };
        if due {
            self.last_fired_ms = Some(now_ms);
        }
        due
    }
}
