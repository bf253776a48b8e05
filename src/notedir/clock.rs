use chrono::{DateTime, Local, TimeZone, Utc};
use std::sync::Mutex;

/// Source of "now" for the engine. Derived filenames use the local calendar date.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    fn now_utc(&self) -> DateTime<Utc> {
        self.now().with_timezone(&Utc)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Local>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Noon local time on the given date.
    pub fn on_date(year: i32, month: u32, day: u32) -> Self {
        let now = Local
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .unwrap_or_else(Local::now);
        Self::new(now)
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn fixed_clock_reports_its_date() {
        let clock = FixedClock::on_date(2024, 1, 5);
        let now = clock.now();
        assert_eq!((now.year(), now.month(), now.day()), (2024, 1, 5));
    }

    #[test]
    fn fixed_clock_advances() {
        let clock = FixedClock::on_date(2024, 1, 5);
        let before = clock.now_utc();
        clock.advance(chrono::Duration::milliseconds(5));
        assert_eq!(clock.now_utc() - before, chrono::Duration::milliseconds(5));
    }
}
