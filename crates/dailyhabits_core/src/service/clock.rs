//! Calendar-day source for "today".

use chrono::{Datelike, Days, Local, NaiveDate};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

/// Supplies the current local calendar date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually driven clock for tests and replay.
///
/// Share it through an `Arc` to move "today" while a service holds it.
#[derive(Debug)]
pub struct FixedClock {
    days_from_ce: AtomicI32,
}

impl FixedClock {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            days_from_ce: AtomicI32::new(day.num_days_from_ce()),
        }
    }

    pub fn set(&self, day: NaiveDate) {
        self.days_from_ce
            .store(day.num_days_from_ce(), Ordering::SeqCst);
    }

    /// Moves the clock forward by `days` calendar days.
    pub fn advance_days(&self, days: u64) {
        if let Some(next) = self.today().checked_add_days(Days::new(days)) {
            self.set(next);
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        let days = self.days_from_ce.load(Ordering::SeqCst);
        NaiveDate::from_num_days_from_ce_opt(days).unwrap_or(NaiveDate::MIN)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock};
    use chrono::NaiveDate;

    #[test]
    fn fixed_clock_advances_across_month_end() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        clock.advance_days(1);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }
}
