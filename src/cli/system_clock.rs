use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};

use crate::core::time::Clock;

/// Real-time clock backed by the system UTC time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Calendar date in the user's timezone.
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn local_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
