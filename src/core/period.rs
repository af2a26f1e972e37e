//! Calendar arithmetic for biweekly pay periods.
//!
//! The reference anchor is the most recent occurrence of the anchor weekday
//! (Friday unless configured otherwise). When today already falls on that
//! weekday, today is the anchor.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub const DAYS_PER_PERIOD: i64 = 14;
pub const DEFAULT_ANCHOR_WEEKDAY: Weekday = Weekday::Fri;

/// Most recent `weekday` on or before `today`.
pub fn reference_anchor(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let current = i64::from(today.weekday().num_days_from_monday());
    let target = i64::from(weekday.num_days_from_monday());
    let days_back = (current - target).rem_euclid(7);
    today - Duration::days(days_back)
}

/// Number of biweekly periods needed to reach `target` from `anchor`.
///
/// Partial periods round up and the result never drops below one, even when
/// `target` precedes the anchor.
pub fn count_biweekly_periods(anchor: NaiveDate, target: NaiveDate) -> u32 {
    let days = (target - anchor).num_days();
    if days <= 0 {
        return 1;
    }
    let periods = (days + DAYS_PER_PERIOD - 1) / DAYS_PER_PERIOD;
    u32::try_from(periods).unwrap_or(u32::MAX).max(1)
}

/// Completed biweekly periods since January 1st of `today`'s year.
pub fn periods_since_year_start(today: NaiveDate) -> u32 {
    let days = today.ordinal0();
    (days / 7) / 2
}

/// Rolls `date` forward to the next `weekday`; identity when it already is one.
pub fn align_forecast_date(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let current = i64::from(date.weekday().num_days_from_monday());
    let target = i64::from(weekday.num_days_from_monday());
    let days_forward = (target - current).rem_euclid(7);
    date + Duration::days(days_forward)
}

/// Forecast date used when the caller supplies none.
pub fn next_anchor_on_or_after(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    align_forecast_date(today, weekday)
}

/// The `index`-th biweekly step after `anchor`.
pub fn period_start(anchor: NaiveDate, index: u32) -> NaiveDate {
    anchor + Duration::days(DAYS_PER_PERIOD * i64::from(index))
}
