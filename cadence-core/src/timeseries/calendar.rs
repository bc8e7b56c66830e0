use chrono::{DateTime, Datelike, Months, NaiveDate, TimeDelta, Utc, Weekday};

use crate::Frequency;

/// Returns `true` on Saturday or Sunday (UTC).
#[must_use]
pub fn is_weekend(ts: DateTime<Utc>) -> bool {
    matches!(ts.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Move a weekend instant forward to the following Monday, keeping the time of day.
#[must_use]
pub fn roll_to_business_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    let skip = match ts.weekday() {
        Weekday::Sat => 2,
        Weekday::Sun => 1,
        _ => 0,
    };
    ts + TimeDelta::days(skip)
}

fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Returns `true` if `ts` falls on the last day of its month.
#[must_use]
pub fn is_month_end(ts: DateTime<Utc>) -> bool {
    last_day_of_month(ts.date_naive()) == Some(ts.date_naive())
}

/// Whole-month offset from `a` to `b`, if `b` is exactly that many months
/// after `a` at the same time of day.
///
/// Day-of-month clamping is honored (Jan 31 + 1 month = Feb 28/29), and two
/// month-end instants are always a whole number of months apart.
#[must_use]
pub fn month_offset(a: DateTime<Utc>, b: DateTime<Utc>) -> Option<u32> {
    let diff = (b.year() - a.year()) * 12 + (b.month() as i32 - a.month() as i32);
    let k = u32::try_from(diff).ok().filter(|&k| k > 0)?;
    if a.checked_add_months(Months::new(k)) == Some(b) {
        return Some(k);
    }
    (a.time() == b.time() && is_month_end(a) && is_month_end(b)).then_some(k)
}

/// The `k`-th grid instant after `anchor` for the given frequency.
///
/// `anchor` must already be a valid grid instant (for business days, a
/// weekday). Returns `None` on overflow or a non-positive fixed step.
#[must_use]
pub fn nth_step(freq: Frequency, anchor: DateTime<Utc>, k: i64) -> Option<DateTime<Utc>> {
    match freq {
        Frequency::BusinessDay => {
            let weekday = i64::from(anchor.weekday().num_days_from_monday());
            let (weeks, rem) = (k / 5, k % 5);
            let wrap = if weekday + rem >= 5 { 2 } else { 0 };
            let days = weeks.checked_mul(7)?.checked_add(rem + wrap)?;
            anchor.checked_add_signed(TimeDelta::try_days(days)?)
        }
        Frequency::Month => {
            let t = anchor.checked_add_months(Months::new(u32::try_from(k).ok()?))?;
            if is_month_end(anchor) {
                let last = last_day_of_month(t.date_naive())?;
                t.with_day(last.day())
            } else {
                Some(t)
            }
        }
        other => {
            let step = other.fixed_seconds().filter(|&s| s > 0)?;
            anchor.checked_add_signed(TimeDelta::try_seconds(step.checked_mul(k)?)?)
        }
    }
}
