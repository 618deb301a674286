//! Calendar windows relative to a single reading of the clock.
//!
//! Weeks start on Monday. Day boundaries are local midnights in the zone of
//! the reading; the resulting instants are stored in UTC.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use serde::Serialize;

use crate::types::{DateWindow, Edge, Instant};

/// Named windows derived from one "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRanges {
    pub now: Instant,
    /// `[midnight, next midnight)`
    pub today: DateWindow,
    /// `[midnight + 1 day, midnight + 2 days - 1ms]`
    pub tomorrow: DateWindow,
    /// Current Monday-start week, closed.
    pub this_week: DateWindow,
    /// The following Monday-start week, closed.
    pub next_week: DateWindow,
    /// First of the month at midnight through the last day at 23:59:59.
    pub this_month: DateWindow,
}

impl DateRanges {
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        // Monday = 1 .. Sunday = 7
        let iso_day = i64::from(today.weekday().number_from_monday());

        let midnight = |date: NaiveDate| resolve_local(&tz, date.and_time(NaiveTime::MIN));
        let last_ms = Duration::milliseconds(1);

        let today_window = DateWindow::new(
            midnight(today),
            midnight(add_days(today, 1)),
            Edge::Exclusive,
        );

        let tomorrow_window = DateWindow::new(
            midnight(add_days(today, 1)),
            midnight(add_days(today, 2)) - last_ms,
            Edge::Inclusive,
        );

        let week_of = |monday: NaiveDate| {
            DateWindow::new(
                midnight(monday),
                midnight(add_days(monday, 7)) - last_ms,
                Edge::Inclusive,
            )
        };
        let this_monday = add_days(today, -(iso_day - 1));
        let next_monday = add_days(today, 8 - iso_day);

        let first_of_month = today.with_day(1).unwrap_or(today);
        let last_of_month = add_days(first_of_next_month(first_of_month), -1);
        let month_end =
            last_of_month.and_time(NaiveTime::MIN) + Duration::seconds(23 * 3600 + 59 * 60 + 59);

        Self {
            now: now.with_timezone(&Utc),
            today: today_window,
            tomorrow: tomorrow_window,
            this_week: week_of(this_monday),
            next_week: week_of(next_monday),
            this_month: DateWindow::new(
                midnight(first_of_month),
                resolve_local(&tz, month_end),
                Edge::Inclusive,
            ),
        }
    }
}

fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}

fn first_of_next_month(first: NaiveDate) -> NaiveDate {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(first)
}

/// Map a wall-clock time in `tz` to an instant.
///
/// Ambiguous times (clocks turned back) take the earlier candidate. Times
/// skipped by a forward transition move to the first valid minute after.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Instant {
    let mut candidate = naive;
    for _ in 0..=180 {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(t) => return t.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            LocalResult::None => candidate += Duration::minutes(1),
        }
    }
    tz.from_utc_datetime(&naive).with_timezone(&Utc)
}
