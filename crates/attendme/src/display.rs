//! Date rendering for terminal output.
//!
//! Day-first, zero-padded, 24-hour. Missing instants render as `-`.

use std::fmt::Display;

use chrono::{Local, TimeZone};

use attendme_sessions::Instant;

pub fn format_date_time(date: Option<Instant>) -> String {
    render(date, &Local, "%d.%m, %H:%M")
}

pub fn format_date_only(date: Option<Instant>) -> String {
    render(date, &Local, "%d.%m.%Y")
}

pub fn format_time_only(date: Option<Instant>) -> String {
    render(date, &Local, "%H:%M")
}

fn render<Tz>(date: Option<Instant>, tz: &Tz, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match date {
        Some(d) => d.with_timezone(tz).format(pattern).to_string(),
        None => "-".to_string(),
    }
}
