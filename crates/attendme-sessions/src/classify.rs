use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::types::{Instant, Session};

/// `start <= now <= end`. False when either bound is missing.
pub fn is_active(start: Option<Instant>, end: Option<Instant>, now: Instant) -> bool {
    match (start, end) {
        (Some(start), Some(end)) => start <= now && now <= end,
        _ => false,
    }
}

/// `end < now`. False when the end is missing.
pub fn is_past(end: Option<Instant>, now: Instant) -> bool {
    end.is_some_and(|end| end < now)
}

pub fn is_session_active<C: Clock>(
    clock: &C,
    start: Option<Instant>,
    end: Option<Instant>,
) -> bool {
    is_active(start, end, clock.now().with_timezone(&Utc))
}

pub fn is_session_past<C: Clock>(clock: &C, end: Option<Instant>) -> bool {
    is_past(end, clock.now().with_timezone(&Utc))
}

/// Badge shown next to a session in list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Upcoming,
    Active,
    Past,
    /// No start date, or a start with no end that has already begun.
    Unscheduled,
}

impl SessionStatus {
    pub fn of(session: &Session, now: Instant) -> Self {
        if is_active(session.date_start, session.date_end, now) {
            SessionStatus::Active
        } else if is_past(session.date_end, now) {
            SessionStatus::Past
        } else {
            match session.date_start {
                Some(start) if start > now => SessionStatus::Upcoming,
                _ => SessionStatus::Unscheduled,
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Upcoming => "upcoming",
            SessionStatus::Active => "active",
            SessionStatus::Past => "past",
            SessionStatus::Unscheduled => "unscheduled",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
