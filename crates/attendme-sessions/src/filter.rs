//! Filtering and ordering of an already-fetched session list.

use crate::clock::Clock;
use crate::ranges::DateRanges;
use crate::selection::{RoleFilter, SearchStage, StudentFilter, TeacherFilter};
use crate::types::Session;

/// Filter and sort `sessions` against an existing calendar snapshot.
///
/// The input is left untouched. Output is ascending by `dateStart`, or
/// descending for `past`; sessions with equal starts keep their input order.
pub fn filter_sessions_at<F: RoleFilter>(
    ranges: &DateRanges,
    sessions: &[Session],
    selection: F,
    search: &str,
) -> Vec<Session> {
    let policy = F::POLICY;
    let by_date = selection.bucket().predicate(ranges, &policy);

    // The term gates on its trimmed form but matches as typed.
    let needle = (!search.trim().is_empty()).then(|| search.to_lowercase());
    let by_text = |s: &Session| needle.as_deref().map_or(true, |n| s.matches_text(n));

    let mut result: Vec<Session> = match policy.search_stage {
        SearchStage::BeforeDate => sessions
            .iter()
            .filter(|s| by_text(*s))
            .filter(|s| by_date.matches(s))
            .cloned()
            .collect(),
        SearchStage::AfterDate => sessions
            .iter()
            .filter(|s| by_date.matches(s))
            .filter(|s| by_text(*s))
            .cloned()
            .collect(),
    };

    if selection.is_past() {
        result.sort_by(|a, b| b.start_millis().cmp(&a.start_millis()));
    } else {
        result.sort_by_key(Session::start_millis);
    }

    let role = policy.role;
    tracing::debug!(
        role = %role,
        selection = %selection,
        total = sessions.len(),
        matched = result.len(),
        "Filtered sessions"
    );

    result
}

/// Filter and sort `sessions`, reading the clock once.
pub fn filter_sessions<F: RoleFilter, C: Clock>(
    clock: &C,
    sessions: &[Session],
    selection: F,
    search: &str,
) -> Vec<Session> {
    filter_sessions_at(&DateRanges::at(&clock.now()), sessions, selection, search)
}

pub fn filter_teacher_sessions<C: Clock>(
    clock: &C,
    sessions: &[Session],
    selection: TeacherFilter,
    search: &str,
) -> Vec<Session> {
    filter_sessions(clock, sessions, selection, search)
}

pub fn filter_student_sessions<C: Clock>(
    clock: &C,
    sessions: &[Session],
    selection: StudentFilter,
    search: &str,
) -> Vec<Session> {
    filter_sessions(clock, sessions, selection, search)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{TimeZone, Utc};

    fn session(id: u32, course: &str, start: Option<(u32, u32)>) -> Session {
        Session {
            id: serde_json::json!(id),
            course_name: Some(course.to_string()),
            course_group_name: None,
            location_name: None,
            date_start: start.map(|(d, h)| Utc.with_ymd_and_hms(2024, 6, d, h, 0, 0).unwrap()),
            date_end: None,
            extra: Default::default(),
        }
    }

    fn ids(sessions: &[Session]) -> Vec<u64> {
        sessions.iter().filter_map(|s| s.id.as_u64()).collect()
    }

    #[test]
    fn test_unfiltered_sorts_missing_start_first() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap());
        let sessions = vec![
            session(1, "Physics", Some((12, 8))),
            session(2, "Algebra", None),
            session(3, "Chemistry", Some((10, 8))),
        ];

        let result = filter_teacher_sessions(&clock, &sessions, TeacherFilter::AllText, "");
        assert_eq!(ids(&result), vec![2, 3, 1]);
        // input untouched
        assert_eq!(ids(&sessions), vec![1, 2, 3]);
    }

    #[test]
    fn test_equal_starts_keep_input_order() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap());
        let sessions = vec![
            session(1, "A", Some((10, 8))),
            session(2, "B", Some((10, 8))),
            session(3, "C", Some((10, 8))),
        ];

        let result = filter_student_sessions(&clock, &sessions, StudentFilter::All, "");
        assert_eq!(ids(&result), vec![1, 2, 3]);
    }

    #[test]
    fn test_whitespace_search_is_ignored() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap());
        let sessions = vec![session(1, "Algebra", Some((10, 8)))];

        let result = filter_student_sessions(&clock, &sessions, StudentFilter::All, "   ");
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_search_matches_as_typed() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap());
        let sessions = vec![
            session(1, "Linear Algebra", Some((10, 8))),
            session(2, "Algebra", Some((10, 9))),
        ];

        let result = filter_student_sessions(&clock, &sessions, StudentFilter::All, " ALGEBRA");
        assert_eq!(ids(&result), vec![1]);
    }
}
