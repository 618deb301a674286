use attendme_sessions::{
    build_student_query, build_teacher_query, filter_student_sessions, filter_teacher_sessions,
    FixedClock, Instant, PageSize, Session, SessionListFilters, StudentFilter, TeacherFilter,
};
use chrono::{Duration, TimeZone, Utc};

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Instant {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

/// Monday 2024-06-10 09:00.
fn monday_morning() -> FixedClock<Utc> {
    FixedClock::new(at(2024, 6, 10, 9, 0))
}

fn session(id: &str, start: Option<Instant>, end: Option<Instant>) -> Session {
    Session {
        id: serde_json::json!(id),
        course_name: None,
        course_group_name: None,
        location_name: None,
        date_start: start,
        date_end: end,
        extra: Default::default(),
    }
}

fn named(id: &str, course: &str, group: &str, location: &str, start: Instant) -> Session {
    Session {
        course_name: Some(course.to_string()),
        course_group_name: Some(group.to_string()),
        location_name: Some(location.to_string()),
        ..session(id, Some(start), Some(start + Duration::minutes(90)))
    }
}

fn ids(sessions: &[Session]) -> Vec<&str> {
    sessions.iter().filter_map(|s| s.id.as_str()).collect()
}

// ============================================================
// Teacher list
// ============================================================

#[test]
fn test_teacher_today_excludes_next_midnight() {
    let sessions = vec![
        session("midnight", Some(at(2024, 6, 11, 0, 0)), None),
        session("late", Some(at(2024, 6, 10, 23, 59)), None),
        session("early", Some(at(2024, 6, 10, 8, 0)), None),
    ];

    let result = filter_teacher_sessions(&monday_morning(), &sessions, TeacherFilter::Today, "");

    assert_eq!(ids(&result), vec!["early", "late"]);
}

#[test]
fn test_teacher_tomorrow_is_half_open() {
    let last_ms = at(2024, 6, 12, 0, 0) - Duration::milliseconds(1);
    let sessions = vec![
        session("start", Some(at(2024, 6, 11, 0, 0)), None),
        session("last_ms", Some(last_ms), None),
        session("evening", Some(at(2024, 6, 11, 18, 0)), None),
    ];

    let result =
        filter_teacher_sessions(&monday_morning(), &sessions, TeacherFilter::Tomorrow, "");

    assert_eq!(ids(&result), vec!["start", "evening"]);
}

#[test]
fn test_teacher_next_week_is_closed() {
    let sessions = vec![
        session("this_week", Some(at(2024, 6, 16, 12, 0)), None),
        session("monday", Some(at(2024, 6, 17, 0, 0)), None),
        session("sunday_night", Some(at(2024, 6, 23, 23, 59)), None),
        session("after", Some(at(2024, 6, 24, 0, 0)), None),
    ];

    let result =
        filter_teacher_sessions(&monday_morning(), &sessions, TeacherFilter::NextWeek, "");

    assert_eq!(ids(&result), vec!["monday", "sunday_night"]);
}

#[test]
fn test_teacher_past_includes_sessions_ending_now() {
    let sessions = vec![
        session("yesterday", Some(at(2024, 6, 9, 8, 0)), Some(at(2024, 6, 9, 10, 0))),
        session("just_ended", Some(at(2024, 6, 10, 8, 0)), Some(at(2024, 6, 10, 9, 0))),
        session("running", Some(at(2024, 6, 10, 8, 30)), Some(at(2024, 6, 10, 9, 30))),
        session("open_ended", Some(at(2024, 6, 1, 8, 0)), None),
    ];

    let result = filter_teacher_sessions(&monday_morning(), &sessions, TeacherFilter::Past, "");

    assert_eq!(ids(&result), vec!["just_ended", "yesterday"]);
}

#[test]
fn test_teacher_all_aliases_agree() {
    let sessions = vec![
        session("b", Some(at(2024, 7, 1, 8, 0)), None),
        session("a", Some(at(2023, 1, 1, 8, 0)), None),
        session("undated", None, None),
    ];
    let clock = monday_morning();

    let by_date = filter_teacher_sessions(&clock, &sessions, TeacherFilter::AllDate, "");
    let by_text = filter_teacher_sessions(&clock, &sessions, TeacherFilter::AllText, "");

    assert_eq!(ids(&by_date), vec!["undated", "a", "b"]);
    assert_eq!(by_date, by_text);
}

#[test]
fn test_teacher_search_after_date_filter() {
    let sessions = vec![
        named("algebra_today", "Algebra", "G1", "Room 1", at(2024, 6, 10, 12, 0)),
        named("algebra_tomorrow", "Algebra", "G1", "Room 1", at(2024, 6, 11, 12, 0)),
        named("physics_today", "Physics", "G2", "Lab", at(2024, 6, 10, 10, 0)),
    ];

    let result =
        filter_teacher_sessions(&monday_morning(), &sessions, TeacherFilter::Today, "alGEbra");

    assert_eq!(ids(&result), vec!["algebra_today"]);
}

// ============================================================
// Student list
// ============================================================

#[test]
fn test_student_today_includes_next_midnight() {
    let sessions = vec![
        session("midnight", Some(at(2024, 6, 11, 0, 0)), None),
        session("early", Some(at(2024, 6, 10, 8, 0)), None),
    ];

    let result = filter_student_sessions(&monday_morning(), &sessions, StudentFilter::Today, "");

    assert_eq!(ids(&result), vec!["early", "midnight"]);
}

#[test]
fn test_student_tomorrow_includes_its_last_millisecond() {
    let last_ms = at(2024, 6, 12, 0, 0) - Duration::milliseconds(1);
    let sessions = vec![
        session("start", Some(at(2024, 6, 11, 0, 0)), None),
        session("last_ms", Some(last_ms), None),
        session("day_after", Some(at(2024, 6, 12, 0, 1)), None),
    ];

    let result =
        filter_student_sessions(&monday_morning(), &sessions, StudentFilter::Tomorrow, "");

    assert_eq!(ids(&result), vec!["start", "last_ms"]);
}

#[test]
fn test_student_past_is_strict() {
    let sessions = vec![
        session("ends_now", Some(at(2024, 6, 10, 8, 0)), Some(at(2024, 6, 10, 9, 0))),
        session("yesterday", Some(at(2024, 6, 9, 8, 0)), Some(at(2024, 6, 9, 10, 0))),
    ];

    let result = filter_student_sessions(&monday_morning(), &sessions, StudentFilter::Past, "");

    assert_eq!(ids(&result), vec!["yesterday"]);
}

#[test]
fn test_student_past_sorts_most_recent_first() {
    let sessions = vec![
        session("old", Some(at(2024, 5, 1, 8, 0)), Some(at(2024, 5, 1, 9, 0))),
        session("recent", Some(at(2024, 6, 9, 8, 0)), Some(at(2024, 6, 9, 9, 0))),
        session("middle", Some(at(2024, 6, 1, 8, 0)), Some(at(2024, 6, 1, 9, 0))),
    ];

    let result = filter_student_sessions(&monday_morning(), &sessions, StudentFilter::Past, "");

    assert_eq!(ids(&result), vec!["recent", "middle", "old"]);
}

#[test]
fn test_student_week_and_month() {
    let clock = FixedClock::new(at(2024, 6, 13, 15, 0)); // Thursday
    let sessions = vec![
        session("last_week", Some(at(2024, 6, 9, 23, 0)), None),
        session("monday", Some(at(2024, 6, 10, 0, 0)), None),
        session("sunday", Some(at(2024, 6, 16, 20, 0)), None),
        session("month_end", Some(at(2024, 6, 30, 23, 59)), None),
        session("july", Some(at(2024, 7, 1, 0, 0)), None),
        session("first", Some(at(2024, 6, 1, 0, 0)), None),
    ];

    let week = filter_student_sessions(&clock, &sessions, StudentFilter::Week, "");
    assert_eq!(ids(&week), vec!["monday", "sunday"]);

    let month = filter_student_sessions(&clock, &sessions, StudentFilter::Month, "");
    assert_eq!(
        ids(&month),
        vec!["first", "last_week", "monday", "sunday", "month_end"]
    );
}

#[test]
fn test_missing_start_never_matches_a_window() {
    let sessions = vec![session("undated", None, Some(at(2024, 6, 10, 10, 0)))];
    let clock = monday_morning();

    for filter in [
        StudentFilter::Today,
        StudentFilter::Tomorrow,
        StudentFilter::Week,
        StudentFilter::Month,
    ] {
        assert!(filter_student_sessions(&clock, &sessions, filter, "").is_empty());
    }
    assert_eq!(
        filter_student_sessions(&clock, &sessions, StudentFilter::All, "").len(),
        1
    );
}

#[test]
fn test_search_checks_group_and_location() {
    let sessions = vec![
        named("by_group", "Physics", "Group ALPHA", "Lab", at(2024, 6, 10, 10, 0)),
        named("by_location", "Chemistry", "G3", "Alpha Hall", at(2024, 6, 10, 11, 0)),
        named("none", "Biology", "G4", "Room 7", at(2024, 6, 10, 12, 0)),
    ];

    let result = filter_student_sessions(&monday_morning(), &sessions, StudentFilter::All, "alpha");

    assert_eq!(ids(&result), vec!["by_group", "by_location"]);
}

#[test]
fn test_search_ignores_date_bucket_when_unfiltered() {
    let sessions = vec![named("far", "Algebra", "G1", "Room 1", at(2030, 1, 1, 8, 0))];

    let result = filter_student_sessions(&monday_morning(), &sessions, StudentFilter::All, "algebra");

    assert_eq!(result.len(), 1);
}

#[test]
fn test_filtering_is_repeatable() {
    let sessions = vec![
        named("a", "Algebra", "G1", "Room 1", at(2024, 6, 10, 12, 0)),
        named("b", "Algebra", "G2", "Room 2", at(2024, 6, 10, 10, 0)),
    ];
    let clock = monday_morning();

    let first = filter_student_sessions(&clock, &sessions, StudentFilter::Today, "alg");
    let second = filter_student_sessions(&clock, &sessions, StudentFilter::Today, "alg");

    assert_eq!(first, second);
}

#[test]
fn test_role_pipelines_agree_where_tables_agree() {
    // Search-before-date vs. search-after-date must not change the set.
    let sessions = vec![
        named("a", "Algebra", "G1", "Room 1", at(2024, 6, 10, 12, 0)),
        named("b", "Physics", "G2", "Room 2", at(2024, 6, 10, 10, 0)),
        named("c", "Algebra", "G2", "Room 2", at(2024, 6, 12, 10, 0)),
    ];
    let clock = monday_morning();

    let teacher = filter_teacher_sessions(&clock, &sessions, TeacherFilter::Today, "algebra");
    let student = filter_student_sessions(&clock, &sessions, StudentFilter::Today, "algebra");

    assert_eq!(teacher, student);
}

// ============================================================
// Query descriptors
// ============================================================

#[test]
fn test_student_month_query() {
    let clock = FixedClock::new(at(2024, 2, 15, 0, 0));

    let query = build_student_query(&clock, StudentFilter::Month, "algebra");

    assert_eq!(query.page_number, 1);
    assert_eq!(query.page_size, PageSize::Unpaged);
    assert_eq!(
        query.filters,
        Some(SessionListFilters {
            search: Some("algebra".to_string()),
            date_start: Some(at(2024, 2, 1, 0, 0)),
            date_end: Some(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()),
        })
    );
}

#[test]
fn test_teacher_unfiltered_query_has_no_filters() {
    let clock = monday_morning();

    let query = build_teacher_query(&clock, TeacherFilter::AllText, "");
    assert_eq!(query.filters, None);

    let json = serde_json::to_value(&query).unwrap();
    assert!(json.get("filters").is_none());
    assert_eq!(json["pageSize"], serde_json::json!(999999));
}

#[test]
fn test_query_trims_search() {
    let query = build_teacher_query(&monday_morning(), TeacherFilter::AllDate, "  physics ");

    assert_eq!(
        query.filters,
        Some(SessionListFilters {
            search: Some("physics".to_string()),
            date_start: None,
            date_end: None,
        })
    );

    let blank = build_teacher_query(&monday_morning(), TeacherFilter::AllDate, "   ");
    assert_eq!(blank.filters, None);
}

#[test]
fn test_past_query_bounds_only_the_end() {
    let clock = monday_morning();

    let teacher = build_teacher_query(&clock, TeacherFilter::Past, "");
    let student = build_student_query(&clock, StudentFilter::Past, "");

    let expected = Some(SessionListFilters {
        search: None,
        date_start: None,
        date_end: Some(at(2024, 6, 10, 9, 0)),
    });
    assert_eq!(teacher.filters, expected);
    assert_eq!(student.filters, expected);
}

#[test]
fn test_window_queries_use_calendar_windows() {
    let clock = monday_morning();

    let today = build_teacher_query(&clock, TeacherFilter::Today, "");
    let filters = today.filters.unwrap();
    assert_eq!(filters.date_start, Some(at(2024, 6, 10, 0, 0)));
    assert_eq!(filters.date_end, Some(at(2024, 6, 11, 0, 0)));

    let tomorrow = build_student_query(&clock, StudentFilter::Tomorrow, "");
    let filters = tomorrow.filters.unwrap();
    assert_eq!(filters.date_start, Some(at(2024, 6, 11, 0, 0)));
    assert_eq!(
        filters.date_end,
        Some(at(2024, 6, 12, 0, 0) - Duration::milliseconds(1))
    );

    let next_week = build_teacher_query(&clock, TeacherFilter::NextWeek, "");
    let filters = next_week.filters.unwrap();
    assert_eq!(filters.date_start, Some(at(2024, 6, 17, 0, 0)));

    let week = build_student_query(&clock, StudentFilter::Week, "");
    let filters = week.filters.unwrap();
    assert_eq!(filters.date_start, Some(at(2024, 6, 10, 0, 0)));
    assert_eq!(
        filters.date_end,
        Some(at(2024, 6, 17, 0, 0) - Duration::milliseconds(1))
    );
}

#[test]
fn test_query_serializes_camel_case() {
    let query = build_student_query(&monday_morning(), StudentFilter::Today, "x");
    let json = serde_json::to_value(&query).unwrap();

    assert_eq!(json["pageNumber"], serde_json::json!(1));
    assert_eq!(json["filters"]["search"], serde_json::json!("x"));
    assert_eq!(
        json["filters"]["dateStart"],
        serde_json::json!("2024-06-10T00:00:00Z")
    );
    assert_eq!(
        json["filters"]["dateEnd"],
        serde_json::json!("2024-06-11T00:00:00Z")
    );
}
