//! # attendme-sessions
//!
//! Session list filtering for the attendance client.
//!
//! Teachers and students browse course sessions narrowed to a window
//! relative to "now" (today, tomorrow, this or next week, this month, past)
//! plus a free-text search. This crate computes those windows and turns a
//! role's selection into either a server query or a filtered, sorted list.
//!
//! ## Key Types
//!
//! - [`Clock`] - Source of "now", read once per operation
//! - [`DateRanges`] - Calendar windows derived from one reading
//! - [`TeacherFilter`] / [`StudentFilter`] - Role menus, see [`RoleFilter`]
//! - [`ServerQueryDescriptor`] - Paged list request for the backend
//! - [`SessionStore`] - JSONL-backed [`SessionSource`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use attendme_sessions::{filter_student_sessions, StudentFilter, SystemClock};
//!
//! let visible = filter_student_sessions(&SystemClock, &sessions, StudentFilter::Week, "algebra");
//! ```

pub mod classify;
pub mod clock;
pub mod filter;
pub mod parser;
pub mod query;
pub mod ranges;
pub mod selection;
pub mod store;
pub mod types;

pub use classify::{is_active, is_past, is_session_active, is_session_past, SessionStatus};
pub use clock::{Clock, FixedClock, SystemClock};
pub use filter::{
    filter_sessions, filter_sessions_at, filter_student_sessions, filter_teacher_sessions,
};
pub use parser::parse_sessions;
pub use query::{
    build_query, build_query_at, build_student_query, build_teacher_query, PageSize,
    ServerQueryDescriptor, SessionListFilters, UNPAGED_SENTINEL,
};
pub use ranges::DateRanges;
pub use selection::{
    Bucket, DatePredicate, Role, RoleFilter, RolePolicy, SearchStage, StudentFilter,
    TeacherFilter, UnknownFilterError,
};
pub use store::{SessionSource, SessionStore};
pub use types::{DateWindow, Edge, Instant, Session};
