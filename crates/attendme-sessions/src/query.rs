//! Server-side list queries.
//!
//! A [`ServerQueryDescriptor`] is plain data handed to whatever fetches the
//! session list. It performs no I/O itself.

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::ranges::DateRanges;
use crate::selection::{RoleFilter, StudentFilter, TeacherFilter};
use crate::types::Instant;

/// Page size the backend reads as "return everything".
pub const UNPAGED_SENTINEL: u32 = 999_999;

/// Page size of a list query.
///
/// The backend has no real pagination for this client yet, so queries are
/// normally `Unpaged`. On the wire that is the numeric sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum PageSize {
    #[default]
    Unpaged,
    Limited(u32),
}

impl From<u32> for PageSize {
    fn from(n: u32) -> Self {
        if n == UNPAGED_SENTINEL {
            PageSize::Unpaged
        } else {
            PageSize::Limited(n)
        }
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        match size {
            PageSize::Unpaged => UNPAGED_SENTINEL,
            PageSize::Limited(n) => n,
        }
    }
}

/// Optional constraints of a list query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionListFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_start: Option<Instant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_end: Option<Instant>,
}

impl SessionListFilters {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.date_start.is_none() && self.date_end.is_none()
    }
}

/// Paged list request. `filters` is `None`, not an empty object, when
/// nothing constrains the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerQueryDescriptor {
    pub page_number: u32,
    pub page_size: PageSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<SessionListFilters>,
}

impl ServerQueryDescriptor {
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Build a query against an existing snapshot of the calendar.
pub fn build_query_at<F: RoleFilter>(
    ranges: &DateRanges,
    selection: F,
    search: &str,
) -> ServerQueryDescriptor {
    let term = search.trim();
    let (date_start, date_end) = selection.bucket().query_bounds(ranges);

    let filters = SessionListFilters {
        search: (!term.is_empty()).then(|| term.to_string()),
        date_start,
        date_end,
    };

    let role = F::POLICY.role;
    tracing::debug!(
        role = %role,
        selection = %selection,
        has_filters = !filters.is_empty(),
        "Built session list query"
    );

    ServerQueryDescriptor {
        page_number: 1,
        page_size: PageSize::Unpaged,
        filters: (!filters.is_empty()).then_some(filters),
    }
}

/// Build a query, reading the clock once.
pub fn build_query<F: RoleFilter, C: Clock>(
    clock: &C,
    selection: F,
    search: &str,
) -> ServerQueryDescriptor {
    build_query_at(&DateRanges::at(&clock.now()), selection, search)
}

pub fn build_teacher_query<C: Clock>(
    clock: &C,
    selection: TeacherFilter,
    search: &str,
) -> ServerQueryDescriptor {
    build_query(clock, selection, search)
}

pub fn build_student_query<C: Clock>(
    clock: &C,
    selection: StudentFilter,
    search: &str,
) -> ServerQueryDescriptor {
    build_query(clock, selection, search)
}
