//! Role-scoped filter selections and the per-role bucket tables.
//!
//! Teachers and students pick from different menus and the two roles apply
//! different edge rules to the same windows. Both tables are expressed as a
//! [`RolePolicy`] so one engine serves both.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ranges::DateRanges;
use crate::types::{DateWindow, Edge, Instant, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Teacher,
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Teacher => f.write_str("teacher"),
            Role::Student => f.write_str("student"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {role} filter: {label:?} (expected one of: {expected})")]
pub struct UnknownFilterError {
    pub role: Role,
    pub label: String,
    pub expected: String,
}

/// Named date-relative category a session is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Today,
    Tomorrow,
    ThisWeek,
    NextWeek,
    ThisMonth,
    Past,
    Unbounded,
}

/// Whether the text search runs before or after the date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    BeforeDate,
    AfterDate,
}

/// Edge rules that differ between roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolePolicy {
    pub role: Role,
    /// Upper edge of the `today` and `tomorrow` buckets.
    pub day_edge: Edge,
    /// `Inclusive` keeps sessions ending exactly now in `past`.
    pub past_edge: Edge,
    pub search_stage: SearchStage,
}

/// Client-side test for a single bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePredicate {
    /// `dateStart` inside the window. A missing start never matches.
    StartsWithin(DateWindow),
    /// `dateEnd` before now. A missing end never matches.
    EndsBefore { now: Instant, edge: Edge },
    Any,
}

impl DatePredicate {
    pub fn matches(&self, session: &Session) -> bool {
        match self {
            DatePredicate::StartsWithin(window) => {
                session.date_start.is_some_and(|d| window.contains(d))
            }
            DatePredicate::EndsBefore { now, edge } => match (session.date_end, edge) {
                (Some(end), Edge::Inclusive) => end <= *now,
                (Some(end), Edge::Exclusive) => end < *now,
                (None, _) => false,
            },
            DatePredicate::Any => true,
        }
    }
}

impl Bucket {
    /// `(dateStart, dateEnd)` to send to the server.
    pub fn query_bounds(self, ranges: &DateRanges) -> (Option<Instant>, Option<Instant>) {
        let window = |w: DateWindow| (Some(w.start), Some(w.end));
        match self {
            Bucket::Today => window(ranges.today),
            Bucket::Tomorrow => window(ranges.tomorrow),
            Bucket::ThisWeek => window(ranges.this_week),
            Bucket::NextWeek => window(ranges.next_week),
            Bucket::ThisMonth => window(ranges.this_month),
            Bucket::Past => (None, Some(ranges.now)),
            Bucket::Unbounded => (None, None),
        }
    }

    pub fn predicate(self, ranges: &DateRanges, policy: &RolePolicy) -> DatePredicate {
        match self {
            Bucket::Today => {
                DatePredicate::StartsWithin(ranges.today.with_end_edge(policy.day_edge))
            }
            Bucket::Tomorrow => {
                DatePredicate::StartsWithin(ranges.tomorrow.with_end_edge(policy.day_edge))
            }
            Bucket::ThisWeek => DatePredicate::StartsWithin(ranges.this_week),
            Bucket::NextWeek => DatePredicate::StartsWithin(ranges.next_week),
            Bucket::ThisMonth => DatePredicate::StartsWithin(ranges.this_month),
            Bucket::Past => DatePredicate::EndsBefore {
                now: ranges.now,
                edge: policy.past_edge,
            },
            Bucket::Unbounded => DatePredicate::Any,
        }
    }
}

/// A role's closed set of filter selections.
pub trait RoleFilter:
    Copy + Eq + fmt::Debug + fmt::Display + FromStr<Err = UnknownFilterError> + 'static
{
    const POLICY: RolePolicy;

    /// Every selection in menu order.
    const ALL: &'static [Self];

    /// The selection applying no date constraint.
    const UNFILTERED: Self;

    fn bucket(self) -> Bucket;

    fn label(self) -> &'static str;

    /// Lenient parse: unknown labels mean "no constraint".
    fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_else(|e: UnknownFilterError| {
            tracing::debug!("{}; treating as unfiltered", e);
            Self::UNFILTERED
        })
    }

    fn is_past(self) -> bool {
        self.bucket() == Bucket::Past
    }
}

fn unknown<F: RoleFilter>(label: &str) -> UnknownFilterError {
    UnknownFilterError {
        role: F::POLICY.role,
        label: label.to_string(),
        expected: F::ALL
            .iter()
            .map(|f| f.label())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeacherFilter {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "tomorrow")]
    Tomorrow,
    #[serde(rename = "nextWeek")]
    NextWeek,
    #[serde(rename = "past")]
    Past,
    #[serde(rename = "all_date")]
    AllDate,
    #[serde(rename = "all_text")]
    AllText,
}

impl RoleFilter for TeacherFilter {
    const POLICY: RolePolicy = RolePolicy {
        role: Role::Teacher,
        day_edge: Edge::Exclusive,
        past_edge: Edge::Inclusive,
        search_stage: SearchStage::AfterDate,
    };

    const ALL: &'static [Self] = &[
        TeacherFilter::Today,
        TeacherFilter::Tomorrow,
        TeacherFilter::NextWeek,
        TeacherFilter::Past,
        TeacherFilter::AllDate,
        TeacherFilter::AllText,
    ];

    const UNFILTERED: Self = TeacherFilter::AllDate;

    fn bucket(self) -> Bucket {
        match self {
            TeacherFilter::Today => Bucket::Today,
            TeacherFilter::Tomorrow => Bucket::Tomorrow,
            TeacherFilter::NextWeek => Bucket::NextWeek,
            TeacherFilter::Past => Bucket::Past,
            // Two menu entries, same meaning.
            TeacherFilter::AllDate | TeacherFilter::AllText => Bucket::Unbounded,
        }
    }

    fn label(self) -> &'static str {
        match self {
            TeacherFilter::Today => "today",
            TeacherFilter::Tomorrow => "tomorrow",
            TeacherFilter::NextWeek => "nextWeek",
            TeacherFilter::Past => "past",
            TeacherFilter::AllDate => "all_date",
            TeacherFilter::AllText => "all_text",
        }
    }
}

impl FromStr for TeacherFilter {
    type Err = UnknownFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.label() == s)
            .ok_or_else(|| unknown::<Self>(s))
    }
}

impl fmt::Display for TeacherFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentFilter {
    All,
    Today,
    Tomorrow,
    Week,
    Month,
    Past,
}

impl RoleFilter for StudentFilter {
    const POLICY: RolePolicy = RolePolicy {
        role: Role::Student,
        day_edge: Edge::Inclusive,
        past_edge: Edge::Exclusive,
        search_stage: SearchStage::BeforeDate,
    };

    const ALL: &'static [Self] = &[
        StudentFilter::All,
        StudentFilter::Today,
        StudentFilter::Tomorrow,
        StudentFilter::Week,
        StudentFilter::Month,
        StudentFilter::Past,
    ];

    const UNFILTERED: Self = StudentFilter::All;

    fn bucket(self) -> Bucket {
        match self {
            StudentFilter::All => Bucket::Unbounded,
            StudentFilter::Today => Bucket::Today,
            StudentFilter::Tomorrow => Bucket::Tomorrow,
            StudentFilter::Week => Bucket::ThisWeek,
            StudentFilter::Month => Bucket::ThisMonth,
            StudentFilter::Past => Bucket::Past,
        }
    }

    fn label(self) -> &'static str {
        match self {
            StudentFilter::All => "all",
            StudentFilter::Today => "today",
            StudentFilter::Tomorrow => "tomorrow",
            StudentFilter::Week => "week",
            StudentFilter::Month => "month",
            StudentFilter::Past => "past",
        }
    }
}

impl FromStr for StudentFilter {
    type Err = UnknownFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.label() == s)
            .ok_or_else(|| unknown::<Self>(s))
    }
}

impl fmt::Display for StudentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
