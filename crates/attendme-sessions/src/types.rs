use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point in time. Every boundary the core computes is normalised to UTC.
pub type Instant = DateTime<Utc>;

/// A scheduled course session as returned by the backend list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_start: Option<Instant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_end: Option<Instant>,
    /// Display fields the core never looks at, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Session {
    /// Sort key used by list views: epoch milliseconds, with a missing start
    /// treated as the epoch itself.
    pub fn start_millis(&self) -> i64 {
        self.date_start.map(|d| d.timestamp_millis()).unwrap_or(0)
    }

    /// True when any of the searchable text fields contains `needle`.
    /// `needle` must already be lower-cased.
    pub fn matches_text(&self, needle: &str) -> bool {
        [
            self.course_name.as_deref(),
            self.course_group_name.as_deref(),
            self.location_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Which edge policy applies to the end of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Inclusive,
    Exclusive,
}

/// A `[start, end]` or `[start, end)` interval of instants.
///
/// The start edge is always inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: Instant,
    pub end: Instant,
    pub end_edge: Edge,
}

impl DateWindow {
    pub fn new(start: Instant, end: Instant, end_edge: Edge) -> Self {
        Self {
            start,
            end,
            end_edge,
        }
    }

    /// Same bounds, different end policy.
    pub fn with_end_edge(self, end_edge: Edge) -> Self {
        Self { end_edge, ..self }
    }

    pub fn contains(&self, t: Instant) -> bool {
        if t < self.start {
            return false;
        }
        match self.end_edge {
            Edge::Inclusive => t <= self.end,
            Edge::Exclusive => t < self.end,
        }
    }
}
