use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::parser::parse_sessions;
use crate::query::{PageSize, ServerQueryDescriptor, SessionListFilters};
use crate::types::Session;

/// Anything that can answer a session list query.
pub trait SessionSource {
    fn fetch(&self, query: &ServerQueryDescriptor) -> Result<Vec<Session>>;
}

/// Provides access to a JSONL session export on disk, answering queries
/// the way the backend list endpoint does.
pub struct SessionStore {
    sessions_file: PathBuf,
}

impl SessionStore {
    /// Create a new SessionStore using the default sessions file.
    pub fn new() -> Result<Self> {
        let data_dir = dirs::data_dir().with_context(|| "Could not determine data directory")?;
        let sessions_file = data_dir.join("attendme").join("sessions.jsonl");
        Ok(Self { sessions_file })
    }

    /// Create a SessionStore over a specific file.
    pub fn with_file(sessions_file: PathBuf) -> Self {
        Self { sessions_file }
    }

    /// Every session in the file, in file order. A missing file is empty.
    pub fn load_all(&self) -> Result<Vec<Session>> {
        if !self.sessions_file.exists() {
            return Ok(Vec::new());
        }
        parse_sessions(&self.sessions_file)
    }

    fn matches_filters(session: &Session, filters: &SessionListFilters) -> bool {
        if let Some(ref search) = filters.search {
            let search_lower = search.trim().to_lowercase();
            if !search_lower.is_empty() && !session.matches_text(&search_lower) {
                return false;
            }
        }

        if let Some(after) = filters.date_start {
            match session.date_start {
                Some(start) if start >= after => {}
                _ => return false,
            }
        }

        if let Some(before) = filters.date_end {
            match session.date_start {
                Some(start) if start <= before => {}
                _ => return false,
            }
        }

        true
    }
}

impl SessionSource for SessionStore {
    fn fetch(&self, query: &ServerQueryDescriptor) -> Result<Vec<Session>> {
        let mut sessions = self.load_all()?;

        if let Some(ref filters) = query.filters {
            sessions.retain(|s| Self::matches_filters(s, filters));
        }

        sessions.sort_by_key(Session::start_millis);

        let page = match query.page_size {
            PageSize::Unpaged => sessions,
            PageSize::Limited(size) => {
                let size = size as usize;
                let skip = (query.page_number.max(1) as usize - 1).saturating_mul(size);
                sessions.into_iter().skip(skip).take(size).collect()
            }
        };

        tracing::debug!(
            file = ?self.sessions_file,
            returned = page.len(),
            "Answered session list query"
        );

        Ok(page)
    }
}
