use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use crate::types::Session;

/// Parse a JSONL file with one session per line.
///
/// Blank lines are skipped. A line that fails to parse is logged and
/// skipped so one bad record does not hide the rest of the list.
pub fn parse_sessions(path: &Path) -> Result<Vec<Session>> {
    let file = File::open(path).with_context(|| format!("Failed to open sessions file: {:?}", path))?;
    let reader = BufReader::new(file);

    let mut sessions = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| "Failed to read line from sessions file")?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Session>(&line) {
            Ok(session) => sessions.push(session),
            Err(e) => {
                tracing::warn!(
                    "Skipping line {} of {:?}: {} ({})",
                    index + 1,
                    path,
                    e,
                    preview(&line)
                );
            }
        }
    }

    Ok(sessions)
}

fn preview(line: &str) -> &str {
    match line.char_indices().nth(100) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}
