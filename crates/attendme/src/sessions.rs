use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::{Args, Subcommand, ValueEnum};
use colored::Colorize;

use attendme_sessions::{
    build_query_at, filter_sessions_at, Clock, DateRanges, FixedClock, Role, RoleFilter, Session,
    SessionSource, SessionStatus, SessionStore, StudentFilter, SystemClock, TeacherFilter,
};

use crate::config::ProjectConfig;
use crate::display::{format_date_only, format_date_time, format_time_only};

#[derive(Subcommand, Debug)]
pub enum SessionsAction {
    /// List sessions for a role, narrowed to a calendar window
    List {
        #[command(flatten)]
        selection: SelectionArgs,

        /// JSONL session export (default: from config, then the data directory)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Ask the store with a server query instead of filtering locally
        #[arg(long)]
        server: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the server query a selection would send
    Query {
        #[command(flatten)]
        selection: SelectionArgs,
    },
}

#[derive(Args, Debug)]
pub struct SelectionArgs {
    /// Role whose filter menu applies (default: from config)
    #[arg(short, long, value_enum)]
    role: Option<RoleChoice>,

    /// Filter label, e.g. today, tomorrow, nextWeek, week, month, past, all
    #[arg(short, long)]
    filter: Option<String>,

    /// Search course, group and location names
    #[arg(short, long, default_value = "")]
    search: String,

    /// Evaluate windows at this RFC 3339 instant instead of the wall clock
    #[arg(long)]
    now: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleChoice {
    Teacher,
    Student,
}

impl From<RoleChoice> for Role {
    fn from(choice: RoleChoice) -> Self {
        match choice {
            RoleChoice::Teacher => Role::Teacher,
            RoleChoice::Student => Role::Student,
        }
    }
}

pub fn handle_sessions_command(action: SessionsAction, config: &ProjectConfig) -> Result<()> {
    match action {
        SessionsAction::List {
            selection,
            file,
            server,
            json,
        } => {
            let store = match file.or_else(|| config.sessions_file.clone()) {
                Some(path) => SessionStore::with_file(path),
                None => SessionStore::new()?,
            };
            let request = ListRequest {
                store: &store,
                config,
                server,
                json,
            };
            with_clock(&selection, |clock| request.run(clock, &selection))
        }
        SessionsAction::Query { selection } => {
            with_clock(&selection, |clock| print_query(clock, &selection, config))
        }
    }
}

/// Run `f` with the clock the arguments ask for.
fn with_clock<T>(
    selection: &SelectionArgs,
    f: impl FnOnce(&dyn ClockReading) -> Result<T>,
) -> Result<T> {
    match selection.now {
        Some(ref now) => {
            let now = DateTime::parse_from_rfc3339(now)
                .with_context(|| format!("Invalid --now instant: {}", now))?;
            f(&FixedClock::new(now))
        }
        None => f(&SystemClock),
    }
}

/// Object-safe view of a [`Clock`]: one snapshot of the calendar.
trait ClockReading {
    fn ranges(&self) -> DateRanges;
}

impl<C: Clock> ClockReading for C {
    fn ranges(&self) -> DateRanges {
        DateRanges::at(&self.now())
    }
}

fn resolve_role(selection: &SelectionArgs, config: &ProjectConfig) -> Result<Role> {
    selection
        .role
        .map(Role::from)
        .or(config.role)
        .with_context(|| "No role given: pass --role or set `role` in attendme.toml")
}

/// Pick the filter. Priority: --filter > [role].filter > interactive picker > unfiltered
///
/// Unknown labels from either source fall through to the unfiltered selection.
fn resolve_filter<F: RoleFilter>(
    selection: &SelectionArgs,
    config: &ProjectConfig,
) -> Result<F> {
    if let Some(ref label) = selection.filter {
        return Ok(label.parse::<F>().unwrap_or_else(|e| {
            tracing::warn!("{}; listing without a date filter", e);
            F::UNFILTERED
        }));
    }

    if let Some(label) = config.role_filter(F::POLICY.role) {
        return Ok(F::from_label(label));
    }

    if !std::io::stdin().is_terminal() {
        return Ok(F::UNFILTERED);
    }

    let items: Vec<&str> = F::ALL.iter().map(|f| f.label()).collect();
    let index = dialoguer::FuzzySelect::new()
        .with_prompt(format!("Select a {} filter", F::POLICY.role))
        .items(&items)
        .default(0)
        .interact()?;

    Ok(F::ALL[index])
}

struct ListRequest<'a> {
    store: &'a SessionStore,
    config: &'a ProjectConfig,
    server: bool,
    json: bool,
}

impl ListRequest<'_> {
    fn run(&self, clock: &dyn ClockReading, selection: &SelectionArgs) -> Result<()> {
        let ranges = clock.ranges();
        let sessions = match resolve_role(selection, self.config)? {
            Role::Teacher => {
                let filter = resolve_filter::<TeacherFilter>(selection, self.config)?;
                self.fetch(&ranges, filter, &selection.search)?
            }
            Role::Student => {
                let filter = resolve_filter::<StudentFilter>(selection, self.config)?;
                self.fetch(&ranges, filter, &selection.search)?
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        } else if sessions.is_empty() {
            println!("{}", "No sessions found.".dimmed());
        } else {
            print_sessions_table(&sessions, &ranges);
        }

        Ok(())
    }

    fn fetch<F: RoleFilter>(
        &self,
        ranges: &DateRanges,
        filter: F,
        search: &str,
    ) -> Result<Vec<Session>> {
        if self.server {
            let query =
                build_query_at(ranges, filter, search).with_page_size(self.config.page_size());
            self.store.fetch(&query)
        } else {
            let all = self.store.load_all()?;
            Ok(filter_sessions_at(ranges, &all, filter, search))
        }
    }
}

fn print_query(
    clock: &dyn ClockReading,
    selection: &SelectionArgs,
    config: &ProjectConfig,
) -> Result<()> {
    let ranges = clock.ranges();
    let query = match resolve_role(selection, config)? {
        Role::Teacher => {
            let filter = resolve_filter::<TeacherFilter>(selection, config)?;
            build_query_at(&ranges, filter, &selection.search)
        }
        Role::Student => {
            let filter = resolve_filter::<StudentFilter>(selection, config)?;
            build_query_at(&ranges, filter, &selection.search)
        }
    }
    .with_page_size(config.page_size());

    println!("{}", serde_json::to_string_pretty(&query)?);
    Ok(())
}

fn print_sessions_table(sessions: &[Session], ranges: &DateRanges) {
    println!(
        "{} {}",
        "As of".dimmed(),
        format_date_time(Some(ranges.now))
    );
    println!(
        "{:<12} {:<13} {:<12} {:<28} {:<12} {}",
        "DATE".dimmed(),
        "TIME".dimmed(),
        "STATUS".dimmed(),
        "COURSE".dimmed(),
        "GROUP".dimmed(),
        "LOCATION".dimmed(),
    );

    for s in sessions {
        let status = SessionStatus::of(s, ranges.now);
        let status_colored = match status {
            SessionStatus::Active => status.label().bright_green().to_string(),
            SessionStatus::Upcoming => status.label().bright_cyan().to_string(),
            SessionStatus::Past => status.label().dimmed().to_string(),
            SessionStatus::Unscheduled => status.label().bright_yellow().to_string(),
        };
        let time = format!(
            "{}-{}",
            format_time_only(s.date_start),
            format_time_only(s.date_end)
        );
        let course = truncate(s.course_name.as_deref().unwrap_or("-"), 28);

        println!(
            "{:<12} {:<13} {:<12} {:<28} {:<12} {}",
            format_date_only(s.date_start),
            time,
            status_colored,
            course,
            s.course_group_name.as_deref().unwrap_or("-"),
            s.location_name.as_deref().unwrap_or("-"),
        );
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
