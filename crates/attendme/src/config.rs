//! Project configuration file support for attendme.
//!
//! Loads configuration from `attendme.toml` in the working directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use attendme_logging::LogFormat;
use attendme_sessions::{PageSize, Role};

/// Project-level configuration loaded from `attendme.toml`
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Role used when `--role` is not given
    pub role: Option<Role>,
    /// JSONL session export to read
    pub sessions_file: Option<PathBuf>,
    /// Default tracing level (e.g. "info", "attendme_sessions=debug")
    pub log_level: Option<String>,
    /// Default log format
    pub log_format: Option<LogFormat>,
    /// Page size for server queries; omit to fetch everything
    pub page_size: Option<u32>,
    /// Teacher-specific configuration
    #[serde(default)]
    pub teacher: RoleConfig,
    /// Student-specific configuration
    #[serde(default)]
    pub student: RoleConfig,
}

/// Configuration for a specific role (teacher or student)
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RoleConfig {
    /// Filter label selected when `--filter` is not given
    pub filter: Option<String>,
}

/// The config file name
pub const CONFIG_FILE_NAME: &str = "attendme.toml";

impl ProjectConfig {
    /// Load configuration from the working directory.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(working_dir: &Path) -> Result<Option<Self>> {
        let config_path = working_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(None);
        }

        Self::load_file(&config_path).map(Some)
    }

    /// Load configuration from an explicit path. A missing file is an error.
    pub fn load_file(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(config)
    }

    /// Configured default filter label for a role.
    pub fn role_filter(&self, role: Role) -> Option<&str> {
        match role {
            Role::Teacher => self.teacher.filter.as_deref(),
            Role::Student => self.student.filter.as_deref(),
        }
    }

    /// Effective page size. Priority: page_size > unpaged
    pub fn page_size(&self) -> PageSize {
        self.page_size.map(PageSize::from).unwrap_or_default()
    }

    /// Effective log level. Priority: CLI flag > log_level > "warn"
    pub fn log_level<'a>(&'a self, cli: Option<&'a str>) -> &'a str {
        cli.or(self.log_level.as_deref()).unwrap_or("warn")
    }
}
