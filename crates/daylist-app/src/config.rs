use std::{fs, path::Path};

use anyhow::{Context, Result};
use daylist_core::{Filter, Priority, SortOrder, ViewQuery};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::debug;

/// File name of the configuration inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration loaded from `<data-dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
}

impl AppConfig {
    /// Load configuration from a data directory; a missing file yields defaults.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let config_path = dir.as_ref().join(CONFIG_FILE);
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        Self::parse(&contents).with_context(|| format!("failed to parse {}", config_path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Initial view parameters and the day-boundary policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    #[serde(default)]
    pub filter: Filter,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default)]
    pub clock: ClockPolicy,
}

impl ViewConfig {
    /// View parameters a fresh session starts with.
    pub fn initial_query(&self) -> ViewQuery {
        ViewQuery {
            filter: self.filter,
            search: String::new(),
            sort: self.sort,
        }
    }
}

/// Defaults applied when creating tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TasksConfig {
    #[serde(default)]
    pub default_priority: Priority,
    #[serde(default = "default_seed_samples")]
    pub seed_samples: bool,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            default_priority: Priority::default(),
            seed_samples: default_seed_samples(),
        }
    }
}

const fn default_seed_samples() -> bool {
    true
}

/// Which calendar day "today" refers to when checking due dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockPolicy {
    /// The local calendar day; falls back to UTC when the offset is unknown.
    #[default]
    Local,
    /// The UTC calendar day.
    Utc,
}

impl ClockPolicy {
    /// Current instant, expressed in the offset this policy selects.
    pub fn now(self) -> OffsetDateTime {
        match self {
            Self::Local => OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()),
            Self::Utc => OffsetDateTime::now_utc(),
        }
    }
}
