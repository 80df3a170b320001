//! Static, author-supplied service specifications

use serde::{Deserialize, Serialize};
use suite_version::Ecosystem;

fn default_true() -> bool {
    true
}

fn default_max_restarts() -> u32 {
    10
}

fn default_min_uptime_ms() -> u64 {
    10_000
}

fn default_restart_delay_ms() -> u64 {
    1_000
}

fn default_kill_timeout_ms() -> u64 {
    5_000
}

fn default_max_memory() -> String {
    "1G".to_string()
}

fn default_instances() -> u32 {
    1
}

fn default_error_file() -> String {
    "logs/err.log".to_string()
}

fn default_out_file() -> String {
    "logs/out.log".to_string()
}

fn default_combined_file() -> String {
    "logs/combined.log".to_string()
}

/// Timestamp format the supervisor prefixes log lines with.
pub const LOG_DATE_FORMAT: &str = "YYYY-MM-DD HH:mm:ss Z";

fn default_date_format() -> String {
    LOG_DATE_FORMAT.to_string()
}

/// One service in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSpec {
    /// Unique identifier, also the supervisor process name
    pub name: String,

    /// Project directory relative to the install root
    pub directory: String,

    /// Which version sources apply to the project
    pub ecosystem: Ecosystem,

    pub command: CommandTemplate,

    /// Default environment entries, in declaration order
    #[serde(default)]
    pub env: Vec<EnvDefault>,

    #[serde(default)]
    pub restart: RestartPolicy,

    #[serde(default)]
    pub resources: ResourceLimits,

    #[serde(default)]
    pub logs: LogPolicy,
}

/// Executable and argument templates.
///
/// Both may reference `${NAME}` placeholders: any key of the final
/// environment, or one of `INSTALL_ROOT`, `SERVICE_DIR`, `SERVICE_NAME`.
/// A relative `script` containing a path separator is taken relative to the
/// service directory; a bare name is left for `PATH` lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandTemplate {
    pub script: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// A default environment entry with an explicit overlay association.
///
/// The value is the first non-empty overlay value among `from` (or `key`
/// itself when `from` is empty), else `default`. Listing older variable
/// names in `from` keeps renamed overlay keys working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvDefault {
    pub key: String,
    #[serde(default)]
    pub from: Vec<String>,
    pub default: String,
}

impl EnvDefault {
    pub fn new(key: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            from: Vec::new(),
            default: default.into(),
        }
    }

    /// Read the value from these overlay keys instead of `key`.
    pub fn from_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.from = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Overlay keys consulted, in priority order.
    pub fn sources(&self) -> Vec<&str> {
        if self.from.is_empty() {
            vec![self.key.as_str()]
        } else {
            self.from.iter().map(String::as_str).collect()
        }
    }
}

/// Supervisor restart behaviour, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestartPolicy {
    #[serde(default = "default_true")]
    pub autorestart: bool,

    #[serde(default = "default_max_restarts")]
    pub max_restarts: u32,

    /// Uptime after which a crash no longer counts against `max_restarts`
    #[serde(default = "default_min_uptime_ms")]
    pub min_uptime_ms: u64,

    #[serde(default = "default_restart_delay_ms")]
    pub restart_delay_ms: u64,

    /// Grace period between SIGINT and SIGKILL
    #[serde(default = "default_kill_timeout_ms")]
    pub kill_timeout_ms: u64,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            autorestart: default_true(),
            max_restarts: default_max_restarts(),
            min_uptime_ms: default_min_uptime_ms(),
            restart_delay_ms: default_restart_delay_ms(),
            kill_timeout_ms: default_kill_timeout_ms(),
        }
    }
}

/// Resource ceilings, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceLimits {
    /// Memory ceiling that triggers a restart, e.g. `512M` or `1G`
    #[serde(default = "default_max_memory")]
    pub max_memory_restart: String,

    #[serde(default = "default_instances")]
    pub instances: u32,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_memory_restart: default_max_memory(),
            instances: default_instances(),
        }
    }
}

/// Log file templates, relative to the service directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogPolicy {
    #[serde(default = "default_error_file")]
    pub error_file: String,

    #[serde(default = "default_out_file")]
    pub out_file: String,

    #[serde(default = "default_combined_file")]
    pub combined_file: String,

    #[serde(default = "default_true")]
    pub merge_logs: bool,

    #[serde(default = "default_true")]
    pub timestamps: bool,

    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for LogPolicy {
    fn default() -> Self {
        Self {
            error_file: default_error_file(),
            out_file: default_out_file(),
            combined_file: default_combined_file(),
            merge_logs: default_true(),
            timestamps: default_true(),
            date_format: default_date_format(),
        }
    }
}
