//! Supervisor ecosystem document
//!
//! Maps a [`SuiteManifest`] onto the field names the process supervisor
//! reads. Durations are emitted in milliseconds.

use crate::catalog::DeployHooks;
use crate::compiler::SuiteManifest;
use crate::descriptor::ServiceDescriptor;
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Interpreter setting for every app; scripts are executed directly.
pub const INTERPRETER: &str = "none";

/// Execution mode for every app.
pub const EXEC_MODE: &str = "fork";

/// Output encoding of the ecosystem document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(format!("unknown output format '{other}' (expected json or yaml)")),
        }
    }
}

/// One supervisor app entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pm2App {
    pub name: String,
    pub cwd: PathBuf,
    pub script: String,
    pub args: Vec<String>,
    pub interpreter: &'static str,
    pub version: String,
    pub env: BTreeMap<String, String>,
    pub instances: u32,
    pub exec_mode: &'static str,
    pub autorestart: bool,
    pub watch: bool,
    pub max_memory_restart: String,
    pub max_restarts: u32,
    pub min_uptime: u64,
    pub restart_delay: u64,
    pub kill_timeout: u64,
    pub error_file: PathBuf,
    pub out_file: PathBuf,
    pub log_file: PathBuf,
    pub merge_logs: bool,
    pub time: bool,
    pub log_date_format: String,
}

impl From<&ServiceDescriptor> for Pm2App {
    fn from(d: &ServiceDescriptor) -> Self {
        Self {
            name: d.name.clone(),
            cwd: d.cwd.clone(),
            script: d.script.clone(),
            args: d.args.clone(),
            interpreter: INTERPRETER,
            version: d.version.clone(),
            env: d.env.clone(),
            instances: d.resources.instances,
            exec_mode: EXEC_MODE,
            autorestart: d.restart.autorestart,
            watch: false,
            max_memory_restart: d.resources.max_memory_restart.clone(),
            max_restarts: d.restart.max_restarts,
            min_uptime: d.restart.min_uptime_ms,
            restart_delay: d.restart.restart_delay_ms,
            kill_timeout: d.restart.kill_timeout_ms,
            error_file: d.logs.error_file.clone(),
            out_file: d.logs.out_file.clone(),
            log_file: d.logs.combined_file.clone(),
            merge_logs: d.logs.merge_logs,
            time: d.logs.timestamps,
            log_date_format: d.logs.date_format.clone(),
        }
    }
}

/// The complete document handed to the supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EcosystemFile {
    pub apps: Vec<Pm2App>,
    #[serde(skip_serializing_if = "DeployHooks::is_empty")]
    pub deploy: DeployHooks,
}

impl EcosystemFile {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Render {
            format: OutputFormat::Json.to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Render {
            format: OutputFormat::Yaml.to_string(),
            message: e.to_string(),
        })
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => self.to_json(),
            OutputFormat::Yaml => self.to_yaml(),
        }
    }
}

impl From<&SuiteManifest> for EcosystemFile {
    fn from(manifest: &SuiteManifest) -> Self {
        Self {
            apps: manifest.apps.iter().map(Pm2App::from).collect(),
            deploy: manifest.deploy.clone(),
        }
    }
}
