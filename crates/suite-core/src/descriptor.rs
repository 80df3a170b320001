//! Fully resolved launch units

use crate::catalog::{ResourceLimits, RestartPolicy};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Everything the supervisor needs to launch one service.
///
/// Built once per service per compilation and handed off whole. Nothing in
/// it refers back to the overlay, the catalog, or the process environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    pub name: String,

    /// Absolute working directory
    pub cwd: PathBuf,

    /// Executable: absolute when the template named a path, bare otherwise
    pub script: String,

    /// Arguments with every placeholder substituted
    pub args: Vec<String>,

    pub version: String,

    pub env: BTreeMap<String, String>,

    pub restart: RestartPolicy,

    pub resources: ResourceLimits,

    pub logs: LogFiles,
}

impl ServiceDescriptor {
    /// Executable followed by its arguments, space separated.
    pub fn command_line(&self) -> String {
        std::iter::once(self.script.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Absolute log destinations and formatting flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogFiles {
    pub error_file: PathBuf,
    pub out_file: PathBuf,
    pub combined_file: PathBuf,
    pub merge_logs: bool,
    pub timestamps: bool,
    pub date_format: String,
}
