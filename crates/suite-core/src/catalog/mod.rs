//! The service catalog
//!
//! A catalog is plain data: an ordered list of [`ServiceSpec`]s plus an
//! opaque deployment-hooks block. The built-in catalog is embedded TOML; an
//! operator may point the compiler at another file with the same shape.
//!
//! ```toml
//! [[service]]
//! name = "automagik-omni"
//! directory = "automagik-omni"
//! ecosystem = "python"
//!
//! [service.command]
//! script = ".venv/bin/uvicorn"
//! args = ["src.api.app:app", "--port", "${AUTOMAGIK_OMNI_API_PORT}"]
//!
//! [[service.env]]
//! key = "AUTOMAGIK_OMNI_API_PORT"
//! default = "8882"
//!
//! [deploy.production]
//! post-deploy = "pm2 reload ecosystem.config.js --env production"
//! ```
//!
//! Catalog order is startup order.

mod spec;

pub use spec::{
    CommandTemplate, EnvDefault, LOG_DATE_FORMAT, LogPolicy, ResourceLimits, RestartPolicy,
    ServiceSpec,
};

use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

const BUILTIN_CATALOG: &str = include_str!("../../catalog/automagik.toml");

static MEMORY_SIZE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+[KMG]$").unwrap());

/// Deployment hooks keyed by environment, then hook name.
///
/// Passed through to the supervisor verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeployHooks(pub BTreeMap<String, BTreeMap<String, String>>);

impl DeployHooks {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hooks for one deployment environment.
    pub fn environment(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.0.get(name)
    }
}

/// Ordered list of services and the deploy block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    #[serde(default, rename = "service")]
    pub services: Vec<ServiceSpec>,

    #[serde(default)]
    pub deploy: DeployHooks,
}

impl Catalog {
    /// The catalog shipped with the compiler.
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_CATALOG, "<builtin>")
    }

    /// Read and validate a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let catalog = Self::parse(&content, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), services = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Parse and validate catalog TOML. `origin` only labels errors.
    pub fn parse(content: &str, origin: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(content).map_err(|e| Error::CatalogParse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Build from specs already in memory.
    pub fn from_specs(services: Vec<ServiceSpec>, deploy: DeployHooks) -> Result<Self> {
        let catalog = Self { services, deploy };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject catalogs that cannot yield a complete suite.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for spec in &self.services {
            if spec.name.trim().is_empty() {
                return Err(Error::invalid("<unnamed>", "service name is empty"));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(Error::DuplicateService {
                    name: spec.name.clone(),
                });
            }
            validate_spec(spec)?;
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ServiceSpec> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Like [`get`](Self::get), but a missing service is an error.
    pub fn spec(&self, name: &str) -> Result<&ServiceSpec> {
        self.get(name).ok_or_else(|| Error::UnknownService {
            name: name.to_string(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.services.iter().map(|s| s.name.as_str())
    }
}

fn validate_spec(spec: &ServiceSpec) -> Result<()> {
    let name = spec.name.as_str();

    if spec.directory.trim().is_empty() {
        return Err(Error::invalid(name, "directory is empty"));
    }
    if Path::new(&spec.directory).is_absolute() {
        return Err(Error::invalid(
            name,
            format!("directory '{}' must be relative to the install root", spec.directory),
        ));
    }
    if spec.command.script.trim().is_empty() {
        return Err(Error::invalid(name, "command script is empty"));
    }
    if !MEMORY_SIZE.is_match(&spec.resources.max_memory_restart) {
        return Err(Error::invalid(
            name,
            format!(
                "max_memory_restart '{}' must look like 512M or 1G",
                spec.resources.max_memory_restart
            ),
        ));
    }
    if spec.resources.instances == 0 {
        return Err(Error::invalid(name, "instances must be at least 1"));
    }

    let mut keys = HashSet::new();
    for entry in &spec.env {
        if entry.key.trim().is_empty() {
            return Err(Error::invalid(name, "env entry with empty key"));
        }
        if !keys.insert(entry.key.as_str()) {
            return Err(Error::invalid(
                name,
                format!("env key '{}' declared twice", entry.key),
            ));
        }
    }

    for (label, path) in [
        ("error_file", &spec.logs.error_file),
        ("out_file", &spec.logs.out_file),
        ("combined_file", &spec.logs.combined_file),
    ] {
        if path.trim().is_empty() || Path::new(path).is_absolute() {
            return Err(Error::invalid(
                name,
                format!("{label} must be a non-empty relative path"),
            ));
        }
    }

    Ok(())
}
