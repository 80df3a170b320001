//! Descriptor assembly
//!
//! Environment layers, lowest to highest precedence:
//!
//! 1. The service's declared defaults, each resolved against its own overlay keys
//! 2. The whole overlay
//! 3. Values the builder injects (`NODE_ENV`, and `PYTHONPATH` for Python)
//!
//! Layer 3 always wins, so a stray overlay entry cannot take a service out
//! of production mode.

use crate::catalog::ServiceSpec;
use crate::descriptor::{LogFiles, ServiceDescriptor};
use crate::overlay::EnvOverlay;
use crate::{Error, Result};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use suite_version::Ecosystem;

/// Runtime-mode variable forced on every service.
pub const RUNTIME_MODE_KEY: &str = "NODE_ENV";
pub const RUNTIME_MODE: &str = "production";

/// Module search path injected for Python services.
pub const PYTHONPATH_KEY: &str = "PYTHONPATH";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Assembles descriptors for one install root and overlay.
///
/// Performs no I/O; versions are resolved by the caller.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorBuilder<'a> {
    install_root: &'a Path,
    overlay: &'a EnvOverlay,
}

impl<'a> DescriptorBuilder<'a> {
    /// Fails if `install_root` is relative; descriptors must not depend on
    /// the supervisor's working directory.
    pub fn new(install_root: &'a Path, overlay: &'a EnvOverlay) -> Result<Self> {
        if !install_root.is_absolute() {
            return Err(Error::RelativeInstallRoot {
                path: install_root.to_path_buf(),
            });
        }
        Ok(Self {
            install_root,
            overlay,
        })
    }

    pub fn install_root(&self) -> &Path {
        self.install_root
    }

    /// Absolute project directory for a spec.
    pub fn service_dir(&self, spec: &ServiceSpec) -> PathBuf {
        self.install_root.join(&spec.directory)
    }

    /// Build the descriptor for `spec` with an already resolved version.
    pub fn build(&self, spec: &ServiceSpec, version: &str) -> Result<ServiceDescriptor> {
        let cwd = self.service_dir(spec);
        let env = self.merge_env(spec, &cwd);

        let script = self.substitute(spec, "script", &spec.command.script, &cwd, &env)?;
        if script.trim().is_empty() {
            return Err(Error::invalid(&spec.name, "command script resolved to nothing"));
        }
        let script = absolutize_script(&cwd, script);

        let args = spec
            .command
            .args
            .iter()
            .map(|arg| self.substitute(spec, "args", arg, &cwd, &env))
            .collect::<Result<Vec<_>>>()?;

        let logs = LogFiles {
            error_file: cwd.join(&spec.logs.error_file),
            out_file: cwd.join(&spec.logs.out_file),
            combined_file: cwd.join(&spec.logs.combined_file),
            merge_logs: spec.logs.merge_logs,
            timestamps: spec.logs.timestamps,
            date_format: spec.logs.date_format.clone(),
        };

        tracing::debug!(service = %spec.name, version, "Built descriptor");

        Ok(ServiceDescriptor {
            name: spec.name.clone(),
            cwd,
            script,
            args,
            version: version.to_string(),
            env,
            restart: spec.restart.clone(),
            resources: spec.resources.clone(),
            logs,
        })
    }

    fn merge_env(&self, spec: &ServiceSpec, cwd: &Path) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();

        for entry in &spec.env {
            let value = entry
                .sources()
                .into_iter()
                .find_map(|key| self.overlay.get(key).filter(|v| !v.is_empty()))
                .unwrap_or(entry.default.as_str());
            env.insert(entry.key.clone(), value.to_string());
        }

        for (key, value) in self.overlay.iter() {
            env.insert(key.to_string(), value.to_string());
        }

        for (key, value) in injected(spec, cwd) {
            if let Some(previous) = env.insert(key.to_string(), value.clone()) {
                if previous != value {
                    tracing::debug!(service = %spec.name, key, "Overriding overlay value");
                }
            }
        }

        env
    }

    fn substitute(
        &self,
        spec: &ServiceSpec,
        field: &str,
        template: &str,
        cwd: &Path,
        env: &BTreeMap<String, String>,
    ) -> Result<String> {
        if let Some(malformed) = malformed_placeholder(template) {
            return Err(Error::UnresolvedPlaceholder {
                service: spec.name.clone(),
                field: field.to_string(),
                placeholder: malformed.to_string(),
            });
        }

        let mut missing = None;
        let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            let value = match name {
                "INSTALL_ROOT" => Some(self.install_root.display().to_string()),
                "SERVICE_DIR" => Some(cwd.display().to_string()),
                "SERVICE_NAME" => Some(spec.name.clone()),
                _ => env.get(name).cloned(),
            };
            value.unwrap_or_else(|| {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            })
        });

        if let Some(placeholder) = missing {
            return Err(Error::UnresolvedPlaceholder {
                service: spec.name.clone(),
                field: field.to_string(),
                placeholder,
            });
        }
        Ok(rendered.into_owned())
    }
}

/// The first `${` in `template` that does not open a well-formed placeholder.
///
/// Only the template is checked; substituted values are literal.
fn malformed_placeholder(template: &str) -> Option<&str> {
    let starts: Vec<usize> = PLACEHOLDER.find_iter(template).map(|m| m.start()).collect();
    template
        .match_indices("${")
        .map(|(at, _)| at)
        .find(|at| !starts.contains(at))
        .map(|at| &template[at..])
}

fn injected(spec: &ServiceSpec, cwd: &Path) -> Vec<(&'static str, String)> {
    let mut values = vec![(RUNTIME_MODE_KEY, RUNTIME_MODE.to_string())];
    if spec.ecosystem == Ecosystem::Python {
        values.push((PYTHONPATH_KEY, cwd.display().to_string()));
    }
    values
}

/// Scripts given as relative paths are anchored at the service directory;
/// bare program names stay as they are.
fn absolutize_script(cwd: &Path, script: String) -> String {
    let path = Path::new(&script);
    if path.is_absolute() || path.components().count() < 2 {
        return script;
    }
    cwd.join(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CommandTemplate, EnvDefault, LogPolicy, ResourceLimits, RestartPolicy};
    use pretty_assertions::assert_eq;

    fn root() -> PathBuf {
        if cfg!(windows) {
            PathBuf::from(r"C:\opt\automagik")
        } else {
            PathBuf::from("/opt/automagik")
        }
    }

    fn spark_api() -> ServiceSpec {
        ServiceSpec {
            name: "automagik-spark-api".to_string(),
            directory: "automagik-spark".to_string(),
            ecosystem: Ecosystem::Python,
            command: CommandTemplate {
                script: ".venv/bin/uvicorn".to_string(),
                args: vec![
                    "automagik_spark.api.app:app".to_string(),
                    "--port".to_string(),
                    "${AUTOMAGIK_SPARK_API_PORT}".to_string(),
                ],
            },
            env: vec![
                EnvDefault::new("AUTOMAGIK_SPARK_API_PORT", "8883"),
                EnvDefault::new("AUTOMAGIK_SPARK_API_KEY", "namastex888"),
            ],
            restart: RestartPolicy::default(),
            resources: ResourceLimits::default(),
            logs: LogPolicy {
                error_file: "logs/api-err.log".to_string(),
                ..LogPolicy::default()
            },
        }
    }

    #[test]
    fn defaults_used_without_overlay() {
        let root = root();
        let overlay = EnvOverlay::empty();
        let builder = DescriptorBuilder::new(&root, &overlay).unwrap();

        let d = builder.build(&spark_api(), "1.2.3").unwrap();

        assert_eq!(d.env["AUTOMAGIK_SPARK_API_PORT"], "8883");
        assert_eq!(d.args.last().map(String::as_str), Some("8883"));
        assert_eq!(d.version, "1.2.3");
    }

    #[test]
    fn overlay_port_reaches_command() {
        let root = root();
        let overlay = EnvOverlay::parse("AUTOMAGIK_SPARK_API_PORT=9000\n");
        let builder = DescriptorBuilder::new(&root, &overlay).unwrap();

        let d = builder.build(&spark_api(), "1.2.3").unwrap();

        assert_eq!(d.env["AUTOMAGIK_SPARK_API_PORT"], "9000");
        assert!(d.command_line().contains("--port 9000"));
    }

    #[test]
    fn whole_overlay_is_exported() {
        let root = root();
        let overlay = EnvOverlay::parse("DATABASE_URL=postgres://db\n");
        let builder = DescriptorBuilder::new(&root, &overlay).unwrap();

        let d = builder.build(&spark_api(), "x").unwrap();
        assert_eq!(d.env["DATABASE_URL"], "postgres://db");
    }

    #[test]
    fn injected_values_beat_overlay() {
        let root = root();
        let overlay = EnvOverlay::parse("NODE_ENV=development\nPYTHONPATH=/elsewhere\n");
        let builder = DescriptorBuilder::new(&root, &overlay).unwrap();

        let d = builder.build(&spark_api(), "x").unwrap();

        assert_eq!(d.env[RUNTIME_MODE_KEY], RUNTIME_MODE);
        assert_eq!(
            d.env[PYTHONPATH_KEY],
            root.join("automagik-spark").display().to_string()
        );
    }

    #[test]
    fn node_services_get_no_pythonpath() {
        let root = root();
        let overlay = EnvOverlay::empty();
        let builder = DescriptorBuilder::new(&root, &overlay).unwrap();
        let mut spec = spark_api();
        spec.ecosystem = Ecosystem::Node;

        let d = builder.build(&spec, "x").unwrap();
        assert!(!d.env.contains_key(PYTHONPATH_KEY));
        assert_eq!(d.env[RUNTIME_MODE_KEY], RUNTIME_MODE);
    }

    #[test]
    fn aliased_default_reads_declared_key() {
        let root = root();
        let overlay = EnvOverlay::parse("AUTOMAGIK_UI_PORT=3000\n");
        let builder = DescriptorBuilder::new(&root, &overlay).unwrap();
        let mut spec = spark_api();
        spec.env = vec![EnvDefault::new("PORT", "8888").from_keys(["AUTOMAGIK_UI_PORT"])];
        spec.command.args = vec!["--port".to_string(), "${PORT}".to_string()];

        let d = builder.build(&spec, "x").unwrap();
        assert_eq!(d.env["PORT"], "3000");
        assert_eq!(d.args, vec!["--port", "3000"]);
    }

    #[test]
    fn alias_order_is_priority_order() {
        let root = root();
        let overlay = EnvOverlay::parse("OLD_PORT=1\nNEW_PORT=2\n");
        let builder = DescriptorBuilder::new(&root, &overlay).unwrap();
        let mut spec = spark_api();
        spec.env = vec![EnvDefault::new("PORT", "0").from_keys(["NEW_PORT", "OLD_PORT"])];

        let d = builder.build(&spec, "x").unwrap();
        assert_eq!(d.env["PORT"], "2");
    }

    #[test]
    fn paths_are_absolute() {
        let root = root();
        let overlay = EnvOverlay::empty();
        let builder = DescriptorBuilder::new(&root, &overlay).unwrap();

        let d = builder.build(&spark_api(), "x").unwrap();

        assert!(d.cwd.is_absolute());
        assert_eq!(d.cwd, root.join("automagik-spark"));
        assert_eq!(d.logs.error_file, root.join("automagik-spark").join("logs/api-err.log"));
        assert!(d.logs.out_file.is_absolute());
        assert!(d.logs.combined_file.is_absolute());
        assert!(Path::new(&d.script).is_absolute());
    }

    #[test]
    fn bare_script_left_for_path_lookup() {
        let root = root();
        let overlay = EnvOverlay::empty();
        let builder = DescriptorBuilder::new(&root, &overlay).unwrap();
        let mut spec = spark_api();
        spec.command.script = "pnpm".to_string();

        assert_eq!(builder.build(&spec, "x").unwrap().script, "pnpm");
    }

    #[test]
    fn builtin_placeholders() {
        let root = root();
        let overlay = EnvOverlay::empty();
        let builder = DescriptorBuilder::new(&root, &overlay).unwrap();
        let mut spec = spark_api();
        spec.command.args = vec!["--name=${SERVICE_NAME}".to_string(), "${SERVICE_DIR}".to_string()];

        let d = builder.build(&spec, "x").unwrap();
        assert_eq!(d.args[0], "--name=automagik-spark-api");
        assert_eq!(d.args[1], root.join("automagik-spark").display().to_string());
    }

    #[test]
    fn unresolved_placeholder_is_fatal() {
        let root = root();
        let overlay = EnvOverlay::empty();
        let builder = DescriptorBuilder::new(&root, &overlay).unwrap();
        let mut spec = spark_api();
        spec.command.args.push("${NOT_DECLARED}".to_string());

        let err = builder.build(&spec, "x").unwrap_err();
        match err {
            Error::UnresolvedPlaceholder {
                service,
                placeholder,
                ..
            } => {
                assert_eq!(service, "automagik-spark-api");
                assert_eq!(placeholder, "NOT_DECLARED");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_placeholder_is_fatal() {
        let root = root();
        let overlay = EnvOverlay::empty();
        let builder = DescriptorBuilder::new(&root, &overlay).unwrap();
        let mut spec = spark_api();
        spec.command.args.push("--flag=${not-a-name}".to_string());

        let err = builder.build(&spec, "x").unwrap_err();
        assert!(
            matches!(err, Error::UnresolvedPlaceholder { ref placeholder, .. } if placeholder == "${not-a-name}")
        );
    }

    #[test]
    fn unterminated_placeholder_is_fatal() {
        let root = root();
        let overlay = EnvOverlay::empty();
        let builder = DescriptorBuilder::new(&root, &overlay).unwrap();
        let mut spec = spark_api();
        spec.command.args.push("${AUTOMAGIK_SPARK_API_PORT".to_string());

        assert!(matches!(
            builder.build(&spec, "x"),
            Err(Error::UnresolvedPlaceholder { .. })
        ));
    }

    #[test]
    fn overlay_values_are_not_expanded() {
        let root = root();
        let overlay = EnvOverlay::parse("AUTOMAGIK_SPARK_API_PORT=${PORT}
");
        let builder = DescriptorBuilder::new(&root, &overlay).unwrap();

        let d = builder.build(&spark_api(), "x").unwrap();

        assert_eq!(d.env["AUTOMAGIK_SPARK_API_PORT"], "${PORT}");
        assert_eq!(d.args.last().map(String::as_str), Some("${PORT}"));
    }

    #[test]
    fn empty_overlay_value_does_not_satisfy_an_alias() {
        let root = root();
        let overlay = EnvOverlay::parse("NEW_PORT=\"\"\nOLD_PORT=7\n");
        let builder = DescriptorBuilder::new(&root, &overlay).unwrap();
        let mut spec = spark_api();
        spec.env = vec![EnvDefault::new("PORT", "0").from_keys(["NEW_PORT", "OLD_PORT"])];

        let d = builder.build(&spec, "x").unwrap();
        assert_eq!(d.env["PORT"], "7");
        assert_eq!(d.env["NEW_PORT"], "");
    }

    #[test]
    fn relative_root_rejected() {
        let overlay = EnvOverlay::empty();
        let err = DescriptorBuilder::new(Path::new("opt/automagik"), &overlay).unwrap_err();
        assert!(matches!(err, Error::RelativeInstallRoot { .. }));
    }

    #[test]
    fn policy_copied_verbatim() {
        let root = root();
        let overlay = EnvOverlay::empty();
        let builder = DescriptorBuilder::new(&root, &overlay).unwrap();
        let mut spec = spark_api();
        spec.restart.max_restarts = 3;
        spec.resources.max_memory_restart = "512M".to_string();

        let d = builder.build(&spec, "x").unwrap();
        assert_eq!(d.restart, spec.restart);
        assert_eq!(d.resources, spec.resources);
    }
}
