//! The compile command

use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;
use suite_core::{CompileOptions, EcosystemFile, OutputFormat};

use super::canonical_dir;
use crate::error::{CliError, Result};

/// Arguments of `suite compile`, after parsing.
#[derive(Debug, Clone)]
pub struct CompileArgs {
    pub root: PathBuf,
    pub overlay: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub vcs_timeout: Duration,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

impl CompileArgs {
    fn options(&self, root: PathBuf) -> CompileOptions {
        let mut options = CompileOptions::new(root).with_vcs_timeout(self.vcs_timeout);
        if let Some(overlay) = &self.overlay {
            options = options.with_overlay(overlay.clone());
        }
        if let Some(catalog) = &self.catalog {
            options = options.with_catalog(catalog.clone());
        }
        options
    }
}

/// Compile the suite and return the rendered document.
pub fn compile_document(args: &CompileArgs) -> Result<String> {
    let root = canonical_dir(&args.root, "Install root")?;
    let options = args.options(root);

    let manifest = suite_core::compile(&options)?;

    Ok(EcosystemFile::from(&manifest).render(args.format)?)
}

/// Run the compile command
pub fn run_compile(args: CompileArgs) -> Result<()> {
    let document = compile_document(&args)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &document).map_err(|e| CliError::io(path, e))?;
            eprintln!(
                "{} Wrote {} document to {}",
                "OK".green().bold(),
                args.format,
                path.display().to_string().cyan()
            );
        }
        None => print!("{document}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use suite_test_utils::install::TestInstall;

    fn args(install: &TestInstall) -> CompileArgs {
        CompileArgs {
            root: install.root().to_path_buf(),
            overlay: None,
            catalog: None,
            vcs_timeout: Duration::from_millis(500),
            format: OutputFormat::Json,
            output: None,
        }
    }

    #[test]
    fn document_reflects_default_overlay() {
        let install = TestInstall::new();
        install.overlay("AUTOMAGIK_SPARK_API_PORT=9000\n");

        let document = compile_document(&args(&install)).unwrap();

        assert!(document.contains("\"9000\""));
        assert!(document.contains("automagik-spark-api"));
    }

    #[test]
    fn explicit_overlay_replaces_default_file() {
        let install = TestInstall::new();
        install.overlay("AUTOMAGIK_SPARK_API_PORT=9000\n");
        let other = install.write("other.env", "AUTOMAGIK_SPARK_API_PORT=9500\n");

        let mut args = args(&install);
        args.overlay = Some(other);
        let document = compile_document(&args).unwrap();

        assert!(document.contains("\"9500\""));
        assert!(!document.contains("\"9000\""));
    }

    #[test]
    fn output_file_written() {
        let install = TestInstall::new();
        let out = install.root().join("eco.yml");

        let mut args = args(&install);
        args.format = OutputFormat::Yaml;
        args.output = Some(out.clone());
        run_compile(args).unwrap();

        let written = std::fs::read_to_string(out).unwrap();
        assert!(written.contains("apps:"));
    }

    #[test]
    fn missing_root_is_user_error() {
        let install = TestInstall::new();
        let mut args = args(&install);
        args.root = install.root().join("missing");
        assert!(matches!(compile_document(&args), Err(CliError::User { .. })));
    }
}
