//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use suite_core::OutputFormat;
use suite_version::Ecosystem;

/// Default VCS query timeout, in milliseconds.
pub const DEFAULT_VCS_TIMEOUT_MS: u64 = 5_000;

/// Suite manifest compiler - build process-supervisor descriptors for the suite
#[derive(Parser, Debug)]
#[command(name = "suite")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Compile the supervisor ecosystem document
    ///
    /// Examples:
    ///   suite compile                          # Install root is the current directory
    ///   suite compile --root /opt/automagik    # Explicit install root
    ///   suite compile --format yaml -o eco.yml # Write YAML to a file
    Compile {
        /// Install root holding one directory per service
        #[arg(long, env = "SUITE_INSTALL_ROOT", default_value = ".")]
        root: PathBuf,

        /// Overlay file (defaults to <root>/.env)
        #[arg(long, env = "SUITE_OVERLAY")]
        overlay: Option<PathBuf>,

        /// Catalog file (defaults to the built-in catalog)
        #[arg(long, env = "SUITE_CATALOG")]
        catalog: Option<PathBuf>,

        /// Timeout for the git revision query, in milliseconds
        #[arg(long, env = "SUITE_VCS_TIMEOUT_MS", default_value_t = DEFAULT_VCS_TIMEOUT_MS)]
        vcs_timeout_ms: u64,

        /// Output format (json or yaml)
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the resolved version of a project directory
    Version {
        /// Project directory
        dir: PathBuf,

        /// Which version sources apply (python or node)
        #[arg(short, long, default_value = "python")]
        ecosystem: Ecosystem,

        /// Timeout for the git revision query, in milliseconds
        #[arg(long, env = "SUITE_VCS_TIMEOUT_MS", default_value_t = DEFAULT_VCS_TIMEOUT_MS)]
        vcs_timeout_ms: u64,
    },

    /// List catalog services in startup order
    List {
        /// Catalog file (defaults to the built-in catalog)
        #[arg(long, env = "SUITE_CATALOG")]
        catalog: Option<PathBuf>,
    },
}
