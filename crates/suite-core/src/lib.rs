//! Suite manifest compilation
//!
//! Turns a static catalog of services, an operator overlay, and the state of
//! each project directory into supervisor-ready descriptors:
//!
//! - **Overlay**: the operator's `.env` file, parsed once into an immutable map
//! - **Catalog**: ordered service specifications, embedded TOML by default
//! - **Builder**: merges environment layers, substitutes `${NAME}` placeholders,
//!   and anchors paths at the install root
//! - **Compiler**: resolves every version and builds the whole suite, or fails
//!
//! ```text
//!          suite-cli
//!              |
//!         suite-core
//!              |
//!        suite-version
//! ```
//!
//! # Example
//!
//! ```no_run
//! use suite_core::{CompileOptions, EcosystemFile, compile};
//!
//! fn example() -> suite_core::Result<()> {
//!     let manifest = compile(&CompileOptions::new("/opt/automagik"))?;
//!     println!("{}", EcosystemFile::from(&manifest).to_json()?);
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod catalog;
pub mod compiler;
pub mod descriptor;
pub mod ecosystem;
pub mod error;
pub mod options;
pub mod overlay;

pub use builder::{DescriptorBuilder, PYTHONPATH_KEY, RUNTIME_MODE, RUNTIME_MODE_KEY};
pub use catalog::{
    Catalog, CommandTemplate, DeployHooks, EnvDefault, LogPolicy, ResourceLimits, RestartPolicy,
    ServiceSpec,
};
pub use compiler::{SuiteCompiler, SuiteManifest};
pub use descriptor::{LogFiles, ServiceDescriptor};
pub use ecosystem::{EcosystemFile, OutputFormat, Pm2App};
pub use error::{Error, Result};
pub use options::{CompileOptions, DEFAULT_OVERLAY_FILE, compile};
pub use overlay::EnvOverlay;
