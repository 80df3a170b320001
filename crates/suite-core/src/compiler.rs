//! Suite compilation: overlay once, then version + descriptor per service

use crate::builder::DescriptorBuilder;
use crate::catalog::{Catalog, DeployHooks};
use crate::descriptor::ServiceDescriptor;
use crate::overlay::EnvOverlay;
use crate::Result;
use std::path::Path;
use suite_version::VersionResolver;

/// The compiled suite: descriptors in catalog order plus the deploy block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteManifest {
    pub apps: Vec<ServiceDescriptor>,
    pub deploy: DeployHooks,
}

impl SuiteManifest {
    pub fn get(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.apps.iter().find(|d| d.name == name)
    }
}

/// Turns a catalog into a [`SuiteManifest`].
///
/// Compilation is all-or-nothing: the first service that fails to build
/// aborts the run and no manifest is produced.
#[derive(Debug)]
pub struct SuiteCompiler {
    catalog: Catalog,
    resolver: VersionResolver,
}

impl SuiteCompiler {
    pub fn new(catalog: Catalog, resolver: VersionResolver) -> Self {
        Self { catalog, resolver }
    }

    /// Built-in catalog with the default resolver.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(Catalog::builtin()?, VersionResolver::default()))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn resolver(&self) -> &VersionResolver {
        &self.resolver
    }

    /// Load the overlay from `overlay_source`, then [`compile`](Self::compile).
    pub fn compile_with_source(
        &self,
        install_root: &Path,
        overlay_source: Option<&Path>,
    ) -> Result<SuiteManifest> {
        let overlay = EnvOverlay::load(overlay_source);
        self.compile(install_root, &overlay)
    }

    /// Compile every catalog service against an already loaded overlay.
    pub fn compile(&self, install_root: &Path, overlay: &EnvOverlay) -> Result<SuiteManifest> {
        let builder = DescriptorBuilder::new(install_root, overlay)?;

        let apps = self
            .catalog
            .services
            .iter()
            .map(|spec| {
                let dir = builder.service_dir(spec);
                let version = self.resolver.resolve(&dir, spec.ecosystem);
                builder.build(spec, &version).inspect_err(|e| {
                    tracing::error!(service = %spec.name, error = %e, "Descriptor build failed");
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            services = apps.len(),
            root = %install_root.display(),
            "Compiled suite"
        );

        Ok(SuiteManifest {
            apps,
            deploy: self.catalog.deploy.clone(),
        })
    }
}

