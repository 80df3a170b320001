//! Error types for suite-core
//!
//! Everything here is fatal: a compilation that hits one of these produces
//! no manifest at all.

use std::path::PathBuf;

/// Result type for suite-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort suite compilation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog {origin}: {message}")]
    CatalogParse { origin: String, message: String },

    #[error("Catalog declares service '{name}' more than once")]
    DuplicateService { name: String },

    #[error("Service '{service}' is invalid: {reason}")]
    InvalidService { service: String, reason: String },

    #[error("Service '{name}' is not in the catalog")]
    UnknownService { name: String },

    #[error("Install root must be absolute, got {path}")]
    RelativeInstallRoot { path: PathBuf },

    #[error("Service '{service}': unresolved placeholder '{placeholder}' in {field}")]
    UnresolvedPlaceholder {
        service: String,
        field: String,
        placeholder: String,
    },

    #[error("Failed to render {format} manifest: {message}")]
    Render { format: String, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid(service: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidService {
            service: service.into(),
            reason: reason.into(),
        }
    }

    /// Name of the service this error is about, if any.
    pub fn service(&self) -> Option<&str> {
        match self {
            Self::DuplicateService { name } | Self::UnknownService { name } => Some(name.as_str()),
            Self::InvalidService { service, .. } | Self::UnresolvedPlaceholder { service, .. } => {
                Some(service.as_str())
            }
            _ => None,
        }
    }
}
