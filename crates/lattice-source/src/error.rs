use std::path::PathBuf;
use thiserror::Error;
use miette::Diagnostic;

use crate::ModulePath;

/// Errors produced by a fetch collaborator.
///
/// The resolver treats every variant the same way (the import stays
/// unresolved); the distinction only matters for reporting.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No module exists at the resolved path.
    #[error("Module not found: `{path}`")]
    #[diagnostic(
        code(lattice_source::not_found),
        help("Check the path given in the `:import(...)` directive")
    )]
    NotFound {
        path: ModulePath,
    },

    /// The module exists but could not be read.
    #[error("Failed to read `{path}`: {reason}")]
    #[diagnostic(code(lattice_source::io_error))]
    Io {
        path: ModulePath,
        reason: String,
    },
}

impl FetchError {
    pub fn from_io(path: ModulePath, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            FetchError::NotFound { path }
        } else {
            FetchError::Io { path, reason: err.to_string() }
        }
    }

    /// The module path the failed fetch was for.
    pub fn path(&self) -> &ModulePath {
        match self {
            FetchError::NotFound { path } | FetchError::Io { path, .. } => path,
        }
    }
}

/// Errors that can occur when loading `lattice.toml`.
#[derive(Debug, Error, Diagnostic, Clone)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    #[diagnostic(
        code("CONFIG-001"),
        help("Pass an existing file with --config, or drop the flag to use defaults")
    )]
    NotFound(PathBuf),

    #[error("Error reading configuration: {0}")]
    #[diagnostic(
        code("CONFIG-002"),
        help("Check file permissions and ensure the file is not corrupted")
    )]
    Read(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code("CONFIG-003"),
        help("Check your lattice.toml syntax; the known sections are [resolve] and [output]")
    )]
    Parse(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Read(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
