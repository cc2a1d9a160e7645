use std::path::PathBuf;

use lattice_resolve::ResolveError;
use lattice_source::ConfigError;
use miette::Diagnostic;
use thiserror::Error;

/// CLI-specific error type that provides rich diagnostics
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolve(#[from] ResolveError),

    #[error("No entry stylesheet given")]
    #[diagnostic(
        code(lattice::cli::missing_entry),
        help("Pass an entry path, or set `entry` under [resolve] in lattice.toml")
    )]
    MissingEntry,

    #[error("I/O error while {operation} `{path}`")]
    #[diagnostic(code(lattice::cli::io_error))]
    IoError {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convert IO errors with context
pub fn convert_io_error(error: std::io::Error, path: PathBuf, operation: &str) -> CliError {
    CliError::IoError {
        path,
        operation: operation.to_string(),
        source: error,
    }
}
