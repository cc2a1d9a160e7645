use std::path::{Path, PathBuf};

use lattice_source::LatticeConfig;

use crate::error::CliError;

/// Loads `explicit` if given, otherwise the nearest `lattice.toml` above
/// `start`, otherwise the defaults.
pub fn load_config(explicit: Option<&Path>, start: &Path) -> Result<LatticeConfig, CliError> {
    if let Some(path) = explicit {
        return Ok(LatticeConfig::load(path)?);
    }
    match LatticeConfig::find(start) {
        Some(path) => {
            log::debug!("Using configuration at {}", path.display());
            Ok(LatticeConfig::load(&path)?)
        }
        None => Ok(LatticeConfig::default()),
    }
}

/// Command-line overrides for a build.
#[derive(Debug, Clone, Default)]
pub struct BuildOverrides {
    pub entry: Option<String>,
    pub root: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub strict: bool,
    pub print_exports: bool,
}

/// The effective settings of one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub entry: String,
    pub root: PathBuf,
    pub output: Option<PathBuf>,
    pub strict: bool,
    pub print_exports: bool,
}

impl BuildSettings {
    /// Command-line values win over the configuration file; flags can only
    /// switch a setting on.
    pub fn merge(config: LatticeConfig, overrides: BuildOverrides) -> Result<Self, CliError> {
        let entry = overrides
            .entry
            .or(config.resolve.entry)
            .ok_or(CliError::MissingEntry)?;
        Ok(Self {
            entry,
            root: overrides.root.unwrap_or(config.resolve.root),
            output: overrides.output.or(config.output.path),
            strict: overrides.strict || config.resolve.strict,
            print_exports: overrides.print_exports || config.output.exports,
        })
    }
}
