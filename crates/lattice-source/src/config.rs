use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Name of the configuration file looked up by [`LatticeConfig::find`].
pub const CONFIG_FILE_NAME: &str = "lattice.toml";

/// Contents of `lattice.toml`.
///
/// Every field is optional; relative paths are interpreted relative to the
/// directory containing the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LatticeConfig {
    /// Where and how to resolve
    #[serde(default)]
    pub resolve: ResolveSection,

    /// Where to write the bundle
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolveSection {
    /// Resolution root; imports never climb above it
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Entry specifier, relative to the root
    #[serde(default)]
    pub entry: Option<String>,

    /// Treat unresolved imports and missing exports as failures
    #[serde(default)]
    pub strict: bool,
}

impl Default for ResolveSection {
    fn default() -> Self {
        Self {
            root: default_root(),
            entry: None,
            strict: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OutputSection {
    /// Output file; standard output when absent
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Append the entry's exports as an `:export` block
    #[serde(default)]
    pub exports: bool,
}

pub fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl LatticeConfig {
    /// Parses configuration text without touching the filesystem.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a configuration file and rebases its relative paths onto the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let mut config = Self::from_toml(&text)?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.rebase(base);
        log::debug!("Loaded configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Searches `start` and its ancestors for `lattice.toml`.
    pub fn find(start: &Path) -> Option<PathBuf> {
        let mut current = if start.is_dir() {
            start.to_path_buf()
        } else {
            start.parent().map_or_else(|| start.to_path_buf(), Path::to_path_buf)
        };

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn rebase(&mut self, base: &Path) {
        if self.resolve.root.is_relative() {
            self.resolve.root = base.join(&self.resolve.root);
        }
        if let Some(output) = &self.output.path {
            if output.is_relative() {
                self.output.path = Some(base.join(output));
            }
        }
    }
}
