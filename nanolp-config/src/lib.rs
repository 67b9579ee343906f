//! Shared configuration loader for nanolp-pub.
//!
//! `defaults/nanolp.default.toml` is embedded into the binary so that docs and
//! runtime behavior stay in sync. Callers layer a user file and command line
//! overrides on top of those defaults via [`Loader`] before deserializing into
//! [`NanolpConfig`], then turn it into the [`ResolveConfig`] the linker runs with.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use nanolp_refs::{CommandMap, Delimiters, RefsError, ResolveConfig};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/nanolp.default.toml");

/// Top-level configuration consumed by nanolp-pub.
#[derive(Debug, Clone, Deserialize)]
pub struct NanolpConfig {
    pub delimiters: Delimiters,
    pub resolve: ResolveSection,
    pub publish: PublishSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveSection {
    pub policy: PolicyKind,
    /// Path of the JSON command map; empty when unset.
    pub command_map: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishSection {
    pub stylesheet: String,
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    InPage,
    Mapped,
}

impl NanolpConfig {
    /// The command map path, if one is configured.
    pub fn command_map_path(&self) -> Option<&Path> {
        let path = self.resolve.command_map.trim();
        (!path.is_empty()).then(|| Path::new(path))
    }

    /// Build the resolution settings, reading the command map for the mapped policy.
    pub fn resolve_config(&self) -> Result<ResolveConfig, ConfigLoadError> {
        let delimiters = self.delimiters.clone();
        match self.resolve.policy {
            PolicyKind::InPage => Ok(ResolveConfig::in_page(delimiters)),
            PolicyKind::Mapped => {
                let path = self
                    .command_map_path()
                    .ok_or(ConfigLoadError::MissingCommandMap)?;
                let commands = read_command_map(path)?;
                Ok(ResolveConfig::mapped(delimiters, commands))
            }
        }
    }
}

/// Read a JSON command map file.
pub fn read_command_map(path: &Path) -> Result<CommandMap, ConfigLoadError> {
    let source = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    CommandMap::from_json_str(&source).map_err(|source| ConfigLoadError::CommandMap {
        path: path.to_path_buf(),
        source,
    })
}

/// Errors turning a loaded configuration into resolution settings.
#[derive(Debug)]
pub enum ConfigLoadError {
    /// The layered configuration did not deserialize
    Config(ConfigError),
    /// The mapped policy was selected without a command map
    MissingCommandMap,
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    CommandMap {
        path: PathBuf,
        source: RefsError,
    },
}

impl fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigLoadError::Config(err) => write!(f, "Configuration error: {}", err),
            ConfigLoadError::MissingCommandMap => {
                write!(f, "The mapped policy needs a command map (resolve.command_map)")
            }
            ConfigLoadError::Io { path, source } => {
                write!(f, "Failed to read '{}': {}", path.display(), source)
            }
            ConfigLoadError::CommandMap { path, source } => {
                write!(f, "{} in '{}'", source, path.display())
            }
        }
    }
}

impl std::error::Error for ConfigLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigLoadError::Config(err) => Some(err),
            ConfigLoadError::Io { source, .. } => Some(source),
            ConfigLoadError::CommandMap { source, .. } => Some(source),
            ConfigLoadError::MissingCommandMap => None,
        }
    }
}

impl From<ConfigError> for ConfigLoadError {
    fn from(err: ConfigError) -> Self {
        ConfigLoadError::Config(err)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<NanolpConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
