//! Application configuration management.
//!
//! Settings are merged with figment from four layers, later layers winning:
//!
//! 1. [`Config::default()`]
//! 2. A TOML file: `--config FILE`, else `config.toml` in the platform
//!    config directory (e.g. `~/.config/dupfind/config.toml` on Linux)
//! 3. `DUPFIND_*` environment variables (`DUPFIND_IO_THREADS=8`)
//! 4. Flags given on the command line ([`ConfigOverrides`])
//!
//! ```toml
//! mode = "pairwise"
//! chunk_size = "256KiB"
//! io_threads = 2
//! skip_hidden = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Deserializer, Serialize};

use crate::duplicates::{MatchStrategy, DEFAULT_IO_THREADS};
use crate::scanner::{DEFAULT_CHUNK_SIZE, MIN_CHUNK_SIZE};

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "DUPFIND_";

/// Errors raised while loading, validating or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration source could not be parsed.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// An explicitly requested configuration file does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A setting has an unusable value.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// No platform configuration directory could be determined.
    #[error("Failed to determine the configuration directory")]
    NoConfigDir,

    /// Refused to overwrite an existing file.
    #[error("Configuration file already exists: {} (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    /// Reading or writing the file failed.
    #[error("I/O error for {}: {source}", path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be serialized.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content comparison strategy.
    pub mode: MatchStrategy,
    /// Read chunk size in bytes. Accepts `65536` or `"64KiB"`.
    #[serde(deserialize_with = "deserialize_size")]
    pub chunk_size: usize,
    /// Number of bucket workers.
    pub io_threads: usize,
    /// Skip hidden files and directories.
    pub skip_hidden: bool,
    /// Indent JSON output.
    pub pretty: bool,
    /// Show progress bars for text output.
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: MatchStrategy::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            io_threads: DEFAULT_IO_THREADS,
            skip_hidden: false,
            pretty: false,
            progress: true,
        }
    }
}

/// Settings given explicitly on the command line.
///
/// `None` fields are left out of the merge and do not mask lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<MatchStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub io_threads: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<bool>,
}

impl Config {
    /// Default platform-specific configuration file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupfind", "dupfind")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Build the layered figment: defaults, file, environment, overrides.
    ///
    /// A missing file contributes nothing.
    #[must_use]
    pub fn figment(file: Option<&Path>, overrides: &ConfigOverrides) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides))
    }

    /// Load and validate the effective configuration.
    ///
    /// `explicit` is the `--config` argument; when absent the default path
    /// is used if it exists.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NotFound`] if `explicit` names a missing file
    /// - [`ConfigError::Load`] if any layer fails to parse
    /// - [`ConfigError::Invalid`] if the merged values fail [`Config::validate`]
    pub fn load(explicit: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|p| p.is_file()),
        };

        if let Some(ref path) = file {
            log::debug!("Loading configuration from {}", path.display());
        }

        let config: Config = Self::figment(file.as_deref(), overrides)
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))?;
        config.validate()?;

        log::debug!("Effective configuration: {:?}", config);
        Ok(config)
    }

    /// Check that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero worker threads or a chunk
    /// size below [`MIN_CHUNK_SIZE`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.io_threads == 0 {
            return Err(ConfigError::Invalid(
                "io_threads must be at least 1".to_string(),
            ));
        }
        if self.chunk_size < MIN_CHUNK_SIZE {
            return Err(ConfigError::Invalid(format!(
                "chunk_size must be at least {} bytes, got {}",
                MIN_CHUNK_SIZE, self.chunk_size
            )));
        }
        Ok(())
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write this configuration to `path` as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::AlreadyExists`] if `path` exists and `force` is false
    /// - [`ConfigError::Io`] if the file cannot be written
    pub fn save(&self, path: &Path, force: bool) -> Result<(), ConfigError> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = self.to_toml()?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Wrote configuration to {}", path.display());
        Ok(())
    }
}

/// Accept a size either as a byte count or a human-readable string.
fn deserialize_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SizeValue {
        Bytes(u64),
        Text(String),
    }

    let bytes = match SizeValue::deserialize(deserializer)? {
        SizeValue::Bytes(n) => n,
        SizeValue::Text(s) => s
            .trim()
            .parse::<ByteSize>()
            .map_err(|e| serde::de::Error::custom(format!("invalid size '{s}': {e}")))?
            .as_u64(),
    };
    usize::try_from(bytes).map_err(serde::de::Error::custom)
}
