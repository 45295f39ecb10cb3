//! Configuration loading and config file resolution
//!
//! Configuration is optional. A missing or unreadable file produces a warning
//! and compiled defaults; only a file that reads but cannot be parsed (or
//! describes an unusable content source) is an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "STEWARD_CONFIG";

/// Config file name looked up in the user config directory
pub const CONFIG_FILE_NAME: &str = "steward.toml";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub resolver: ResolverConfig,
    pub content: ContentConfig,
    pub synthesis: SynthesisConfig,
    pub catalog: CatalogConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5780,
        }
    }
}

/// Logging settings (RUST_LOG still takes precedence)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Public URL layout for source documents and their transformed companions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Directory prefix for source artifacts (e.g. `/pdfs`)
    pub source_dir: String,
    /// Directory prefix for transformed JSON artifacts
    pub transformed_dir: String,
    /// Source filename -> companion filename, merged over the built-in table
    pub special_cases: BTreeMap<String, String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            source_dir: "/pdfs".to_string(),
            transformed_dir: "/transformed".to_string(),
            special_cases: BTreeMap::new(),
        }
    }
}

/// Where transformed content is fetched from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    /// GET `<base_url><candidate path>` over HTTP
    Http,
    /// Read `<directory><candidate path>` from the local filesystem
    Directory,
    /// No backing store; every record uses fallback content
    #[default]
    Offline,
}

/// Content source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub mode: ContentMode,
    pub base_url: Option<String>,
    pub directory: Option<PathBuf>,
    /// HTTP request timeout; unset keeps the client default
    pub timeout_secs: Option<u64>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            mode: ContentMode::Offline,
            base_url: None,
            directory: None,
            timeout_secs: None,
        }
    }
}

/// Record synthesis settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Mixed into every per-record seed; change it to get a different dataset
    pub seed: u64,
}

/// Known source filenames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// `None` keeps the built-in catalog
    pub filenames: Option<Vec<String>>,
}

impl TomlConfig {
    /// Check cross-field requirements that serde defaults cannot express
    pub fn validate(&self) -> Result<()> {
        match self.content.mode {
            ContentMode::Http => {
                let base = self.content.base_url.as_deref().unwrap_or("");
                if base.trim().is_empty() {
                    return Err(Error::Config(
                        "content.mode = \"http\" requires content.base_url".to_string(),
                    ));
                }
            }
            ContentMode::Directory => {
                if self.content.directory.is_none() {
                    return Err(Error::Config(
                        "content.mode = \"directory\" requires content.directory".to_string(),
                    ));
                }
            }
            ContentMode::Offline => {}
        }

        if self.content.timeout_secs == Some(0) {
            return Err(Error::Config("content.timeout_secs must be > 0".to_string()));
        }

        Ok(())
    }
}

/// Config file resolution following priority order:
/// 1. Command-line argument (highest priority)
/// 2. `STEWARD_CONFIG` environment variable
/// 3. User config directory (`<config_dir>/steward/steward.toml`)
/// 4. Compiled defaults (no file)
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    /// Create resolver with optional CLI-provided path
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Pick the config file path to use, if any
    pub fn resolve_path(&self) -> Option<PathBuf> {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_path {
            return Some(path.clone());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        // Priority 3: User config directory, only if the file is there
        user_config_path().filter(|p| p.exists())
    }

    /// Resolve and load configuration, degrading to defaults when no file is usable
    pub fn load(&self) -> Result<TomlConfig> {
        let Some(path) = self.resolve_path() else {
            debug!("No config file found, using compiled defaults");
            return Ok(TomlConfig::default());
        };

        if !path.exists() {
            warn!(
                "Config file {} not found, using compiled defaults",
                path.display()
            );
            return Ok(TomlConfig::default());
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    "Config file {} unreadable ({}), using compiled defaults",
                    path.display(),
                    e
                );
                return Ok(TomlConfig::default());
            }
        };

        let config = parse_toml_config(&content, &path)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Default per-user config file location
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("steward").join(CONFIG_FILE_NAME))
}

/// Read, parse and validate a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_toml_config(&content, path)
}

/// Parse and validate config text read from `path`
fn parse_toml_config(content: &str, path: &Path) -> Result<TomlConfig> {
    let config: TomlConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}
