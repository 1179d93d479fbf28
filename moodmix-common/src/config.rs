//! Configuration loading and root folder resolution
//!
//! Two-tier configuration:
//! 1. **TOML bootstrap**: root folder, HTTP port, logging (read once at startup)
//! 2. **Database runtime**: everything else lives in the `settings` table
//!
//! A missing or malformed TOML file is never fatal: a warning is logged and
//! compiled defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "MOODMIX_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "moodmix.db";

/// Default HTTP port for the mood matcher service
pub const DEFAULT_PORT: u16 = 5740;

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the database
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load `path` if it exists; a missing file gives defaults
    ///
    /// Read and parse failures name the file.
    pub fn load_optional(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the platform config file, if there is one
    pub fn try_load() -> Result<Self> {
        match config_file_path() {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Self::load_optional(&path)
            }
            None => {
                debug!("No config file found, using compiled defaults");
                Ok(Self::default())
            }
        }
    }

    /// Defaults in place of a failed load, with the failure kept for
    /// reporting once logging is up
    pub fn or_defaults(result: Result<Self>) -> (Self, Option<Error>) {
        match result {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load from the platform config location, falling back to defaults
    pub fn load_or_default() -> Self {
        let (config, problem) = Self::or_defaults(Self::try_load());
        if let Some(e) = problem {
            warn!("Ignoring config file: {} (using compiled defaults)", e);
        }
        config
    }
}

/// Compiled-in defaults (lowest priority tier)
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub port: u16,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            port: DEFAULT_PORT,
        }
    }
}

/// Root folder resolution following priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable (`MOODMIX_ROOT_FOLDER`)
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    toml_config: Option<TomlConfig>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            toml_config: None,
        }
    }

    /// Command-line override
    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    /// Use an already-loaded TOML config instead of reading the platform file
    pub fn with_toml_config(mut self, config: TomlConfig) -> Self {
        self.toml_config = Some(config);
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            debug!("[{}] root folder from command line", self.module_name);
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                debug!("[{}] root folder from {}", self.module_name, ROOT_FOLDER_ENV);
                return PathBuf::from(path);
            }
        }

        let toml_root = match &self.toml_config {
            Some(config) => config.root_folder.clone(),
            None => TomlConfig::load_or_default().root_folder,
        };
        if let Some(path) = toml_root {
            debug!("[{}] root folder from TOML config", self.module_name);
            return path;
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder and locates files inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder).map_err(|e| {
            Error::Config(format!(
                "Failed to create root folder {}: {}",
                self.root_folder.display(),
                e
            ))
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }
}

/// Platform config file, if one exists
fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("moodmix").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/moodmix/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/moodmix (or /var/lib/moodmix for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("moodmix"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/moodmix"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("moodmix"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/moodmix"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("moodmix"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\moodmix"))
    } else {
        PathBuf::from("./moodmix_data")
    }
}
