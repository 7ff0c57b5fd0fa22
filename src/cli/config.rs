//! SafeFolks configuration file handling
//!
//! Provides default configuration generation and loading for the SafeFolks
//! bot. Configuration files are TOML format and hold the bot token, which is
//! why the config file must never be committed to version control.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// SafeFolks bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafefolksConfig {
    /// Telegram credentials
    pub telegram: TelegramConfig,

    /// Trust data storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Telegram-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by @BotFather
    #[serde(default)]
    pub bot_token: String,
}

impl TelegramConfig {
    /// The configured token, or None when unset or blank.
    pub fn token(&self) -> Option<&str> {
        let token = self.bot_token.trim();
        (!token.is_empty()).then_some(token)
    }
}

/// Trust data storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the trust data file (JSON)
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl SafefolksConfig {
    /// Create a new configuration with the given data file path
    #[allow(dead_code)]
    pub fn new(data_file: PathBuf) -> Self {
        Self {
            telegram: TelegramConfig {
                bot_token: String::new(),
            },
            storage: StorageConfig { data_file },
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: SafefolksConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(path, contents)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        Ok(())
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml(data_file: &Path) -> String {
        format!(
            r#"# SafeFolks Bot Configuration
#
# This file holds the bot token. Keep it OUT of version control.

[telegram]
# Bot token from @BotFather (required)
bot_token = ""

[storage]
# Path to the trust data file (JSON)
data_file = "{data_file}"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (optional, logs to stderr if not specified)
# file = "/var/log/safefolks/safefolks.log"
"#,
            data_file = data_file.display()
        )
    }

    /// Create and save a default configuration file
    pub fn create_default(
        config_path: &Path,
        data_file: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let contents = Self::generate_default_toml(data_file);

        // Create parent directory if needed
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(config_path, contents).map_err(|e| {
            format!(
                "Failed to write config file '{}': {}",
                config_path.display(),
                e
            )
        })?;

        Ok(())
    }
}

/// Get the default config file path
///
/// - Linux: ~/.local/share/safefolks/config.toml
pub fn default_config_path() -> PathBuf {
    data_dir().join("config.toml")
}

/// Get the default trust data file path
///
/// - Linux: ~/.local/share/safefolks/trust_data.json
pub fn default_data_file() -> PathBuf {
    data_dir().join("trust_data.json")
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("safefolks")
}
