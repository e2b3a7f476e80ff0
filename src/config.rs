use serde::{Deserialize, Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default location of the recipe document, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/recipes.json";

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Which store recipes are kept in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    File,
    Table,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::File => write!(f, "file"),
            BackendKind::Table => write!(f, "table"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(BackendKind::File),
            "table" => Ok(BackendKind::Table),
            other => Err(other.to_string()),
        }
    }
}

/// Connection settings for the table backend
#[derive(Debug, Clone, Serialize)]
pub struct TableConfig {
    pub driver: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    pub database: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "redact_secret"
    )]
    pub password: Option<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            driver: "sqlite".to_string(),
            server: None,
            database: Config::default_data_dir().join("recipes.db"),
            user: None,
            password: None,
        }
    }
}

impl TableConfig {
    /// Build the connection URL for the configured driver.
    ///
    /// Only SQLite is supported; `server`, `user` and `password` have no
    /// meaning for it and are ignored.
    pub fn connection_url(&self) -> Result<String, ConfigError> {
        match self.driver.to_lowercase().as_str() {
            "sqlite" => {
                if self.server.is_some() || self.user.is_some() || self.password.is_some() {
                    tracing::debug!("Ignoring server/user/password for the sqlite driver");
                }
                Ok(format!("sqlite:{}?mode=rwc", self.database.display()))
            }
            _ => Err(ConfigError::UnsupportedDriver(self.driver.clone())),
        }
    }
}

fn redact_secret<S: Serializer>(secret: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match secret {
        Some(_) => serializer.serialize_str("********"),
        None => serializer.serialize_none(),
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Which backend stores recipes
    pub backend: ConfigValue<BackendKind>,
    /// Path to the JSON recipe document (file backend)
    pub data_path: ConfigValue<PathBuf>,
    /// Connection settings (table backend)
    pub table: TableConfig,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    backend: Option<BackendKind>,
    data_path: Option<PathBuf>,
    table: Option<TableConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TableConfigFile {
    driver: Option<String>,
    server: Option<String>,
    database: Option<PathBuf>,
    user: Option<String>,
    password: Option<String>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut backend = ConfigValue::new(BackendKind::default(), ConfigSource::Default);
        let mut data_path =
            ConfigValue::new(PathBuf::from(DEFAULT_DATA_PATH), ConfigSource::Default);
        let mut table = TableConfig::default();
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(kind) = file_config.backend {
                backend = ConfigValue::new(kind, ConfigSource::File);
            }
            if let Some(document) = file_config.data_path {
                data_path = ConfigValue::new(resolve_against(&path, document), ConfigSource::File);
            }
            if let Some(file_table) = file_config.table {
                if let Some(driver) = file_table.driver {
                    table.driver = driver;
                }
                if let Some(database) = file_table.database {
                    table.database = resolve_against(&path, database);
                }
                table.server = file_table.server.or(table.server);
                table.user = file_table.user.or(table.user);
                table.password = file_table.password.or(table.password);
            }
        }

        // Apply environment variable overrides
        if let Ok(kind) = std::env::var("RECIPEBOOK_BACKEND") {
            let parsed = kind.parse().map_err(|value| ConfigError::InvalidValue {
                name: "RECIPEBOOK_BACKEND".to_string(),
                value,
            })?;
            backend = ConfigValue::new(parsed, ConfigSource::Environment);
        }
        if let Ok(document) = std::env::var("RECIPEBOOK_DATA_PATH") {
            data_path = ConfigValue::new(PathBuf::from(document), ConfigSource::Environment);
        }
        // Table env var overrides
        if let Ok(driver) = std::env::var("RECIPEBOOK_DB_DRIVER") {
            table.driver = driver;
        }
        if let Ok(server) = std::env::var("RECIPEBOOK_DB_SERVER") {
            table.server = Some(server);
        }
        if let Ok(database) = std::env::var("RECIPEBOOK_DB_DATABASE") {
            table.database = PathBuf::from(database);
        }
        if let Ok(user) = std::env::var("RECIPEBOOK_DB_USER") {
            table.user = Some(user);
        }
        if let Ok(password) = std::env::var("RECIPEBOOK_DB_PASSWORD") {
            table.password = Some(password);
        }

        Ok(Self {
            backend,
            data_path,
            table,
            config_file,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/recipebook/
    /// - macOS: ~/Library/Application Support/recipebook/
    /// - Windows: %APPDATA%/recipebook/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recipebook")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/recipebook/
    /// - macOS: ~/Library/Application Support/recipebook/
    /// - Windows: %APPDATA%/recipebook/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recipebook")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Resolve relative paths against the config file's directory
fn resolve_against(config_path: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        config_path
            .parent()
            .map(|p| p.join(&path))
            .unwrap_or(path)
    } else {
        path
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue { name: String, value: String },
    UnsupportedDriver(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue { name, value } => {
                write!(f, "Invalid value '{}' for {}", value, name)
            }
            ConfigError::UnsupportedDriver(driver) => {
                write!(
                    f,
                    "Unsupported database driver '{}' (supported: sqlite)",
                    driver
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
