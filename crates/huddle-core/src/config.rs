// Configuration loading and parsing (config/huddle.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::persistence::DEFAULT_SNAPSHOT_KEY;
use crate::roster::{NamePolicy, DEFAULT_MAX_NAME_LEN};

/// Name of the config file inside `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "huddle.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },

    #[error("no usable data directory for the database: {message}")]
    DataDirUnavailable { message: String },
}

// ---------------------------------------------------------------------------
// huddle.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub roster: RosterConfig,
    pub teams: TeamsConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Longest name the add and edit inputs accept, in characters.
    pub max_name_len: usize,
}

impl Default for RosterConfig {
    fn default() -> Self {
        RosterConfig {
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

impl RosterConfig {
    pub fn name_policy(&self) -> NamePolicy {
        NamePolicy::with_max_len(self.max_name_len)
    }
}

/// Bounds on the team count the frontend offers. The partitioner itself
/// accepts any count.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TeamsConfig {
    pub default_count: usize,
    pub min_count: usize,
    pub max_count: usize,
}

impl Default for TeamsConfig {
    fn default() -> Self {
        TeamsConfig {
            default_count: 3,
            min_count: 2,
            max_count: 10,
        }
    }
}

impl TeamsConfig {
    /// Clamp a requested count into `[min_count, max_count]`.
    pub fn clamp(&self, count: usize) -> usize {
        count.clamp(self.min_count, self.max_count)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key the roster snapshot is stored under.
    pub snapshot_key: String,
    /// Database file. When absent the platform data directory is used.
    pub db_path: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
            db_path: None,
        }
    }
}

impl StorageConfig {
    /// The configured database path, or `huddle.db` under the platform data
    /// directory (created if missing).
    pub fn resolve_db_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.db_path {
            return Ok(PathBuf::from(path));
        }

        let dirs = directories::ProjectDirs::from("", "", "huddle").ok_or_else(|| {
            ConfigError::DataDirUnavailable {
                message: "could not determine a home directory".into(),
            }
        })?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|e| ConfigError::DataDirUnavailable {
            message: format!("failed to create {}: {e}", data_dir.display()),
        })?;
        Ok(data_dir.join("huddle.db"))
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/huddle.toml` relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config = parse_config(&text).map_err(|source| ConfigError::ParseError {
        path: path.clone(),
        source,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Parse config text without validating it.
pub fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

/// Ensure `config/huddle.toml` exists by copying it from `defaults/`.
/// Returns the list of files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let source = defaults_dir.join(CONFIG_FILE);
    let target = config_dir.join(CONFIG_FILE);
    if !source.is_file() {
        return Ok(vec![]);
    }

    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            let content = std::fs::read(&source).map_err(|e| ConfigError::DefaultsCopyError {
                message: format!("failed to read {}: {e}", source.display()),
            })?;
            std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                ConfigError::DefaultsCopyError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            Ok(vec![target])
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(vec![]),
        Err(e) => Err(ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

/// Convenience wrapper: loads config relative to the current working
/// directory. Falls back to built-in defaults when neither `defaults/` nor
/// `config/` is present.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    match ensure_config_files(&cwd) {
        Ok(_) => {}
        Err(ConfigError::DefaultsCopyError { .. })
            if !cwd.join("defaults").exists() && !cwd.join("config").exists() =>
        {
            return Ok(Config::default());
        }
        Err(e) => return Err(e),
    }
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.roster.max_name_len == 0 {
        return Err(ConfigError::ValidationError {
            field: "roster.max_name_len".into(),
            message: "must be greater than 0".into(),
        });
    }

    let teams = &config.teams;
    if teams.min_count == 0 {
        return Err(ConfigError::ValidationError {
            field: "teams.min_count".into(),
            message: "must be greater than 0".into(),
        });
    }
    if teams.min_count > teams.max_count {
        return Err(ConfigError::ValidationError {
            field: "teams.max_count".into(),
            message: format!(
                "must be >= teams.min_count ({}), got {}",
                teams.min_count, teams.max_count
            ),
        });
    }
    if !(teams.min_count..=teams.max_count).contains(&teams.default_count) {
        return Err(ConfigError::ValidationError {
            field: "teams.default_count".into(),
            message: format!(
                "must be between {} and {} inclusive, got {}",
                teams.min_count, teams.max_count, teams.default_count
            ),
        });
    }

    if config.storage.snapshot_key.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "storage.snapshot_key".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
