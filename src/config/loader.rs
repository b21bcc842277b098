//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "REVIEWS_FEED_CONFIG";

/// Environment variable overriding the reviews endpoint.
pub const URL_ENV_VAR: &str = "REVIEWS_FEED_URL";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/reviews-feed/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Reviews requested per page.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// How many viewport heights from the end of the list trigger the next page.
    #[serde(default)]
    pub screens_to_load_next_page: Option<f64>,

    /// HTTP endpoint serving review pages.
    #[serde(default)]
    pub reviews_url: Option<String>,

    /// Local JSON file with the whole review collection.
    #[serde(default)]
    pub reviews_file: Option<PathBuf>,

    /// Directory for the image disk tier.
    #[serde(default)]
    pub image_cache_dir: Option<PathBuf>,

    /// Byte budget of the image memory tier.
    #[serde(default)]
    pub memory_cache_limit_bytes: Option<usize>,

    /// Network request timeout in seconds.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Reviews requested per page.
    pub page_size: usize,
    /// Pagination trigger distance in viewport heights.
    pub screens_to_load_next_page: f64,
    /// HTTP endpoint, if any.
    pub reviews_url: Option<String>,
    /// Local collection file, if any.
    pub reviews_file: Option<PathBuf>,
    /// Image disk tier directory.
    pub image_cache_dir: PathBuf,
    /// Image memory tier budget in bytes.
    pub memory_cache_limit_bytes: usize,
    /// Network request timeout.
    pub request_timeout: Duration,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

/// Default page size.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Default trigger distance: two and a half screens before the end.
pub const DEFAULT_SCREENS_TO_LOAD_NEXT_PAGE: f64 = 2.5;

/// Default memory tier budget (100 MiB).
pub const DEFAULT_MEMORY_CACHE_LIMIT_BYTES: usize = 100 * 1024 * 1024;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            screens_to_load_next_page: DEFAULT_SCREENS_TO_LOAD_NEXT_PAGE,
            reviews_url: None,
            reviews_file: None,
            image_cache_dir: default_image_cache_dir(),
            memory_cache_limit_bytes: DEFAULT_MEMORY_CACHE_LIMIT_BYTES,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/reviews-feed/reviews-feed.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("reviews-feed").join("reviews-feed.log")
    } else {
        PathBuf::from("reviews-feed.log")
    }
}

/// Resolve default image disk tier directory.
///
/// Returns `~/.cache/reviews-feed/images` on Linux, falling back to a
/// relative `.cache` directory.
pub fn default_image_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("reviews-feed")
        .join("images")
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
/// Returns `Err` if file exists but cannot be read or parsed.
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/reviews-feed/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("reviews-feed").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (like CLI `--config`)
/// 2. `REVIEWS_FEED_CONFIG` environment variable
/// 3. Default path `~/.config/reviews-feed/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(format!("{CONFIG_ENV_VAR} is empty")));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `REVIEWS_FEED_URL`: Override the reviews endpoint (replaces a configured file)
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(url) = std::env::var(URL_ENV_VAR) {
        if !url.is_empty() {
            config.reviews_url = Some(url);
            config.reviews_file = None;
        }
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
/// A zero page size or a non-positive trigger distance falls back to the default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        page_size: config
            .page_size
            .filter(|&size| size > 0)
            .unwrap_or(defaults.page_size),
        screens_to_load_next_page: config
            .screens_to_load_next_page
            .filter(|&screens| screens.is_finite() && screens > 0.0)
            .unwrap_or(defaults.screens_to_load_next_page),
        reviews_url: config.reviews_url.or(defaults.reviews_url),
        reviews_file: config.reviews_file.or(defaults.reviews_file),
        image_cache_dir: config.image_cache_dir.unwrap_or(defaults.image_cache_dir),
        memory_cache_limit_bytes: config
            .memory_cache_limit_bytes
            .unwrap_or(defaults.memory_cache_limit_bytes),
        request_timeout: config
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    page_size_override: Option<usize>,
    url_override: Option<String>,
    file_override: Option<PathBuf>,
) -> ResolvedConfig {
    if let Some(page_size) = page_size_override.filter(|&size| size > 0) {
        config.page_size = page_size;
    }

    // An explicit source on the command line replaces whichever source the
    // file or environment selected.
    if let Some(url) = url_override {
        config.reviews_url = Some(url);
        config.reviews_file = None;
    }

    if let Some(file) = file_override {
        config.reviews_file = Some(file);
        config.reviews_url = None;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

#[cfg(test)]
mod log_path_tests {
    use super::*;

    #[test]
    fn default_log_path_ends_with_log_file_name() {
        let path = default_log_path();
        assert!(
            path.to_string_lossy().ends_with("reviews-feed.log"),
            "Default log path should end with 'reviews-feed.log', got: {:?}",
            path
        );
    }

    #[test]
    fn default_image_cache_dir_ends_with_images() {
        let path = default_image_cache_dir();
        assert!(path.ends_with("reviews-feed/images"), "got: {:?}", path);
    }

    #[test]
    fn config_file_log_path_overrides_default() {
        let custom_path = PathBuf::from("/custom/path/to/app.log");
        let config_file = ConfigFile {
            log_file_path: Some(custom_path.clone()),
            ..ConfigFile::default()
        };

        let resolved = merge_config(Some(config_file));
        assert_eq!(
            resolved.log_file_path, custom_path,
            "Config file log_file_path should override default"
        );
    }

    #[test]
    fn missing_config_file_log_path_uses_default() {
        let resolved = merge_config(Some(ConfigFile::default()));
        assert_eq!(
            resolved.log_file_path,
            default_log_path(),
            "Missing log_file_path in config should use default"
        );
    }
}
