//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/gisty/gisty.toml` (or an explicit `--config` file)
//! 3. Environment variables: `GISTY_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Upper bound GitHub's GraphQL API accepts for `comments(last: n)`.
pub const MAX_COMMENTS_LIMIT: u32 = 100;

/// Unified configuration for gisty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// `gh` executable (name on $PATH or absolute path)
    pub gh_command: String,
    /// Default number of gists fetched by `list`
    pub list_limit: u32,
    /// Number of most recent comments fetched by `comments`
    pub max_comments: u32,
    /// Append ` (file: .., line: ..)` to error messages
    pub annotate_errors: bool,
    /// Default parent directory for `clone`
    pub clone_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gh_command: "gh".into(),
            list_limit: 10,
            max_comments: MAX_COMMENTS_LIMIT,
            annotate_errors: true,
            clone_dir: None,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, keep base).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub gh_command: Option<String>,
    pub list_limit: Option<u32>,
    pub max_comments: Option<u32>,
    pub annotate_errors: Option<bool>,
    pub clone_dir: Option<PathBuf>,
}

/// Get the XDG config directory for gisty.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gisty").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("gisty.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input untouched on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Comment window actually sent to the API (1..=100).
    pub fn comment_window(&self) -> u32 {
        self.max_comments.clamp(1, MAX_COMMENTS_LIMIT)
    }

    fn expand_paths(&mut self) {
        self.gh_command = expand_env_vars(&self.gh_command);
        if let Some(dir) = &self.clone_dir {
            self.clone_dir = Some(PathBuf::from(expand_env_vars(
                dir.to_string_lossy().as_ref(),
            )));
        }
    }

    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            gh_command: overlay
                .gh_command
                .clone()
                .unwrap_or_else(|| self.gh_command.clone()),
            list_limit: overlay.list_limit.unwrap_or(self.list_limit),
            max_comments: overlay.max_comments.unwrap_or(self.max_comments),
            annotate_errors: overlay.annotate_errors.unwrap_or(self.annotate_errors),
            clone_dir: overlay
                .clone_dir
                .clone()
                .or_else(|| self.clone_dir.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit config file replacing the global one
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. `config_file` if given, else `$XDG_CONFIG_HOME/gisty/gisty.toml` if present
    /// 3. Environment variables: `GISTY_*` prefix
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        match config_file {
            Some(path) => {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        let raw = load_raw_settings(&global_path)?;
                        current = current.merge_with(&raw);
                    }
                }
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply GISTY_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("GISTY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value::<String>(&config, "gh_command")? {
            settings.gh_command = val;
        }
        if let Some(val) = env_value::<u32>(&config, "list_limit")? {
            settings.list_limit = val;
        }
        if let Some(val) = env_value::<u32>(&config, "max_comments")? {
            settings.max_comments = val;
        }
        if let Some(val) = env_value::<bool>(&config, "annotate_errors")? {
            settings.annotate_errors = val;
        }
        if let Some(val) = env_value::<String>(&config, "clone_dir")? {
            settings.clone_dir = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# gisty configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/gisty/gisty.toml  (or --config <file>)
#   Env:    GISTY_* environment variables (explicit overrides)
#
# Authentication is handled by gh itself (gh auth login, GH_TOKEN, GITHUB_TOKEN).

# gh executable, name on $PATH or absolute path
# gh_command = "gh"

# Default number of gists shown by `gisty list`
# list_limit = 10

# Number of most recent comments fetched by `gisty comments` (1..=100)
# max_comments = 100

# Append " (file: <name>, line: <n>)" to error messages
# annotate_errors = true

# Default parent directory for `gisty clone`
# clone_dir = "~/gists"
"#
        .to_string()
    }
}

/// Unset is `None`; a value that does not parse is an error, not a silent default.
fn env_value<T: DeserializeOwned>(config: &Config, key: &str) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!("GISTY_{}: {e}", key.to_uppercase()),
        }),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
