//! Configuration management for fixml.
//!
//! This module provides the [`Config`] struct which controls processing
//! behavior. Configuration can be loaded from:
//! - TOML files (`fixml.toml`)
//! - CLI arguments (which override file settings)
//!
//! Config files are auto-discovered by searching parent directories from the
//! file being processed up to the filesystem root, plus the user's home
//! directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["fixml.toml"];

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    // Try HOME environment variable first (works on Unix and some Windows setups)
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    // Fallback for Windows
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

// Serde default functions
fn default_max_file_size_mb() -> u64 {
    100
}

/// Main configuration struct for fixml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Report processing as logical organization (no element reordering
    /// is performed; this only selects the status-line wording)
    #[serde(default)]
    pub organize: bool,

    /// Apply XML best-practice fixes (inject a missing XML declaration)
    #[serde(default)]
    pub fix_warnings: bool,

    /// Additional file extensions to treat as XML (on top of the defaults)
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Glob patterns for files/directories to skip
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Maximum file size in megabytes; larger files are skipped (default: 100)
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
}

/// Partial configuration for TOML parsing
///
/// All scalar fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
struct PartialConfig {
    pub organize: Option<bool>,
    pub fix_warnings: Option<bool>,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub max_file_size_mb: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            organize: false,
            fix_warnings: false,
            extensions: Vec::new(),
            exclude: Vec::new(),
            max_file_size_mb: 100,
        }
    }
}

impl Config {
    /// Maximum reasonable file size limit in megabytes
    const MAX_FILE_SIZE_MB: u64 = 4096;

    /// Validate configuration values are within reasonable bounds
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.max_file_size_mb == 0 {
            return Some("max_file_size_mb must be at least 1".to_string());
        }
        if self.max_file_size_mb > Self::MAX_FILE_SIZE_MB {
            return Some(format!(
                "max_file_size_mb {} exceeds maximum of {}",
                self.max_file_size_mb,
                Self::MAX_FILE_SIZE_MB
            ));
        }
        for ext in &self.extensions {
            if ext.contains('/') || ext.contains('\\') {
                return Some(format!(
                    "extension '{ext}' must not contain path separators"
                ));
            }
        }
        None
    }

    /// Configured file size limit in bytes
    #[must_use]
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&contents)?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = partial.organize {
            self.organize = v;
        }
        if let Some(v) = partial.fix_warnings {
            self.fix_warnings = v;
        }
        if let Some(v) = partial.max_file_size_mb {
            self.max_file_size_mb = v;
        }
        // Merge lists (entries accumulate across config levels)
        for ext in &partial.extensions {
            if !self.extensions.contains(ext) {
                self.extensions.push(ext.clone());
            }
        }
        for pattern in &partial.exclude {
            if !self.exclude.contains(pattern) {
                self.exclude.push(pattern.clone());
            }
        }
    }

    /// Discover config files from parent directories of a given path
    ///
    /// Searches from the file's directory up to the root, then adds home directory config.
    /// Returns list of config file paths in order of priority (least specific first).
    #[must_use]
    pub fn discover_config_files(start_path: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        // Add home directory config first (lowest priority)
        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        // Start from the file's parent directory (or the path itself if it's a directory)
        let start_dir = if start_path.is_file() {
            start_path.parent().map(Path::to_path_buf)
        } else if start_path.is_dir() {
            Some(start_path.to_path_buf())
        } else {
            // Path doesn't exist, use current directory
            std::env::current_dir().ok()
        };

        // Collect config files from parent directories (from root to current)
        if let Some(dir) = start_dir {
            let mut ancestors: Vec<PathBuf> = dir.ancestors().map(Path::to_path_buf).collect();
            // Reverse so we go from root to current (less specific to more specific)
            ancestors.reverse();

            for ancestor in ancestors {
                for config_name in CONFIG_FILE_NAMES {
                    let config_path = ancestor.join(config_name);
                    if config_path.is_file() && !config_files.contains(&config_path) {
                        config_files.push(config_path);
                    }
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones (only explicitly set values).
    /// Returns default config if no files found.
    #[must_use]
    pub fn from_discovered_files(start_path: &Path) -> Self {
        let config_files = Self::discover_config_files(start_path);

        if config_files.is_empty() {
            return Self::default();
        }

        let mut config = Self::default();
        for path in &config_files {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => config.apply_partial(&partial),
                    Err(e) => eprintln!("Warning: failed to parse {}: {e}", path.display()),
                },
                Err(e) => eprintln!("Warning: failed to read {}: {e}", path.display()),
            }
        }
        config
    }
}
