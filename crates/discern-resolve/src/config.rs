use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for discern.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (DISCERN_* prefix)
/// 3. Config file (~/.config/discern/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Apple Music developer token (required for catalog access).
    ///
    /// Can be set via:
    /// - ENV: DISCERN_APPLE_MUSIC_TOKEN
    /// - Config: apple_music_token = "..."
    pub apple_music_token: Option<String>,

    /// Apple Music storefront (country code).
    #[serde(default = "default_storefront")]
    pub storefront: String,

    /// Base URL of the AI studio-album service. Discographies are still
    /// classified without it, just with less help for electronic artists.
    ///
    /// Can be set via:
    /// - ENV: DISCERN_STUDIO_ALBUMS_ENDPOINT
    pub studio_albums_endpoint: Option<String>,

    /// Catalog request rate.
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Maximum number of cached searches. Zero disables the bound.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Default `--limit` for searches.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Default `--min-confidence` for searches.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Logger options, passed straight to twyg.
    #[serde(default)]
    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            apple_music_token: None,
            storefront: default_storefront(),
            studio_albums_endpoint: None,
            requests_per_second: default_requests_per_second(),
            cache_capacity: default_cache_capacity(),
            search_limit: default_search_limit(),
            min_confidence: default_min_confidence(),
            logging: twyg::Opts::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/discern/config.toml
    /// Reads environment variables with DISCERN_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new()
            .context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path.to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder.add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("discern");
        builder.add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build()
            .context("Failed to build configuration")?;

        Ok(config)
    }

    /// The developer token, or an error naming the setting to fill in.
    pub fn require_apple_music_token(&self) -> crate::ResolveResult<&str> {
        self.apple_music_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| crate::ResolveError::MissingCredentials {
                source_name: "Apple Music".to_string(),
                setting: "DISCERN_APPLE_MUSIC_TOKEN".to_string(),
            })
    }
}

fn default_storefront() -> String {
    "us".to_string()
}

fn default_requests_per_second() -> u32 {
    20
}

fn default_cache_capacity() -> usize {
    512
}

fn default_search_limit() -> usize {
    50
}

fn default_min_confidence() -> f64 {
    0.35
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/discern/config.toml
/// - macOS: ~/Library/Application Support/discern/config.toml
/// - Windows: %APPDATA%\discern\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("discern")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Discern Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (DISCERN_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Apple Music developer token (a signed JWT)
# Required for searching the catalog and fetching discographies
#
# Can also be set via:
# - Environment: DISCERN_APPLE_MUSIC_TOKEN=your-token-here
#apple_music_token = "your-apple-music-developer-token"

# Storefront used for catalog lookups
storefront = "us"

# Base URL of the studio-album whitelist service
# Optional; improves classification of electronic discographies
#studio_albums_endpoint = "https://example.com"

# Catalog requests per second
requests_per_second = 20

# Number of searches kept in the in-memory cache (0 = unbounded)
cache_capacity = 512

# Search defaults (overridden by --limit and --min-confidence)
search_limit = 50
min_confidence = 0.35

# Logger options (see the twyg documentation for every key)
#[logging]
#coloured = true
#level = "info"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config())
        .context("Failed to write config file")?;

    Ok(true)
}
