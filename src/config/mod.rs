mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./flixbridge.toml",
        "~/.config/flixbridge/config.toml",
        "/etc/flixbridge/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.retry.attempts == 0 {
        anyhow::bail!("Retry attempts must be at least 1");
    }

    let base_urls = [
        ("tmdb.base_url", &config.tmdb.base_url),
        ("streams.base_url", &config.streams.base_url),
        ("skiptimes.base_url", &config.skiptimes.base_url),
    ];
    for (key, value) in base_urls {
        let url = reqwest::Url::parse(value)
            .with_context(|| format!("{key} is not a valid URL: {value}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("{key} must be an http(s) URL: {value}");
        }
    }

    if config.tmdb.api_key.is_empty() {
        tracing::warn!("No TMDB API key configured; TMDB lookups will be rejected upstream");
    }

    Ok(())
}
