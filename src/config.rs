use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

/// Application configuration loaded from TOML config file.
/// All fields have sensible defaults — the config file is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Local directory holding journey.json and clips/ (used when the CLI
    /// gets no --data-dir).
    pub data_dir: Option<PathBuf>,
    /// Base URL of a deployed site to fetch journey data from instead.
    pub base_url: Option<String>,
    /// Map-service token (env var CARTOLOG_MAPBOX_TOKEN overrides).
    pub mapbox_token: Option<String>,
    /// Number of parallel clip-fetch workers. 0 = auto-detect (cores / 2, min 1).
    pub workers: usize,
}

impl AppConfig {
    /// Load config from `~/.config/cartolog/config.toml`.
    /// Returns default config if file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match config_path {
            Some(path) if path.exists() => match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Resolve worker count: 0 → auto-detect (cores / 2, min 1).
    pub fn resolve_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            let cores = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(2);
            (cores / 2).max(1)
        }
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: AppConfig = toml::from_str(
            r#"
            data_dir = "/srv/journey/public/data"
            base_url = "https://journey.example.com"
            mapbox_token = "pk.test"
            workers = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir.clone().unwrap(), PathBuf::from("/srv/journey/public/data"));
        assert_eq!(config.base_url.as_deref(), Some("https://journey.example.com"));
        assert_eq!(config.workers, 4);
        assert_eq!(config.resolve_workers(), 4);
    }

    #[test]
    fn empty_config_gives_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.data_dir.is_none());
        assert!(config.base_url.is_none());
        assert!(config.mapbox_token.is_none());
        assert!(config.resolve_workers() >= 1);
    }
}
