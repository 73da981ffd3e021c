use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LaneConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    pub media_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub timeline_page_size: usize,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let dir = default_lane_dir();
        Self {
            db_path: dir.join("memory_lane.db").to_string_lossy().into_owned(),
            media_dir: dir.join("media").to_string_lossy().into_owned(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            timeline_page_size: 20,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Returns `~/.memory-lane/`
pub fn default_lane_dir() -> PathBuf {
    home_dir().join(".memory-lane")
}

/// Returns the default config file path: `~/.memory-lane/config.toml`
pub fn default_config_path() -> PathBuf {
    default_lane_dir().join("config.toml")
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl LaneConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            LaneConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (MEMORY_LANE_DB, MEMORY_LANE_MEDIA_DIR,
    /// MEMORY_LANE_HOST, MEMORY_LANE_PORT, MEMORY_LANE_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MEMORY_LANE_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("MEMORY_LANE_MEDIA_DIR") {
            self.storage.media_dir = val;
        }
        if let Ok(val) = std::env::var("MEMORY_LANE_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("MEMORY_LANE_PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %val, "ignoring invalid MEMORY_LANE_PORT"),
            }
        }
        if let Ok(val) = std::env::var("MEMORY_LANE_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    /// Resolve the media root, expanding `~` if needed.
    pub fn resolved_media_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.media_dir)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LaneConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.api.timeline_page_size, 20);
        assert!(config.storage.db_path.ends_with("memory_lane.db"));
        assert!(config.storage.media_dir.ends_with("media"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"
port = 8080

[storage]
db_path = "/tmp/lane.db"

[api]
timeline_page_size = 5
"#;
        let config: LaneConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.db_path, "/tmp/lane.db");
        assert_eq!(config.api.timeline_page_size, 5);
        // defaults still apply for unset fields
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.api.max_upload_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = LaneConfig::default();
        std::env::set_var("MEMORY_LANE_DB", "/tmp/override.db");
        std::env::set_var("MEMORY_LANE_MEDIA_DIR", "/tmp/override-media");
        std::env::set_var("MEMORY_LANE_PORT", "not-a-port");
        std::env::set_var("MEMORY_LANE_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.storage.media_dir, "/tmp/override-media");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.log_level, "trace");

        std::env::remove_var("MEMORY_LANE_DB");
        std::env::remove_var("MEMORY_LANE_MEDIA_DIR");
        std::env::remove_var("MEMORY_LANE_PORT");
        std::env::remove_var("MEMORY_LANE_LOG_LEVEL");
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/var/lane.db"), PathBuf::from("/var/lane.db"));
        assert!(expand_tilde("~/lane.db").ends_with("lane.db"));
    }
}
