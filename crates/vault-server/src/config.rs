//! Configuration loading and management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Externally visible base URL, used to build avatar links
    #[serde(default = "default_public_url")]
    pub public_url: String,
    /// Largest accepted request body (avatar uploads)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding users.json, passwords.json and profiles.json
    #[serde(default = "default_data_dir")]
    pub data_directory: PathBuf,
    #[serde(default = "default_upload_dir")]
    pub upload_directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Built web client (index.html, wasm and js bundles)
    #[serde(default = "default_dist_dir")]
    pub dist_directory: PathBuf,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_public_url() -> String {
    format!("http://{}:{}", default_host(), default_port())
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("frontend/dist")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: default_public_url(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_dir(),
            upload_directory: default_upload_dir(),
        }
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            dist_directory: default_dist_dir(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let config_paths: Vec<PathBuf> = vec![
            Some(PathBuf::from("config.toml")),
            Some(PathBuf::from("vault.toml")),
            dirs_config_path(),
        ]
        .into_iter()
        .flatten()
        .collect();

        for path in config_paths {
            if path.exists() {
                let content = std::fs::read_to_string(&path)?;
                let config = Self::from_toml(&content)?;
                tracing::info!("Loaded config from {:?}", path);
                return Ok(config);
            }
        }

        tracing::info!("Using default configuration");
        Ok(Config::default())
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Public URL without a trailing slash
    pub fn public_url(&self) -> &str {
        self.server.public_url.trim_end_matches('/')
    }
}

fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vault").join("config.toml"))
}

/// Helper to get user's config directory
mod dirs {
    use std::path::PathBuf;

    pub fn config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_CONFIG_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".config"))
                })
        }

        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library").join("Application Support"))
        }

        #[cfg(target_os = "windows")]
        {
            std::env::var("APPDATA").ok().map(PathBuf::from)
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.data_directory, PathBuf::from("data"));
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 5000
            public_url = "https://vault.example/"

            [storage]
            upload_directory = "/var/lib/vault/uploads"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.public_url(), "https://vault.example");
        assert_eq!(
            config.storage.upload_directory,
            PathBuf::from("/var/lib/vault/uploads")
        );
        assert_eq!(config.storage.data_directory, PathBuf::from("data"));
    }
}
