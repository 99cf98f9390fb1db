//! Shell configuration

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::route::RouteTable;

/// Client-side application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Id of the element the application mounts into
    #[serde(default = "default_mount_id")]
    pub mount_id: String,
    /// Where the user is sent when their session ends
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Shown when a component fails without a message
    #[serde(default = "default_generic_error")]
    pub generic_error_message: String,
    /// How long a toast stays on screen
    #[serde(default = "default_toast_timeout")]
    pub toast_timeout_ms: u32,
    /// Base URL of the vault server API
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_mount_id() -> String {
    "app".to_string()
}

fn default_login_path() -> String {
    "/".to_string()
}

fn default_generic_error() -> String {
    "An error occurred in a component".to_string()
}

fn default_toast_timeout() -> u32 {
    4000
}

fn default_api_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            mount_id: default_mount_id(),
            login_path: default_login_path(),
            generic_error_message: default_generic_error(),
            toast_timeout_ms: default_toast_timeout(),
            api_url: default_api_url(),
        }
    }
}

impl ShellConfig {
    /// Parse a JSON document, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Check the settings against the route table
    pub fn validate(&self, routes: &RouteTable) -> Result<()> {
        if self.mount_id.is_empty() {
            return Err(Error::Config("mount_id must not be empty".to_string()));
        }
        if routes.resolve(&self.login_path).is_none() {
            return Err(Error::Config(format!(
                "login_path '{}' is not a declared route",
                self.login_path
            )));
        }
        Ok(())
    }
}
