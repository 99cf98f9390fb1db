//! Wire types shared by the vault server and its web client

use serde::{Deserialize, Serialize};

/// Body of every status-only response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Registration and login request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub username: String,
}

/// A password stored for one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCredential {
    pub username: String,
    pub service: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavePasswordRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePasswordRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePasswordRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

/// Query string of the per-user read endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuery {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdateResponse {
    pub message: String,
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_deserialize() {
        let request: UpdatePasswordRequest =
            serde_json::from_str(r#"{"username":"alice"}"#).unwrap();
        assert_eq!(request.username.as_deref(), Some("alice"));
        assert!(request.service.is_none());
        assert!(request.new_password.is_none());
    }
}
