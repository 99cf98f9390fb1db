//! File-backed account, password and profile storage
//!
//! Each collection lives in its own JSON document under the data directory.
//! Documents are read once at startup and rewritten in full on every
//! mutation, through a temporary file and a rename.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use vault_core::api::{Profile, ServiceCredential};

const USERS_FILE: &str = "users.json";
const PASSWORDS_FILE: &str = "passwords.json";
const PROFILES_FILE: &str = "profiles.json";

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Documents {
    users: Vec<UserRecord>,
    passwords: Vec<ServiceCredential>,
    profiles: Vec<Profile>,
}

pub struct Store {
    dir: PathBuf,
    docs: RwLock<Documents>,
}

impl Store {
    /// Open the store, creating the directory and empty documents as needed
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        let docs = Documents {
            users: load_or_create(&dir.join(USERS_FILE)).await?,
            passwords: load_or_create(&dir.join(PASSWORDS_FILE)).await?,
            profiles: load_or_create(&dir.join(PROFILES_FILE)).await?,
        };

        tracing::info!(
            "Opened store at {:?}: {} users, {} passwords, {} profiles",
            dir,
            docs.users.len(),
            docs.passwords.len(),
            docs.profiles.len()
        );

        Ok(Self {
            dir,
            docs: RwLock::new(docs),
        })
    }

    pub async fn user(&self, username: &str) -> Option<UserRecord> {
        let docs = self.docs.read().await;
        docs.users.iter().find(|u| u.username == username).cloned()
    }

    /// Add an account; returns `false` if the username is taken
    pub async fn add_user(
        &self,
        username: &str,
        password_hash: String,
    ) -> Result<bool, StoreError> {
        let mut docs = self.docs.write().await;
        if docs.users.iter().any(|u| u.username == username) {
            return Ok(false);
        }

        let mut users = docs.users.clone();
        users.push(UserRecord {
            username: username.to_string(),
            password_hash,
            created_at: Utc::now(),
        });
        persist(&self.dir.join(USERS_FILE), &users).await?;
        docs.users = users;
        Ok(true)
    }

    pub async fn passwords(&self, username: &str) -> Vec<ServiceCredential> {
        let docs = self.docs.read().await;
        docs.passwords
            .iter()
            .filter(|p| p.username == username)
            .cloned()
            .collect()
    }

    pub async fn add_password(&self, credential: ServiceCredential) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        let mut passwords = docs.passwords.clone();
        passwords.push(credential);
        persist(&self.dir.join(PASSWORDS_FILE), &passwords).await?;
        docs.passwords = passwords;
        Ok(())
    }

    /// Remove every entry for the service; returns how many were removed
    pub async fn delete_password(
        &self,
        username: &str,
        service: &str,
    ) -> Result<usize, StoreError> {
        let mut docs = self.docs.write().await;
        let mut passwords = docs.passwords.clone();
        passwords.retain(|p| p.username != username || p.service != service);
        let removed = docs.passwords.len() - passwords.len();

        if removed > 0 {
            persist(&self.dir.join(PASSWORDS_FILE), &passwords).await?;
            docs.passwords = passwords;
        }
        Ok(removed)
    }

    /// Replace the password of every entry for the service
    ///
    /// Returns `false` when the user has no entry for that service.
    pub async fn update_password(
        &self,
        username: &str,
        service: &str,
        new_password: &str,
    ) -> Result<bool, StoreError> {
        let mut docs = self.docs.write().await;
        let mut passwords = docs.passwords.clone();
        let mut updated = false;
        for entry in passwords
            .iter_mut()
            .filter(|p| p.username == username && p.service == service)
        {
            entry.password = new_password.to_string();
            updated = true;
        }

        if updated {
            persist(&self.dir.join(PASSWORDS_FILE), &passwords).await?;
            docs.passwords = passwords;
        }
        Ok(updated)
    }

    pub async fn profile(&self, username: &str) -> Option<Profile> {
        let docs = self.docs.read().await;
        docs.profiles.iter().find(|p| p.username == username).cloned()
    }

    /// Insert or replace the profile for `profile.username`
    pub async fn upsert_profile(&self, profile: Profile) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        let mut profiles = docs.profiles.clone();
        match profiles.iter_mut().find(|p| p.username == profile.username) {
            Some(existing) => *existing = profile,
            None => profiles.push(profile),
        }
        persist(&self.dir.join(PROFILES_FILE), &profiles).await?;
        docs.profiles = profiles;
        Ok(())
    }
}

async fn load_or_create<T>(path: &Path) -> Result<Vec<T>, StoreError>
where
    T: Serialize + DeserializeOwned,
{
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let empty: Vec<T> = Vec::new();
            persist(path, &empty).await?;
            Ok(empty)
        }
        Err(e) => Err(e.into()),
    }
}

async fn persist<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
