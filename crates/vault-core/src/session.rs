//! Session values kept in persistent key-value storage

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::{Error, Result};

/// Keys the session occupies in persistent storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKey {
    AccessToken,
    RefreshToken,
    Username,
}

impl SessionKey {
    pub const ALL: [SessionKey; 3] = [Self::AccessToken, Self::RefreshToken, Self::Username];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::RefreshToken => "refresh_token",
            Self::Username => "username",
        }
    }
}

/// String-keyed, string-valued persistent storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store, used off the browser and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// Access/refresh token pair issued by a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    pub access: String,
    pub refresh: String,
}

/// The signed-in user's session
#[derive(Clone)]
pub struct SessionStore {
    backend: Rc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(backend: Rc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Username of the signed-in user
    pub fn username(&self) -> Option<String> {
        match self.backend.get(SessionKey::Username.as_str()) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                log::warn!("Failed to read session username: {}", e);
                None
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.username().is_some()
    }

    pub fn get(&self, key: SessionKey) -> Result<Option<String>> {
        self.backend.get(key.as_str())
    }

    /// Record a successful login
    pub fn begin(&self, username: &str, tokens: Option<&Tokens>) -> Result<()> {
        if let Some(tokens) = tokens {
            self.backend
                .set(SessionKey::AccessToken.as_str(), &tokens.access)?;
            self.backend
                .set(SessionKey::RefreshToken.as_str(), &tokens.refresh)?;
        }
        self.backend.set(SessionKey::Username.as_str(), username)
    }

    /// Remove every session key as one operation
    ///
    /// If any removal fails, the keys already removed are written back before
    /// the error is returned, so the store never holds a partial session.
    pub fn clear(&self) -> Result<()> {
        let mut removed: Vec<(SessionKey, String)> = Vec::with_capacity(SessionKey::ALL.len());

        for key in SessionKey::ALL {
            let outcome = self.backend.get(key.as_str()).and_then(|previous| {
                match previous {
                    Some(value) => {
                        self.backend.remove(key.as_str())?;
                        Ok(Some(value))
                    }
                    None => Ok(None),
                }
            });

            match outcome {
                Ok(Some(value)) => removed.push((key, value)),
                Ok(None) => {}
                Err(e) => {
                    let restored = self.restore(&removed);
                    return Err(Error::SessionClear {
                        key: key.as_str(),
                        reason: e.to_string(),
                        restored,
                    });
                }
            }
        }

        log::debug!("Session cleared ({} key(s) removed)", removed.len());
        Ok(())
    }

    fn restore(&self, removed: &[(SessionKey, String)]) -> usize {
        removed
            .iter()
            .filter(|(key, value)| match self.backend.set(key.as_str(), value) {
                Ok(()) => true,
                Err(e) => {
                    log::error!("Failed to restore session key {}: {}", key.as_str(), e);
                    false
                }
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Store that refuses to remove one key
    struct StuckStore {
        inner: MemoryStore,
        stuck: &'static str,
    }

    impl KeyValueStore for StuckStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            if key == self.stuck {
                return Err(Error::Storage("quota exceeded".to_string()));
            }
            self.inner.remove(key)
        }
    }

    fn tokens() -> Tokens {
        Tokens {
            access: "a-1".to_string(),
            refresh: "r-1".to_string(),
        }
    }

    #[test]
    fn test_begin_and_clear() {
        let store = Rc::new(MemoryStore::new());
        let session = SessionStore::new(store.clone());

        session.begin("alice", Some(&tokens())).unwrap();
        assert_eq!(session.username(), Some("alice".to_string()));
        assert_eq!(store.len(), 3);

        session.clear().unwrap();
        assert!(!session.is_active());
        for key in SessionKey::ALL {
            assert!(!store.contains(key.as_str()));
        }
    }

    #[test]
    fn test_clear_leaves_other_keys() {
        let store = Rc::new(MemoryStore::new());
        store.set("theme", "dark").unwrap();
        let session = SessionStore::new(store.clone());
        session.begin("bob", None).unwrap();

        session.clear().unwrap();
        assert!(store.contains("theme"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_on_empty_store() {
        let session = SessionStore::new(Rc::new(MemoryStore::new()));
        assert!(session.clear().is_ok());
    }

    #[test]
    fn test_failed_clear_restores_removed_keys() {
        let store = Rc::new(StuckStore {
            inner: MemoryStore::new(),
            stuck: "username",
        });
        let session = SessionStore::new(store.clone());
        session.begin("carol", Some(&tokens())).unwrap();

        let err = session.clear().unwrap_err();
        assert_eq!(
            err,
            Error::SessionClear {
                key: "username",
                reason: "Storage error: quota exceeded".to_string(),
                restored: 2,
            }
        );
        assert_eq!(
            session.get(SessionKey::AccessToken).unwrap(),
            Some("a-1".to_string())
        );
        assert_eq!(
            session.get(SessionKey::RefreshToken).unwrap(),
            Some("r-1".to_string())
        );
        assert_eq!(session.username(), Some("carol".to_string()));
    }
}
