//! Route table and history-based navigation
//!
//! The table is a fixed, ordered list of `(path, view)` pairs. Resolution is an
//! exact string comparison; there is no wildcard or fallback entry, so a path
//! that is not declared resolves to nothing.

use std::cell::RefCell;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A routed top-level view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    /// Login and registration
    UserAuth,
    /// Stored credentials for the signed-in user
    PasswordManager,
    /// Random password generator
    PasswordGenerator,
    /// Account profile
    UserProfile,
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserAuth => "UserAuth",
            Self::PasswordManager => "PasswordManager",
            Self::PasswordGenerator => "PasswordGenerator",
            Self::UserProfile => "UserProfile",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single `(path, view)` binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: &'static str,
    pub view: View,
}

/// The routes the application declares, in match order
pub const ROUTES: [RouteEntry; 4] = [
    RouteEntry {
        path: "/",
        view: View::UserAuth,
    },
    RouteEntry {
        path: "/manager",
        view: View::PasswordManager,
    },
    RouteEntry {
        path: "/generator",
        view: View::PasswordGenerator,
    },
    RouteEntry {
        path: "/profile",
        view: View::UserProfile,
    },
];

/// Ordered route table with exact-match resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Build a table, rejecting duplicate paths and paths without a leading `/`
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self> {
        for (idx, entry) in entries.iter().enumerate() {
            if !entry.path.starts_with('/') {
                return Err(Error::InvalidRouteTable(format!(
                    "path '{}' must start with '/'",
                    entry.path
                )));
            }
            if entries[..idx].iter().any(|e| e.path == entry.path) {
                return Err(Error::InvalidRouteTable(format!(
                    "duplicate path '{}'",
                    entry.path
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Look up the view bound to exactly `path`
    pub fn resolve(&self, path: &str) -> Option<View> {
        self.entries
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| entry.view)
    }

    /// Path a view is mounted at
    pub fn path_of(&self, view: View) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|entry| entry.view == view)
            .map(|entry| entry.path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.path)
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            entries: ROUTES.to_vec(),
        }
    }
}

/// Address/history stack of the host environment
pub trait History {
    /// Path of the current location
    fn current_path(&self) -> String;

    /// Push a new entry onto the stack and make it current
    fn push(&self, path: &str);
}

/// In-process history stack, used off the browser and in tests
#[derive(Debug)]
pub struct MemoryHistory {
    stack: RefCell<Vec<String>>,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            stack: RefCell::new(vec![initial.into()]),
        }
    }

    /// Every entry pushed so far, oldest first
    pub fn entries(&self) -> Vec<String> {
        self.stack.borrow().clone()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn current_path(&self) -> String {
        self.stack.borrow().last().cloned().unwrap_or_else(|| "/".to_string())
    }

    fn push(&self, path: &str) {
        self.stack.borrow_mut().push(path.to_string());
    }
}
