//! vault-core - Application shell for the vault password manager
//!
//! This crate holds everything about the web client that does not need a
//! browser: the route table, the fault model and its handlers, session storage
//! and the password generator. It compiles natively and to WebAssembly; the
//! frontend supplies browser-backed implementations of its traits.

pub mod api;
mod config;
mod error;
mod fault;
pub mod generator;
mod notify;
mod route;
mod session;
mod shell;

pub use config::ShellConfig;
pub use error::{Error, Result};
pub use fault::{ComponentError, Fault, FaultBus, FaultHandler, FaultKind, FaultReporter, HostFault};
pub use notify::{Alert, Delivery, Notification, NotificationKind, NotificationSink};
pub use route::{History, MemoryHistory, RouteEntry, RouteTable, View, ROUTES};
pub use session::{KeyValueStore, MemoryStore, SessionKey, SessionStore, Tokens};
pub use shell::{Application, Bootstrapper, RejectionOutcome, Shell};
