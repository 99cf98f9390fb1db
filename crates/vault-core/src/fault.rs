//! Fault model and the host fault-reporting interface
//!
//! Two kinds of failure reach the shell: errors raised while rendering a
//! component, and asynchronous operations that failed with nobody awaiting
//! them. Both are delivered through a [`FaultReporter`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Classification of an asynchronous failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// The session existed but is no longer accepted
    SessionExpired,
    /// The request carried no usable identity
    NotAuthenticated,
    /// Any other failure
    Other,
}

impl FaultKind {
    /// Whether the fault should tear down the session
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::NotAuthenticated)
    }
}

/// A failed asynchronous operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    pub kind: FaultKind,
    pub message: Option<String>,
}

impl Fault {
    pub fn new(kind: FaultKind, message: Option<String>) -> Self {
        Self { kind, message }
    }

    pub fn session_expired() -> Self {
        Self::new(FaultKind::SessionExpired, Some("Session expired".to_string()))
    }

    pub fn not_authenticated() -> Self {
        Self::new(
            FaultKind::NotAuthenticated,
            Some("Not authenticated".to_string()),
        )
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Other, Some(message.into()))
    }

    /// Classify a failed HTTP exchange by status code
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let kind = match status {
            401 => FaultKind::NotAuthenticated,
            403 => FaultKind::SessionExpired,
            _ => FaultKind::Other,
        };
        Self::new(kind, message.filter(|m| !m.is_empty()))
    }

    /// Message, treating an empty string as absent
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "{:?}: {}", self.kind, message),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl std::error::Error for Fault {}

/// An unrecovered error raised inside the view tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentError {
    pub message: Option<String>,
    /// Name of the component that raised it
    pub component: String,
    /// Lifecycle phase or other host detail
    pub info: String,
}

impl ComponentError {
    pub fn new(
        message: Option<String>,
        component: impl Into<String>,
        info: impl Into<String>,
    ) -> Self {
        Self {
            message,
            component: component.into(),
            info: info.into(),
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

/// Anything the host reports to the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostFault {
    Component(ComponentError),
    Rejection(Fault),
}

pub type FaultHandler = Rc<dyn Fn(&HostFault)>;

/// Host-provided subscription point for uncaught failures
pub trait FaultReporter {
    fn on_fault(&self, handler: FaultHandler);
}

/// Single-threaded fan-out of host faults to every subscriber
#[derive(Clone, Default)]
pub struct FaultBus {
    handlers: Rc<RefCell<Vec<FaultHandler>>>,
}

impl FaultBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch a fault to every subscriber, returning how many saw it
    ///
    /// Handlers may report further faults while being called.
    pub fn report(&self, fault: HostFault) -> usize {
        let handlers: Vec<FaultHandler> = self.handlers.borrow().clone();
        if handlers.is_empty() {
            log::warn!("No fault handler installed, dropping: {:?}", fault);
        }
        for handler in &handlers {
            handler(&fault);
        }
        handlers.len()
    }

    pub fn report_rejection(&self, fault: Fault) -> usize {
        self.report(HostFault::Rejection(fault))
    }

    pub fn report_component_error(&self, error: ComponentError) -> usize {
        self.report(HostFault::Component(error))
    }
}

impl FaultReporter for FaultBus {
    fn on_fault(&self, handler: FaultHandler) {
        self.handlers.borrow_mut().push(handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_auth_failure_kinds() {
        assert!(FaultKind::SessionExpired.is_auth_failure());
        assert!(FaultKind::NotAuthenticated.is_auth_failure());
        assert!(!FaultKind::Other.is_auth_failure());
    }

    #[test]
    fn test_from_status() {
        assert_eq!(
            Fault::from_status(401, None).kind,
            FaultKind::NotAuthenticated
        );
        assert_eq!(
            Fault::from_status(403, Some("Unauthorized".into())).kind,
            FaultKind::SessionExpired
        );
        let other = Fault::from_status(500, Some(String::new()));
        assert_eq!(other.kind, FaultKind::Other);
        assert_eq!(other.message(), None);
    }

    #[test]
    fn test_message_text_does_not_classify() {
        // Only the kind decides whether a fault is an auth failure
        let fault = Fault::other("Session expired");
        assert!(!fault.kind.is_auth_failure());
    }

    #[test]
    fn test_bus_dispatches_to_all_subscribers() {
        let bus = FaultBus::new();
        let seen = Rc::new(Cell::new(0));

        for _ in 0..2 {
            let seen = seen.clone();
            bus.on_fault(Rc::new(move |_: &HostFault| seen.set(seen.get() + 1)));
        }

        assert_eq!(bus.report_rejection(Fault::other("boom")), 2);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_bus_allows_reentrant_reports() {
        let bus = FaultBus::new();
        let seen = Rc::new(Cell::new(0));

        let inner_bus = bus.clone();
        let counter = seen.clone();
        bus.on_fault(Rc::new(move |fault: &HostFault| {
            counter.set(counter.get() + 1);
            if let HostFault::Component(_) = fault {
                inner_bus.report_rejection(Fault::other("follow-up"));
            }
        }));

        bus.report_component_error(ComponentError::new(None, "Toast", "render"));
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_report_without_subscribers() {
        let bus = FaultBus::new();
        assert_eq!(bus.report_rejection(Fault::not_authenticated()), 0);
    }
}
