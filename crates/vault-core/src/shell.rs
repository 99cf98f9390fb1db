//! Application bootstrap and global fault handling
//!
//! [`Bootstrapper::initialize`] binds the shell to a mount point. The resulting
//! [`Shell`] owns the handlers for uncaught component errors and unhandled
//! asynchronous faults, and the `show_error`/`show_success` helpers every view
//! uses to talk to the user.
//!
//! The notification widget is injected rather than looked up: it attaches
//! itself while mounted and detaches when torn down. Whenever no widget is
//! attached, messages degrade to the console or a blocking alert.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::ShellConfig;
use crate::error::{Error, Result};
use crate::fault::{ComponentError, Fault, FaultReporter, HostFault};
use crate::notify::{Alert, Delivery, Notification, NotificationKind, NotificationSink};
use crate::route::{History, RouteTable, View};
use crate::session::SessionStore;

/// What the unhandled-fault handler did
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RejectionOutcome {
    /// The session keys were removed
    pub session_cleared: bool,
    /// A navigation to the login path was issued
    pub redirected: bool,
    /// How the fault message reached the user, if it had one
    pub delivery: Option<Delivery>,
}

/// Collaborators the shell needs before it can start
pub struct Bootstrapper {
    config: ShellConfig,
    routes: RouteTable,
    session: SessionStore,
    history: Rc<dyn History>,
    alert: Rc<dyn Alert>,
}

impl Bootstrapper {
    pub fn new(
        config: ShellConfig,
        session: SessionStore,
        history: Rc<dyn History>,
        alert: Rc<dyn Alert>,
    ) -> Self {
        Self {
            config,
            routes: RouteTable::default(),
            session,
            history,
            alert,
        }
    }

    pub fn routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Bind the shell to its mount point
    ///
    /// A missing mount point is fatal: the error is meant to be propagated to
    /// the host, not handled.
    pub fn initialize<M>(self, mount: Option<M>) -> Result<Application<M>> {
        let mount =
            mount.ok_or_else(|| Error::MissingMountPoint(self.config.mount_id.clone()))?;
        self.config.validate(&self.routes)?;

        log::info!("Shell initialized on #{}", self.config.mount_id);

        let shell = Rc::new(Shell {
            config: self.config,
            routes: self.routes,
            session: self.session,
            history: self.history,
            alert: self.alert,
            sink: RefCell::new(None),
        });

        Ok(Application { shell, mount })
    }
}

/// An initialized shell and the mount point it is bound to
pub struct Application<M> {
    pub shell: Rc<Shell>,
    pub mount: M,
}

impl<M> Application<M> {
    /// Subscribe the shell's handlers to the host's fault reports
    pub fn install(&self, reporter: &dyn FaultReporter) {
        self.shell.install(reporter);
    }
}

/// Process-wide handlers for faults and user messages
pub struct Shell {
    config: ShellConfig,
    routes: RouteTable,
    session: SessionStore,
    history: Rc<dyn History>,
    alert: Rc<dyn Alert>,
    sink: RefCell<Option<Rc<dyn NotificationSink>>>,
}

impl Shell {
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Make a notification widget reachable
    pub fn attach_notifications(&self, sink: Rc<dyn NotificationSink>) {
        *self.sink.borrow_mut() = Some(sink);
    }

    pub fn detach_notifications(&self) {
        self.sink.borrow_mut().take();
    }

    pub fn has_notifications(&self) -> bool {
        self.sink.borrow().is_some()
    }

    fn notification_sink(&self) -> Option<Rc<dyn NotificationSink>> {
        self.sink.borrow().clone()
    }

    /// Route both kinds of host fault to this shell
    pub fn install(self: &Rc<Self>, reporter: &dyn FaultReporter) {
        let shell = Rc::clone(self);
        reporter.on_fault(Rc::new(move |fault: &HostFault| match fault {
            HostFault::Component(error) => {
                shell.on_component_error(error);
            }
            HostFault::Rejection(fault) => {
                shell.on_unhandled_rejection(fault);
            }
        }));
    }

    /// Handle an error raised while rendering a component
    pub fn on_component_error(&self, error: &ComponentError) -> Delivery {
        log::error!(
            "Global component error in {}: {} ({})",
            error.component,
            error.message().unwrap_or("<no message>"),
            error.info
        );

        let message = error
            .message()
            .unwrap_or(self.config.generic_error_message.as_str());

        match self.notification_sink() {
            Some(sink) => {
                sink.add_notification(message, NotificationKind::Info);
                Delivery::Widget(Notification::info(message))
            }
            None => Delivery::Console(message.to_string()),
        }
    }

    /// Handle an asynchronous failure nobody awaited
    pub fn on_unhandled_rejection(&self, fault: &Fault) -> RejectionOutcome {
        log::error!("Unhandled rejection: {}", fault);

        let mut outcome = RejectionOutcome::default();

        if fault.kind.is_auth_failure() {
            match self.session.clear() {
                Ok(()) => outcome.session_cleared = true,
                Err(e) => log::error!("{}", e),
            }

            if self.history.current_path() != self.config.login_path {
                self.history.push(&self.config.login_path);
                outcome.redirected = true;
            }
        }

        if let Some(message) = fault.message() {
            outcome.delivery = Some(match self.notification_sink() {
                Some(sink) => {
                    sink.add_notification(message, NotificationKind::Info);
                    Delivery::Widget(Notification::info(message))
                }
                None => {
                    let text = format!("Error: {}", message);
                    self.alert.alert(&text);
                    Delivery::Alert(text)
                }
            });
        }

        outcome
    }

    /// Tell the user something went wrong
    pub fn show_error(&self, message: &str) -> Delivery {
        match self.notification_sink() {
            Some(sink) => {
                sink.add_notification(message, NotificationKind::Info);
                Delivery::Widget(Notification::info(message))
            }
            None => {
                let text = format!("Toast not available: {}", message);
                log::error!("{}", text);
                Delivery::Console(text)
            }
        }
    }

    /// Tell the user an action succeeded
    pub fn show_success(&self, message: &str) -> Delivery {
        match self.notification_sink() {
            Some(sink) => {
                sink.add_notification(message, NotificationKind::Success);
                Delivery::Widget(Notification::success(message))
            }
            None => {
                let text = format!("Success: {}", message);
                log::info!("{}", text);
                Delivery::Console(text)
            }
        }
    }

    /// Send the user to a declared route
    ///
    /// Undeclared paths are refused before anything is pushed.
    pub fn navigate(&self, path: &str) -> Result<View> {
        let view = self
            .routes
            .resolve(path)
            .ok_or_else(|| Error::UnknownRoute(path.to_string()))?;
        log::debug!("Navigating to {} ({})", path, view);
        self.history.push(path);
        Ok(view)
    }

    /// View for the current location, if one is declared
    pub fn current_view(&self) -> Option<View> {
        self.routes.resolve(&self.history.current_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::{FaultBus, FaultKind};
    use crate::route::MemoryHistory;
    use crate::session::{KeyValueStore, MemoryStore, SessionKey, Tokens};

    #[derive(Default)]
    struct RecordingSink {
        received: RefCell<Vec<Notification>>,
    }

    impl NotificationSink for RecordingSink {
        fn add_notification(&self, message: &str, kind: NotificationKind) {
            self.received
                .borrow_mut()
                .push(Notification::new(message, kind));
        }
    }

    #[derive(Default)]
    struct RecordingAlert {
        shown: RefCell<Vec<String>>,
    }

    impl Alert for RecordingAlert {
        fn alert(&self, message: &str) {
            self.shown.borrow_mut().push(message.to_string());
        }
    }

    struct Fixture {
        store: Rc<MemoryStore>,
        history: Rc<MemoryHistory>,
        alert: Rc<RecordingAlert>,
        shell: Rc<Shell>,
    }

    fn fixture(start: &str) -> Fixture {
        let store = Rc::new(MemoryStore::new());
        let history = Rc::new(MemoryHistory::new(start));
        let alert = Rc::new(RecordingAlert::default());

        let session = SessionStore::new(store.clone());
        session
            .begin(
                "alice",
                Some(&Tokens {
                    access: "access".to_string(),
                    refresh: "refresh".to_string(),
                }),
            )
            .unwrap();

        let app = Bootstrapper::new(
            ShellConfig::default(),
            session,
            history.clone(),
            alert.clone(),
        )
        .initialize(Some(()))
        .unwrap();

        Fixture {
            store,
            history,
            alert,
            shell: app.shell,
        }
    }

    fn session_keys_absent(store: &MemoryStore) -> bool {
        SessionKey::ALL
            .iter()
            .all(|key| store.get(key.as_str()).unwrap().is_none())
    }

    #[test]
    fn test_initialize_requires_mount_point() {
        let result = Bootstrapper::new(
            ShellConfig::default(),
            SessionStore::new(Rc::new(MemoryStore::new())),
            Rc::new(MemoryHistory::default()),
            Rc::new(RecordingAlert::default()),
        )
        .initialize::<()>(None);

        assert!(matches!(result, Err(Error::MissingMountPoint(id)) if id == "app"));
    }

    #[test]
    fn test_auth_failure_clears_session_and_redirects() {
        for fault in [Fault::session_expired(), Fault::not_authenticated()] {
            let f = fixture("/manager");
            let outcome = f.shell.on_unhandled_rejection(&fault);

            assert!(outcome.session_cleared);
            assert!(outcome.redirected);
            assert!(session_keys_absent(&f.store));
            assert_eq!(f.history.current_path(), "/");
        }
    }

    #[test]
    fn test_auth_failure_at_login_path_does_not_navigate() {
        let f = fixture("/");
        let outcome = f.shell.on_unhandled_rejection(&Fault::session_expired());

        assert!(outcome.session_cleared);
        assert!(!outcome.redirected);
        assert_eq!(f.history.entries(), vec!["/"]);
    }

    #[test]
    fn test_rejection_without_widget_alerts() {
        let f = fixture("/generator");
        let outcome = f.shell.on_unhandled_rejection(&Fault::other("Network down"));

        assert!(!outcome.session_cleared);
        assert!(!outcome.redirected);
        assert_eq!(
            outcome.delivery,
            Some(Delivery::Alert("Error: Network down".to_string()))
        );
        assert_eq!(*f.alert.shown.borrow(), vec!["Error: Network down"]);
        assert!(!session_keys_absent(&f.store));
    }

    #[test]
    fn test_auth_failure_also_notifies() {
        let f = fixture("/profile");
        let sink = Rc::new(RecordingSink::default());
        f.shell.attach_notifications(sink.clone());

        let outcome = f.shell.on_unhandled_rejection(&Fault::not_authenticated());

        assert!(outcome.redirected);
        assert_eq!(
            *sink.received.borrow(),
            vec![Notification::info("Not authenticated")]
        );
        assert!(f.alert.shown.borrow().is_empty());
    }

    #[test]
    fn test_rejection_without_message_is_silent() {
        let f = fixture("/manager");
        let outcome = f
            .shell
            .on_unhandled_rejection(&Fault::new(FaultKind::Other, None));

        assert_eq!(outcome, RejectionOutcome::default());
        assert!(f.alert.shown.borrow().is_empty());
    }

    #[test]
    fn test_component_error_without_message_uses_fallback() {
        let f = fixture("/manager");
        let sink = Rc::new(RecordingSink::default());
        f.shell.attach_notifications(sink.clone());

        f.shell
            .on_component_error(&ComponentError::new(None, "PasswordManager", "render"));
        f.shell.on_component_error(&ComponentError::new(
            Some(String::new()),
            "PasswordManager",
            "render",
        ));

        let received = sink.received.borrow();
        assert_eq!(received.len(), 2);
        for notification in received.iter() {
            assert_eq!(notification.message, "An error occurred in a component");
        }
    }

    #[test]
    fn test_component_error_without_widget() {
        let f = fixture("/manager");
        let delivery = f.shell.on_component_error(&ComponentError::new(
            Some("bad state".to_string()),
            "UserProfile",
            "effect",
        ));

        assert_eq!(delivery, Delivery::Console("bad state".to_string()));
        assert!(f.alert.shown.borrow().is_empty());
    }

    #[test]
    fn test_show_success() {
        let f = fixture("/manager");
        assert_eq!(
            f.shell.show_success("Saved"),
            Delivery::Console("Success: Saved".to_string())
        );

        let sink = Rc::new(RecordingSink::default());
        f.shell.attach_notifications(sink.clone());
        assert_eq!(
            f.shell.show_success("Saved"),
            Delivery::Widget(Notification::success("Saved"))
        );
        assert_eq!(
            *sink.received.borrow(),
            vec![Notification::success("Saved")]
        );
    }

    #[test]
    fn test_show_error_after_detach() {
        let f = fixture("/manager");
        let sink = Rc::new(RecordingSink::default());
        f.shell.attach_notifications(sink.clone());
        f.shell.detach_notifications();

        assert_eq!(
            f.shell.show_error("Failed"),
            Delivery::Console("Toast not available: Failed".to_string())
        );
        assert!(sink.received.borrow().is_empty());
    }

    #[test]
    fn test_installed_handlers_receive_synthetic_faults() {
        let f = fixture("/manager");
        let sink = Rc::new(RecordingSink::default());
        f.shell.attach_notifications(sink.clone());

        let bus = FaultBus::new();
        f.shell.install(&bus);

        bus.report_component_error(ComponentError::new(
            Some("render failed".to_string()),
            "PasswordGenerator",
            "render",
        ));
        bus.report_rejection(Fault::session_expired());

        assert_eq!(
            *sink.received.borrow(),
            vec![
                Notification::info("render failed"),
                Notification::info("Session expired"),
            ]
        );
        assert!(session_keys_absent(&f.store));
        assert_eq!(f.history.current_path(), "/");
    }

    #[test]
    fn test_navigate_rejects_undeclared_paths() {
        let f = fixture("/");
        assert_eq!(f.shell.current_view(), Some(View::UserAuth));
        assert_eq!(f.shell.navigate("/profile"), Ok(View::UserProfile));
        assert_eq!(f.shell.current_view(), Some(View::UserProfile));
        assert_eq!(
            f.shell.navigate("/login"),
            Err(Error::UnknownRoute("/login".to_string()))
        );
        assert_eq!(f.history.entries(), vec!["/", "/profile"]);
        assert_eq!(f.shell.current_view(), Some(View::UserProfile));
    }
}
