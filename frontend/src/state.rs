//! Application state management

use std::future::Future;
use std::rc::Rc;

use leptos::*;
use vault_core::{Fault, FaultBus, Shell};
use wasm_bindgen_futures::spawn_local;

use crate::api_client::ApiClient;

/// Long-lived collaborators shared by every view
#[derive(Clone)]
pub struct Services {
    pub shell: Rc<Shell>,
    pub faults: FaultBus,
    pub api: ApiClient,
}

impl Services {
    /// Run a task whose failure nobody awaits
    ///
    /// An `Err` is reported to the fault bus as an unhandled rejection.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = Result<(), Fault>> + 'static,
    {
        let faults = self.faults.clone();
        spawn_local(async move {
            if let Err(fault) = task.await {
                faults.report_rejection(fault);
            }
        });
    }

    pub fn show_error(&self, message: &str) {
        self.shell.show_error(message);
    }

    pub fn show_success(&self, message: &str) {
        self.shell.show_success(message);
    }
}

/// Global application state - all fields are Copy signals
#[derive(Clone, Copy)]
pub struct AppState {
    /// Signed-in user, mirrored from session storage
    pub username: RwSignal<Option<String>>,
    /// Bumped whenever stored passwords change
    pub passwords_version: RwSignal<u32>,
}

impl AppState {
    pub fn new(services: &Services) -> Self {
        Self {
            username: create_rw_signal(services.shell.session().username()),
            passwords_version: create_rw_signal(0),
        }
    }

    /// Record a successful login in storage and in the UI
    pub fn sign_in(&self, services: &Services, username: &str) -> Result<(), Fault> {
        services
            .shell
            .session()
            .begin(username, None)
            .map_err(|e| Fault::other(e.to_string()))?;
        self.username.set(Some(username.to_string()));
        Ok(())
    }

    /// Forget the session
    pub fn sign_out(&self, services: &Services) -> Result<(), Fault> {
        services
            .shell
            .session()
            .clear()
            .map_err(|e| Fault::other(e.to_string()))?;
        self.username.set(None);
        Ok(())
    }

    /// Pick up session changes made outside the UI, e.g. by the fault handler
    pub fn sync_session(&self, services: &Services) {
        let stored = services.shell.session().username();
        if self.username.get_untracked() != stored {
            self.username.set(stored);
        }
    }

    pub fn passwords_changed(&self) {
        self.passwords_version.update(|v| *v += 1);
    }
}
