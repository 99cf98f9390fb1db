//! Browser-backed implementations of the shell's host interfaces

use vault_core::{Alert, ComponentError, Error, Fault, FaultBus, FaultKind, History, KeyValueStore};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{ErrorEvent, PromiseRejectionEvent, Storage};

fn window() -> Result<web_sys::Window, Error> {
    web_sys::window().ok_or_else(|| Error::Storage("No window object".to_string()))
}

/// `window.localStorage`
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<Storage, Error> {
        window()?
            .local_storage()
            .map_err(|e| Error::Storage(format!("{:?}", e)))?
            .ok_or_else(|| Error::Storage("localStorage unavailable".to_string()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> vault_core::Result<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| Error::Storage(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> vault_core::Result<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| Error::Storage(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> vault_core::Result<()> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| Error::Storage(format!("{:?}", e)))
    }
}

/// The native History API
///
/// Pushing an entry does not fire `popstate`, so one is dispatched by hand to
/// let the router pick up the new location.
pub struct BrowserHistory;

impl History for BrowserHistory {
    fn current_path(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn push(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let pushed = window
            .history()
            .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(path)))
            .and_then(|_| web_sys::PopStateEvent::new("popstate"))
            .and_then(|event| window.dispatch_event(&event));

        if let Err(e) = pushed {
            log::error!("Failed to navigate to {}: {:?}", path, e);
        }
    }
}

/// `window.alert`
pub struct WindowAlert;

impl Alert for WindowAlert {
    fn alert(&self, message: &str) {
        let Some(window) = web_sys::window() else {
            log::warn!("No window to alert: {}", message);
            return;
        };
        warn_on_alert_failure(message, window.alert_with_message(message));
    }
}

/// Log a failed `alert` call; returns whether it failed
fn warn_on_alert_failure(message: &str, result: Result<(), JsValue>) -> bool {
    match result {
        Ok(()) => false,
        Err(e) => {
            log::warn!("Failed to show alert {:?}: {:?}", message, e);
            true
        }
    }
}

/// Build a fault from a JavaScript rejection reason
///
/// A `kind` property carrying a serialized [`FaultKind`] selects the kind;
/// the message text never does.
pub fn fault_from_js(reason: &JsValue) -> Fault {
    let message = if let Some(text) = reason.as_string() {
        Some(text)
    } else if let Some(error) = reason.dyn_ref::<js_sys::Error>() {
        error.message().as_string()
    } else {
        js_sys::Reflect::get(reason, &JsValue::from_str("message"))
            .ok()
            .and_then(|m| m.as_string())
    };

    let kind = if reason.is_object() {
        js_sys::Reflect::get(reason, &JsValue::from_str("kind"))
            .ok()
            .and_then(|k| serde_wasm_bindgen::from_value::<FaultKind>(k).ok())
            .unwrap_or(FaultKind::Other)
    } else {
        FaultKind::Other
    };

    Fault::new(kind, message)
}

/// Feed the window's `error` and `unhandledrejection` events into the bus
pub fn listen_for_faults(faults: &FaultBus) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))?;

    let bus = faults.clone();
    let on_rejection: Closure<dyn Fn(PromiseRejectionEvent)> =
        Closure::new(move |event: PromiseRejectionEvent| {
            event.prevent_default();
            bus.report_rejection(fault_from_js(&event.reason()));
        });
    window.add_event_listener_with_callback(
        "unhandledrejection",
        on_rejection.as_ref().unchecked_ref(),
    )?;
    on_rejection.forget();

    let bus = faults.clone();
    let on_error: Closure<dyn Fn(ErrorEvent)> = Closure::new(move |event: ErrorEvent| {
        let message = Some(event.message()).filter(|m| !m.is_empty());
        let info = format!("{}:{}", event.filename(), event.lineno());
        bus.report_component_error(ComponentError::new(message, "window", info));
    });
    window.add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())?;
    on_error.forget();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_core::SessionKey;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_local_storage_round_trip() {
        let store = LocalStorage;
        store.set(SessionKey::Username.as_str(), "alice").unwrap();
        assert_eq!(
            store.get(SessionKey::Username.as_str()).unwrap(),
            Some("alice".to_string())
        );
        store.remove(SessionKey::Username.as_str()).unwrap();
        assert_eq!(store.get(SessionKey::Username.as_str()).unwrap(), None);
    }

    #[wasm_bindgen_test]
    fn test_fault_from_js_error() {
        let fault = fault_from_js(&js_sys::Error::new("Session expired").into());
        assert_eq!(fault.kind, FaultKind::Other);
        assert_eq!(fault.message(), Some("Session expired"));
    }

    #[wasm_bindgen_test]
    fn test_fault_from_js_kind() {
        let reason = js_sys::Object::new();
        js_sys::Reflect::set(&reason, &"kind".into(), &"not_authenticated".into()).unwrap();
        js_sys::Reflect::set(&reason, &"message".into(), &"token rejected".into()).unwrap();

        let fault = fault_from_js(&reason.into());
        assert_eq!(fault.kind, FaultKind::NotAuthenticated);
        assert_eq!(fault.message(), Some("token rejected"));
    }

    #[wasm_bindgen_test]
    fn test_alert_failure_is_reported() {
        assert!(warn_on_alert_failure("Error: boom", Err(JsValue::from_str("blocked"))));
        assert!(!warn_on_alert_failure("Error: boom", Ok(())));
    }

    #[wasm_bindgen_test]
    fn test_history_push() {
        BrowserHistory.push("/generator");
        assert_eq!(BrowserHistory.current_path(), "/generator");
    }
}
