//! Vault Frontend
//!
//! A Leptos-based web client for the vault password manager.

mod api_client;
mod app;
mod browser;
mod components;
mod state;
mod utils;
mod views;

use std::rc::Rc;

use vault_core::{Bootstrapper, FaultBus, SessionStore, ShellConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::api_client::ApiClient;
use crate::app::App;
use crate::browser::{BrowserHistory, LocalStorage, WindowAlert};
use crate::state::Services;

/// Initialize the application
///
/// A missing mount point aborts startup with an error thrown to the page.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    console_log::init_with_level(log::Level::Debug)
        .map_err(|e| JsValue::from_str(&format!("Failed to initialize logger: {}", e)))?;

    log::info!("Vault starting...");

    let mut config = ShellConfig::default();
    if let Some(url) = option_env!("VAULT_API_URL") {
        config = config.with_api_url(url);
    }

    let mount = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(&config.mount_id))
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());

    let api = ApiClient::new(config.api_url.clone());
    let session = SessionStore::new(Rc::new(LocalStorage));
    let app = Bootstrapper::new(config, session, Rc::new(BrowserHistory), Rc::new(WindowAlert))
        .initialize(mount)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let faults = FaultBus::new();
    app.install(&faults);
    browser::listen_for_faults(&faults)?;

    let services = Services {
        shell: app.shell.clone(),
        faults,
        api,
    };

    leptos::mount_to(app.mount, move || leptos::view! { <App services=services /> });

    log::info!("Vault mounted");
    Ok(())
}
