//! Main application component

use std::collections::HashSet;
use std::rc::Rc;

use leptos::*;
use leptos_router::{Route, Router, Routes, A};
use vault_core::{ComponentError, Fault, FaultReporter, HostFault, RouteTable, View as Screen};

use crate::components::toast::Toast;
use crate::state::{AppState, Services};
use crate::views::{
    password_generator::PasswordGenerator, password_manager::PasswordManager, user_auth::UserAuth,
    user_profile::UserProfile,
};

/// Root application component
#[component]
pub fn App(services: Services) -> impl IntoView {
    let state = AppState::new(&services);
    provide_context(services.clone());
    provide_context(state);

    // The shell's handler runs first and may clear the session
    {
        let services = services.clone();
        services.faults.clone().on_fault(Rc::new(move |_: &HostFault| {
            state.sync_session(&services);
        }));
    }

    let table = services.shell.routes().clone();
    let path = move |view: Screen| route_path(&table, view);

    let reported = store_value(HashSet::new());
    let faults = services.faults.clone();
    let fallback = move |errors: RwSignal<Errors>| {
        for (key, error) in errors.get_untracked() {
            if !reported.try_update_value(|seen| seen.insert(key)).unwrap_or(false) {
                continue;
            }
            match error.downcast_ref::<Fault>() {
                Some(fault) => faults.report_rejection(fault.clone()),
                None => faults.report_component_error(ComponentError::new(
                    Some(error.to_string()),
                    "view",
                    "render",
                )),
            };
        }

        view! {
            <div class="error-panel">
                <p>"Something went wrong while showing this page."</p>
                <A href="/">"Back to start"</A>
            </div>
        }
    };

    view! {
        <Router>
            <div class="app">
                <Header />
                <Toast />
                <main class="app-main">
                    <ErrorBoundary fallback=fallback>
                        <Routes>
                            <Route path=path(Screen::UserAuth) view=UserAuth />
                            <Route path=path(Screen::PasswordManager) view=PasswordManager />
                            <Route path=path(Screen::PasswordGenerator) view=PasswordGenerator />
                            <Route path=path(Screen::UserProfile) view=UserProfile />
                        </Routes>
                    </ErrorBoundary>
                </main>
            </div>
        </Router>
    }
}

/// Declared path of a view; a table without it sends the link to the root
fn route_path(table: &RouteTable, view: Screen) -> &'static str {
    table.path_of(view).unwrap_or("/")
}

/// Header component with app title and navigation
#[component]
fn Header() -> impl IntoView {
    let state = expect_context::<AppState>();
    let services = expect_context::<Services>();
    let table = services.shell.routes();

    view! {
        <header class="app-header">
            <div class="header-left">
                <h1 class="app-title">"Vault"</h1>
            </div>
            <nav class="header-nav">
                <A href=route_path(table, Screen::UserAuth) exact=true>"Sign In"</A>
                <A href=route_path(table, Screen::PasswordManager)>"Passwords"</A>
                <A href=route_path(table, Screen::PasswordGenerator)>"Generator"</A>
                <A href=route_path(table, Screen::UserProfile)>"Profile"</A>
            </nav>
            <div class="header-right">
                <Show when=move || state.username.get().is_some()>
                    <span class="current-user">
                        {move || state.username.get().unwrap_or_default()}
                    </span>
                </Show>
            </div>
        </header>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_core::RouteEntry;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_route_path_follows_table() {
        assert_eq!(route_path(&RouteTable::default(), Screen::PasswordManager), "/manager");

        let table = RouteTable::new(vec![
            RouteEntry {
                path: "/",
                view: Screen::UserAuth,
            },
            RouteEntry {
                path: "/vault",
                view: Screen::PasswordManager,
            },
        ])
        .unwrap();
        assert_eq!(route_path(&table, Screen::PasswordManager), "/vault");
        assert_eq!(route_path(&table, Screen::UserProfile), "/");
    }
}
