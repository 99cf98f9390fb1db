//! Login and registration

use leptos::*;
use leptos_router::{use_navigate, NavigateOptions};

use crate::state::{AppState, Services};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Login,
    Register,
}

/// Sign-in form, also the login route
#[component]
pub fn UserAuth() -> impl IntoView {
    let services = expect_context::<Services>();
    let state = expect_context::<AppState>();
    let navigate = use_navigate();

    let mode = create_rw_signal(Mode::Login);
    let username = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let busy = create_rw_signal(false);
    let server_up = create_rw_signal(true);

    {
        let api = services.api.clone();
        spawn_local(async move {
            let up = api.health_check().await.unwrap_or(false);
            if !up {
                log::warn!("Vault server is not reachable");
            }
            server_up.set(up);
        });
    }

    let submit = {
        let services = services.clone();
        move || {
            let name = username.get_untracked().trim().to_string();
            let secret = password.get_untracked();
            if name.is_empty() || secret.is_empty() {
                services.show_error("Username and password are required");
                return;
            }

            busy.set(true);
            let current = mode.get_untracked();
            let task_services = services.clone();
            let navigate = navigate.clone();
            services.spawn(async move {
                let result = match current {
                    Mode::Login => task_services.api.login(&name, &secret).await.and_then(|resp| {
                        state.sign_in(&task_services, &resp.username)?;
                        task_services.show_success(&resp.message);
                        navigate("/manager", NavigateOptions::default());
                        Ok(())
                    }),
                    Mode::Register => task_services.api.register(&name, &secret).await.map(|resp| {
                        task_services.show_success(&resp.message);
                        mode.set(Mode::Login);
                    }),
                };
                busy.set(false);
                password.set(String::new());
                result
            });
        }
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        submit();
    };

    let toggle_mode = move |_| {
        mode.update(|m| {
            *m = match m {
                Mode::Login => Mode::Register,
                Mode::Register => Mode::Login,
            }
        })
    };

    view! {
        <section class="view user-auth">
            <h2>{move || if mode.get() == Mode::Login { "Sign In" } else { "Create Account" }}</h2>

            <Show when=move || !server_up.get()>
                <div class="error-message">"The vault server is not reachable"</div>
            </Show>

            <Show when=move || state.username.get().is_some()>
                <p class="signed-in-as">
                    "Signed in as " {move || state.username.get().unwrap_or_default()}
                </p>
            </Show>

            <form on:submit=on_submit>
                <div class="form-group">
                    <label for="username">"Username"</label>
                    <input
                        type="text"
                        id="username"
                        class="form-input"
                        autocomplete="username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                        disabled=move || busy.get()
                    />
                </div>
                <div class="form-group">
                    <label for="password">"Password"</label>
                    <input
                        type="password"
                        id="password"
                        class="form-input"
                        autocomplete=move || {
                            match mode.get() {
                                Mode::Login => "current-password",
                                Mode::Register => "new-password",
                            }
                        }
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                        disabled=move || busy.get()
                    />
                </div>
                <div class="form-actions">
                    <button
                        type="submit"
                        class="btn btn-primary"
                        disabled=move || {
                            busy.get() || username.get().is_empty() || password.get().is_empty()
                        }
                    >
                        {move || match (mode.get(), busy.get()) {
                            (Mode::Login, true) => "Signing in...",
                            (Mode::Login, false) => "Sign In",
                            (Mode::Register, true) => "Registering...",
                            (Mode::Register, false) => "Register",
                        }}
                    </button>
                    <button type="button" class="btn btn-link" on:click=toggle_mode>
                        {move || if mode.get() == Mode::Login {
                            "Need an account? Register"
                        } else {
                            "Already registered? Sign in"
                        }}
                    </button>
                </div>
            </form>
        </section>
    }
}
