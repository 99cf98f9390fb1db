//! Stored service passwords for the signed-in user

use leptos::*;
use leptos_router::A;
use vault_core::api::ServiceCredential;

use crate::state::{AppState, Services};
use crate::utils::clipboard;

#[component]
pub fn PasswordManager() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <section class="view password-manager">
            <h2>"Password Manager"</h2>
            <Show
                when=move || state.username.get().is_some()
                fallback=|| view! {
                    <p class="empty-state">
                        <A href="/">"Sign in"</A> " to manage your passwords."
                    </p>
                }
            >
                <AddPasswordForm />
                <PasswordList />
            </Show>
        </section>
    }
}

#[component]
fn AddPasswordForm() -> impl IntoView {
    let services = expect_context::<Services>();
    let state = expect_context::<AppState>();

    let service = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let Some(username) = state.username.get_untracked() else {
            return;
        };
        let name = service.get_untracked().trim().to_string();
        let secret = password.get_untracked();
        if name.is_empty() || secret.is_empty() {
            services.show_error("Service and password are required");
            return;
        }

        let task_services = services.clone();
        services.spawn(async move {
            let resp = task_services.api.save_password(&username, &name, &secret).await?;
            task_services.show_success(&resp.message);
            service.set(String::new());
            password.set(String::new());
            state.passwords_changed();
            Ok(())
        });
    };

    view! {
        <form class="add-password" on:submit=on_submit>
            <input
                type="text"
                class="form-input"
                placeholder="Service"
                prop:value=move || service.get()
                on:input=move |ev| service.set(event_target_value(&ev))
            />
            <input
                type="password"
                class="form-input"
                placeholder="Password"
                autocomplete="new-password"
                prop:value=move || password.get()
                on:input=move |ev| password.set(event_target_value(&ev))
            />
            <button type="submit" class="btn btn-primary">"Save"</button>
        </form>
    }
}

#[component]
fn PasswordList() -> impl IntoView {
    let services = expect_context::<Services>();
    let state = expect_context::<AppState>();

    let api = services.api.clone();
    let passwords = create_local_resource(
        move || (state.username.get(), state.passwords_version.get()),
        move |(username, _)| {
            let api = api.clone();
            async move {
                match username {
                    Some(username) => api.list_passwords(&username).await,
                    None => Ok(Vec::new()),
                }
            }
        },
    );

    // A failed load goes to the shell like any other unhandled rejection
    let faults = services.faults.clone();
    create_effect(move |_| {
        if let Some(Err(fault)) = passwords.get() {
            faults.report_rejection(fault);
        }
    });

    view! {
        <Transition fallback=|| view! { <p class="loading">"Loading passwords..."</p> }>
            {move || {
                passwords.get().map(|result| match result {
                    Ok(entries) if entries.is_empty() => {
                        view! { <p class="empty-state">"No passwords saved yet."</p> }.into_view()
                    }
                    Ok(entries) => view! {
                        <ul class="password-list">
                            {entries
                                .into_iter()
                                .map(|entry| view! { <PasswordRow entry=entry /> })
                                .collect_view()}
                        </ul>
                    }
                    .into_view(),
                    Err(_) => view! {
                        <p class="error-message">"Could not load passwords."</p>
                    }
                    .into_view(),
                })
            }}
        </Transition>
    }
}

#[component]
fn PasswordRow(entry: ServiceCredential) -> impl IntoView {
    let services = expect_context::<Services>();
    let state = expect_context::<AppState>();

    let revealed = create_rw_signal(false);
    let editing = create_rw_signal(false);
    let new_password = create_rw_signal(String::new());

    let ServiceCredential {
        username,
        service,
        password,
    } = entry;
    let secret = store_value(password);
    let owner = store_value(username);
    let service_name = store_value(service.clone());

    let copy = {
        let services = services.clone();
        move |_| {
            let text = secret.get_value();
            let task_services = services.clone();
            services.spawn(async move {
                clipboard::copy_to_clipboard(&text).await?;
                task_services.show_success("Copied to clipboard");
                Ok(())
            });
        }
    };

    let delete = {
        let services = services.clone();
        move |_| {
            let task_services = services.clone();
            let (username, service) = (owner.get_value(), service_name.get_value());
            services.spawn(async move {
                let resp = task_services.api.delete_password(&username, &service).await?;
                task_services.show_success(&resp.message);
                state.passwords_changed();
                Ok(())
            });
        }
    };

    let save = move |_| {
        let replacement = new_password.get_untracked();
        if replacement.is_empty() {
            services.show_error("New password is required");
            return;
        }
        let task_services = services.clone();
        let (username, service) = (owner.get_value(), service_name.get_value());
        services.spawn(async move {
            let resp = task_services
                .api
                .update_password(&username, &service, &replacement)
                .await?;
            task_services.show_success(&resp.message);
            editing.set(false);
            new_password.set(String::new());
            state.passwords_changed();
            Ok(())
        });
    };

    view! {
        <li class="password-row">
            <span class="service-name">{service}</span>
            <code class="password-value">
                {move || if revealed.get() { secret.get_value() } else { "\u{2022}".repeat(8) }}
            </code>
            <div class="password-actions">
                <button class="btn btn-small" on:click=move |_| revealed.update(|r| *r = !*r)>
                    {move || if revealed.get() { "Hide" } else { "Show" }}
                </button>
                <button class="btn btn-small" on:click=copy>"Copy"</button>
                <button class="btn btn-small" on:click=move |_| editing.update(|e| *e = !*e)>
                    "Edit"
                </button>
                <button class="btn btn-small btn-danger" on:click=delete>"Delete"</button>
            </div>
            <Show when=move || editing.get()>
                <div class="password-edit">
                    <input
                        type="password"
                        class="form-input"
                        placeholder="New password"
                        autocomplete="new-password"
                        prop:value=move || new_password.get()
                        on:input=move |ev| new_password.set(event_target_value(&ev))
                    />
                    <button class="btn btn-small btn-primary" on:click=save.clone()>
                        "Update"
                    </button>
                </div>
            </Show>
        </li>
    }
}
