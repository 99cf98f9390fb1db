//! Profile page with avatar upload

use leptos::html::Input;
use leptos::*;
use leptos_router::{use_navigate, NavigateOptions, A};

use crate::state::{AppState, Services};

#[component]
pub fn UserProfile() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <section class="view user-profile">
            <h2>"Profile"</h2>
            <Show
                when=move || state.username.get().is_some()
                fallback=|| view! {
                    <p class="empty-state">
                        <A href="/">"Sign in"</A> " to view your profile."
                    </p>
                }
            >
                <ProfileForm />
            </Show>
        </section>
    }
}

#[component]
fn ProfileForm() -> impl IntoView {
    let services = expect_context::<Services>();
    let state = expect_context::<AppState>();
    let navigate = use_navigate();

    let email = create_rw_signal(String::new());
    let avatar_url = create_rw_signal(None::<String>);
    let saving = create_rw_signal(false);
    let avatar_input = create_node_ref::<Input>();

    let api = services.api.clone();
    let profile = create_local_resource(
        move || state.username.get(),
        move |username| {
            let api = api.clone();
            async move {
                match username {
                    Some(username) => api.profile(&username).await,
                    None => Ok(None),
                }
            }
        },
    );

    let faults = services.faults.clone();
    create_effect(move |_| match profile.get() {
        Some(Ok(Some(loaded))) => {
            email.set(loaded.email);
            avatar_url.set(loaded.avatar_url);
        }
        Some(Ok(None)) => {
            email.set(String::new());
            avatar_url.set(None);
        }
        Some(Err(fault)) => {
            faults.report_rejection(fault);
        }
        None => {}
    });

    let on_submit = {
        let services = services.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            let Some(username) = state.username.get_untracked() else {
                return;
            };
            let address = email.get_untracked();
            let avatar = avatar_input
                .get_untracked()
                .and_then(|input| input.files())
                .and_then(|files| files.get(0));

            saving.set(true);
            let task_services = services.clone();
            services.spawn(async move {
                let result = task_services
                    .api
                    .update_profile(&username, &address, avatar)
                    .await;
                saving.set(false);
                let resp = result?;
                avatar_url.set(resp.avatar_url);
                task_services.show_success(&resp.message);
                Ok(())
            });
        }
    };

    let logout = move |_| match state.sign_out(&services) {
        Ok(()) => {
            services.show_success("Signed out");
            navigate("/", NavigateOptions::default());
        }
        Err(fault) => services.show_error(&fault.to_string()),
    };

    view! {
        <div class="profile">
            <div class="avatar">
                {move || match avatar_url.get() {
                    Some(url) => {
                        view! { <img class="avatar-image" src=url alt="Avatar" /> }.into_view()
                    }
                    None => view! { <div class="avatar-placeholder">"No avatar"</div> }.into_view(),
                }}
            </div>
            <p class="profile-username">{move || state.username.get().unwrap_or_default()}</p>

            <form on:submit=on_submit>
                <div class="form-group">
                    <label for="email">"Email"</label>
                    <input
                        type="email"
                        id="email"
                        class="form-input"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="avatar">"Avatar"</label>
                    <input type="file" id="avatar" accept="image/*" node_ref=avatar_input />
                </div>
                <div class="form-actions">
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                        {move || if saving.get() { "Saving..." } else { "Save Profile" }}
                    </button>
                    <button type="button" class="btn btn-secondary" on:click=logout>
                        "Sign Out"
                    </button>
                </div>
            </form>
        </div>
    }
}
