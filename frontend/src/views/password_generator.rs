//! Password generator page

use std::time::Duration;

use leptos::*;
use vault_core::generator::{self, GeneratorOptions, Strength, MAX_LENGTH, MIN_LENGTH};

use crate::state::Services;
use crate::utils::clipboard;

#[component]
pub fn PasswordGenerator() -> impl IntoView {
    let services = expect_context::<Services>();

    let options = create_rw_signal(GeneratorOptions::default());
    let generated_password = create_rw_signal(String::new());
    let copied = create_rw_signal(false);

    // Regenerate whenever the options change
    create_effect(move |_| {
        generated_password.set(generator::generate_password(&options.get()));
        copied.set(false);
    });

    let regenerate = move |_| {
        generated_password.set(generator::generate_password(&options.get_untracked()));
        copied.set(false);
    };

    let copy = move |_| {
        let password = generated_password.get_untracked();
        services.spawn(async move {
            clipboard::copy_to_clipboard(&password).await?;
            copied.set(true);
            set_timeout(move || copied.set(false), Duration::from_secs(2));
            Ok(())
        });
    };

    let set_length = move |ev| {
        let value: usize = event_target_value(&ev).parse().unwrap_or(20);
        options.update(|o| *o = o.clone().with_length(value));
    };

    let option_row = move |label: &'static str,
                           get: fn(&GeneratorOptions) -> bool,
                           toggle: fn(&mut GeneratorOptions)| {
        view! {
            <div class="option-row">
                <label>
                    <input
                        type="checkbox"
                        prop:checked=move || options.with(get)
                        on:change=move |_| options.update(toggle)
                    />
                    " " {label}
                </label>
            </div>
        }
    };

    view! {
        <section class="view password-generator">
            <h2>"Password Generator"</h2>

            <div class="generated-password-display">
                <code class="generated-password">{move || generated_password.get()}</code>
                <div class="password-actions">
                    <button class="btn btn-secondary" on:click=regenerate title="Generate new">
                        "Regenerate"
                    </button>
                    <button
                        class="btn btn-primary"
                        class:copied=move || copied.get()
                        on:click=copy
                        title="Copy to clipboard"
                    >
                        <Show when=move || copied.get() fallback=|| "Copy Password">
                            "Copied!"
                        </Show>
                    </button>
                </div>
            </div>

            <div class="password-strength">
                <StrengthBar password=generated_password />
            </div>

            <div class="generator-options">
                <div class="option-row">
                    <label for="length">"Length: " {move || options.get().length}</label>
                    <input
                        type="range"
                        id="length"
                        min=MIN_LENGTH
                        max=MAX_LENGTH
                        prop:value=move || options.get().length
                        on:input=set_length
                    />
                </div>
                {option_row("Uppercase (A-Z)", |o| o.uppercase, |o| o.uppercase = !o.uppercase)}
                {option_row("Lowercase (a-z)", |o| o.lowercase, |o| o.lowercase = !o.lowercase)}
                {option_row("Numbers (0-9)", |o| o.numbers, |o| o.numbers = !o.numbers)}
                {option_row("Symbols (!@#$%...)", |o| o.symbols, |o| o.symbols = !o.symbols)}
            </div>
        </section>
    }
}

#[component]
fn StrengthBar(password: RwSignal<String>) -> impl IntoView {
    let score = move || password.with(|p| generator::calculate_strength(p));
    let strength = move || Strength::from_score(score());

    view! {
        <div class="strength-bar-container">
            <div
                class=move || format!("strength-bar {}", strength().css_class())
                style=move || format!("width: {}%", score())
            ></div>
        </div>
        <span class="strength-text">{move || strength().label()}</span>
    }
}
