use leptos::prelude::*;
use patients_care::query::{Debouncer, SEARCH_DEBOUNCE_MS};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// A debounced search input.
///
/// Every keystroke is pushed into a [`Debouncer`] and a timer is armed for
/// the pushed ticket. When a timer fires, only the newest ticket yields a
/// value, so `on_change` sees the text once typing pauses. Enter commits
/// immediately.
///
/// # Props
/// - `value`: ReadSignal<String> - The current input value to display
/// - `on_change`: Callback<String> - Called with the debounced search value
/// - `on_immediate_change`: Callback<String> - Called on every keystroke
/// - `placeholder`: &'static str - Placeholder text (default: "Search...")
/// - `debounce_ms`: u32 - Debounce delay in milliseconds
#[component]
pub fn SearchInput(
    /// The current value of the search input
    value: ReadSignal<String>,
    /// Callback when the debounced search value changes
    on_change: Callback<String>,
    /// Callback when the input value changes immediately (before debounce)
    on_immediate_change: Callback<String>,
    /// Placeholder text for the input
    #[prop(optional, default = "Search...")]
    placeholder: &'static str,
    /// Debounce delay in milliseconds
    #[prop(optional, default = SEARCH_DEBOUNCE_MS)]
    debounce_ms: u32,
) -> impl IntoView {
    let debouncer = StoredValue::new(Debouncer::<String>::new());

    let on_input = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        on_immediate_change.run(value.clone());

        let ticket = debouncer.try_update_value(|d| d.push(value));
        let Some(ticket) = ticket else {
            return;
        };

        let callback = Closure::once(move || {
            if let Some(Some(value)) = debouncer.try_update_value(|d| d.fire(ticket)) {
                on_change.run(value);
            }
        });

        let Some(window) = web_sys::window() else {
            return;
        };
        if window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                debounce_ms as i32,
            )
            .is_ok()
        {
            callback.forget();
        }
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Enter" {
            debouncer.update_value(|d| d.cancel());
            on_change.run(event_target_value(&ev));
        }
    };

    view! {
        <input
            type="search"
            placeholder=placeholder
            prop:value=move || value.get()
            on:input=on_input
            on:keydown=on_keydown
            class="w-full rounded-lg border-ctp-surface1 bg-ctp-surface0 px-4 py-2 text-ctp-text placeholder-ctp-subtext0 focus:border-ctp-blue focus:ring-2 focus:ring-ctp-blue focus:outline-none"
        />
    }
}
