use leptos::prelude::*;
use patients_care::validation::ValidationErrors;

/// Labelled input with the first validation message of its field below it.
#[component]
pub fn TextField(
    label: &'static str,
    /// Field name as used in validation errors
    field: &'static str,
    value: RwSignal<String>,
    errors: RwSignal<Option<ValidationErrors>>,
    #[prop(optional, default = "text")] input_type: &'static str,
) -> impl IntoView {
    let message = move || {
        errors.with(|errors| {
            errors
                .as_ref()
                .and_then(|e| e.field(field))
                .map(|m| format!("{} {}", label, m))
        })
    };

    view! {
        <label class="flex flex-col gap-1 text-sm">
            <span class="text-ctp-subtext1">{label}</span>
            <input
                type=input_type
                name=field
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
                class="rounded-lg border border-ctp-surface1 bg-ctp-surface0 px-3 py-2 text-ctp-text focus:border-ctp-blue focus:outline-none"
                class:border-ctp-red=move || message().is_some()
            />
            <span class="text-xs text-ctp-red min-h-4">{message}</span>
        </label>
    }
}
