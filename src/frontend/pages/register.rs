use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use patients_care::notice::Notice;
use patients_care::validation::{RegisterForm, ValidationErrors};

use crate::api::auth;
use crate::components::TextField;
use crate::store::use_store;

#[component]
pub fn Register() -> impl IntoView {
    let store = use_store();
    let navigate = use_navigate();
    let name = RwSignal::new(String::new());
    let surname = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let repeated_password = RwSignal::new(String::new());
    let terms = RwSignal::new(false);
    let errors = RwSignal::new(None::<ValidationErrors>);
    let busy = RwSignal::new(false);

    let terms_error = move || {
        errors.with(|e| {
            e.as_ref()
                .and_then(|e| e.field("terms"))
                .map(|m| format!("Terms {}", m))
        })
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let form = RegisterForm {
            name: name.get_untracked(),
            surname: surname.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            repeated_password: repeated_password.get_untracked(),
            terms: terms.get_untracked(),
        };
        let request = match form.validate() {
            Ok(request) => request,
            Err(e) => {
                errors.set(Some(e));
                return;
            }
        };
        errors.set(None);
        busy.set(true);

        let navigate = navigate.clone();
        spawn_local(async move {
            let result = auth::register(&request).await;
            busy.set(false);
            match result {
                Ok(response) => {
                    store.notify(Notice::success(response.message));
                    navigate("/login", Default::default());
                }
                Err(e) => store.notify(Notice::error(e.to_string()).sticky()),
            }
        });
    };

    view! {
        <div class="min-h-screen flex items-center justify-center bg-ctp-base">
            <form on:submit=on_submit class="w-full max-w-md flex flex-col gap-3 rounded-lg bg-ctp-surface0 p-8">
                <h2 class="text-2xl font-bold text-ctp-text">"Create an account"</h2>
                <TextField label="Name" field="name" value=name errors/>
                <TextField label="Surname" field="surname" value=surname errors/>
                <TextField label="Email" field="email" value=email errors input_type="email"/>
                <TextField label="Password" field="password" value=password errors input_type="password"/>
                <TextField
                    label="Repeat password"
                    field="repeatedPassword"
                    value=repeated_password
                    errors
                    input_type="password"
                />
                <label class="flex items-center gap-2 text-sm text-ctp-subtext1">
                    <input
                        type="checkbox"
                        prop:checked=move || terms.get()
                        on:change=move |ev| terms.set(event_target_checked(&ev))
                    />
                    "I accept the terms of service"
                </label>
                <span class="text-xs text-ctp-red">{terms_error}</span>
                <button
                    type="submit"
                    disabled=move || busy.get()
                    class="px-4 py-2 rounded bg-ctp-blue text-ctp-base font-medium disabled:opacity-50"
                >
                    "Register"
                </button>
                <p class="text-sm text-ctp-subtext0">
                    "Already registered? "
                    <a href="/login" class="text-ctp-blue hover:text-ctp-lavender underline">"Sign in"</a>
                </p>
            </form>
        </div>
    }
}
