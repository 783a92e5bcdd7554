use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use patients_care::notice::Notice;
use patients_care::validation::{LoginForm, ValidationErrors};

use crate::api::auth;
use crate::components::TextField;
use crate::store::use_store;

#[component]
pub fn Login() -> impl IntoView {
    let store = use_store();
    let navigate = use_navigate();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let errors = RwSignal::new(None::<ValidationErrors>);
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let form = LoginForm {
            email: email.get_untracked(),
            password: password.get_untracked(),
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
            let result = auth::login(&request).await;
            busy.set(false);
            match result {
                Ok(()) => {
                    store.signed_in();
                    navigate("/allPatients", Default::default());
                }
                Err(e) => store.notify(Notice::error(e.to_string())),
            }
        });
    };

    view! {
        <div class="min-h-screen flex items-center justify-center bg-ctp-base">
            <form on:submit=on_submit class="w-full max-w-sm flex flex-col gap-4 rounded-lg bg-ctp-surface0 p-8">
                <h2 class="text-2xl font-bold text-ctp-text">"Sign in"</h2>
                <TextField label="Email" field="email" value=email errors input_type="email"/>
                <TextField label="Password" field="password" value=password errors input_type="password"/>
                <button
                    type="submit"
                    disabled=move || busy.get()
                    class="px-4 py-2 rounded bg-ctp-blue text-ctp-base font-medium disabled:opacity-50"
                >
                    "Sign in"
                </button>
                <p class="text-sm text-ctp-subtext0">
                    "No account yet? "
                    <a href="/register" class="text-ctp-blue hover:text-ctp-lavender underline">"Register"</a>
                </p>
            </form>
        </div>
    }
}
