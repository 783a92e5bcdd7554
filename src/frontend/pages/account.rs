use leptos::prelude::*;
use leptos::task::spawn_local;
use patients_care::models::UserProfile;
use patients_care::notice::Notice;
use patients_care::session::TokenStore;
use patients_care::validation::{PasswordForm, ProfileForm, ValidationErrors, validate_avatar};
use web_sys::{File, HtmlInputElement};

use crate::api::{API_BASE, ApiClientError, users};
use crate::components::{ConfirmDialog, DashboardLayout, TextField};
use crate::session::BrowserTokenStore;
use crate::store::{AppStore, use_store};

/// Reports the outcome of an account action. Errors on this page are sticky.
fn report<T>(store: AppStore, result: Result<T, ApiClientError>, success: impl FnOnce(T) -> String) -> bool {
    match result {
        Ok(value) => {
            store.notify(Notice::success(success(value)));
            true
        }
        Err(ApiClientError::Unauthorized) => {
            store.signed_out();
            false
        }
        Err(e) => {
            store.notify(Notice::error(e.to_string()).sticky());
            false
        }
    }
}

async fn reload_profile(store: AppStore) {
    match users::me().await {
        Ok(profile) => store.user.set(Some(profile)),
        Err(ApiClientError::Unauthorized) => store.signed_out(),
        Err(e) => web_sys::console::log_1(&format!("Error loading profile: {}", e).into()),
    }
}

#[component]
pub fn AccountManagement() -> impl IntoView {
    let store = use_store();

    view! {
        <DashboardLayout>
            <h2 class="text-3xl font-bold text-ctp-text mb-6">"Account"</h2>
            <div class="flex flex-col gap-8 max-w-2xl">
                <AvatarSection/>
                {move || {
                    store
                        .user
                        .get()
                        .map(|user| view! { <ProfileSection user/> })
                }}
                <PasswordSection/>
                <DeleteAccountSection/>
            </div>
        </DashboardLayout>
    }
}

#[component]
fn AvatarSection() -> impl IntoView {
    let store = use_store();
    let busy = RwSignal::new(false);
    let avatar = move || {
        store
            .user
            .with(|user| user.as_ref().and_then(|u| u.avatar_url(API_BASE)))
    };

    let on_file = move |ev: web_sys::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let files: Vec<File> = match input.files() {
            Some(list) => (0..list.length()).filter_map(|i| list.get(i)).collect(),
            None => Vec::new(),
        };
        input.set_value("");

        let mime_types: Vec<String> = files.iter().map(|f| f.type_()).collect();
        let mime_refs: Vec<&str> = mime_types.iter().map(String::as_str).collect();
        if let Err(e) = validate_avatar(&mime_refs) {
            store.notify(Notice::error(e.to_string()));
            return;
        }
        let Some(file) = files.into_iter().next() else {
            return;
        };

        busy.set(true);
        spawn_local(async move {
            let result = users::upload_avatar(&file).await;
            busy.set(false);
            if report(store, result, |r| r.message) {
                reload_profile(store).await;
            }
        });
    };

    let on_delete = move |_| {
        busy.set(true);
        spawn_local(async move {
            let result = users::delete_avatar().await;
            busy.set(false);
            if report(store, result, |r| r.message) {
                reload_profile(store).await;
            }
        });
    };

    view! {
        <section class="flex items-center gap-6 rounded-lg bg-ctp-surface0 p-6">
            {move || match avatar() {
                Some(src) => view! {
                    <img src=src alt="avatar" class="w-24 h-24 rounded-full object-cover"/>
                }
                    .into_any(),
                None => view! { <div class="w-24 h-24 rounded-full bg-ctp-surface2"></div> }.into_any(),
            }}
            <div class="flex flex-col gap-2">
                <label class="px-4 py-2 rounded bg-ctp-blue text-ctp-base font-medium cursor-pointer text-center">
                    "Upload avatar"
                    <input type="file" accept="image/*" class="hidden" on:change=on_file disabled=move || busy.get()/>
                </label>
                <button
                    on:click=on_delete
                    disabled=move || busy.get() || avatar().is_none()
                    class="px-4 py-2 rounded border border-ctp-surface1 text-ctp-text hover:border-ctp-red disabled:opacity-50"
                >
                    "Remove avatar"
                </button>
            </div>
        </section>
    }
}

#[component]
fn ProfileSection(user: UserProfile) -> impl IntoView {
    let store = use_store();
    let name = RwSignal::new(user.name);
    let surname = RwSignal::new(user.surname);
    let email = RwSignal::new(user.email);
    let errors = RwSignal::new(None::<ValidationErrors>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let form = ProfileForm {
            name: name.get_untracked(),
            surname: surname.get_untracked(),
            email: email.get_untracked(),
        };
        let request = match form.validate() {
            Ok(request) => request,
            Err(e) => {
                errors.set(Some(e));
                return;
            }
        };
        errors.set(None);
        spawn_local(async move {
            let result = users::update(&request).await;
            if report(store, result, |r| r.message) {
                reload_profile(store).await;
            }
        });
    };

    view! {
        <form on:submit=on_submit class="flex flex-col gap-3 rounded-lg bg-ctp-surface0 p-6">
            <h3 class="text-lg font-semibold text-ctp-text">"Profile"</h3>
            <TextField label="Name" field="name" value=name errors/>
            <TextField label="Surname" field="surname" value=surname errors/>
            <TextField label="Email" field="email" value=email errors input_type="email"/>
            <button type="submit" class="self-end px-4 py-2 rounded bg-ctp-blue text-ctp-base font-medium">
                "Save"
            </button>
        </form>
    }
}

#[component]
fn PasswordSection() -> impl IntoView {
    let store = use_store();
    let password = RwSignal::new(String::new());
    let repeated_password = RwSignal::new(String::new());
    let errors = RwSignal::new(None::<ValidationErrors>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let form = PasswordForm {
            password: password.get_untracked(),
            repeated_password: repeated_password.get_untracked(),
        };
        let request = match form.validate() {
            Ok(request) => request,
            Err(e) => {
                errors.set(Some(e));
                return;
            }
        };
        errors.set(None);
        spawn_local(async move {
            let result = users::change_password(&request).await;
            if report(store, result, |r| r.message) {
                password.set(String::new());
                repeated_password.set(String::new());
            }
        });
    };

    view! {
        <form on:submit=on_submit class="flex flex-col gap-3 rounded-lg bg-ctp-surface0 p-6">
            <h3 class="text-lg font-semibold text-ctp-text">"Password"</h3>
            <TextField label="New password" field="password" value=password errors input_type="password"/>
            <TextField
                label="Repeat password"
                field="repeatedPassword"
                value=repeated_password
                errors
                input_type="password"
            />
            <button type="submit" class="self-end px-4 py-2 rounded bg-ctp-blue text-ctp-base font-medium">
                "Change password"
            </button>
        </form>
    }
}

#[component]
fn DeleteAccountSection() -> impl IntoView {
    let store = use_store();
    let confirm_open = RwSignal::new(false);

    let on_confirm = Callback::new(move |_| {
        spawn_local(async move {
            let result = users::delete_account().await;
            if report(store, result, |r| r.message) {
                // The server dropped the session along with the account.
                let _ = BrowserTokenStore.clear();
                store.signed_out();
            }
        });
    });

    view! {
        <section class="flex justify-between items-center rounded-lg border border-ctp-red p-6">
            <div>
                <h3 class="text-lg font-semibold text-ctp-text">"Delete account"</h3>
                <p class="text-sm text-ctp-subtext0">"Your account and session are removed for good."</p>
            </div>
            <button
                on:click=move |_| confirm_open.set(true)
                class="px-4 py-2 rounded bg-ctp-red text-ctp-base font-medium"
            >
                "Delete"
            </button>
            <ConfirmDialog
                open=confirm_open
                title="Delete account"
                message=Signal::derive(|| "Delete your account? This cannot be undone.".to_string())
                on_confirm
            />
        </section>
    }
}
