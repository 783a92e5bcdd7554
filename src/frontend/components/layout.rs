use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_location, use_navigate};
use patients_care::notice::Notice;

use crate::api::{API_BASE, ApiClientError, auth, users};
use crate::store::use_store;

const NAV_LINKS: [(&str, &str); 4] = [
    ("/start", "Start"),
    ("/allPatients", "Patients"),
    ("/addPatient", "Add patient"),
    ("/accountManagement", "Account"),
];

fn segment_label(segment: &str) -> Option<&'static str> {
    match segment {
        "start" => Some("Start"),
        "allPatients" => Some("Patients"),
        "addPatient" => Some("Add patient"),
        "editPatient" => Some("Edit patient"),
        "accountManagement" => Some("Account"),
        _ => None,
    }
}

/// Breadcrumb trail for a path; unknown segments such as ids are skipped.
fn breadcrumbs(path: &str) -> Vec<(String, &'static str)> {
    let mut href = String::new();
    let mut crumbs = Vec::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        href.push('/');
        href.push_str(segment);
        if let Some(label) = segment_label(segment) {
            crumbs.push((href.clone(), label));
        }
    }
    crumbs
}

/// Shell of every signed-in page: sidebar, breadcrumbs and the user badge.
#[component]
pub fn DashboardLayout(children: Children) -> impl IntoView {
    let store = use_store();
    let location = use_location();
    let navigate = use_navigate();

    if store.user.get_untracked().is_none() {
        spawn_local(async move {
            match users::me().await {
                Ok(profile) => store.user.set(Some(profile)),
                Err(ApiClientError::Unauthorized) => store.signed_out(),
                Err(e) => web_sys::console::log_1(&format!("Error loading profile: {}", e).into()),
            }
        });
    }

    let is_active = move |path: &str| location.pathname.get().starts_with(path);

    let on_logout = move |_| {
        let navigate = navigate.clone();
        spawn_local(async move {
            if let Err(e) = auth::logout().await {
                store.notify(Notice::error(e.to_string()));
            }
            store.signed_out();
            navigate("/login", Default::default());
        });
    };

    let user_name = move || {
        store
            .user
            .with(|user| user.as_ref().map(|u| u.full_name()).unwrap_or_default())
    };
    let avatar = move || {
        store
            .user
            .with(|user| user.as_ref().and_then(|u| u.avatar_url(API_BASE)))
    };

    view! {
        <div class="min-h-screen flex bg-ctp-base">
            <aside class="w-56 shrink-0 bg-ctp-surface0 border-r border-ctp-surface1 flex flex-col">
                <div class="px-6 py-5">
                    <h1 class="text-2xl font-bold bg-gradient-to-r from-ctp-mauve to-ctp-blue bg-clip-text text-transparent">
                        "Patients care"
                    </h1>
                </div>
                <nav class="flex flex-col gap-1 px-3">
                    {NAV_LINKS
                        .iter()
                        .map(|(href, label)| {
                            let href = *href;
                            view! {
                                <a
                                    href=href
                                    class="px-4 py-2 rounded-lg font-medium transition-colors"
                                    class:bg-ctp-surface2=move || is_active(href)
                                    class:text-ctp-text=move || is_active(href)
                                    class:text-ctp-subtext1=move || !is_active(href)
                                >
                                    {*label}
                                </a>
                            }
                        })
                        .collect_view()}
                </nav>
            </aside>

            <div class="flex-1 flex flex-col">
                <header class="flex justify-between items-center px-6 py-4 border-b border-ctp-surface1">
                    <nav class="flex items-center gap-2 text-sm text-ctp-subtext0">
                        {move || {
                            breadcrumbs(&location.pathname.get())
                                .into_iter()
                                .enumerate()
                                .map(|(i, (href, label))| {
                                    view! {
                                        {(i > 0).then_some("/")}
                                        <a href=href class="hover:text-ctp-text">{label}</a>
                                    }
                                })
                                .collect_view()
                        }}
                    </nav>
                    <div class="flex items-center gap-3">
                        {move || match avatar() {
                            Some(src) => view! {
                                <img src=src alt="avatar" class="w-8 h-8 rounded-full object-cover"/>
                            }
                                .into_any(),
                            None => view! {
                                <div class="w-8 h-8 rounded-full bg-ctp-surface2"></div>
                            }
                                .into_any(),
                        }}
                        <span class="text-ctp-text">{user_name}</span>
                        <button
                            on:click=on_logout
                            class="px-3 py-1 rounded border border-ctp-surface1 text-ctp-subtext1 hover:border-ctp-red"
                        >
                            "Sign out"
                        </button>
                    </div>
                </header>
                <main class="flex-1 p-6">{children()}</main>
            </div>
        </div>
    }
}
