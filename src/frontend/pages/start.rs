use leptos::prelude::*;

use crate::components::DashboardLayout;
use crate::store::use_store;

#[component]
pub fn Start() -> impl IntoView {
    let store = use_store();
    let greeting = move || {
        store.user.with(|user| match user {
            Some(user) => format!("Welcome, {}", user.name),
            None => "Welcome".to_string(),
        })
    };

    view! {
        <DashboardLayout>
            <h2 class="text-3xl font-bold text-ctp-text mb-4">{greeting}</h2>
            <p class="text-ctp-subtext0 mb-6">"Manage patient records and your account from here."</p>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4 max-w-3xl">
                <a href="/allPatients" class="rounded-lg border border-ctp-surface1 bg-ctp-surface0 p-5 hover:border-ctp-blue">
                    <h3 class="font-semibold text-ctp-text">"Patients"</h3>
                    <p class="text-sm text-ctp-subtext0">"Browse, search and edit records"</p>
                </a>
                <a href="/addPatient" class="rounded-lg border border-ctp-surface1 bg-ctp-surface0 p-5 hover:border-ctp-blue">
                    <h3 class="font-semibold text-ctp-text">"Add patient"</h3>
                    <p class="text-sm text-ctp-subtext0">"Create a new record"</p>
                </a>
                <a href="/accountManagement" class="rounded-lg border border-ctp-surface1 bg-ctp-surface0 p-5 hover:border-ctp-blue">
                    <h3 class="font-semibold text-ctp-text">"Account"</h3>
                    <p class="text-sm text-ctp-subtext0">"Profile, avatar and password"</p>
                </a>
            </div>
        </DashboardLayout>
    }
}
