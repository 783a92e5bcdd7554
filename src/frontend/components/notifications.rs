use leptos::prelude::*;
use patients_care::notice::NoticeLevel;

use crate::store::use_store;

/// Stack of notices in the corner of the screen.
#[component]
pub fn Notifications() -> impl IntoView {
    let store = use_store();

    view! {
        <div class="fixed bottom-4 right-4 z-50 flex flex-col gap-2 w-80">
            <For
                each=move || store.notices.get()
                key=|(id, _)| *id
                children=move |(id, notice)| {
                    let (icon, border) = match notice.level {
                        NoticeLevel::Success => ("✓", "border-ctp-green"),
                        NoticeLevel::Error => ("✗", "border-ctp-red"),
                    };
                    view! {
                        <div class=format!(
                            "flex items-start gap-3 rounded-lg border-l-4 bg-ctp-surface0 px-4 py-3 shadow-lg {}",
                            border,
                        )>
                            <span class="font-bold">{icon}</span>
                            <p class="flex-1 text-sm text-ctp-text">{notice.message}</p>
                            <button
                                on:click=move |_| store.dismiss(id)
                                class="text-ctp-overlay0 hover:text-ctp-text"
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
