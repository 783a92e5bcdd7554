use leptos::prelude::*;

use crate::components::NotFoundView;

#[component]
pub fn NotFound() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-ctp-base">
            <NotFoundView message="This page does not exist."/>
        </div>
    }
}
