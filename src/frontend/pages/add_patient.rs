use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::Redirect;
use patients_care::models::RequestPatient;
use patients_care::notice::Notice;

use crate::api::{ApiClientError, patients};
use crate::components::{DashboardLayout, PatientFormView};
use crate::store::use_store;

#[component]
pub fn AddPatient() -> impl IntoView {
    let store = use_store();
    let busy = RwSignal::new(false);
    let saved = RwSignal::new(false);

    let on_submit = Callback::new(move |request: RequestPatient| {
        busy.set(true);
        spawn_local(async move {
            let result = patients::add(&request).await;
            busy.set(false);
            match result {
                Ok(response) => {
                    store.notify(Notice::success(response.message));
                    saved.set(true);
                }
                Err(ApiClientError::Unauthorized) => store.signed_out(),
                Err(e) => store.notify(Notice::error(e.to_string())),
            }
        });
    });

    view! {
        <DashboardLayout>
            <h2 class="text-3xl font-bold text-ctp-text mb-6">"Add patient"</h2>
            <PatientFormView submit_label="Add" busy on_submit/>
            {move || saved.get().then(|| view! { <Redirect path="/allPatients"/> })}
        </DashboardLayout>
    }
}
