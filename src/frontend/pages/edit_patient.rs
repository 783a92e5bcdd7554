use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_params_map;
use patients_care::models::RequestPatient;
use patients_care::notice::Notice;
use patients_care::validation::PatientForm;

use crate::api::{ApiClientError, patients};
use crate::components::{DashboardLayout, NotFoundView, PatientFormView};
use crate::store::use_store;

#[component]
pub fn EditPatient() -> impl IntoView {
    let store = use_store();
    let params = use_params_map();
    let patient_id = move || params.with(|p| p.get("patientId").unwrap_or_default());

    let patient = LocalResource::new(move || {
        let id = patient_id();
        async move {
            let result = patients::get(&id).await;
            match &result {
                Err(ApiClientError::Unauthorized) => store.signed_out(),
                Err(e) => store.notify(Notice::error(e.to_string()).sticky()),
                Ok(_) => {}
            }
            result
        }
    });

    view! {
        <DashboardLayout>
            <h2 class="text-3xl font-bold text-ctp-text mb-6">"Edit patient"</h2>
            <Suspense fallback=move || {
                view! { <p class="text-ctp-subtext0">"Loading patient..."</p> }
            }>
                {move || {
                    patient
                        .get()
                        .map(|result| match result {
                            Ok(patient) => {
                                view! {
                                    <EditPatientForm id=patient_id() initial=PatientForm::from(&patient)/>
                                }
                                    .into_any()
                            }
                            Err(_) => {
                                view! { <NotFoundView message="This patient could not be loaded."/> }
                                    .into_any()
                            }
                        })
                }}
            </Suspense>
        </DashboardLayout>
    }
}

#[component]
fn EditPatientForm(id: String, initial: PatientForm) -> impl IntoView {
    let store = use_store();
    let busy = RwSignal::new(false);
    let saved = RwSignal::new(false);
    let id = StoredValue::new(id);

    let on_submit = Callback::new(move |request: RequestPatient| {
        busy.set(true);
        let id = id.get_value();
        spawn_local(async move {
            let result = patients::edit(&id, &request).await;
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
        <PatientFormView initial submit_label="Save" busy on_submit/>
        {move || saved.get().then(|| view! { <Redirect path="/allPatients"/> })}
    }
}
