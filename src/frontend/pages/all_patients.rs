use leptos::prelude::*;
use leptos::task::spawn_local;
use patients_care::models::{Patient, patient_columns};
use patients_care::notice::Notice;

use crate::api::{ApiClientError, patients};
use crate::components::{ConfirmDialog, DashboardLayout, DataTable, NotFoundView, SearchInput};
use crate::hooks::{use_patients, use_search};
use crate::store::use_store;

const TABLE_NAME: &str = "Patients";

#[component]
pub fn AllPatients() -> impl IntoView {
    view! {
        <DashboardLayout>
            <PatientsList/>
        </DashboardLayout>
    }
}

#[component]
fn PatientsList() -> impl IntoView {
    let store = use_store();
    let list = use_patients();
    let state = list.state;
    let on_intent = list.on_intent;
    let refetch = list.refetch;
    let search = use_search(
        state.with_untracked(|s| s.query().search.clone()),
        list.on_search,
    );
    let search_input = search.search_input;
    let on_search_change = search.on_debounced_change;
    let on_search_input = search.on_immediate_change;
    let is_error = Memo::new(move |_| state.with(|s| s.is_error()));

    let confirm_open = RwSignal::new(false);
    let pending_delete = RwSignal::new(Vec::<String>::new());
    let deleting = RwSignal::new(false);

    let delete_selected = Callback::new(move |_| {
        let ids = pending_delete.get_untracked();
        if ids.is_empty() {
            return;
        }
        deleting.set(true);
        spawn_local(async move {
            let mut deleted = 0usize;
            for id in &ids {
                match patients::delete(id).await {
                    Ok(_) => deleted += 1,
                    Err(ApiClientError::Unauthorized) => {
                        store.signed_out();
                        return;
                    }
                    Err(e) => store.notify(Notice::error(format!("{}: {}", id, e))),
                }
            }
            if deleted > 0 {
                let noun = if deleted == 1 { "patient" } else { "patients" };
                store.notify(Notice::success(format!("Deleted {} {}", deleted, noun)));
            }
            deleting.set(false);
            pending_delete.set(Vec::new());
            refetch.run(());
        });
    });

    let selected_items_options = Callback::new(move |selected: Vec<Patient>| {
        let ids: Vec<String> = selected.into_iter().map(|p| p.id).collect();
        view! {
            <button
                disabled=move || deleting.get()
                on:click=move |_| {
                    pending_delete.set(ids.clone());
                    confirm_open.set(true);
                }
                class="px-3 py-1 rounded bg-ctp-red text-ctp-base font-medium disabled:opacity-50"
            >
                "Delete"
            </button>
        }
        .into_any()
    });

    let row_actions = Callback::new(move |id: String| {
        view! {
            <a
                href=format!("/allPatients/editPatient/{}", id)
                class="text-ctp-blue hover:text-ctp-lavender underline"
            >
                "Edit"
            </a>
        }
        .into_any()
    });

    let confirm_message = Signal::derive(move || {
        let count = pending_delete.with(|ids| ids.len());
        format!("Delete {} selected patient record(s)? This cannot be undone.", count)
    });

    view! {
        <div class="flex justify-between items-center mb-6">
            <h2 class="text-3xl font-bold text-ctp-text">"Patients"</h2>
            <div class="flex gap-2">
                <button
                    on:click=move |_| refetch.run(())
                    class="px-4 py-2 rounded border border-ctp-surface1 text-ctp-text hover:border-ctp-blue"
                >
                    "Refresh"
                </button>
                <a href="/addPatient" class="px-4 py-2 rounded bg-ctp-blue text-ctp-base font-medium">
                    "Add patient"
                </a>
            </div>
        </div>

        {move || {
            if is_error.get() {
                view! { <NotFoundView message="Patients could not be loaded."/> }.into_any()
            } else {
                view! {
                    <DataTable
                        name=TABLE_NAME
                        selectable=true
                        columns=patient_columns()
                        data=Signal::derive(move || state.with(|s| s.rows().to_vec()))
                        is_loading=Signal::derive(move || state.with(|s| s.is_loading()))
                        pagination=Signal::derive(move || state.with(|s| s.pagination()))
                        sort=Signal::derive(move || state.with(|s| s.query().sort.clone()))
                        on_intent
                        filter=move || {
                            view! {
                                <SearchInput
                                    value=search_input
                                    on_change=on_search_change
                                    on_immediate_change=on_search_input
                                    placeholder="Search patients..."
                                />
                            }
                        }
                        selected_items_options
                        row_actions
                    />
                }
                    .into_any()
            }
        }}

        <ConfirmDialog
            open=confirm_open
            title="Delete patients"
            message=confirm_message
            on_confirm=delete_selected
        />
    }
}
