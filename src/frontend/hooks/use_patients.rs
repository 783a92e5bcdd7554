use leptos::prelude::*;
use leptos::task::spawn_local;
use patients_care::models::Patient;
use patients_care::notice::fetch_notice;
use patients_care::query::{FetchOutcome, ListState};
use patients_care::table::TableIntent;

use crate::api::{ApiClientError, patients};
use crate::store::use_store;

/// Return type for use_patients hook
pub struct UsePatientsReturn {
    pub state: Signal<ListState<Patient>>,
    pub on_intent: Callback<TableIntent>,
    pub on_search: Callback<String>,
    pub refetch: Callback<()>,
}

/// Keeps the patients page in the store in sync with its query.
///
/// Every query change issues a fetch. Responses to superseded fetches are
/// dropped, so a slow early response cannot overwrite a later one.
pub fn use_patients() -> UsePatientsReturn {
    let store = use_store();
    let list = store.patients;
    let query = Memo::new(move |_| list.with(|state| state.query().clone()));
    let reload = RwSignal::new(0u32);

    Effect::new(move || {
        query.track();
        reload.track();

        let Some((ticket, query)) = list.try_update(|state| state.begin_fetch()) else {
            return;
        };
        web_sys::console::log_1(&format!("Fetching patients: {}", query.to_query_string()).into());

        spawn_local(async move {
            let result = patients::list(&query).await;
            if matches!(result, Err(ApiClientError::Unauthorized)) {
                store.signed_out();
                return;
            }
            let error = result.as_ref().err().map(ToString::to_string);
            if let Some(e) = &error {
                web_sys::console::log_1(&format!("Error: {}", e).into());
            }

            let Some(outcome) = list.try_update(|state| state.resolve(ticket, result)) else {
                return;
            };
            if outcome == FetchOutcome::Stale {
                web_sys::console::log_1(&"Dropped stale patients response".into());
            }
            if let Some(notice) = fetch_notice(outcome, error) {
                store.notify(notice);
            }
        });
    });

    let on_intent = Callback::new(move |intent: TableIntent| {
        list.update(|state| {
            state.dispatch(intent);
        });
    });

    let on_search = Callback::new(move |search: String| {
        list.update(|state| {
            state.change_search(search);
        });
    });

    let refetch = Callback::new(move |_| {
        reload.update(|n| *n += 1);
    });

    UsePatientsReturn {
        state: list.into(),
        on_intent,
        on_search,
        refetch,
    }
}
