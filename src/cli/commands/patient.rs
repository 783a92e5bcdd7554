use serde::Serialize;
use tabled::builder::Builder;
use tracing::{debug, info, instrument, warn};

use crate::cli::api_client::ApiClient;
use crate::cli::commands::done;
use crate::cli::error::{CliError, CliResult};
use crate::cli::session_store::QueryStore;
use crate::cli::utils::{apply_table_style, render_table_view, require_force};
use crate::endpoints;
use crate::models::{MessageResponse, Page, Patient, Single, patient_columns};
use crate::query::{FetchOutcome, ListQuery, ListState};
use crate::table::{SortDirection, Table, TableProps};
use crate::validation::PatientForm;

pub const TABLE_NAME: &str = "Patients";

/// Changes to the saved list query requested on the command line.
#[derive(Debug, Default, Clone)]
pub struct ListArgs {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<SortDirection>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub next: bool,
    pub prev: bool,
    pub reset: bool,
}

/// Fields to change on an existing patient; unset fields keep their value.
#[derive(Debug, Default, Clone)]
pub struct PatientEdit {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone_number: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub avenue: Option<String>,
}

impl PatientEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.surname.is_none()
            && self.phone_number.is_none()
            && self.state.is_none()
            && self.city.is_none()
            && self.avenue.is_none()
    }

    pub fn apply_to(self, form: &mut PatientForm) {
        let fields = [
            (self.name, &mut form.name),
            (self.surname, &mut form.surname),
            (self.phone_number, &mut form.phone_number),
            (self.state, &mut form.state),
            (self.city, &mut form.city),
            (self.avenue, &mut form.avenue),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

/// Apply command-line arguments to the saved query, going through the same
/// intents a table header or pager would emit.
///
/// `--sort KEY` alone behaves like clicking that column's header.
pub fn apply_list_args(query: &mut ListQuery, args: &ListArgs) -> CliResult<()> {
    if args.reset {
        *query = ListQuery::default();
    }

    let table = Table::new(TABLE_NAME);
    let columns = patient_columns();

    if let Some(search) = &args.search {
        query.change_search(search.trim());
    }

    if let Some(size) = args.page_size {
        let intent = table.rows_per_page_event(size).ok_or_else(|| {
            CliError::InvalidArgument(format!(
                "page size {} is not one of {:?}",
                size,
                table.page_sizes().as_slice()
            ))
        })?;
        query.apply(intent);
    }

    match (&args.sort, args.direction) {
        (Some(key), direction) => {
            let intent = table
                .click_header_key(&columns, key, &query.sort)
                .ok_or_else(|| {
                    CliError::InvalidArgument(format!(
                        "cannot sort by '{}' (expected one of: {})",
                        key,
                        columns.sortable_keys().join(", ")
                    ))
                })?;
            query.apply(intent);
            if let Some(direction) = direction {
                query.sort.sort_direction = direction;
            }
        }
        (None, Some(direction)) => query.sort.sort_direction = direction,
        (None, None) => {}
    }

    if let Some(page) = args.page {
        query.change_page(page);
    }
    if args.next {
        query.next_page();
    }
    if args.prev {
        query.previous_page();
    }

    Ok(())
}

/// Fetch one page of patients for `state`'s current query.
pub async fn fetch_page(api_client: &ApiClient, state: &mut ListState<Patient>) -> CliResult<()> {
    let (ticket, query) = state.begin_fetch();
    let params = query.to_params();
    debug!(?params, "Fetching patients");

    let result: CliResult<Page<Patient>> = async {
        let response = api_client
            .send_private(|c| c.get(endpoints::PATIENTS).query(&params))
            .await?;
        ApiClient::handle_response(response).await
    }
    .await;

    match result {
        Ok(page) => {
            if state.resolve::<CliError>(ticket, Ok(page)) == FetchOutcome::Stale {
                debug!("Dropped stale patients page");
            }
            Ok(())
        }
        Err(e) => {
            state.resolve::<()>(ticket, Err(()));
            Err(e)
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListOutput<'a> {
    query: &'a ListQuery,
    total_items: u64,
    data: &'a [Patient],
}

/// List patients using the saved query updated by `args`. The query is saved
/// again only after a successful fetch.
#[instrument(skip(api_client, store))]
pub async fn list_patients(
    api_client: &ApiClient,
    store: &QueryStore,
    args: &ListArgs,
    format: &str,
) -> CliResult<String> {
    let mut query = store.load();
    apply_list_args(&mut query, args)?;

    let mut state = ListState::new(query);
    fetch_page(api_client, &mut state).await?;
    store.save(state.query())?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&ListOutput {
            query: state.query(),
            total_items: state.total_items(),
            data: state.rows(),
        })?),
        _ => Ok(format_table(&state)),
    }
}

pub(crate) fn format_table(state: &ListState<Patient>) -> String {
    let columns = patient_columns();
    let view = Table::new(TABLE_NAME).project(&TableProps {
        is_loading: state.is_loading(),
        columns: &columns,
        data: state.rows(),
        pagination: state.pagination(),
        sort: &state.query().sort,
    });
    let mut output = render_table_view(&view, "No patients found.");
    if !state.query().search.is_empty() {
        output.push_str(&format!("\nSearch: \"{}\"", state.query().search));
    }
    output
}

async fn fetch_patient(api_client: &ApiClient, id: &str) -> CliResult<Patient> {
    let path = endpoints::patient(id);
    let response = api_client.send_private(|c| c.get(&path)).await?;
    let single: Single<Patient> = ApiClient::handle_response(response).await?;
    Ok(single.data)
}

/// Get a single patient by ID
#[instrument(skip(api_client))]
pub async fn get_patient(api_client: &ApiClient, id: &str, format: &str) -> CliResult<String> {
    let patient = fetch_patient(api_client, id).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&patient)?),
        _ => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            builder.push_record(["ID", &patient.id]);
            builder.push_record(["Name", &patient.name]);
            builder.push_record(["Surname", &patient.surname]);
            builder.push_record(["Phone number", &patient.phone_number]);
            builder.push_record(["State", &patient.address.state]);
            builder.push_record(["City", &patient.address.city]);
            builder.push_record(["Avenue", &patient.address.avenue]);
            if !patient.photos.is_empty() {
                let photos = patient
                    .photos
                    .iter()
                    .map(|p| p.original_name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                builder.push_record(["Photos", &photos]);
            }
            if let Some(created_at) = &patient.created_at {
                builder.push_record(["Created", created_at]);
            }
            if let Some(updated_at) = &patient.updated_at {
                builder.push_record(["Updated", updated_at]);
            }

            let mut table = builder.build();
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
    }
}

#[instrument(skip(api_client, form))]
pub async fn add_patient(api_client: &ApiClient, form: &PatientForm) -> CliResult<String> {
    let request = form.validate()?;

    let response = api_client
        .send_private(|c| c.post(endpoints::PATIENTS).json(&request))
        .await?;
    let body: MessageResponse = ApiClient::handle_response(response).await?;

    info!("Patient added");
    Ok(done(&body.message))
}

/// Merge `edit` over the stored record and save it.
#[instrument(skip(api_client, edit))]
pub async fn edit_patient(api_client: &ApiClient, id: &str, edit: PatientEdit) -> CliResult<String> {
    if edit.is_empty() {
        return Err(CliError::InvalidArgument(
            "nothing to change; pass at least one field".to_string(),
        ));
    }

    let current = fetch_patient(api_client, id).await?;
    let mut form = PatientForm::from(&current);
    edit.apply_to(&mut form);
    let request = form.validate()?;

    let path = endpoints::patient(id);
    let response = api_client
        .send_private(|c| c.patch(&path).json(&request))
        .await?;
    let body: MessageResponse = ApiClient::handle_response(response).await?;

    info!("Patient updated");
    Ok(done(&body.message))
}

/// Delete every listed patient. Failures are reported per id; the command
/// fails only when nothing could be deleted.
#[instrument(skip(api_client))]
pub async fn delete_patients(api_client: &ApiClient, ids: &[String], force: bool) -> CliResult<String> {
    if ids.is_empty() {
        return Err(CliError::InvalidArgument(
            "no patient ids given".to_string(),
        ));
    }
    let action = match ids.len() {
        1 => "delete 1 patient".to_string(),
        n => format!("delete {} patients", n),
    };
    require_force(force, &action)?;

    let mut lines = Vec::with_capacity(ids.len());
    let mut first_error = None;
    let mut deleted = 0;

    for id in ids {
        let path = endpoints::patient(id);
        let result = async {
            let response = api_client.send_private(|c| c.delete(&path)).await?;
            ApiClient::handle_response::<MessageResponse>(response).await
        }
        .await;

        match result {
            Ok(_) => {
                deleted += 1;
                lines.push(done(&format!("Deleted patient {}", id)));
            }
            Err(e) => {
                warn!(id = %id, error = %e, "Delete failed");
                lines.push(format!("✗ {}: {}", id, e));
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) if deleted == 0 => Err(e),
        _ => Ok(lines.join("\n")),
    }
}
