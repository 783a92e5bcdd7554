use super::*;
use crate::table::{Table, TableRow};

#[derive(Debug, Clone, PartialEq)]
struct Row(String);

impl TableRow for Row {
    fn row_id(&self) -> &str {
        &self.0
    }
}

fn page(ids: &[&str], total: u64) -> Page<Row> {
    Page {
        data: ids.iter().map(|id| Row(id.to_string())).collect(),
        total_items: total,
    }
}

#[test]
fn test_default_query() {
    let query = ListQuery::default();
    assert_eq!(query.search, "");
    assert_eq!(query.sort, Sort::new("name", SortDirection::Desc));
    assert_eq!(query.page_size, 5);
    assert_eq!(query.current_page, 1);
}

#[test]
fn test_rows_per_page_and_search_reset_page() {
    let mut query = ListQuery::default();
    query.change_page(4);
    query.change_rows_per_page(10);
    assert_eq!(query.current_page, 1);
    assert_eq!(query.page_size, 10);

    query.change_page(3);
    query.change_search("kowal");
    assert_eq!(query.current_page, 1);
    assert_eq!(query.search, "kowal");
}

#[test]
fn test_sort_change_keeps_page() {
    let mut query = ListQuery::default();
    query.change_page(3);
    query.apply(TableIntent::ChangeSort {
        key: "surname".to_string(),
        direction: SortDirection::Asc,
    });

    assert_eq!(query.current_page, 3);
    assert_eq!(query.sort, Sort::new("surname", SortDirection::Asc));
}

#[test]
fn test_previous_page_stops_at_first() {
    let mut query = ListQuery::default();
    query.previous_page();
    assert_eq!(query.current_page, 1);
    query.next_page();
    query.next_page();
    assert_eq!(query.current_page, 3);
    query.change_page(0);
    assert_eq!(query.current_page, 1);
}

#[test]
fn test_params_omit_empty_search() {
    let query = ListQuery::default();
    assert_eq!(
        query.to_params(),
        vec![
            ("sortBy", "name".to_string()),
            ("sortDirection", "desc".to_string()),
            ("pageSize", "5".to_string()),
            ("currentPage", "1".to_string()),
        ]
    );

    let mut query = ListQuery::default();
    query.change_search("  ");
    assert!(query.to_params().iter().all(|(k, _)| *k != "search"));
}

#[test]
fn test_query_string_encodes_search() {
    let mut query = ListQuery::default();
    query.change_sort("address.city", SortDirection::Asc);
    query.change_search("Jan K");

    assert_eq!(
        query.to_query_string(),
        "sortBy=address.city&sortDirection=asc&pageSize=5&currentPage=1&search=Jan%20K"
    );

    query.change_search("Łódź&x=1");
    assert!(
        query
            .to_query_string()
            .ends_with("&search=%C5%81%C3%B3d%C5%BA%26x%3D1")
    );
}

#[test]
fn test_query_serializes_flat() {
    let value = serde_json::to_value(ListQuery::default()).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "search": "",
            "sortBy": "name",
            "sortDirection": "desc",
            "pageSize": 5,
            "currentPage": 1
        })
    );
}

#[test]
fn test_fetch_applies_latest_result() {
    let mut state: ListState<Row> = ListState::default();
    let (ticket, query) = state.begin_fetch();
    assert!(state.is_loading());
    assert_eq!(query, ListQuery::default());

    let outcome = state.resolve::<()>(ticket, Ok(page(&["a", "b"], 12)));

    assert_eq!(outcome, FetchOutcome::Applied);
    assert!(!state.is_loading());
    assert_eq!(state.rows().len(), 2);
    assert_eq!(state.total_items(), 12);
}

#[test]
fn test_stale_response_is_dropped() {
    let mut state: ListState<Row> = ListState::default();
    let (first, _) = state.begin_fetch();
    state.dispatch(TableIntent::ChangePage(2));
    let (second, query) = state.begin_fetch();
    assert_eq!(query.current_page, 2);

    assert_eq!(
        state.resolve::<()>(second, Ok(page(&["f", "g"], 12))),
        FetchOutcome::Applied
    );
    assert_eq!(
        state.resolve::<()>(first, Ok(page(&["a", "b"], 12))),
        FetchOutcome::Stale
    );

    let ids: Vec<&str> = state.rows().iter().map(|r| r.row_id()).collect();
    assert_eq!(ids, vec!["f", "g"]);
}

#[test]
fn test_stale_response_does_not_end_loading() {
    let mut state: ListState<Row> = ListState::default();
    let (first, _) = state.begin_fetch();
    let (_second, _) = state.begin_fetch();

    state.resolve::<()>(first, Ok(page(&["a"], 1)));

    assert!(state.is_loading());
    assert!(!state.has_data());
}

#[test]
fn test_failure_keeps_previous_rows() {
    let mut state: ListState<Row> = ListState::default();
    let (ticket, _) = state.begin_fetch();
    state.resolve::<()>(ticket, Ok(page(&["a"], 1)));

    let (ticket, _) = state.begin_fetch();
    let outcome = state.resolve(ticket, Err("boom"));

    assert_eq!(outcome, FetchOutcome::Failed);
    assert!(state.is_error());
    assert_eq!(state.rows().len(), 1);

    let (_ticket, _) = state.begin_fetch();
    assert!(!state.is_error());
}

#[test]
fn test_dispatch_reports_change() {
    let mut state: ListState<Row> = ListState::default();
    assert!(!state.dispatch(TableIntent::ChangePage(1)));
    assert!(state.dispatch(TableIntent::ChangeRowsPerPage(10)));
    assert!(!state.change_search(""));
    assert!(state.change_search("nowak"));
}

#[test]
fn test_table_intents_drive_query() {
    let table = Table::new("Patients");
    let mut state: ListState<Row> = ListState::default();

    let columns = crate::models::patient_columns();
    let intent = table
        .click_header_key(&columns, "name", &state.query().sort)
        .unwrap();
    state.dispatch(intent);
    assert_eq!(state.query().sort.sort_direction, SortDirection::Asc);

    state.dispatch(table.page_event(2));
    assert_eq!(state.query().current_page, 3);

    if let Some(intent) = table.rows_per_page_event(25) {
        state.dispatch(intent);
    }
    assert_eq!(state.query().page_size, 25);
    assert_eq!(state.query().current_page, 1);
}

#[test]
fn test_reset_drops_fetches_from_before() {
    let mut state: ListState<Row> = ListState::default();
    state.change_search("kowalski");
    let (old_ticket, _) = state.begin_fetch();

    state.reset(ListQuery::default());
    assert_eq!(state.query(), &ListQuery::default());
    assert!(!state.has_data());
    assert!(!state.is_loading());

    let (new_ticket, _) = state.begin_fetch();
    assert_eq!(
        state.resolve::<()>(old_ticket, Ok(page(&["a"], 1))),
        FetchOutcome::Stale
    );
    assert_eq!(
        state.resolve::<()>(new_ticket, Ok(page(&["b"], 1))),
        FetchOutcome::Applied
    );
    assert_eq!(state.rows(), &[Row("b".to_string())]);
}

#[test]
fn test_reset_without_new_fetch_ignores_late_response() {
    let mut state: ListState<Row> = ListState::default();
    let (ticket, _) = state.begin_fetch();
    state.reset(ListQuery::default());

    assert_eq!(
        state.resolve::<()>(ticket, Ok(page(&["a"], 1))),
        FetchOutcome::Stale
    );
    assert!(!state.has_data());
}
