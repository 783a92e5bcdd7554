//! Caller-side list state: the canonical query the table reflects, the last
//! applied result set, and the generation counter that keeps late responses
//! from overwriting newer ones.

mod debounce;

pub use debounce::{DebounceTicket, Debouncer, SEARCH_DEBOUNCE_MS};

use serde::{Deserialize, Serialize};

use crate::models::Page;
use crate::table::{Pagination, Sort, SortDirection, TableIntent};

pub const DEFAULT_SORT_KEY: &str = "name";
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Search, sort and page position of a list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub search: String,
    #[serde(flatten)]
    pub sort: Sort,
    pub page_size: u32,
    pub current_page: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: Sort::new(DEFAULT_SORT_KEY, SortDirection::Desc),
            page_size: DEFAULT_PAGE_SIZE,
            current_page: 1,
        }
    }
}

impl ListQuery {
    pub fn change_sort(&mut self, key: impl Into<String>, direction: SortDirection) {
        self.sort = Sort::new(key, direction);
    }

    pub fn change_page(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    pub fn change_rows_per_page(&mut self, size: u32) {
        self.page_size = size.max(1);
        self.current_page = 1;
    }

    pub fn change_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.current_page = 1;
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.saturating_add(1);
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.saturating_sub(1).max(1);
    }

    pub fn apply(&mut self, intent: TableIntent) {
        match intent {
            TableIntent::ChangePage(page) => self.change_page(page),
            TableIntent::ChangeRowsPerPage(size) => self.change_rows_per_page(size),
            TableIntent::ChangeSort { key, direction } => self.change_sort(key, direction),
        }
    }

    pub fn pagination(&self, total_items: u64) -> Pagination {
        Pagination::new(self.current_page, self.page_size, total_items)
    }

    /// Query string parameters of the list endpoint. An empty search is left
    /// out entirely.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("sortBy", self.sort.sort_by.clone()),
            ("sortDirection", self.sort.sort_direction.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("currentPage", self.current_page.to_string()),
        ];
        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("search", search.to_string()));
        }
        params
    }

    /// Same parameters, encoded as a query string.
    pub fn to_query_string(&self) -> String {
        self.to_params()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(&v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Identifies one fetch. Only the ticket of the most recent fetch is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// What happened to a resolved fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed,
    /// A newer fetch was issued; the response was dropped.
    Stale,
}

/// Query state plus the fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    query: ListQuery,
    data: Option<Vec<T>>,
    total_items: u64,
    is_loading: bool,
    is_error: bool,
    generation: u64,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self::new(ListQuery::default())
    }
}

impl<T> ListState<T> {
    pub fn new(query: ListQuery) -> Self {
        Self {
            query,
            data: None,
            total_items: 0,
            is_loading: false,
            is_error: false,
            generation: 0,
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Applies a table intent; the caller refetches when the query changed.
    pub fn dispatch(&mut self, intent: TableIntent) -> bool {
        let before = self.query.clone();
        self.query.apply(intent);
        before != self.query
    }

    pub fn change_search(&mut self, search: impl Into<String>) -> bool {
        let search = search.into();
        if search == self.query.search {
            return false;
        }
        self.query.change_search(search);
        true
    }

    /// Marks a fetch as in flight and hands out its ticket together with the
    /// query it must use.
    pub fn begin_fetch(&mut self) -> (FetchTicket, ListQuery) {
        self.generation += 1;
        self.is_loading = true;
        self.is_error = false;
        (
            FetchTicket {
                generation: self.generation,
            },
            self.query.clone(),
        )
    }

    /// Back to `query` with no rows. Fetches still in flight become stale, so
    /// a response from before the reset can never be applied after it.
    pub fn reset(&mut self, query: ListQuery) {
        *self = Self {
            generation: self.generation + 1,
            ..Self::new(query)
        };
    }

    pub fn is_latest(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Applies a fetch result unless a newer fetch has been issued since.
    /// A failure keeps the last good rows but raises the error flag.
    pub fn resolve<E>(&mut self, ticket: FetchTicket, result: Result<Page<T>, E>) -> FetchOutcome {
        if !self.is_latest(ticket) {
            return FetchOutcome::Stale;
        }
        self.is_loading = false;
        match result {
            Ok(page) => {
                self.data = Some(page.data);
                self.total_items = page.total_items;
                FetchOutcome::Applied
            }
            Err(_) => {
                self.is_error = true;
                FetchOutcome::Failed
            }
        }
    }

    pub fn rows(&self) -> &[T] {
        self.data.as_deref().unwrap_or_default()
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn pagination(&self) -> Pagination {
        self.query.pagination(self.total_items)
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;
