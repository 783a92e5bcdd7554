//! Generic data table.
//!
//! The table owns only view-local state: which rows are selected and whether
//! the filter area is open. Pagination and sort are owned by the caller; the
//! table reflects them and turns user interaction into [`TableIntent`]s that
//! the caller applies to its own state. Nothing in here fetches or mutates data.

mod column;
mod pagination;
mod selection;
mod sort;

pub use column::{CellRenderer, Column, Columns};
pub use pagination::{DEFAULT_PAGE_SIZES, PageSizeOptions, Pagination};
pub use selection::{CheckState, Selection, TableRow};
pub use sort::{Sort, SortDirection};

use std::fmt;

use thiserror::Error;

/// Errors raised while configuring a table. Interaction with a configured
/// table cannot fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("duplicate column key '{0}'")]
    DuplicateColumnKey(String),

    #[error("invalid sort direction '{0}' (expected 'asc' or 'desc')")]
    InvalidSortDirection(String),

    #[error("page size options must be non-empty and greater than zero")]
    InvalidPageSizes,
}

/// A change the table asks its owner to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableIntent {
    /// 1-indexed page to show.
    ChangePage(u32),
    ChangeRowsPerPage(u32),
    ChangeSort {
        key: String,
        direction: SortDirection,
    },
}

/// Everything the caller feeds into a render pass.
pub struct TableProps<'a, T, C = String> {
    pub is_loading: bool,
    pub columns: &'a Columns<T, C>,
    /// Rows of the current page only; the table never slices.
    pub data: &'a [T],
    pub pagination: Pagination,
    pub sort: &'a Sort,
}

/// Toolbar heading: the table name, or the selection count while rows are
/// selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarTitle {
    Name(String),
    Selected(usize),
}

impl fmt::Display for ToolbarTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolbarTitle::Name(name) => f.write_str(name),
            ToolbarTitle::Selected(n) => write!(f, "{} selected", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub key: String,
    pub title: String,
    pub sortable: bool,
    /// Direction of the active sort column; `None` for every other column.
    pub direction: Option<SortDirection>,
}

impl HeaderView {
    pub fn is_active(&self) -> bool {
        self.direction.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView<C> {
    pub id: String,
    /// Checkbox state; `None` when the table is not selectable.
    pub selected: Option<bool>,
    pub cells: Vec<C>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    /// Zero-indexed.
    pub display_page: u32,
    pub page_count: u32,
    pub page_size: u32,
    pub page_sizes: Vec<u32>,
    pub total_items: u64,
    pub item_range: Option<(u64, u64)>,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Render model produced by [`Table::project`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView<C> {
    pub title: ToolbarTitle,
    pub filter_open: bool,
    /// Whether bulk actions over the selection should be shown.
    pub show_selection_actions: bool,
    /// Blocking overlay drawn above the rows, which stay rendered underneath.
    pub loading_overlay: bool,
    pub header_checkbox: Option<CheckState>,
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView<C>>,
    pub pagination: PaginationView,
}

/// View-local state of one table instance.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    selectable: bool,
    page_sizes: PageSizeOptions,
    selection: Selection,
    filter_open: bool,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selectable: false,
            page_sizes: PageSizeOptions::default(),
            selection: Selection::new(),
            filter_open: false,
        }
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn with_page_sizes(mut self, page_sizes: PageSizeOptions) -> Self {
        self.page_sizes = page_sizes;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn page_sizes(&self) -> &PageSizeOptions {
        &self.page_sizes
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_filter_open(&self) -> bool {
        self.filter_open
    }

    pub fn toggle_filter(&mut self) {
        self.filter_open = !self.filter_open;
    }

    /// Called whenever the caller hands over a new set of rows. Selected ids
    /// that are no longer shown are dropped.
    pub fn sync_rows<T: TableRow>(&mut self, rows: &[T]) {
        self.selection.retain_rows(rows);
    }

    pub fn set_row_selected(&mut self, id: &str, checked: bool) {
        if self.selectable {
            self.selection.set(id, checked);
        }
    }

    pub fn toggle_row(&mut self, id: &str) {
        if self.selectable {
            self.selection.toggle(id);
        }
    }

    /// Header checkbox click. Scoped to the rows currently shown.
    pub fn toggle_all<T: TableRow>(&mut self, rows: &[T]) {
        if self.selectable {
            self.selection.toggle_all(rows);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Rows handed to bulk actions. Always empty for a non-selectable table.
    pub fn selected_rows<'a, T: TableRow>(&self, rows: &'a [T]) -> Vec<&'a T> {
        if !self.selectable {
            return Vec::new();
        }
        self.selection.selected_rows(rows)
    }

    pub fn header_checkbox<T: TableRow>(&self, rows: &[T]) -> Option<CheckState> {
        self.selectable.then(|| self.selection.header_state(rows))
    }

    /// Header click on `column`. Non-sortable columns produce no intent.
    pub fn click_header<T, C>(&self, column: &Column<T, C>, sort: &Sort) -> Option<TableIntent> {
        if !column.sortable {
            return None;
        }
        let next = sort.clicked(&column.key);
        Some(TableIntent::ChangeSort {
            key: next.sort_by,
            direction: next.sort_direction,
        })
    }

    /// Header click by column key; unknown keys produce no intent.
    pub fn click_header_key<T, C>(
        &self,
        columns: &Columns<T, C>,
        key: &str,
        sort: &Sort,
    ) -> Option<TableIntent> {
        columns
            .get(key)
            .and_then(|column| self.click_header(column, sort))
    }

    /// Page control event carrying a zero-indexed page.
    pub fn page_event(&self, display_index: u32) -> TableIntent {
        TableIntent::ChangePage(Pagination::page_from_display(display_index))
    }

    /// Page-size selector event. Sizes outside the configured set are ignored.
    pub fn rows_per_page_event(&self, size: u32) -> Option<TableIntent> {
        self.page_sizes
            .contains(size)
            .then_some(TableIntent::ChangeRowsPerPage(size))
    }

    pub fn title<T: TableRow>(&self, rows: &[T]) -> ToolbarTitle {
        match self.selected_rows(rows).len() {
            0 => ToolbarTitle::Name(self.name.clone()),
            n => ToolbarTitle::Selected(n),
        }
    }

    /// Projects the caller's props and the local state into a render model.
    pub fn project<T: TableRow, C>(&self, props: &TableProps<'_, T, C>) -> TableView<C> {
        let headers = props
            .columns
            .iter()
            .map(|column| HeaderView {
                key: column.key.clone(),
                title: column.title.clone(),
                sortable: column.sortable,
                direction: props
                    .sort
                    .is_active(&column.key)
                    .then_some(props.sort.sort_direction),
            })
            .collect();

        let rows = props
            .data
            .iter()
            .map(|row| RowView {
                id: row.row_id().to_string(),
                selected: self
                    .selectable
                    .then(|| self.selection.contains(row.row_id())),
                cells: props.columns.iter().map(|c| c.render(row)).collect(),
            })
            .collect();

        let pagination = props.pagination;
        let title = self.title(props.data);

        TableView {
            show_selection_actions: matches!(title, ToolbarTitle::Selected(_)),
            title,
            filter_open: self.filter_open,
            loading_overlay: props.is_loading,
            header_checkbox: self.header_checkbox(props.data),
            headers,
            rows,
            pagination: PaginationView {
                display_page: pagination.display_page(),
                page_count: pagination.page_count(),
                page_size: pagination.page_size,
                page_sizes: self.page_sizes.as_slice().to_vec(),
                total_items: pagination.total_items,
                item_range: pagination.item_range(),
                has_previous: pagination.has_previous(),
                has_next: pagination.has_next(),
            },
        }
    }
}
