use std::collections::BTreeSet;

/// A row the table can render and select.
pub trait TableRow {
    /// Stable identifier, unique within a result set.
    fn row_id(&self) -> &str;
}

/// State of a checkbox that summarises several rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Indeterminate,
    Checked,
}

/// Selected rows, keyed by their stable id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn set(&mut self, id: &str, checked: bool) {
        if checked {
            self.ids.insert(id.to_string());
        } else {
            self.ids.remove(id);
        }
    }

    pub fn toggle(&mut self, id: &str) {
        let checked = !self.contains(id);
        self.set(id, checked);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// True when `rows` is non-empty and every row in it is selected.
    pub fn covers<T: TableRow>(&self, rows: &[T]) -> bool {
        !rows.is_empty() && rows.iter().all(|r| self.contains(r.row_id()))
    }

    /// Select-all over the rows currently shown: clears when all of them are
    /// already selected, otherwise selects exactly those rows.
    pub fn toggle_all<T: TableRow>(&mut self, rows: &[T]) {
        if self.covers(rows) {
            self.clear();
        } else {
            self.ids = rows.iter().map(|r| r.row_id().to_string()).collect();
        }
    }

    pub fn header_state<T: TableRow>(&self, rows: &[T]) -> CheckState {
        let selected = rows.iter().filter(|r| self.contains(r.row_id())).count();
        if selected == 0 {
            CheckState::Unchecked
        } else if selected == rows.len() {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }

    /// Drops ids that are not among `rows`.
    pub fn retain_rows<T: TableRow>(&mut self, rows: &[T]) {
        let present: BTreeSet<&str> = rows.iter().map(TableRow::row_id).collect();
        self.ids.retain(|id| present.contains(id.as_str()));
    }

    /// Selected rows in `rows` order.
    pub fn selected_rows<'a, T: TableRow>(&self, rows: &'a [T]) -> Vec<&'a T> {
        rows.iter().filter(|r| self.contains(r.row_id())).collect()
    }
}
