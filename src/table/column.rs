use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::TableError;

/// Pure projection from a row to a cell.
pub type CellRenderer<T, C> = Arc<dyn Fn(&T) -> C + Send + Sync>;

/// A column descriptor. `C` is whatever the renderer displays: plain strings
/// for terminal output, views for the browser.
pub struct Column<T, C = String> {
    pub title: String,
    pub key: String,
    pub sortable: bool,
    render: CellRenderer<T, C>,
}

impl<T, C> Column<T, C> {
    pub fn new(
        title: impl Into<String>,
        key: impl Into<String>,
        render: impl Fn(&T) -> C + Send + Sync + 'static,
    ) -> Self {
        Self {
            title: title.into(),
            key: key.into(),
            sortable: false,
            render: Arc::new(render),
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn render(&self, row: &T) -> C {
        (self.render)(row)
    }

    /// Re-targets the column at another cell type, keeping title, key and
    /// sortability.
    pub fn map_cell<D>(self, f: impl Fn(C) -> D + Send + Sync + 'static) -> Column<T, D>
    where
        T: 'static,
        C: 'static,
    {
        let render = self.render;
        Column {
            title: self.title,
            key: self.key,
            sortable: self.sortable,
            render: Arc::new(move |row: &T| f(render(row))),
        }
    }
}

impl<T, C> Clone for Column<T, C> {
    fn clone(&self) -> Self {
        Self {
            title: self.title.clone(),
            key: self.key.clone(),
            sortable: self.sortable,
            render: Arc::clone(&self.render),
        }
    }
}

impl<T, C> fmt::Debug for Column<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("title", &self.title)
            .field("key", &self.key)
            .field("sortable", &self.sortable)
            .finish_non_exhaustive()
    }
}

/// Ordered set of columns with unique keys. Order is rendering order.
pub struct Columns<T, C = String>(Vec<Column<T, C>>);

impl<T, C> Columns<T, C> {
    pub fn new(columns: Vec<Column<T, C>>) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.key.as_str()) {
                return Err(TableError::DuplicateColumnKey(column.key.clone()));
            }
        }
        Ok(Self(columns))
    }

    pub fn push(&mut self, column: Column<T, C>) -> Result<(), TableError> {
        if self.get(&column.key).is_some() {
            return Err(TableError::DuplicateColumnKey(column.key));
        }
        self.0.push(column);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Column<T, C>> {
        self.0.iter().find(|c| c.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column<T, C>> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys of the sortable columns, in rendering order.
    pub fn sortable_keys(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|c| c.sortable)
            .map(|c| c.key.as_str())
            .collect()
    }

    pub fn map_cells<D>(self, f: impl Fn(C) -> D + Clone + Send + Sync + 'static) -> Columns<T, D>
    where
        T: 'static,
        C: 'static,
    {
        // keys stay unique, no need to re-validate
        Columns(self.0.into_iter().map(|c| c.map_cell(f.clone())).collect())
    }
}

impl<T, C> Clone for Columns<T, C> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T, C> fmt::Debug for Columns<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}
