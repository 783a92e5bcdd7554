use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TableError;

/// Direction of the active sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Arrow used by text renderers for the active column.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(TableError::InvalidSortDirection(other.to_string())),
        }
    }
}

/// The single active sort column and its direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sort {
    pub sort_by: String,
    pub sort_direction: SortDirection,
}

impl Sort {
    pub fn new(sort_by: impl Into<String>, sort_direction: SortDirection) -> Self {
        Self {
            sort_by: sort_by.into(),
            sort_direction,
        }
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.sort_by == key
    }

    /// The sort that results from clicking the header of column `key`.
    ///
    /// A column that is not active becomes active in descending order; clicking
    /// the active column flips its direction.
    pub fn clicked(&self, key: &str) -> Sort {
        if self.is_active(key) {
            Sort::new(key, self.sort_direction.toggled())
        } else {
            Sort::new(key, SortDirection::Desc)
        }
    }
}
