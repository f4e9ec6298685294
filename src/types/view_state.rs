use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::FilterValue;
use crate::error::{Result, TableError};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// The single active sort key
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

/// Interactive view state.
///
/// Column order, hidden ids and resize widths are overlays keyed by column
/// id on top of the immutable column configuration; dropping them restores
/// the configured layout.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sort: Option<SortState>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub filters: BTreeMap<String, FilterValue>,
    /// 1-indexed current page
    #[serde(default = "first_page")]
    pub page: usize,
    /// Rows per page; `None` disables paging
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub column_order: Option<Vec<String>>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
    pub hidden: BTreeSet<String>,
    /// Manual resize widths
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub widths: BTreeMap<String, f32>,
}

fn first_page() -> usize {
    1
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            sort: None,
            filters: BTreeMap::new(),
            page: 1,
            page_size: None,
            column_order: None,
            hidden: BTreeSet::new(),
            widths: BTreeMap::new(),
        }
    }
}

impl ViewState {
    /// Header click: flip the direction of the active column, or start a
    /// new column ascending.
    pub fn toggle_sort(&mut self, column: &str) -> &SortState {
        let direction = match &self.sort {
            Some(current) if current.column == column => current.direction.toggled(),
            _ => SortDirection::Asc,
        };
        self.sort.insert(SortState {
            column: column.to_string(),
            direction,
        })
    }

    /// Set or clear (empty value) a column filter. Returns to page 1.
    pub fn set_filter(&mut self, column: &str, value: FilterValue) {
        if value.is_empty() {
            self.filters.remove(column);
        } else {
            self.filters.insert(column.to_string(), value);
        }
        self.page = 1;
    }

    /// Filters that actually constrain rows.
    pub fn active_filters(&self) -> impl Iterator<Item = (&String, &FilterValue)> {
        self.filters.iter().filter(|(_, value)| !value.is_empty())
    }

    /// Change the page size; always resets to page 1.
    pub fn set_page_size(&mut self, size: usize) -> Result<()> {
        if size == 0 {
            return Err(TableError::InvalidPageSize);
        }
        self.page_size = Some(size);
        self.page = 1;
        Ok(())
    }

    /// Drop the order, visibility and width overlays.
    pub fn reset_columns(&mut self) {
        self.column_order = None;
        self.hidden.clear();
        self.widths.clear();
    }
}
