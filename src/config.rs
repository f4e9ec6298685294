//! Table configuration as supplied by the host.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};
use crate::layout::DEFAULT_COLUMN_WIDTH;
use crate::types::{Column, Span};

/// Default body row height in pixels
pub const DEFAULT_ROW_HEIGHT: f32 = 32.0;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TableOptions {
    pub row_height: f32,
    /// Width for columns with no configured, measured or resized width
    pub fallback_width: f32,
    /// Rows arrive already filtered, sorted and paged
    pub server_side: bool,
    pub page_size: Option<usize>,
    /// Known container width, enabling fillspace growth
    pub container_width: Option<f32>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            fallback_width: DEFAULT_COLUMN_WIDTH,
            server_side: false,
            page_size: None,
            container_width: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    pub columns: Vec<Column>,
    #[serde(default)]
    pub spans: Vec<Span>,
    #[serde(default)]
    pub options: TableOptions,
}

impl TableConfig {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    pub fn spans(mut self, spans: Vec<Span>) -> Self {
        self.spans = spans;
        self
    }

    pub fn options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no table can be built from.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(TableError::NoColumns);
        }
        if self.options.page_size == Some(0) {
            return Err(TableError::InvalidPageSize);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_options() {
        let config = TableConfig::from_json(r#"{"columns": [{"id": "a"}]}"#).unwrap();
        assert_eq!(config.options.row_height, DEFAULT_ROW_HEIGHT);
        assert_eq!(config.options.fallback_width, DEFAULT_COLUMN_WIDTH);
        assert!(!config.options.server_side);
        assert!(config.spans.is_empty());
    }

    #[test]
    fn test_camel_case_options() {
        let config = TableConfig::from_json(
            r#"{"columns": [{"id": "a"}], "options": {"rowHeight": 24, "pageSize": 10, "serverSide": true}}"#,
        )
        .unwrap();
        assert_eq!(config.options.row_height, 24.0);
        assert_eq!(config.options.page_size, Some(10));
        assert!(config.options.server_side);
    }

    #[test]
    fn test_rejects_empty_columns_and_zero_page() {
        assert!(matches!(
            TableConfig::from_json(r#"{"columns": []}"#),
            Err(TableError::NoColumns)
        ));
        assert!(matches!(
            TableConfig::from_json(r#"{"columns": [{"id": "a"}], "options": {"pageSize": 0}}"#),
            Err(TableError::InvalidPageSize)
        ));
        assert!(matches!(
            TableConfig::from_json("{"),
            Err(TableError::Config(_))
        ));
    }
}
