//! Structured error types for tableview.
//!
//! Only programmer errors and host-call misuse surface here. Data-dependent
//! problems (rows without ids, dangling spans) degrade into derived-state
//! flags instead, see [`crate::types::DataShapeError`].

/// All errors that can occur when configuring or driving a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The layout resolver was called without any configured column.
    #[error("table has no columns")]
    NoColumns,

    /// A host call referenced a column id that is not configured.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// A host call referenced a row id that is not in the row set.
    #[error("unknown row: {0}")]
    UnknownRow(String),

    /// Filter set on a column that does not accept filters.
    #[error("column is not filterable: {0}")]
    NotFilterable(String),

    /// Sort requested on a column that does not accept sorting.
    #[error("column is not sortable: {0}")]
    NotSortable(String),

    /// Page size of zero.
    #[error("page size must be at least 1")]
    InvalidPageSize,

    /// Configuration (de)serialization error.
    #[error("configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O error reading or writing a table document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed host input (row ids, scroll member names).
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TableError>;

impl From<TableError> for wasm_bindgen::JsValue {
    fn from(e: TableError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
