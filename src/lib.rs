//! tableview - headless data table engine
//!
//! Turns a column configuration, a row set and interactive view state into
//! everything a host needs to draw a data table:
//! - Filter / sort / page pipeline with server-side pass-through
//! - Column layout: frozen panels, width priority, auto-fit, fillspace
//! - Merged cells (row/col spans) resolved over the working rows
//! - Scroll synchronization between frozen panels, with echo suppression
//! - Column resize and reorder sessions with scoped pointer capture
//!
//! # Usage (Rust)
//!
//! ```
//! use serde_json::json;
//! use tableview::{Column, DataTable, Row, TableConfig};
//!
//! let mut table = DataTable::new(TableConfig::new(vec![
//!     Column::new("name").header("Name"),
//!     Column::new("age").width(60.0),
//! ]))?;
//! table.set_rows(vec![Row::try_from(json!({"id": 1, "name": "Ada", "age": 36}))?]);
//! let view = table.view()?;
//! assert_eq!(view.rows.len(), 1);
//! # Ok::<(), tableview::TableError>(())
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { TableView } from 'tableview';
//! await init();
//! const table = new TableView({ columns: [{ id: 'name' }] });
//! table.setRows(rows);
//! render(table.view());
//! ```

pub mod config;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod pipeline;
pub mod scroll;
pub mod table;
pub mod types;
pub mod value;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use config::{TableConfig, TableOptions};
pub use error::{Result, TableError};
pub use table::{CellChange, CellContext, CellRenderer, DataTable, DeriveStats, DerivedView};
pub use viewer::TableView;

pub use types::*;

/// Derive a view from a JSON document `{config, rows, state?}` and return
/// it as JSON.
///
/// # Errors
/// Returns an error if the document or configuration is invalid.
#[wasm_bindgen(js_name = "deriveJson")]
pub fn derive_json(document: &str) -> std::result::Result<String, JsValue> {
    let view = derive_document(document)?;
    serde_json::to_string(&view)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Native counterpart of [`derive_json`], shared with the CLI.
pub fn derive_document(document: &str) -> Result<DerivedView> {
    #[derive(serde::Deserialize)]
    struct Document {
        config: TableConfig,
        #[serde(default)]
        rows: Vec<Row>,
        #[serde(default)]
        state: Option<ViewState>,
    }

    let doc: Document = serde_json::from_str(document)?;
    let mut table = DataTable::new(doc.config)?;
    table.set_rows(doc.rows);
    if let Some(mut state) = doc.state {
        state.page_size = state.page_size.or(table.state().page_size);
        table.set_state(state)?;
    }
    table.view()
}

/// Read a table document from `path` and derive its view.
///
/// # Errors
/// [`TableError::Io`] when the file cannot be read, otherwise as
/// [`derive_document`].
pub fn derive_file(path: impl AsRef<std::path::Path>) -> Result<DerivedView> {
    let document = std::fs::read_to_string(path)?;
    derive_document(&document)
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
