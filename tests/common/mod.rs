//! Common test utilities: row/table builders and a recording renderer.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use serde_json::Value;
use tableview::{
    CellContext, CellRenderer, Column, DataTable, DerivedView, Row, RowId, TableConfig,
    TableOptions,
};

/// Build one row from a JSON object.
pub fn row(value: Value) -> Row {
    Row::try_from(value).expect("row must be a JSON object")
}

/// Build rows from a JSON array of objects.
pub fn rows(value: Value) -> Vec<Row> {
    match value {
        Value::Array(items) => items.into_iter().map(row).collect(),
        other => panic!("expected an array of rows, got {other}"),
    }
}

/// `n` rows `{id: 1..=n, n: i}`.
pub fn numbered_rows(n: u64) -> Vec<Row> {
    (1..=n)
        .map(|i| row(serde_json::json!({ "id": i, "n": i })))
        .collect()
}

/// `[{id:1,name:"B"},{id:2,name:"A"},{id:3,name:null}]`
pub fn name_rows() -> Vec<Row> {
    rows(serde_json::json!([
        {"id": 1, "name": "B"},
        {"id": 2, "name": "A"},
        {"id": 3, "name": null},
    ]))
}

pub fn table(columns: Vec<Column>, data: Vec<Row>) -> DataTable {
    table_with(TableConfig::new(columns), data)
}

pub fn table_with(config: TableConfig, data: Vec<Row>) -> DataTable {
    let mut table = DataTable::new(config).expect("valid config");
    table.set_rows(data);
    table
}

pub fn options(f: impl FnOnce(&mut TableOptions)) -> TableOptions {
    let mut options = TableOptions::default();
    f(&mut options);
    options
}

/// Row ids of the working set, in display order.
pub fn ids(view: &DerivedView) -> Vec<String> {
    view.rows
        .iter()
        .map(|r| r.id().map(|id| id.to_string()).unwrap_or_default())
        .collect()
}

pub fn rid(id: &str) -> RowId {
    RowId::new(id)
}

/// Column ids in rendered order.
pub fn column_ids(view: &DerivedView) -> Vec<String> {
    view.layout.columns.iter().map(|g| g.id.clone()).collect()
}

/// What a renderer was asked to draw, flattened to strings.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub panels: Vec<String>,
    pub cells: Vec<String>,
    pub error: Option<String>,
}

impl CellRenderer for RecordingRenderer {
    fn begin_panel(&mut self, panel: tableview::layout::Panel, _width: f32) {
        self.panels.push(format!("{panel:?}"));
    }

    fn cell(&mut self, cell: CellContext<'_>) {
        let text = match cell {
            CellContext::Content {
                row,
                column,
                display,
                span,
            } => {
                let id = row.id().map(|id| id.to_string()).unwrap_or_default();
                match span {
                    Some(s) => format!("{id}/{}={display} [{}x{}]", column.id, s.colspan, s.rowspan),
                    None => format!("{id}/{}={display}", column.id),
                }
            }
            CellContext::Spacer { column, width } => format!("spacer {column} {width}"),
            CellContext::Editor { row, column, .. } => {
                let id = row.id().map(|id| id.to_string()).unwrap_or_default();
                format!("{id}/{} editor", column.id)
            }
        };
        self.cells.push(text);
    }

    fn data_error(&mut self, error: &tableview::DataShapeError) {
        self.error = Some(error.to_string());
    }
}
