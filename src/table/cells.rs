//! Cell renderer contract.
//!
//! The engine never draws. It walks the derived view panel by panel, row by
//! row, and hands each visible cell to a host [`CellRenderer`] as a
//! [`CellContext`].

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use super::DerivedView;
use crate::layout::{ColumnGeometry, Panel, SpanMark, SpanOrigin};
use crate::types::{Column, DataShapeError, Row, RowId, ValueType};
use crate::value::format_value;

/// What to render in one cell slot
#[derive(Debug, Clone, PartialEq)]
pub enum CellContext<'a> {
    /// Display text, with the merged-region extent when this is a span origin
    Content {
        row: &'a Row,
        column: &'a Column,
        display: String,
        span: Option<&'a SpanOrigin>,
    },
    /// Covered by a span; keeps the column's width so offsets line up
    Spacer { column: &'a str, width: f32 },
    /// Editable cell; the host mounts an editor for the value type
    Editor {
        row: &'a Row,
        column: &'a Column,
        value_type: ValueType,
        value: Option<&'a Value>,
    },
}

/// Host-side cell drawing
pub trait CellRenderer {
    fn begin_panel(&mut self, _panel: Panel, _width: f32) {}

    fn begin_row(&mut self, _index: usize, _row: &Row) {}

    fn cell(&mut self, cell: CellContext<'_>);

    /// Called instead of any row when the row set failed validation.
    fn data_error(&mut self, _error: &DataShapeError) {}
}

/// Result of an inline edit
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CellChange {
    pub row: RowId,
    pub column: String,
    pub old: Option<Value>,
    pub new: Value,
}

fn cell_context<'a>(
    row: &'a Row,
    column: &'a Column,
    geometry: &'a ColumnGeometry,
    mark: Option<&'a SpanMark>,
) -> CellContext<'a> {
    match mark {
        Some(SpanMark::Skip) => CellContext::Spacer {
            column: &geometry.id,
            width: geometry.width,
        },
        Some(SpanMark::Origin(origin)) => {
            let value = origin.value.as_ref().or_else(|| row.get(&column.id));
            CellContext::Content {
                row,
                column,
                display: format_value(value, column.format.as_ref()),
                span: Some(origin),
            }
        }
        None if column.editable => CellContext::Editor {
            row,
            column,
            value_type: column.value_type,
            value: row.value(&column.id),
        },
        None => CellContext::Content {
            row,
            column,
            display: format_value(row.get(&column.id), column.format.as_ref()),
            span: None,
        },
    }
}

/// Walk every visible cell of `view`.
pub fn render_view(view: &DerivedView, columns: &[Column], renderer: &mut dyn CellRenderer) {
    if let Some(error) = &view.data_error {
        renderer.data_error(error);
        return;
    }

    let by_id: HashMap<&str, &Column> = columns.iter().map(|c| (c.id.as_str(), c)).collect();
    let panels = [
        (Panel::Left, view.layout.panels.left),
        (Panel::Scrollable, view.layout.panels.scrollable),
        (Panel::Right, view.layout.panels.right),
    ];

    for (panel, width) in panels {
        let slots: Vec<(&ColumnGeometry, &Column)> = view
            .layout
            .panel(panel)
            .filter_map(|g| by_id.get(g.id.as_str()).map(|c| (g, *c)))
            .collect();
        if slots.is_empty() {
            continue;
        }
        renderer.begin_panel(panel, width);
        for (index, row) in view.rows.iter().enumerate() {
            renderer.begin_row(index, row);
            let id = row.id();
            for &(geometry, column) in &slots {
                let mark = id.as_ref().and_then(|id| view.spans.cell(id, &geometry.id));
                renderer.cell(cell_context(row, column, geometry, mark));
            }
        }
    }
}
