//! Merged-cell overlay.
//!
//! Spans are keyed by their origin cell and expanded against the *working*
//! row sequence and the resolved column order, so a span covers whichever
//! rows currently follow its origin after filtering, sorting and paging.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::Value;

use super::column_layout::{CellWidth, ColumnLayout};
use crate::types::{RowId, Span};

/// Origin of a merged region, with its effective extent
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpanOrigin {
    pub colspan: usize,
    pub rowspan: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub width: CellWidth,
    pub height: f32,
}

/// Marking of a single cell
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SpanMark {
    Origin(SpanOrigin),
    /// Covered by an origin; rendered as a spacer of the column's width
    Skip,
}

/// Per-cell span markings, keyed by row id then column id
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct SpanOverlay {
    cells: BTreeMap<RowId, BTreeMap<String, SpanMark>>,
}

impl SpanOverlay {
    pub fn cell(&self, row: &RowId, column: &str) -> Option<&SpanMark> {
        self.cells.get(row).and_then(|cols| cols.get(column))
    }

    pub fn origin(&self, row: &RowId, column: &str) -> Option<&SpanOrigin> {
        match self.cell(row, column) {
            Some(SpanMark::Origin(origin)) => Some(origin),
            _ => None,
        }
    }

    pub fn is_skipped(&self, row: &RowId, column: &str) -> bool {
        matches!(self.cell(row, column), Some(SpanMark::Skip))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn origins(&self) -> usize {
        self.count(|m| matches!(m, SpanMark::Origin(_)))
    }

    pub fn skips(&self) -> usize {
        self.count(|m| matches!(m, SpanMark::Skip))
    }

    fn count(&self, pred: impl Fn(&SpanMark) -> bool) -> usize {
        self.cells
            .values()
            .flat_map(BTreeMap::values)
            .filter(|m| pred(m))
            .count()
    }

    fn is_marked(&self, row: &RowId, column: &str) -> bool {
        self.cell(row, column).is_some()
    }

    fn mark(&mut self, row: &RowId, column: &str, mark: SpanMark) {
        self.cells
            .entry(row.clone())
            .or_default()
            .insert(column.to_string(), mark);
    }
}

/// Expand `spans` over the working rows and resolved columns.
///
/// Spans whose origin row or column is not currently displayed are
/// ignored. Coverage stops at the last column and last working row and
/// the origin reports the truncated extent. When spans overlap, the first
/// one in `spans` keeps every cell it marked.
pub fn resolve_spans(
    row_ids: &[RowId],
    layout: &ColumnLayout,
    spans: &[Span],
    row_height: f32,
) -> SpanOverlay {
    let mut overlay = SpanOverlay::default();
    if spans.is_empty() || row_ids.is_empty() || layout.is_empty() {
        return overlay;
    }

    let mut row_pos: HashMap<&RowId, usize> = HashMap::with_capacity(row_ids.len());
    for (i, id) in row_ids.iter().enumerate() {
        row_pos.entry(id).or_insert(i);
    }

    for span in spans {
        let (Some(&r0), Some(c0)) = (row_pos.get(&span.row), layout.position(&span.column)) else {
            continue;
        };
        if overlay.is_marked(&span.row, &span.column) {
            log::debug!("span at {}/{} overlaps an earlier span", span.row, span.column);
            continue;
        }

        let rowspan = span.rows().min(row_ids.len() - r0);
        let colspan = span.cols().min(layout.len() - c0);

        let covered_rows = row_ids.iter().skip(r0).take(rowspan);
        for (dr, row) in covered_rows.enumerate() {
            let covered_cols = layout.columns.iter().skip(c0).take(colspan);
            for (dc, geometry) in covered_cols.enumerate() {
                if (dr, dc) == (0, 0) || overlay.is_marked(row, &geometry.id) {
                    continue;
                }
                overlay.mark(row, &geometry.id, SpanMark::Skip);
            }
        }

        overlay.mark(
            &span.row,
            &span.column,
            SpanMark::Origin(SpanOrigin {
                colspan,
                rowspan,
                value: span.value.clone(),
                style: span.style.clone(),
                width: layout.span_width(c0, colspan),
                height: rowspan as f32 * row_height,
            }),
        );
    }

    overlay
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::layout::{resolve_layout, LayoutInput, LayoutOptions};
    use crate::types::{Column, ViewState};

    fn layout(ids: &[&str]) -> ColumnLayout {
        let columns: Vec<Column> = ids.iter().map(|id| Column::new(*id).width(50.0)).collect();
        let state = ViewState::default();
        let measured = HashMap::new();
        resolve_layout(
            &columns,
            &LayoutInput::from_state(&state, &measured, None),
            &LayoutOptions::default(),
        )
        .unwrap()
    }

    fn ids(n: u64) -> Vec<RowId> {
        (1..=n).map(RowId::from).collect()
    }

    #[test]
    fn test_two_by_two_marks_three_skips() {
        let overlay = resolve_spans(
            &ids(3),
            &layout(&["a", "b", "c"]),
            &[Span::new("1", "a").colspan(2).rowspan(2)],
            32.0,
        );
        assert_eq!(overlay.skips(), 3);
        assert!(overlay.is_skipped(&RowId::from("1"), "b"));
        assert!(overlay.is_skipped(&RowId::from("2"), "a"));
        assert!(overlay.is_skipped(&RowId::from("2"), "b"));
        let origin = overlay.origin(&RowId::from("1"), "a").unwrap();
        assert_eq!(origin.height, 64.0);
        assert_eq!(origin.width, CellWidth::Fixed { px: 100.0 });
    }

    #[test]
    fn test_truncated_at_edges() {
        let overlay = resolve_spans(
            &ids(2),
            &layout(&["a", "b"]),
            &[Span::new("2", "b").colspan(4).rowspan(4)],
            10.0,
        );
        let origin = overlay.origin(&RowId::from("2"), "b").unwrap();
        assert_eq!((origin.colspan, origin.rowspan), (1, 1));
        assert_eq!(overlay.skips(), 0);
    }

    #[test]
    fn test_dangling_spans_ignored() {
        let overlay = resolve_spans(
            &ids(2),
            &layout(&["a"]),
            &[Span::new("9", "a").rowspan(2), Span::new("1", "zz").colspan(2)],
            10.0,
        );
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_first_span_wins() {
        let overlay = resolve_spans(
            &ids(3),
            &layout(&["a", "b", "c"]),
            &[
                Span::new("1", "a").colspan(2),
                Span::new("1", "b").colspan(2),
                Span::new("1", "c").rowspan(2),
            ],
            10.0,
        );
        assert!(overlay.is_skipped(&RowId::from("1"), "b"));
        assert!(overlay.origin(&RowId::from("1"), "c").is_some());
        assert!(overlay.is_skipped(&RowId::from("2"), "c"));
        assert_eq!(overlay.origins(), 2);
    }

    #[test]
    fn test_later_span_does_not_remark_covered_cells() {
        let overlay = resolve_spans(
            &ids(3),
            &layout(&["a", "b"]),
            &[Span::new("2", "b"), Span::new("1", "a").colspan(2).rowspan(2)],
            10.0,
        );
        assert!(overlay.origin(&RowId::from("2"), "b").is_some());
        assert_eq!(overlay.skips(), 2);
    }

    #[test]
    fn test_serializes_by_row_then_column() {
        let overlay = resolve_spans(&ids(2), &layout(&["a", "b"]), &[Span::new("1", "a").colspan(2)], 10.0);
        let json = serde_json::to_value(&overlay).unwrap();
        assert_eq!(json["1"]["b"]["kind"], "skip");
        assert_eq!(json["1"]["a"]["kind"], "origin");
        assert_eq!(json["1"]["a"]["colspan"], 2);
    }
}
