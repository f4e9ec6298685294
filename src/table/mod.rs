//! The table engine.
//!
//! [`DataTable`] owns the configuration, the raw rows and the view state,
//! and derives a [`DerivedView`] on demand. Each derive stage is memoized
//! on the revisions of exactly the inputs it reads, so a resize re-runs
//! layout and spans but never the filter/sort/page pipeline, and a page
//! change never re-measures columns that do not auto-fit.

mod cells;
mod memo;

pub use cells::{render_view, CellChange, CellContext, CellRenderer};
pub use memo::Memo;

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::config::TableConfig;
use crate::error::{Result, TableError};
use crate::interaction::move_id;
use crate::layout::{
    clamp_width, effective_order, measure_auto_fit, resolve_layout, resolve_spans, CachedMeasure,
    CharWidthMeasure, ColumnLayout, LayoutInput, LayoutOptions, SpanOverlay, TextMeasure,
};
use crate::pipeline::{run_pipeline, Pagination, PipelineOutput};
use crate::types::{
    validate_rows, Column, DataShapeError, FilterInput, FilterKind, FilterValue, Row, RowId,
    SortState, ViewState,
};
use crate::value::{locale_cmp, value_text};

/// Everything a host needs to draw the table once
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DerivedView {
    /// Working set: filtered, sorted and paged (empty on a data error)
    pub rows: Vec<Row>,
    pub layout: ColumnLayout,
    pub spans: SpanOverlay,
    pub pagination: Pagination,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_error: Option<DataShapeError>,
    pub row_height: f32,
}

/// How often each derive stage has run
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeriveStats {
    pub pipeline: usize,
    pub measure: usize,
    pub layout: usize,
    pub spans: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct Revisions {
    rows: u64,
    filter: u64,
    sort: u64,
    page: u64,
    overlay: u64,
    container: u64,
}

type PipelineKey = (u64, u64, u64, u64);
type MeasureKey = Option<PipelineKey>;
type LayoutKey = (MeasureKey, u64, u64);

struct Derived<'a> {
    rows: &'a [Row],
    output: &'a PipelineOutput,
    layout: &'a ColumnLayout,
    spans: &'a SpanOverlay,
}

pub struct DataTable {
    config: TableConfig,
    rows: Vec<Row>,
    state: ViewState,
    server_total: Option<usize>,
    container_width: Option<f32>,
    data_error: Option<DataShapeError>,
    measurer: Box<dyn TextMeasure>,
    revs: Revisions,
    pipeline: Memo<PipelineKey, PipelineOutput>,
    measured: Memo<MeasureKey, HashMap<String, f32>>,
    layout: Memo<LayoutKey, ColumnLayout>,
    spans: Memo<(PipelineKey, LayoutKey), SpanOverlay>,
}

impl DataTable {
    /// # Errors
    /// [`TableError::NoColumns`] for an empty column list and
    /// [`TableError::InvalidPageSize`] for a zero page size.
    pub fn new(config: TableConfig) -> Result<Self> {
        config.validate()?;
        let state = ViewState {
            page_size: config.options.page_size,
            ..ViewState::default()
        };
        Ok(Self {
            container_width: config.options.container_width,
            config,
            rows: Vec::new(),
            state,
            server_total: None,
            data_error: None,
            measurer: Box::new(CachedMeasure::new(CharWidthMeasure::default())),
            revs: Revisions::default(),
            pipeline: Memo::default(),
            measured: Memo::default(),
            layout: Memo::default(),
            spans: Memo::default(),
        })
    }

    /// Replace the text measurer used for auto-fit columns.
    pub fn with_measurer(mut self, measurer: impl TextMeasure + 'static) -> Self {
        self.set_measurer(Box::new(measurer));
        self
    }

    pub fn set_measurer(&mut self, measurer: Box<dyn TextMeasure>) {
        self.measurer = measurer;
        // layout keys only track measurement inputs, not the measurer
        self.measured.invalidate();
        self.layout.invalidate();
        self.spans.invalidate();
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn columns(&self) -> &[Column] {
        &self.config.columns
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.config.columns.iter().find(|c| c.id == id)
    }

    fn known_column(&self, id: &str) -> Result<&Column> {
        self.column(id)
            .ok_or_else(|| TableError::UnknownColumn(id.to_string()))
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn data_error(&self) -> Option<&DataShapeError> {
        self.data_error.as_ref()
    }

    /// Replace the row set. Rows with missing or duplicate ids put the
    /// table into the data-error state until the next valid set arrives.
    /// A current page past the new last page is pulled back to it.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.data_error = validate_rows(&rows);
        if let Some(error) = &self.data_error {
            log::warn!("row set rejected: {error}");
        }
        self.rows = rows;
        self.revs.rows += 1;
        if self.state.page > 1 {
            let last = self.pagination().total_pages.max(1);
            if self.state.page > last {
                log::debug!("page {} past the new row set, showing {last}", self.state.page);
                self.state.page = last;
                self.revs.page += 1;
            }
        }
    }

    /// Replace the whole view state, e.g. when restoring a saved view.
    pub fn set_state(&mut self, state: ViewState) -> Result<()> {
        if state.page_size == Some(0) {
            return Err(TableError::InvalidPageSize);
        }
        self.state = state;
        self.revs.filter += 1;
        self.revs.sort += 1;
        self.revs.page += 1;
        self.revs.overlay += 1;
        Ok(())
    }

    // Sorting

    pub fn toggle_sort(&mut self, column: &str) -> Result<SortState> {
        if !self.known_column(column)?.sortable {
            return Err(TableError::NotSortable(column.to_string()));
        }
        self.revs.sort += 1;
        Ok(self.state.toggle_sort(column).clone())
    }

    pub fn clear_sort(&mut self) {
        if self.state.sort.take().is_some() {
            self.revs.sort += 1;
        }
    }

    // Filtering

    /// Set a column filter; an empty value clears it. Returns to page 1.
    pub fn set_filter(&mut self, column: &str, value: impl Into<FilterValue>) -> Result<()> {
        if !self.known_column(column)?.filterable {
            return Err(TableError::NotFilterable(column.to_string()));
        }
        self.state.set_filter(column, value.into());
        self.revs.filter += 1;
        self.revs.page += 1;
        Ok(())
    }

    pub fn clear_filter(&mut self, column: &str) -> Result<()> {
        self.set_filter(column, FilterValue::Text(String::new()))
    }

    pub fn clear_filters(&mut self) {
        self.state.filters.clear();
        self.state.page = 1;
        self.revs.filter += 1;
        self.revs.page += 1;
    }

    /// Filter widgets for the visible filterable columns, in display order.
    pub fn filter_inputs(&self) -> Vec<FilterInput> {
        effective_order(&self.config.columns, self.state.column_order.as_deref())
            .into_iter()
            .filter(|c| c.filterable && !c.hidden && !self.state.hidden.contains(&c.id))
            .map(|c| FilterInput {
                column: c.id.clone(),
                kind: c.filter,
                value: self.state.filters.get(&c.id).cloned(),
                custom: c.custom_filter,
                options: match c.filter {
                    FilterKind::Combo | FilterKind::MultiCombo => self.distinct_values(&c.id),
                    FilterKind::Text | FilterKind::Date | FilterKind::Number => Vec::new(),
                },
            })
            .collect()
    }

    fn distinct_values(&self, column: &str) -> Vec<String> {
        let mut values: Vec<String> = self
            .rows
            .iter()
            .filter_map(|row| row.get(column).and_then(value_text))
            .map(|text| text.into_owned())
            .collect();
        values.sort_by(|a, b| locale_cmp(a, b));
        values.dedup();
        values
    }

    // Paging

    pub fn pagination(&mut self) -> Pagination {
        let total = self.total_count();
        Pagination::resolve(&self.state, total)
    }

    /// Go to `page`, clamped to the available pages. Returns the page now shown.
    pub fn set_page(&mut self, page: usize) -> usize {
        let last = self.pagination().total_pages.max(1);
        let page = page.clamp(1, last);
        if page != self.state.page {
            self.state.page = page;
            self.revs.page += 1;
        }
        page
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<()> {
        self.state.set_page_size(size)?;
        self.revs.page += 1;
        Ok(())
    }

    /// Turn paging off.
    pub fn clear_page_size(&mut self) {
        self.state.page_size = None;
        self.state.page = 1;
        self.revs.page += 1;
    }

    /// Total row count reported by the server in server-side mode.
    pub fn set_server_total(&mut self, count: usize) {
        self.server_total = Some(count);
    }

    fn total_count(&mut self) -> usize {
        if self.config.options.server_side {
            return self.server_total.unwrap_or(self.rows.len());
        }
        let key = self.pipeline_key();
        let (rows, config, state) = (&self.rows, &self.config, &self.state);
        self.pipeline
            .get_or_compute(key, || {
                run_pipeline(rows, &config.columns, state, config.options.server_side)
            })
            .filtered_count
    }

    // Columns

    /// Set a manual width; returns the clamped width actually stored.
    pub fn set_column_width(&mut self, column: &str, px: f32) -> Result<f32> {
        let width = clamp_width(self.known_column(column)?, px);
        self.state.widths.insert(column.to_string(), width);
        self.revs.overlay += 1;
        Ok(width)
    }

    pub fn clear_column_width(&mut self, column: &str) -> Result<()> {
        self.known_column(column)?;
        if self.state.widths.remove(column).is_some() {
            self.revs.overlay += 1;
        }
        Ok(())
    }

    pub fn width_override(&self, column: &str) -> Option<f32> {
        self.state.widths.get(column).copied()
    }

    /// Resolved width of a visible column.
    pub fn column_width(&mut self, column: &str) -> Result<f32> {
        self.derive()?
            .layout
            .width_of(column)
            .ok_or_else(|| TableError::UnknownColumn(column.to_string()))
    }

    /// All column ids in effective order, hidden ones included.
    pub fn column_order(&self) -> Vec<String> {
        effective_order(&self.config.columns, self.state.column_order.as_deref())
            .into_iter()
            .map(|c| c.id.clone())
            .collect()
    }

    pub fn set_column_order(&mut self, order: Vec<String>) {
        self.state.column_order = Some(order);
        self.revs.overlay += 1;
    }

    /// Move `source` to where `target` is. Returns whether anything moved.
    pub fn move_column(&mut self, source: &str, target: &str) -> Result<bool> {
        self.known_column(source)?;
        self.known_column(target)?;
        let mut order = self.column_order();
        if !move_id(&mut order, source, target) {
            return Ok(false);
        }
        log::debug!("moved column {source} to {target}");
        self.set_column_order(order);
        Ok(true)
    }

    pub fn set_column_hidden(&mut self, column: &str, hidden: bool) -> Result<()> {
        self.known_column(column)?;
        let changed = if hidden {
            self.state.hidden.insert(column.to_string())
        } else {
            self.state.hidden.remove(column)
        };
        if changed {
            self.revs.overlay += 1;
        }
        Ok(())
    }

    /// Drop order, visibility and width overlays.
    pub fn reset_columns(&mut self) {
        self.state.reset_columns();
        self.revs.overlay += 1;
    }

    pub fn set_container_width(&mut self, width: Option<f32>) {
        if self.container_width != width {
            self.container_width = width;
            self.revs.container += 1;
        }
    }

    // Editing

    /// Write an edited value into the row set.
    pub fn commit_edit(&mut self, row: &RowId, column: &str, value: Value) -> Result<CellChange> {
        self.known_column(column)?;
        let target = self
            .rows
            .iter_mut()
            .find(|r| r.id().as_ref() == Some(row))
            .ok_or_else(|| TableError::UnknownRow(row.to_string()))?;
        let old = target.set(column, value.clone());
        if column == "id" || column == "Id" {
            self.data_error = validate_rows(&self.rows);
        }
        self.revs.rows += 1;
        Ok(CellChange {
            row: row.clone(),
            column: column.to_string(),
            old,
            new: value,
        })
    }

    // Deriving

    fn pipeline_key(&self) -> PipelineKey {
        let r = self.revs;
        (r.rows, r.filter, r.sort, r.page)
    }

    fn derive(&mut self) -> Result<Derived<'_>> {
        let pipeline_key = self.pipeline_key();
        let revs = self.revs;
        let rows = &self.rows;
        let config = &self.config;
        let state = &self.state;

        let output = self.pipeline.get_or_compute(pipeline_key, || {
            log::debug!("pipeline: {} rows", rows.len());
            run_pipeline(rows, &config.columns, state, config.options.server_side)
        });

        let measure_key = config
            .columns
            .iter()
            .any(|c| c.adjust.is_some())
            .then_some(pipeline_key);
        let measurer = &mut self.measurer;
        let measured = self.measured.get_or_compute(measure_key, || {
            let working: Vec<&Row> = output.indices.iter().filter_map(|&i| rows.get(i)).collect();
            log::debug!("measuring auto-fit columns over {} rows", working.len());
            measure_auto_fit(&config.columns, &working, measurer.as_mut())
        });

        let layout_key = (measure_key, revs.overlay, revs.container);
        let container_width = self.container_width;
        let layout = self.layout.try_get_or_compute(layout_key, || {
            log::debug!("layout: {} columns", config.columns.len());
            resolve_layout(
                &config.columns,
                &LayoutInput::from_state(state, measured, container_width),
                &LayoutOptions {
                    fallback_width: config.options.fallback_width,
                },
            )
        })?;

        let has_error = self.data_error.is_some();
        let spans = self.spans.get_or_compute((pipeline_key, layout_key), || {
            if has_error {
                return SpanOverlay::default();
            }
            let ids: Vec<RowId> = output
                .indices
                .iter()
                .filter_map(|&i| rows.get(i))
                .filter_map(Row::id)
                .collect();
            resolve_spans(&ids, layout, &config.spans, config.options.row_height)
        });

        Ok(Derived {
            rows,
            output,
            layout,
            spans,
        })
    }

    /// Derive the current view.
    pub fn view(&mut self) -> Result<DerivedView> {
        let total = self.total_count();
        let pagination = Pagination::resolve(&self.state, total);
        let data_error = self.data_error.clone();
        let row_height = self.config.options.row_height;

        let derived = self.derive()?;
        let rows = if data_error.is_some() {
            Vec::new()
        } else {
            derived
                .output
                .indices
                .iter()
                .filter_map(|&i| derived.rows.get(i).cloned())
                .collect()
        };

        Ok(DerivedView {
            rows,
            layout: derived.layout.clone(),
            spans: derived.spans.clone(),
            pagination,
            data_error,
            row_height,
        })
    }

    /// Walk every visible cell of `view` through `renderer`.
    pub fn render_cells(&self, view: &DerivedView, renderer: &mut dyn CellRenderer) {
        render_view(view, &self.config.columns, renderer);
    }

    pub fn stats(&self) -> DeriveStats {
        DeriveStats {
            pipeline: self.pipeline.computes(),
            measure: self.measured.computes(),
            layout: self.layout.computes(),
            spans: self.spans.computes(),
        }
    }
}
