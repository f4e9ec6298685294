//! Filter → sort → page pipeline producing the working row set.
//!
//! In server-side mode the pipeline is the identity: the host already
//! filtered, sorted and paged the rows it hands over.

mod filter;
mod page;
mod sort;

pub use filter::{compile_filters, filter_indices, parse_number_filter, CompiledFilter};
pub use page::{paginate, total_pages, Pagination};
pub use sort::{compare_values, sort_indices};

use crate::types::{Column, Row, ViewState};

/// Result of one pipeline run, as indices into the raw row slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutput {
    /// Rows surviving filter + sort, before paging
    pub filtered_count: usize,
    /// Working set in display order
    pub indices: Vec<usize>,
}

/// Run the pipeline, returning indices so callers can avoid cloning rows.
pub fn run_pipeline(
    rows: &[Row],
    columns: &[Column],
    state: &ViewState,
    server_side: bool,
) -> PipelineOutput {
    if server_side {
        return PipelineOutput {
            filtered_count: rows.len(),
            indices: (0..rows.len()).collect(),
        };
    }

    let filters = compile_filters(columns, state);
    let mut indices = filter_indices(rows, &filters);

    if let Some(sort) = &state.sort {
        match columns.iter().find(|c| c.id == sort.column) {
            Some(column) => sort_indices(&mut indices, rows, column, sort.direction),
            None => log::debug!("ignoring sort on unknown column {}", sort.column),
        }
    }

    let filtered_count = indices.len();
    if let Some(size) = state.page_size {
        indices = paginate(&indices, state.page, size);
    }

    PipelineOutput {
        filtered_count,
        indices,
    }
}

/// Working row set for `rows` under `state`.
pub fn derive_working_set(
    rows: &[Row],
    columns: &[Column],
    state: &ViewState,
    server_side: bool,
) -> Vec<Row> {
    run_pipeline(rows, columns, state, server_side)
        .indices
        .into_iter()
        .filter_map(|i| rows.get(i).cloned())
        .collect()
}
