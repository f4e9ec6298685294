//! Column layout and span resolution.
//!
//! This module handles:
//! - Resolving column order, visibility, frozen panels and widths
//! - Measuring auto-fit widths through a pluggable text measurer
//! - Expanding merged-cell spans over the working rows

mod column_layout;
mod measure;
mod spans;
mod text_cache;

pub use column_layout::{
    clamp_width, effective_order, resolve_layout, resolve_width, CellWidth, ColumnGeometry,
    ColumnLayout, LayoutInput, LayoutOptions, Panel, PanelBounds, DEFAULT_COLUMN_WIDTH,
    MIN_COLUMN_WIDTH,
};
#[cfg(target_arch = "wasm32")]
pub use measure::CanvasMeasure;
pub use measure::{
    measure_auto_fit, measure_column, CachedMeasure, CharWidthMeasure, TextMeasure, CELL_PADDING,
    SORT_ICON_SPACE,
};
pub use spans::{resolve_spans, SpanMark, SpanOrigin, SpanOverlay};
pub use text_cache::{TextWidthCache, DEFAULT_TEXT_CACHE_CAPACITY};
