//! Auto-fit width measurement.
//!
//! Columns with `adjust` get a width from the rendered extent of their
//! header and/or formatted cell values, padded for the cell's inner
//! padding and the sort affordance.

use std::collections::HashMap;

use unicode_width::UnicodeWidthStr;

use super::text_cache::TextWidthCache;
use crate::types::{Column, Row};
use crate::value::format_value;

/// Horizontal cell padding (both sides)
pub const CELL_PADDING: f32 = 16.0;

/// Room reserved for the sort icon on sortable columns
pub const SORT_ICON_SPACE: f32 = 20.0;

/// Measures rendered text width in pixels.
pub trait TextMeasure {
    fn text_width(&mut self, text: &str) -> f32;
}

/// Fixed-pitch estimate: display columns times an average glyph width.
///
/// Wide (CJK) characters count as two columns.
#[derive(Debug, Clone, Copy)]
pub struct CharWidthMeasure {
    pub char_width: f32,
}

impl Default for CharWidthMeasure {
    fn default() -> Self {
        Self { char_width: 7.0 }
    }
}

impl TextMeasure for CharWidthMeasure {
    fn text_width(&mut self, text: &str) -> f32 {
        text.width() as f32 * self.char_width
    }
}

/// Wraps a measurer with a per-text width cache.
pub struct CachedMeasure<M> {
    inner: M,
    cache: TextWidthCache,
}

impl<M: TextMeasure> CachedMeasure<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            cache: TextWidthCache::default(),
        }
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl<M: TextMeasure> TextMeasure for CachedMeasure<M> {
    fn text_width(&mut self, text: &str) -> f32 {
        let inner = &mut self.inner;
        self.cache.get_or_measure(text, |t| inner.text_width(t))
    }
}

/// Canvas 2D text metrics, used in the browser.
#[cfg(target_arch = "wasm32")]
pub struct CanvasMeasure {
    ctx: web_sys::CanvasRenderingContext2d,
}

#[cfg(target_arch = "wasm32")]
impl CanvasMeasure {
    /// Create an off-document canvas measuring with a CSS font string.
    pub fn new(font: &str) -> Option<Self> {
        use wasm_bindgen::JsCast;

        let document = web_sys::window()?.document()?;
        let canvas = document
            .create_element("canvas")
            .ok()?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .ok()?;
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<web_sys::CanvasRenderingContext2d>()
            .ok()?;
        ctx.set_font(font);
        Some(Self { ctx })
    }
}

#[cfg(target_arch = "wasm32")]
impl TextMeasure for CanvasMeasure {
    #[allow(clippy::cast_possible_truncation)]
    fn text_width(&mut self, text: &str) -> f32 {
        self.ctx
            .measure_text(text)
            .map(|m| m.width() as f32)
            .unwrap_or(0.0)
    }
}

/// Width a column needs to show its header and/or `rows` without clipping.
pub fn measure_column(column: &Column, rows: &[&Row], measurer: &mut dyn TextMeasure) -> Option<f32> {
    let mode = column.adjust?;
    let mut widest: f32 = 0.0;

    if mode.measures_header() {
        widest = widest.max(measurer.text_width(column.title()));
    }
    if mode.measures_data() {
        for row in rows {
            let text = format_value(row.get(&column.id), column.format.as_ref());
            widest = widest.max(measurer.text_width(&text));
        }
    }

    let affordance = if column.sortable { SORT_ICON_SPACE } else { 0.0 };
    Some(widest + CELL_PADDING + affordance)
}

/// Measure every column that asks for auto-fit.
pub fn measure_auto_fit(
    columns: &[Column],
    rows: &[&Row],
    measurer: &mut dyn TextMeasure,
) -> HashMap<String, f32> {
    columns
        .iter()
        .filter_map(|c| measure_column(c, rows, measurer).map(|w| (c.id.clone(), w)))
        .collect()
}
