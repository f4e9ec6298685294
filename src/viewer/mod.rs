//! WASM-exported `TableView` - the browser entry point.
//!
//! Wraps a [`DataTable`] and a [`ScrollSync`] behind a JS-friendly API.
//! Structured values cross the boundary as plain JS objects through
//! `serde-wasm-bindgen`; the host renders the returned view itself.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use js_sys::Function;

use crate::config::TableConfig;
use crate::scroll::{HorizontalPart, ScrollSync, VerticalPanel};
use crate::table::DataTable;
use crate::types::{FilterValue, Row, RowId, ViewState};

/// Font used for auto-fit measurement until the host sets one
#[cfg(target_arch = "wasm32")]
const DEFAULT_FONT: &str = "14px sans-serif";

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Deserialization error: {e}")))
}

#[wasm_bindgen]
pub struct TableView {
    table: DataTable,
    scroll: ScrollSync,
    change_callback: Option<Function>,
}

impl TableView {
    fn notify(&self) {
        if let Some(callback) = &self.change_callback {
            if let Err(e) = callback.call0(&JsValue::NULL) {
                log::warn!("change callback failed: {e:?}");
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn use_canvas_font(&mut self, font: &str) {
        use crate::layout::{CachedMeasure, CanvasMeasure};

        match CanvasMeasure::new(font) {
            Some(measure) => self.table.set_measurer(Box::new(CachedMeasure::new(measure))),
            None => log::warn!("canvas text measurement unavailable, using estimates"),
        }
    }
}

#[wasm_bindgen]
impl TableView {
    /// Create a view from a `TableConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<TableView, JsValue> {
        console_error_panic_hook::set_once();

        let config: TableConfig = from_js(config)?;
        let table = DataTable::new(config)?;
        #[allow(unused_mut)]
        let mut view = TableView {
            table,
            scroll: ScrollSync::new(false, false),
            change_callback: None,
        };
        #[cfg(target_arch = "wasm32")]
        view.use_canvas_font(DEFAULT_FONT);
        Ok(view)
    }

    /// Called with no arguments after every state change.
    #[wasm_bindgen(js_name = "setChangeCallback")]
    pub fn set_change_callback(&mut self, callback: Option<Function>) {
        self.change_callback = callback;
    }

    /// CSS font string used when measuring auto-fit columns.
    #[wasm_bindgen(js_name = "setFont")]
    pub fn set_font(&mut self, font: &str) {
        #[cfg(target_arch = "wasm32")]
        self.use_canvas_font(font);
        #[cfg(not(target_arch = "wasm32"))]
        let _ = font;
        self.notify();
    }

    #[wasm_bindgen(js_name = "setRows")]
    pub fn set_rows(&mut self, rows: JsValue) -> Result<(), JsValue> {
        let rows: Vec<Row> = from_js(rows)?;
        self.table.set_rows(rows);
        self.notify();
        Ok(())
    }

    /// Derive the current view. Also re-attaches frozen scroll panels.
    pub fn view(&mut self) -> Result<JsValue, JsValue> {
        let view = self.table.view()?;
        self.scroll.set_frozen(
            view.layout.frozen_left().next().is_some(),
            view.layout.frozen_right().next().is_some(),
        );
        to_js(&view)
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(self.table.state())
    }

    #[wasm_bindgen(js_name = "setState")]
    pub fn set_state(&mut self, state: JsValue) -> Result<(), JsValue> {
        let state: ViewState = from_js(state)?;
        self.table.set_state(state)?;
        self.notify();
        Ok(())
    }

    #[wasm_bindgen(js_name = "toggleSort")]
    pub fn toggle_sort(&mut self, column: &str) -> Result<JsValue, JsValue> {
        let sort = self.table.toggle_sort(column)?;
        self.notify();
        to_js(&sort)
    }

    #[wasm_bindgen(js_name = "clearSort")]
    pub fn clear_sort(&mut self) {
        self.table.clear_sort();
        self.notify();
    }

    /// Value is a string or an array of strings.
    #[wasm_bindgen(js_name = "setFilter")]
    pub fn set_filter(&mut self, column: &str, value: JsValue) -> Result<(), JsValue> {
        let value: FilterValue = from_js(value)?;
        self.table.set_filter(column, value)?;
        self.notify();
        Ok(())
    }

    #[wasm_bindgen(js_name = "clearFilter")]
    pub fn clear_filter(&mut self, column: &str) -> Result<(), JsValue> {
        self.table.clear_filter(column)?;
        self.notify();
        Ok(())
    }

    #[wasm_bindgen(js_name = "clearFilters")]
    pub fn clear_filters(&mut self) {
        self.table.clear_filters();
        self.notify();
    }

    #[wasm_bindgen(js_name = "filterInputs")]
    pub fn filter_inputs(&self) -> Result<JsValue, JsValue> {
        to_js(&self.table.filter_inputs())
    }

    pub fn pagination(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.table.pagination())
    }

    #[wasm_bindgen(js_name = "setPage")]
    pub fn set_page(&mut self, page: usize) -> usize {
        let page = self.table.set_page(page);
        self.notify();
        page
    }

    #[wasm_bindgen(js_name = "setPageSize")]
    pub fn set_page_size(&mut self, size: usize) -> Result<(), JsValue> {
        self.table.set_page_size(size)?;
        self.notify();
        Ok(())
    }

    #[wasm_bindgen(js_name = "setServerTotal")]
    pub fn set_server_total(&mut self, count: usize) {
        self.table.set_server_total(count);
        self.notify();
    }

    /// Returns the clamped width actually applied.
    #[wasm_bindgen(js_name = "setColumnWidth")]
    pub fn set_column_width(&mut self, column: &str, px: f32) -> Result<f32, JsValue> {
        let width = self.table.set_column_width(column, px)?;
        self.notify();
        Ok(width)
    }

    #[wasm_bindgen(js_name = "clearColumnWidth")]
    pub fn clear_column_width(&mut self, column: &str) -> Result<(), JsValue> {
        self.table.clear_column_width(column)?;
        self.notify();
        Ok(())
    }

    #[wasm_bindgen(js_name = "setColumnOrder")]
    pub fn set_column_order(&mut self, order: JsValue) -> Result<(), JsValue> {
        let order: Vec<String> = from_js(order)?;
        self.table.set_column_order(order);
        self.notify();
        Ok(())
    }

    #[wasm_bindgen(js_name = "moveColumn")]
    pub fn move_column(&mut self, source: &str, target: &str) -> Result<bool, JsValue> {
        let moved = self.table.move_column(source, target)?;
        if moved {
            self.notify();
        }
        Ok(moved)
    }

    #[wasm_bindgen(js_name = "setColumnHidden")]
    pub fn set_column_hidden(&mut self, column: &str, hidden: bool) -> Result<(), JsValue> {
        self.table.set_column_hidden(column, hidden)?;
        self.notify();
        Ok(())
    }

    #[wasm_bindgen(js_name = "resetColumns")]
    pub fn reset_columns(&mut self) {
        self.table.reset_columns();
        self.notify();
    }

    #[wasm_bindgen(js_name = "setContainerWidth")]
    pub fn set_container_width(&mut self, width: Option<f32>) {
        self.table.set_container_width(width);
        self.notify();
    }

    #[wasm_bindgen(js_name = "commitEdit")]
    pub fn commit_edit(&mut self, row: &str, column: &str, value: JsValue) -> Result<JsValue, JsValue> {
        let value: serde_json::Value = from_js(value)?;
        let change = self.table.commit_edit(&RowId::new(row), column, value)?;
        self.notify();
        to_js(&change)
    }

    /// Report a scroll event. `axis` is `"vertical"` (members `left`,
    /// `center`, `right`) or `"horizontal"` (`header`, `body`, `scrollbar`).
    /// Returns the `{target, offset}` commands to apply; empty for echoes.
    pub fn scroll(&mut self, axis: &str, member: &str, offset: f32) -> Result<JsValue, JsValue> {
        match axis {
            "vertical" => {
                let source: VerticalPanel = member.parse()?;
                to_js(self.scroll.scroll_vertical(source, offset).commands())
            }
            "horizontal" => {
                let source: HorizontalPart = member.parse()?;
                to_js(self.scroll.scroll_horizontal(source, offset).commands())
            }
            other => Err(JsValue::from_str(&format!("unknown scroll axis: {other}"))),
        }
    }

    /// Release the scroll guards; call from `requestAnimationFrame`.
    pub fn frame(&mut self) {
        self.scroll.frame();
    }

    /// Scrollable panel extents changed. Returns whether the dedicated
    /// horizontal scrollbar should be shown.
    #[wasm_bindgen(js_name = "resizeViewport")]
    pub fn resize_viewport(&mut self, content_width: f32, client_width: f32) -> bool {
        self.scroll.resize(content_width, client_width)
    }

    pub fn shadows(&self) -> Result<JsValue, JsValue> {
        to_js(&self.scroll.shadows())
    }

    pub fn stats(&self) -> Result<JsValue, JsValue> {
        to_js(&self.table.stats())
    }
}
