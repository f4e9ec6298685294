//! Column resize drag.

use super::capture::{CaptureGuard, PointerCapture};
use crate::error::Result;
use crate::table::DataTable;

/// A resize drag in progress.
///
/// The proposed width is the width at drag start plus the pointer's
/// horizontal travel, clamped by the column bounds on every move.
pub struct ResizeSession<C: PointerCapture> {
    column: String,
    start_x: f32,
    start_width: f32,
    previous: Option<f32>,
    current: f32,
    guard: CaptureGuard<C>,
}

impl<C: PointerCapture> ResizeSession<C> {
    /// Start resizing `column` with the pointer at `start_x`.
    ///
    /// # Errors
    /// [`TableError::UnknownColumn`](crate::TableError::UnknownColumn) when
    /// the column is not visible.
    pub fn begin(table: &mut DataTable, column: &str, start_x: f32, capture: C) -> Result<Self> {
        let start_width = table.column_width(column)?;
        let previous = table.width_override(column);
        log::debug!("resize start {column} at {start_width}px");
        Ok(Self {
            column: column.to_string(),
            start_x,
            start_width,
            previous,
            current: start_width,
            guard: CaptureGuard::acquire(capture),
        })
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn start_width(&self) -> f32 {
        self.start_width
    }

    pub fn current_width(&self) -> f32 {
        self.current
    }

    /// Apply the pointer position; returns the clamped width now in effect.
    pub fn drag_to(&mut self, table: &mut DataTable, x: f32) -> Result<f32> {
        let proposed = self.start_width + (x - self.start_x);
        self.current = table.set_column_width(&self.column, proposed)?;
        Ok(self.current)
    }

    /// Keep the current width and release the pointer.
    pub fn finish(mut self) -> f32 {
        self.guard.release();
        self.current
    }

    /// Put back whatever width override existed before the drag.
    pub fn cancel(mut self, table: &mut DataTable) -> Result<()> {
        self.guard.release();
        match self.previous {
            Some(px) => table.set_column_width(&self.column, px).map(|_| ()),
            None => table.clear_column_width(&self.column),
        }
    }
}
