//! Column reorder drag.

use super::capture::{CaptureGuard, PointerCapture};
use crate::error::{Result, TableError};
use crate::table::DataTable;

/// Move `source` to the position `target` held before the move.
///
/// Returns false, leaving `order` untouched, when either id is missing or
/// both are the same.
pub fn move_id(order: &mut Vec<String>, source: &str, target: &str) -> bool {
    if source == target {
        return false;
    }
    let (Some(from), Some(to)) = (
        order.iter().position(|id| id == source),
        order.iter().position(|id| id == target),
    ) else {
        return false;
    };
    let moved = order.remove(from);
    order.insert(to, moved);
    true
}

/// A header drag in progress.
pub struct ReorderSession<C: PointerCapture> {
    source: String,
    target: Option<String>,
    guard: CaptureGuard<C>,
}

impl<C: PointerCapture> ReorderSession<C> {
    pub fn begin(table: &DataTable, source: &str, capture: C) -> Result<Self> {
        if table.column(source).is_none() {
            return Err(TableError::UnknownColumn(source.to_string()));
        }
        Ok(Self {
            source: source.to_string(),
            target: None,
            guard: CaptureGuard::acquire(capture),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Header under the pointer; hovering the dragged column clears the target.
    pub fn hover(&mut self, target: Option<&str>) {
        self.target = target
            .filter(|t| *t != self.source)
            .map(str::to_string);
    }

    /// Commit the move. Returns false when there was no drop target.
    pub fn drop_on(mut self, table: &mut DataTable) -> Result<bool> {
        self.guard.release();
        match self.target.take() {
            Some(target) => table.move_column(&self.source, &target),
            None => Ok(false),
        }
    }

    pub fn cancel(mut self) {
        self.guard.release();
    }
}
