use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RowId;

/// Merged-cell override keyed by its origin cell
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    /// Origin row
    pub row: RowId,
    /// Origin column
    pub column: String,
    #[serde(default = "one")]
    pub colspan: u32,
    #[serde(default = "one")]
    pub rowspan: u32,
    /// Literal value shown instead of the row's own value
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<Value>,
    /// Style (class name or inline css) handed to the renderer
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub style: Option<String>,
}

fn one() -> u32 {
    1
}

impl Span {
    pub fn new(row: impl Into<RowId>, column: impl Into<String>) -> Self {
        Self {
            row: row.into(),
            column: column.into(),
            colspan: 1,
            rowspan: 1,
            value: None,
            style: None,
        }
    }

    pub fn colspan(mut self, n: u32) -> Self {
        self.colspan = n;
        self
    }

    pub fn rowspan(mut self, n: u32) -> Self {
        self.rowspan = n;
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Column count covered, zero treated as one.
    pub fn cols(&self) -> usize {
        usize::try_from(self.colspan.max(1)).unwrap_or(1)
    }

    /// Row count covered, zero treated as one.
    pub fn rows(&self) -> usize {
        usize::try_from(self.rowspan.max(1)).unwrap_or(1)
    }
}
