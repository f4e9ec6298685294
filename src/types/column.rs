use serde::{Deserialize, Serialize};

use super::FilterKind;

/// Value type tag; picks the comparator and the editor handed to the host
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    #[default]
    Text,
    Number,
    Boolean,
    Date,
    Structured,
}

/// Auto-fit source for a column width
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AutoFit {
    /// Widest cell value
    Data,
    /// Header text
    Header,
    /// Widest of header and cell values
    All,
}

impl AutoFit {
    pub fn measures_header(self) -> bool {
        matches!(self, Self::Header | Self::All)
    }

    pub fn measures_data(self) -> bool {
        matches!(self, Self::Data | Self::All)
    }
}

/// Edge a frozen column is pinned to
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FrozenSide {
    Left,
    Right,
}

/// Declarative display formatter for cell values
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CellFormat {
    /// Plain text conversion
    Text,
    /// Fixed number of decimals
    Number {
        #[serde(default)]
        decimals: Option<usize>,
    },
    /// chrono strftime pattern, e.g. `%d.%m.%Y`
    Date { pattern: String },
    /// Labels for true / false
    Boolean { yes: String, no: String },
}

/// Column configuration.
///
/// Owned by the table configuration and never mutated by interaction;
/// reorder, hide and resize go through overlays in
/// [`ViewState`](super::ViewState).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Unique id, also the row key the column reads
    pub id: String,
    /// Header text (defaults to the id)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub header: Option<String>,
    #[serde(default)]
    pub value_type: ValueType,
    /// Explicit width in pixels
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub adjust: Option<AutoFit>,
    /// Absorb leftover horizontal space (first such column only)
    #[serde(default)]
    pub fillspace: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub frozen: Option<FrozenSide>,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub filter: FilterKind,
    /// Host renders its own filter component for this column
    #[serde(default)]
    pub custom_filter: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub editable: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub format: Option<CellFormat>,
}

fn default_true() -> bool {
    true
}

impl Column {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: None,
            value_type: ValueType::Text,
            width: None,
            min_width: None,
            max_width: None,
            adjust: None,
            fillspace: false,
            frozen: None,
            sortable: true,
            filterable: false,
            filter: FilterKind::Text,
            custom_filter: false,
            hidden: false,
            editable: false,
            format: None,
        }
    }

    pub fn header(mut self, text: impl Into<String>) -> Self {
        self.header = Some(text.into());
        self
    }

    pub fn value_type(mut self, value: ValueType) -> Self {
        self.value_type = value;
        self
    }

    pub fn width(mut self, px: f32) -> Self {
        self.width = Some(px);
        self
    }

    pub fn min_width(mut self, px: f32) -> Self {
        self.min_width = Some(px);
        self
    }

    pub fn max_width(mut self, px: f32) -> Self {
        self.max_width = Some(px);
        self
    }

    pub fn adjust(mut self, mode: AutoFit) -> Self {
        self.adjust = Some(mode);
        self
    }

    pub fn fillspace(mut self) -> Self {
        self.fillspace = true;
        self
    }

    pub fn frozen(mut self, side: FrozenSide) -> Self {
        self.frozen = Some(side);
        self
    }

    pub fn sortable(mut self, value: bool) -> Self {
        self.sortable = value;
        self
    }

    /// Make the column filterable with the given widget kind.
    pub fn filter(mut self, kind: FilterKind) -> Self {
        self.filterable = true;
        self.filter = kind;
        self
    }

    pub fn custom_filter(mut self) -> Self {
        self.filterable = true;
        self.custom_filter = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    pub fn format(mut self, format: CellFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Header text shown to the user.
    pub fn title(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.id)
    }
}
