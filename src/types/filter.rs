use serde::{Deserialize, Serialize};

/// Which filter widget (and matching rule) a column uses
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum FilterKind {
    /// Case-insensitive substring match
    #[default]
    Text,
    /// Case-insensitive exact match
    Combo,
    /// Case-insensitive "contains any of"
    MultiCombo,
    /// Same calendar day, time of day ignored
    Date,
    /// Numeric comparison with an optional operator prefix
    Number,
}

/// Current value of a column filter
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    Set(Vec<String>),
}

impl FilterValue {
    /// Empty text and empty sets never filter anything out.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Set(values) => values.is_empty(),
        }
    }

    /// The individual values, a text filter being a one-element set.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Text(s) => vec![s.as_str()],
            Self::Set(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        Self::Set(values)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Set(values.into_iter().map(ToString::to_string).collect())
    }
}

/// Comparison operators accepted as a prefix of number filters
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum NumberOperator {
    #[default]
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

/// What the host needs to render one column's filter widget
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterInput {
    /// Column the filter belongs to
    pub column: String,
    /// Widget kind
    pub kind: FilterKind,
    /// Current value, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FilterValue>,
    /// True when the column supplies its own filter component
    pub custom: bool,
    /// Distinct choices for combo and multi-combo widgets
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub options: Vec<String>,
}
