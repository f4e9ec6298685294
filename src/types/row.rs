use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TableError;

/// Stable row identifier taken from a row's `id` (or `Id`) field.
///
/// Numbers are canonicalised through their JSON text, so `1` and `"1"`
/// identify the same row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "String")]
pub struct RowId(String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Interpret a JSON value as an identifier.
    ///
    /// Only non-empty strings and numbers qualify.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for RowId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<RowId> for String {
    fn from(id: RowId) -> Self {
        id.0
    }
}

impl TryFrom<Value> for RowId {
    type Error = TableError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
            .ok_or_else(|| TableError::Other(format!("invalid row id: {value}")))
    }
}

/// An arbitrary keyed record supplied by the host.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The row identifier, read from `id` and then `Id`.
    pub fn id(&self) -> Option<RowId> {
        self.0
            .get("id")
            .and_then(RowId::from_value)
            .or_else(|| self.0.get("Id").and_then(RowId::from_value))
    }

    /// Raw field access; `null` is returned as-is.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Field value with `null` folded into `None`.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Replace a field, returning the previous value.
    pub fn set(&mut self, key: &str, value: Value) -> Option<Value> {
        self.0.insert(key.to_string(), value)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Row {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for Row {
    type Error = TableError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(TableError::Other(format!(
                "row must be a JSON object, got {other}"
            ))),
        }
    }
}

/// Rows that break the unique-identifier invariant.
///
/// Non-fatal: the table keeps rendering its header, filters and pagination
/// and shows this in place of the row area.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataShapeError {
    /// Positions (raw order, 0-based) of rows without a usable id
    pub missing: Vec<usize>,
    /// Positions of rows repeating an id already seen earlier
    pub duplicate: Vec<usize>,
}

impl DataShapeError {
    /// All offending positions in ascending order.
    pub fn positions(&self) -> Vec<usize> {
        let mut all: Vec<usize> = self
            .missing
            .iter()
            .chain(self.duplicate.iter())
            .copied()
            .collect();
        all.sort_unstable();
        all
    }
}

impl fmt::Display for DataShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rows without a unique id at positions {:?}", self.positions())
    }
}

/// Check that every row carries a unique id.
pub fn validate_rows(rows: &[Row]) -> Option<DataShapeError> {
    let mut seen = HashSet::with_capacity(rows.len());
    let mut err = DataShapeError::default();

    for (pos, row) in rows.iter().enumerate() {
        match row.id() {
            None => err.missing.push(pos),
            Some(id) => {
                if !seen.insert(id) {
                    err.duplicate.push(pos);
                }
            }
        }
    }

    if err.missing.is_empty() && err.duplicate.is_empty() {
        None
    } else {
        Some(err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: Value) -> Row {
        Row::try_from(v).unwrap()
    }

    #[test]
    fn test_id_falls_back_to_capitalised_key() {
        assert_eq!(row(json!({"id": 7})).id(), Some(RowId::from(7_u64)));
        assert_eq!(row(json!({"Id": "a"})).id(), Some(RowId::from("a")));
        assert_eq!(row(json!({"id": null, "Id": 3})).id(), Some(RowId::from(3_u64)));
        assert_eq!(row(json!({"id": ""})).id(), None);
        assert_eq!(row(json!({"id": true})).id(), None);
    }

    #[test]
    fn test_numeric_and_string_ids_match() {
        assert_eq!(row(json!({"id": 1})).id(), row(json!({"id": "1"})).id());
    }

    #[test]
    fn test_validate_flags_missing_and_duplicate() {
        let rows = vec![
            row(json!({"id": 1})),
            row(json!({"name": "x"})),
            row(json!({"id": 1})),
            row(json!({"id": 2})),
        ];
        let err = validate_rows(&rows).unwrap();
        assert_eq!(err.missing, vec![1]);
        assert_eq!(err.duplicate, vec![2]);
        assert_eq!(err.positions(), vec![1, 2]);
    }

    #[test]
    fn test_validate_accepts_unique_ids() {
        let rows = vec![row(json!({"id": 1})), row(json!({"Id": 2}))];
        assert!(validate_rows(&rows).is_none());
        assert!(validate_rows(&[]).is_none());
    }

    #[test]
    fn test_row_id_deserializes_from_number() {
        let id: RowId = serde_json::from_value(json!(12)).unwrap();
        assert_eq!(id.as_str(), "12");
        assert!(serde_json::from_value::<RowId>(json!(null)).is_err());
    }
}
