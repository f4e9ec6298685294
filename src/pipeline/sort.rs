//! Single-key row sorting.

use std::cmp::Ordering;

use serde_json::Value;

use crate::types::{Column, Row, SortDirection, ValueType};
use crate::value::{locale_cmp, value_datetime, value_number, value_text};

/// Order two cell values for a sort.
///
/// Null and missing values sort after every defined value in both
/// directions; only the ordering of defined values is reversed for `Desc`.
pub fn compare_values(
    a: Option<&Value>,
    b: Option<&Value>,
    value_type: ValueType,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ord = compare_defined(a, b, value_type);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
    }
}

fn compare_defined(a: &Value, b: &Value, value_type: ValueType) -> Ordering {
    let typed = match value_type {
        ValueType::Number => compare_parsed(value_number(a), value_number(b)),
        ValueType::Date => compare_parsed(value_datetime(a), value_datetime(b)),
        ValueType::Boolean => compare_parsed(a.as_bool(), b.as_bool()),
        ValueType::Text | ValueType::Structured => None,
    };
    typed.unwrap_or_else(|| compare_text(a, b))
}

/// Parsed values first; `None` means both failed to parse.
fn compare_parsed<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Option<Ordering> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.partial_cmp(&b).unwrap_or(Ordering::Equal)),
        (Some(_), None) => Some(Ordering::Less),
        (None, Some(_)) => Some(Ordering::Greater),
        (None, None) => None,
    }
}

fn compare_text(a: &Value, b: &Value) -> Ordering {
    match (value_text(a), value_text(b)) {
        (Some(a), Some(b)) => locale_cmp(&a, &b),
        _ => Ordering::Equal,
    }
}

/// Stable sort of row indices by one column.
pub fn sort_indices(
    indices: &mut [usize],
    rows: &[Row],
    column: &Column,
    direction: SortDirection,
) {
    let key = column.id.as_str();
    indices.sort_by(|&a, &b| {
        compare_values(
            rows.get(a).and_then(|r| r.value(key)),
            rows.get(b).and_then(|r| r.value(key)),
            column.value_type,
            direction,
        )
    });
}
