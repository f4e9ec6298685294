//! Column filters.
//!
//! Each active filter is compiled once into a list of matchers; a row passes
//! a filter when any matcher accepts its value, and passes the pipeline when
//! it passes every filter.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde_json::Value;

use crate::types::{Column, FilterKind, FilterValue, NumberOperator, Row, ViewState};
use crate::value::{parse_datetime, value_day, value_number, value_text};

#[derive(Debug, Clone, PartialEq)]
enum Matcher {
    /// Lowercased needle
    Contains(String),
    /// Lowercased exact value
    Equals(String),
    Day(NaiveDate),
    Compare(NumberOperator, f64),
}

impl Matcher {
    fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Contains(needle) => {
                value_text(value).is_some_and(|text| text.to_lowercase().contains(needle.as_str()))
            }
            Self::Equals(expected) => {
                value_text(value).is_some_and(|text| text.to_lowercase() == *expected)
            }
            Self::Day(day) => value_day(value).is_some_and(|d| d == *day),
            Self::Compare(op, rhs) => value_number(value)
                .and_then(|lhs| lhs.partial_cmp(rhs))
                .is_some_and(|ord| operator_accepts(*op, ord)),
        }
    }
}

fn operator_accepts(op: NumberOperator, ord: Ordering) -> bool {
    match op {
        NumberOperator::Equal => ord == Ordering::Equal,
        NumberOperator::NotEqual => ord != Ordering::Equal,
        NumberOperator::GreaterThan => ord == Ordering::Greater,
        NumberOperator::GreaterThanOrEqual => ord != Ordering::Less,
        NumberOperator::LessThan => ord == Ordering::Less,
        NumberOperator::LessThanOrEqual => ord != Ordering::Greater,
    }
}

/// Parse a number filter such as `>= 10`, `!=3` or `42`.
pub fn parse_number_filter(raw: &str) -> Option<(NumberOperator, f64)> {
    let s = raw.trim();
    let (op, rest) = if let Some(rest) = s.strip_prefix(">=") {
        (NumberOperator::GreaterThanOrEqual, rest)
    } else if let Some(rest) = s.strip_prefix("<=") {
        (NumberOperator::LessThanOrEqual, rest)
    } else if let Some(rest) = s.strip_prefix("!=") {
        (NumberOperator::NotEqual, rest)
    } else if let Some(rest) = s.strip_prefix('>') {
        (NumberOperator::GreaterThan, rest)
    } else if let Some(rest) = s.strip_prefix('<') {
        (NumberOperator::LessThan, rest)
    } else if let Some(rest) = s.strip_prefix('=') {
        (NumberOperator::Equal, rest)
    } else {
        (NumberOperator::Equal, s)
    };
    rest.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(|n| (op, n))
}

fn compile_matcher(kind: FilterKind, raw: &str) -> Option<Matcher> {
    if raw.is_empty() {
        return None;
    }
    match kind {
        FilterKind::Text | FilterKind::MultiCombo => Some(Matcher::Contains(raw.to_lowercase())),
        FilterKind::Combo => Some(Matcher::Equals(raw.to_lowercase())),
        FilterKind::Date => {
            let day = parse_datetime(raw).map(|dt| dt.date());
            if day.is_none() {
                log::debug!("ignoring unparseable date filter {raw:?}");
            }
            day.map(Matcher::Day)
        }
        FilterKind::Number => Some(
            parse_number_filter(raw).map_or_else(
                || Matcher::Contains(raw.to_lowercase()),
                |(op, n)| Matcher::Compare(op, n),
            ),
        ),
    }
}

/// One active column filter, ready to test rows.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    column: String,
    matchers: Vec<Matcher>,
}

impl CompiledFilter {
    pub fn compile(column: &Column, value: &FilterValue) -> Option<Self> {
        let matchers: Vec<Matcher> = value
            .values()
            .into_iter()
            .filter_map(|raw| compile_matcher(column.filter, raw))
            .collect();
        if matchers.is_empty() {
            return None;
        }
        Some(Self {
            column: column.id.clone(),
            matchers,
        })
    }

    /// Null and missing values never pass an active filter.
    pub fn accepts(&self, row: &Row) -> bool {
        row.value(&self.column)
            .is_some_and(|value| self.matchers.iter().any(|m| m.matches(value)))
    }
}

/// Compile every active filter that targets a configured column.
pub fn compile_filters(columns: &[Column], state: &ViewState) -> Vec<CompiledFilter> {
    state
        .active_filters()
        .filter_map(|(id, value)| {
            let Some(column) = columns.iter().find(|c| &c.id == id) else {
                log::debug!("ignoring filter on unknown column {id}");
                return None;
            };
            CompiledFilter::compile(column, value)
        })
        .collect()
}

/// Indices of rows passing every filter, in raw order.
pub fn filter_indices(rows: &[Row], filters: &[CompiledFilter]) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| filters.iter().all(|f| f.accepts(row)))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: &[Value]) -> Vec<Row> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Row::try_from(json!({"id": i, "v": v})).unwrap())
            .collect()
    }

    fn run(kind: FilterKind, value: FilterValue, data: &[Value]) -> Vec<usize> {
        let column = Column::new("v").filter(kind);
        let filter = CompiledFilter::compile(&column, &value).unwrap();
        filter_indices(&rows(data), &[filter])
    }

    #[test]
    fn test_text_contains_case_insensitive() {
        let data = [json!("Alpha"), json!("beta"), json!(null), json!("GAMMA")];
        assert_eq!(run(FilterKind::Text, "A".into(), &data), vec![0, 1, 3]);
        assert_eq!(run(FilterKind::Text, "mm".into(), &data), vec![3]);
    }

    #[test]
    fn test_combo_exact() {
        let data = [json!("Open"), json!("open issue"), json!("OPEN")];
        assert_eq!(run(FilterKind::Combo, "open".into(), &data), vec![0, 2]);
    }

    #[test]
    fn test_multi_combo_any() {
        let data = [json!("red"), json!("green"), json!("blue")];
        let value = FilterValue::from(vec!["RE", "lu"]);
        assert_eq!(run(FilterKind::MultiCombo, value, &data), vec![0, 1, 2]);
        let value = FilterValue::from(vec!["ed"]);
        assert_eq!(run(FilterKind::MultiCombo, value, &data), vec![0]);
    }

    #[test]
    fn test_date_same_day() {
        let data = [
            json!("2024-05-01T09:30:00"),
            json!("2024-05-02T00:00:00"),
            json!("2024-05-01"),
            json!("garbage"),
        ];
        assert_eq!(run(FilterKind::Date, "2024-05-01".into(), &data), vec![0, 2]);
    }

    #[test]
    fn test_unparseable_date_filter_is_noop() {
        let column = Column::new("v").filter(FilterKind::Date);
        assert!(CompiledFilter::compile(&column, &"soon".into()).is_none());
    }

    #[test]
    fn test_number_operators() {
        let data = [json!(5), json!(10), json!("15"), json!("n/a")];
        assert_eq!(run(FilterKind::Number, ">= 10".into(), &data), vec![1, 2]);
        assert_eq!(run(FilterKind::Number, "<10".into(), &data), vec![0]);
        assert_eq!(run(FilterKind::Number, "10".into(), &data), vec![1]);
        assert_eq!(run(FilterKind::Number, "!=10".into(), &data), vec![0, 2]);
        // Not a number: falls back to substring matching
        assert_eq!(run(FilterKind::Number, "n/".into(), &data), vec![3]);
    }

    #[test]
    fn test_parse_number_filter() {
        assert_eq!(
            parse_number_filter(" > 2.5"),
            Some((NumberOperator::GreaterThan, 2.5))
        );
        assert_eq!(parse_number_filter("=-1"), Some((NumberOperator::Equal, -1.0)));
        assert_eq!(parse_number_filter(">"), None);
    }

    #[test]
    fn test_filters_compose_with_and() {
        let data = vec![
            Row::try_from(json!({"id": 1, "a": "x1", "b": "y"})).unwrap(),
            Row::try_from(json!({"id": 2, "a": "x2", "b": "z"})).unwrap(),
        ];
        let columns = vec![
            Column::new("a").filter(FilterKind::Text),
            Column::new("b").filter(FilterKind::Text),
        ];
        let mut state = ViewState::default();
        state.set_filter("a", "x".into());
        state.set_filter("b", "z".into());
        state.set_filter("missing", "q".into());
        let filters = compile_filters(&columns, &state);
        assert_eq!(filters.len(), 2);
        assert_eq!(filter_indices(&data, &filters), vec![1]);
    }
}
