//! Filter / sort / page pipeline tests.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::*;
use serde_json::json;
use tableview::pipeline::derive_working_set;
use tableview::{
    Column, FilterKind, FilterValue, SortDirection, SortState, TableConfig, ValueType, ViewState,
};
use test_case::test_case;

fn working_ids(rows: &[tableview::Row]) -> Vec<String> {
    rows.iter()
        .map(|r| r.id().map(|id| id.to_string()).unwrap_or_default())
        .collect()
}

// ============================================================================
// Sample scenarios
// ============================================================================

#[test]
fn test_sort_name_ascending_puts_null_last() {
    let mut table = table(vec![Column::new("name")], name_rows());
    table.toggle_sort("name").unwrap();
    assert_eq!(ids(&table.view().unwrap()), vec!["2", "1", "3"]);
}

#[test]
fn test_filter_is_case_insensitive_and_excludes_null() {
    let mut table = table(
        vec![Column::new("name").filter(FilterKind::Text)],
        name_rows(),
    );
    table.set_filter("name", "A").unwrap();
    assert_eq!(ids(&table.view().unwrap()), vec!["2"]);
}

#[test]
fn test_seven_rows_page_three_has_one_row() {
    let mut table = table(vec![Column::new("n")], numbered_rows(7));
    table.set_page_size(3).unwrap();
    assert_eq!(table.pagination().total_pages, 3);
    assert_eq!(table.set_page(3), 3);
    assert_eq!(ids(&table.view().unwrap()), vec!["7"]);
}

// ============================================================================
// Properties
// ============================================================================

#[test_case(SortDirection::Asc ; "ascending")]
#[test_case(SortDirection::Desc ; "descending")]
fn test_nulls_sort_last_in_both_directions(direction: SortDirection) {
    let data = rows(json!([
        {"id": 1, "v": null},
        {"id": 2, "v": 5},
        {"id": 3},
        {"id": 4, "v": -1},
        {"id": 5, "v": 12},
    ]));
    let columns = vec![Column::new("v").value_type(ValueType::Number)];
    let state = ViewState {
        sort: Some(SortState {
            column: "v".into(),
            direction,
        }),
        ..ViewState::default()
    };
    let out = derive_working_set(&data, &columns, &state, false);
    let ids = working_ids(&out);
    let defined = &ids[..3];
    assert!(defined.iter().all(|id| ["2", "4", "5"].contains(&id.as_str())));
    let tail: Vec<&str> = ids[3..].iter().map(String::as_str).collect();
    assert_eq!(tail, vec!["1", "3"], "nulls keep input order at the end");
}

#[test]
fn test_numeric_sort_is_not_lexicographic() {
    let data = rows(json!([
        {"id": "a", "v": 10},
        {"id": "b", "v": 9},
        {"id": "c", "v": "100"},
    ]));
    let columns = vec![Column::new("v").value_type(ValueType::Number)];
    let state = ViewState {
        sort: Some(SortState {
            column: "v".into(),
            direction: SortDirection::Asc,
        }),
        ..ViewState::default()
    };
    assert_eq!(
        working_ids(&derive_working_set(&data, &columns, &state, false)),
        vec!["b", "a", "c"]
    );
}

#[test]
fn test_sort_toggle_cycle() {
    let mut table = table(vec![Column::new("a"), Column::new("b")], numbered_rows(2));
    assert_eq!(table.toggle_sort("a").unwrap().direction, SortDirection::Asc);
    assert_eq!(table.toggle_sort("a").unwrap().direction, SortDirection::Desc);
    assert_eq!(table.toggle_sort("a").unwrap().direction, SortDirection::Asc);
    let switched = table.toggle_sort("b").unwrap();
    assert_eq!(switched.column, "b");
    assert_eq!(switched.direction, SortDirection::Asc);
}

#[test]
fn test_filter_idempotence() {
    let data = rows(json!([
        {"id": 1, "city": "Oslo"},
        {"id": 2, "city": "Lisbon"},
        {"id": 3, "city": "Boston"},
    ]));
    let columns = vec![Column::new("city").filter(FilterKind::Text)];
    let mut state = ViewState::default();
    state.set_filter("city", FilterValue::from("os"));
    let once = derive_working_set(&data, &columns, &state, false);
    let twice = derive_working_set(&once, &columns, &state, false);
    assert_eq!(once, twice);
    assert_eq!(working_ids(&once), vec!["1", "3"]);
}

#[test_case(1)]
#[test_case(2)]
#[test_case(3)]
#[test_case(7)]
#[test_case(50)]
fn test_pages_concatenate_to_working_set(page_size: usize) {
    let mut table = table(vec![Column::new("n")], numbered_rows(17));
    table.toggle_sort("n").unwrap();
    table.toggle_sort("n").unwrap();
    let whole = ids(&table.view().unwrap());

    table.set_page_size(page_size).unwrap();
    let pages = table.pagination().total_pages;
    let mut joined = Vec::new();
    for page in 1..=pages {
        table.set_page(page);
        joined.extend(ids(&table.view().unwrap()));
    }
    assert_eq!(joined, whole);
}

// ============================================================================
// Filter kinds
// ============================================================================

fn amounts() -> Vec<tableview::Row> {
    rows(json!([
        {"id": 1, "amount": 5},
        {"id": 2, "amount": 10},
        {"id": 3, "amount": "15"},
        {"id": 4, "amount": null},
    ]))
}

#[test_case("10", &["2"] ; "bare number is equality")]
#[test_case(">=10", &["2", "3"] ; "greater or equal")]
#[test_case("< 10", &["1"] ; "less than with space")]
#[test_case("!=10", &["1", "3"] ; "not equal skips null")]
#[test_case("1", &[] ; "no match")]
fn test_number_filter(filter: &str, expected: &[&str]) {
    let columns = vec![Column::new("amount")
        .value_type(ValueType::Number)
        .filter(FilterKind::Number)];
    let mut state = ViewState::default();
    state.set_filter("amount", FilterValue::from(filter));
    let out = derive_working_set(&amounts(), &columns, &state, false);
    let mut got = working_ids(&out);
    let mut want: Vec<String> = expected.iter().map(|s| (*s).to_string()).collect();
    got.sort();
    want.sort();
    assert_eq!(got, want);
}

#[test]
fn test_unparseable_number_filter_falls_back_to_text() {
    let columns = vec![Column::new("amount").filter(FilterKind::Number)];
    let mut state = ViewState::default();
    state.set_filter("amount", FilterValue::from("1x"));
    assert!(derive_working_set(&amounts(), &columns, &state, false).is_empty());
    state.set_filter("amount", FilterValue::from("5 "));
    assert_eq!(
        working_ids(&derive_working_set(&amounts(), &columns, &state, false)),
        vec!["1"]
    );
}

#[test]
fn test_date_filter_ignores_time_of_day() {
    let data = rows(json!([
        {"id": 1, "at": "2024-05-01T08:30:00"},
        {"id": 2, "at": "2024-05-01"},
        {"id": 3, "at": "2024-05-02T00:00:00"},
        {"id": 4, "at": "garbage"},
    ]));
    let columns = vec![Column::new("at")
        .value_type(ValueType::Date)
        .filter(FilterKind::Date)];
    let mut state = ViewState::default();
    state.set_filter("at", FilterValue::from("2024-05-01T23:00:00"));
    assert_eq!(
        working_ids(&derive_working_set(&data, &columns, &state, false)),
        vec!["1", "2"]
    );

    state.set_filter("at", FilterValue::from("not a date"));
    assert_eq!(derive_working_set(&data, &columns, &state, false).len(), 4);
}

#[test]
fn test_combo_and_multi_combo() {
    let data = rows(json!([
        {"id": 1, "city": "Oslo"},
        {"id": 2, "city": "Oslo East"},
        {"id": 3, "city": "Quito"},
    ]));
    let combo = vec![Column::new("city").filter(FilterKind::Combo)];
    let mut state = ViewState::default();
    state.set_filter("city", FilterValue::from("oslo"));
    assert_eq!(
        working_ids(&derive_working_set(&data, &combo, &state, false)),
        vec!["1"]
    );

    let multi = vec![Column::new("city").filter(FilterKind::MultiCombo)];
    state.set_filter("city", FilterValue::from(vec!["east", "quito"]));
    assert_eq!(
        working_ids(&derive_working_set(&data, &multi, &state, false)),
        vec!["2", "3"]
    );
}

#[test]
fn test_filters_compose_with_and() {
    let data = rows(json!([
        {"id": 1, "city": "Oslo", "amount": 5},
        {"id": 2, "city": "Oslo", "amount": 50},
        {"id": 3, "city": "Quito", "amount": 50},
    ]));
    let columns = vec![
        Column::new("city").filter(FilterKind::Text),
        Column::new("amount").filter(FilterKind::Number),
    ];
    let mut state = ViewState::default();
    state.set_filter("city", FilterValue::from("oslo"));
    state.set_filter("amount", FilterValue::from(">10"));
    assert_eq!(
        working_ids(&derive_working_set(&data, &columns, &state, false)),
        vec!["2"]
    );
}

#[test]
fn test_unknown_filter_column_is_ignored() {
    let mut state = ViewState::default();
    state.set_filter("nope", FilterValue::from("x"));
    let out = derive_working_set(&numbered_rows(3), &[Column::new("n")], &state, false);
    assert_eq!(out.len(), 3);
}

// ============================================================================
// Server-side mode and paging state
// ============================================================================

#[test]
fn test_server_side_is_identity() {
    let config = TableConfig::new(vec![
        Column::new("name").filter(FilterKind::Text),
    ])
    .options(options(|o| {
        o.server_side = true;
        o.page_size = Some(2);
    }));
    let mut table = table_with(config, name_rows());
    table.toggle_sort("name").unwrap();
    table.set_filter("name", "zzz").unwrap();
    table.set_server_total(40);

    let view = table.view().unwrap();
    assert_eq!(ids(&view), vec!["1", "2", "3"]);
    assert_eq!(view.pagination.total_count, 40);
    assert_eq!(view.pagination.total_pages, 20);
}

#[test]
fn test_filter_and_page_size_reset_page() {
    let mut table = table(
        vec![Column::new("n").filter(FilterKind::Number)],
        numbered_rows(10),
    );
    table.set_page_size(2).unwrap();
    table.set_page(4);
    table.set_filter("n", ">0").unwrap();
    assert_eq!(table.state().page, 1);

    table.set_page(3);
    table.set_page_size(5).unwrap();
    assert_eq!(table.state().page, 1);
}

#[test]
fn test_set_page_clamps() {
    let mut table = table(vec![Column::new("n")], numbered_rows(5));
    table.set_page_size(2).unwrap();
    assert_eq!(table.set_page(0), 1);
    assert_eq!(table.set_page(99), 3);

    let mut empty = common::table(vec![Column::new("n")], Vec::new());
    empty.set_page_size(2).unwrap();
    assert_eq!(empty.set_page(5), 1);
}

#[test]
fn test_shrinking_row_set_pulls_page_back() {
    let mut table = table(vec![Column::new("n")], numbered_rows(10));
    table.set_page_size(2).unwrap();
    assert_eq!(table.set_page(5), 5);

    table.set_rows(numbered_rows(3));
    assert_eq!(table.state().page, 2);
    let view = table.view().unwrap();
    assert_eq!(ids(&view), vec!["3"]);
    assert_eq!(view.pagination.page, view.pagination.total_pages);

    table.set_rows(numbered_rows(8));
    assert_eq!(table.state().page, 2, "growing keeps the current page");

    table.set_rows(Vec::new());
    assert_eq!(table.state().page, 1);
}

#[test]
fn test_zero_page_size_is_rejected() {
    let mut table = table(vec![Column::new("n")], numbered_rows(1));
    assert!(matches!(
        table.set_page_size(0),
        Err(tableview::TableError::InvalidPageSize)
    ));
}
