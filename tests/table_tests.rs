//! Table engine tests: data errors, memoized derive, rendering, editing
//! and the JSON document entry point.
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
use tableview::layout::CharWidthMeasure;
use tableview::{
    derive_document, derive_file, AutoFit, Column, FilterKind, FilterValue, FrozenSide, Span,
    SortDirection, TableConfig, TableError,
};

// ============================================================================
// Data shape errors
// ============================================================================

#[test]
fn test_data_error_keeps_header_and_pagination() {
    let data = rows(json!([
        {"id": 1, "n": 1},
        {"id": 1, "n": 2},
        {"n": 3},
    ]));
    let config = TableConfig::new(vec![Column::new("n")]).options(options(|o| {
        o.page_size = Some(2);
    }));
    let mut table = table_with(config, data);

    let error = table.data_error().cloned().unwrap();
    assert_eq!(error.positions(), vec![1, 2]);

    let view = table.view().unwrap();
    assert!(view.rows.is_empty());
    assert_eq!(view.data_error, Some(error));
    assert_eq!(view.pagination.total_count, 3);
    assert_eq!(view.pagination.total_pages, 2);
    assert_eq!(column_ids(&view), vec!["n"]);
}

#[test]
fn test_valid_row_set_clears_data_error() {
    let mut table = table(vec![Column::new("n")], rows(json!([{"n": 1}])));
    assert!(table.data_error().is_some());
    table.set_rows(numbered_rows(2));
    assert!(table.data_error().is_none());
    assert_eq!(ids(&table.view().unwrap()), vec!["1", "2"]);
}

#[test]
fn test_capitalized_id_field_is_accepted() {
    let mut table = table(
        vec![Column::new("v")],
        rows(json!([{"Id": "x", "v": 1}, {"Id": 7, "v": 2}])),
    );
    assert!(table.data_error().is_none());
    assert_eq!(ids(&table.view().unwrap()), vec!["x", "7"]);
}

// ============================================================================
// Memoized derive
// ============================================================================

#[test]
fn test_resize_does_not_rerun_pipeline() {
    let mut table = table(
        vec![Column::new("a").width(50.0), Column::new("n")],
        numbered_rows(10),
    );
    table.view().unwrap();
    let before = table.stats();

    table.set_column_width("a", 90.0).unwrap();
    table.view().unwrap();
    let after = table.stats();
    assert_eq!(after.pipeline, before.pipeline);
    assert_eq!(after.measure, before.measure);
    assert_eq!(after.layout, before.layout + 1);
    assert_eq!(after.spans, before.spans + 1);

    table.view().unwrap();
    assert_eq!(table.stats(), after, "unchanged inputs reuse every stage");

    table.set_container_width(Some(900.0));
    table.view().unwrap();
    assert_eq!(table.stats().pipeline, before.pipeline);
}

#[test]
fn test_sort_relayouts_only_with_auto_fit() {
    let mut fixed = table(vec![Column::new("n").width(50.0)], numbered_rows(5));
    fixed.view().unwrap();
    let before = fixed.stats();
    fixed.toggle_sort("n").unwrap();
    fixed.view().unwrap();
    let after = fixed.stats();
    assert_eq!(after.pipeline, before.pipeline + 1);
    assert_eq!(after.layout, before.layout);
    assert_eq!(after.spans, before.spans + 1);

    let mut fitted = table(
        vec![Column::new("n").adjust(AutoFit::Data)],
        numbered_rows(5),
    );
    fitted.view().unwrap();
    let before = fitted.stats();
    fitted.toggle_sort("n").unwrap();
    fitted.view().unwrap();
    let after = fitted.stats();
    assert_eq!(after.measure, before.measure + 1);
    assert_eq!(after.layout, before.layout + 1);
}

#[test]
fn test_replacing_measurer_remeasures() {
    let mut table = table(
        vec![Column::new("n").adjust(AutoFit::Data).sortable(false)],
        numbered_rows(3),
    );
    let narrow = table.column_width("n").unwrap();
    table.set_measurer(Box::new(CharWidthMeasure { char_width: 70.0 }));
    let wide = table.column_width("n").unwrap();
    assert!(wide > narrow);
}

// ============================================================================
// Errors on host calls
// ============================================================================

#[test]
fn test_host_call_errors() {
    let mut table = table(
        vec![
            Column::new("fixed").sortable(false),
            Column::new("plain"),
        ],
        numbered_rows(1),
    );
    assert!(matches!(
        table.toggle_sort("fixed"),
        Err(TableError::NotSortable(_))
    ));
    assert!(matches!(
        table.set_filter("plain", "x"),
        Err(TableError::NotFilterable(_))
    ));
    assert!(matches!(
        table.toggle_sort("missing"),
        Err(TableError::UnknownColumn(_))
    ));
    assert!(matches!(
        table.set_column_width("missing", 10.0),
        Err(TableError::UnknownColumn(_))
    ));
    assert!(matches!(
        table.move_column("plain", "missing"),
        Err(TableError::UnknownColumn(_))
    ));
    assert!(table.state().sort.is_none());
}

// ============================================================================
// Filter inputs
// ============================================================================

#[test]
fn test_filter_inputs_follow_display_order_and_list_options() {
    let data = rows(json!([
        {"id": 1, "city": "Oslo", "name": "x"},
        {"id": 2, "city": "Berlin", "name": "y"},
        {"id": 3, "city": "Oslo", "name": "z"},
        {"id": 4, "city": "oslo", "name": null},
        {"id": 5, "city": null, "name": "w"},
    ]));
    let mut table = table(
        vec![
            Column::new("name").filter(FilterKind::Text),
            Column::new("city").filter(FilterKind::Combo),
            Column::new("secret").filter(FilterKind::Text).hidden(),
            Column::new("id"),
        ],
        data,
    );
    table.move_column("city", "name").unwrap();
    table.set_filter("city", "Oslo").unwrap();

    let inputs = table.filter_inputs();
    let columns: Vec<&str> = inputs.iter().map(|i| i.column.as_str()).collect();
    assert_eq!(columns, vec!["city", "name"]);

    assert_eq!(inputs[0].kind, FilterKind::Combo);
    assert_eq!(inputs[0].options, vec!["Berlin", "oslo", "Oslo"]);
    assert_eq!(inputs[0].value, Some(FilterValue::from("Oslo")));
    assert!(inputs[1].options.is_empty());
    assert_eq!(inputs[1].value, None);
}

// ============================================================================
// Editing
// ============================================================================

#[test]
fn test_commit_edit_updates_rows_and_rederives() {
    let mut table = table(
        vec![Column::new("name").editable()],
        name_rows(),
    );
    table.toggle_sort("name").unwrap();
    assert_eq!(ids(&table.view().unwrap()), vec!["2", "1", "3"]);

    let change = table.commit_edit(&rid("3"), "name", json!("0")).unwrap();
    assert_eq!(change.old, Some(json!(null)));
    assert_eq!(change.new, json!("0"));
    assert_eq!(ids(&table.view().unwrap()), vec!["3", "2", "1"]);
}

#[test]
fn test_commit_edit_errors_and_id_revalidation() {
    let mut table = table(vec![Column::new("id"), Column::new("n")], numbered_rows(2));
    assert!(matches!(
        table.commit_edit(&rid("9"), "n", json!(1)),
        Err(TableError::UnknownRow(_))
    ));
    assert!(matches!(
        table.commit_edit(&rid("1"), "zz", json!(1)),
        Err(TableError::UnknownColumn(_))
    ));

    table.commit_edit(&rid("2"), "id", json!(1)).unwrap();
    assert!(table.data_error().is_some());
    assert!(table.view().unwrap().rows.is_empty());
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_render_cells_walks_panels_spans_and_editors() {
    let config = TableConfig::new(vec![
        Column::new("id").frozen(FrozenSide::Left).width(40.0),
        Column::new("name").width(100.0),
        Column::new("note").editable(),
    ])
    .spans(vec![Span::new("1", "name").rowspan(2).value("merged")]);
    let data = rows(json!([
        {"id": 1, "name": "A", "note": "x"},
        {"id": 2, "name": "B"},
    ]));
    let mut table = table_with(config, data);
    let view = table.view().unwrap();

    let mut recorder = RecordingRenderer::default();
    table.render_cells(&view, &mut recorder);

    assert_eq!(recorder.panels, vec!["Left", "Scrollable"]);
    assert_eq!(
        recorder.cells,
        vec![
            "1/id=1",
            "2/id=2",
            "1/name=merged [1x2]",
            "1/note editor",
            "spacer name 100",
            "2/note editor",
        ]
    );
    assert!(recorder.error.is_none());
}

#[test]
fn test_render_cells_reports_data_error_instead_of_rows() {
    let mut table = table(vec![Column::new("n")], rows(json!([{"n": 1}])));
    let view = table.view().unwrap();
    let mut recorder = RecordingRenderer::default();
    table.render_cells(&view, &mut recorder);
    assert!(recorder.cells.is_empty());
    assert!(recorder.panels.is_empty());
    assert!(recorder.error.unwrap().contains("[0]"));
}

// ============================================================================
// JSON document
// ============================================================================

#[test]
fn test_derive_document() {
    let document = json!({
        "config": {
            "columns": [
                {"id": "n", "valueType": "number"},
                {"id": "label", "filterable": true},
            ],
            "spans": [{"row": 4, "column": "n", "colspan": 2}],
            "options": {"pageSize": 2},
        },
        "rows": [
            {"id": 1, "n": 1, "label": "one"},
            {"id": 2, "n": 2, "label": "two"},
            {"id": 3, "n": 3, "label": "three"},
            {"id": 4, "n": 4, "label": "four"},
        ],
        "state": {"sort": {"column": "n", "direction": "desc"}},
    });
    let view = derive_document(&document.to_string()).unwrap();
    assert_eq!(ids(&view), vec!["4", "3"]);
    assert_eq!(view.pagination.page_size, Some(2));
    assert_eq!(view.pagination.total_pages, 2);
    assert_eq!(view.spans.origins(), 1);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["spans"]["4"]["n"]["kind"], "origin");
    assert_eq!(json["spans"]["4"]["label"]["kind"], "skip");
    assert_eq!(json["pagination"]["totalCount"], 4);
    assert!(json.get("dataError").is_none());
}

#[test]
fn test_derive_document_rejects_bad_config() {
    assert!(matches!(
        derive_document(r#"{"config": {"columns": []}}"#),
        Err(TableError::NoColumns)
    ));
    assert!(matches!(
        derive_document("not json"),
        Err(TableError::Config(_))
    ));
}

#[test]
fn test_derive_file_reads_document_and_reports_io_errors() {
    let path = std::env::temp_dir().join(format!("tableview-doc-{}.json", std::process::id()));
    let document = json!({
        "config": {"columns": [{"id": "n"}]},
        "rows": [{"id": 1, "n": 1}, {"id": 2, "n": 2}],
    });
    std::fs::write(&path, document.to_string()).unwrap();
    let view = derive_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(ids(&view), vec!["1", "2"]);

    assert!(matches!(derive_file(&path), Err(TableError::Io(_))));
}

#[test]
fn test_state_round_trips_through_set_state() {
    let mut table = table(
        vec![Column::new("n").filter(FilterKind::Number)],
        numbered_rows(6),
    );
    table.toggle_sort("n").unwrap();
    table.set_filter("n", ">2").unwrap();
    table.set_column_width("n", 77.0).unwrap();
    let saved = table.state().clone();

    let mut restored = table_with(
        TableConfig::new(vec![Column::new("n").filter(FilterKind::Number)]),
        numbered_rows(6),
    );
    restored.set_state(saved).unwrap();
    assert_eq!(ids(&restored.view().unwrap()), vec!["3", "4", "5", "6"]);
    assert_eq!(restored.column_width("n").unwrap(), 77.0);
    assert_eq!(
        restored.state().sort.as_ref().map(|s| s.direction),
        Some(SortDirection::Asc)
    );
}
