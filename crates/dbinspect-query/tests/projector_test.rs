//! Column to field resolution and per-row conversion.

use chrono::NaiveDateTime;
use dbinspect_core::{Cell, ProjectionError};
use dbinspect_query::{record, ColumnPlan};
use proptest::prelude::*;

record! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Hinted {
        pub name: String => "FOO",
    }
}

record! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Tablespace {
        pub tablespace_name: String,
        pub used_mb: f64,
        pub max_mb: Option<f64>,
        pub created: Option<NaiveDateTime>,
    }
}

record! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Guarded {
        pub owner: String,
        pub secret: String as readonly,
    }
}

record! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Twins {
        pub first: String => "VALUE",
        pub second: String => "VALUE",
    }
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

// ── Matching precedence ─────────────────────────────────────────────────────

#[test]
fn hint_wins_over_field_name() {
    let plan = ColumnPlan::<Hinted>::build(&columns(&["FOO", "name"]));
    let row = plan
        .project(vec![Cell::from("x"), Cell::from("y")])
        .unwrap();
    assert_eq!(row.name, "x");
}

#[test]
fn hint_wins_regardless_of_column_order() {
    let plan = ColumnPlan::<Hinted>::build(&columns(&["name", "foo"]));
    let row = plan
        .project(vec![Cell::from("y"), Cell::from("x")])
        .unwrap();
    assert_eq!(row.name, "x");
    assert_eq!(plan.targets(), vec![None, Some("name")]);
}

#[test]
fn field_name_matches_case_insensitively() {
    let plan = ColumnPlan::<Tablespace>::build(&columns(&[
        "TABLESPACE_NAME",
        "Used_MB",
        "max_mb",
        "CREATED",
    ]));
    assert_eq!(
        plan.targets(),
        vec![
            Some("tablespace_name"),
            Some("used_mb"),
            Some("max_mb"),
            Some("created")
        ]
    );
}

#[test]
fn a_field_is_matched_by_at_most_one_column() {
    let plan = ColumnPlan::<Twins>::build(&columns(&["VALUE", "value", "VALUE"]));
    let row = plan
        .project(vec![Cell::from("a"), Cell::from("b"), Cell::from("c")])
        .unwrap();
    assert_eq!(row.first, "a");
    assert_eq!(row.second, "b");
    assert_eq!(plan.targets(), vec![Some("first"), Some("second"), None]);
}

// ── Unmatched and read-only columns ─────────────────────────────────────────

#[test]
fn unmatched_column_is_discarded() {
    let plan = ColumnPlan::<Hinted>::build(&columns(&["EXTRA", "FOO"]));
    let row = plan
        .project(vec![Cell::Integer(9), Cell::from("kept")])
        .unwrap();
    assert_eq!(row.name, "kept");
}

#[test]
fn readonly_field_is_never_written() {
    let plan = ColumnPlan::<Guarded>::build(&columns(&["OWNER", "SECRET"]));
    let row = plan
        .project(vec![Cell::from("SYS"), Cell::from("hunter2")])
        .unwrap();
    assert_eq!(row.owner, "SYS");
    assert_eq!(row.secret, "");
}

// ── Conversion ──────────────────────────────────────────────────────────────

#[test]
fn null_into_nullable_field_is_absent() {
    let plan = ColumnPlan::<Tablespace>::build(&columns(&["TABLESPACE_NAME", "USED_MB", "MAX_MB"]));
    let row = plan
        .project(vec![Cell::from("USERS"), Cell::Real(12.5), Cell::Null])
        .unwrap();
    assert_eq!(row.max_mb, None);
    assert_eq!(row.used_mb, 12.5);
}

#[test]
fn null_into_required_field_fails_the_row() {
    let plan = ColumnPlan::<Tablespace>::build(&columns(&["TABLESPACE_NAME"]));
    let err = plan.project(vec![Cell::Null]).unwrap_err();
    assert!(matches!(err, ProjectionError::NullIntoRequired { .. }));
}

#[test]
fn bytes_decode_into_text_fields() {
    let plan = ColumnPlan::<Hinted>::build(&columns(&["FOO"]));
    let row = plan.project(vec![Cell::Bytes(b"ONLINE".to_vec())]).unwrap();
    assert_eq!(row.name, "ONLINE");
}

#[test]
fn type_mismatch_names_column_and_field() {
    let plan = ColumnPlan::<Tablespace>::build(&columns(&["USED_MB"]));
    let err = plan.project(vec![Cell::from("lots")]).unwrap_err();
    match err {
        ProjectionError::Conversion { column, field, .. } => {
            assert_eq!(column, "USED_MB");
            assert_eq!(field, "used_mb");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn short_row_is_an_arity_error() {
    let plan = ColumnPlan::<Hinted>::build(&columns(&["FOO", "BAR"]));
    let err = plan.project(vec![Cell::from("x")]).unwrap_err();
    assert_eq!(err, ProjectionError::Arity { expected: 2, found: 1 });
}

proptest! {
    #[test]
    fn hinted_column_matches_in_any_case(mask in proptest::collection::vec(any::<bool>(), 3)) {
        let column: String = "FOO"
            .chars()
            .zip(mask)
            .map(|(c, lower)| if lower { c.to_ascii_lowercase() } else { c })
            .collect();
        let plan = ColumnPlan::<Hinted>::build(&[column]);
        let row = plan.project(vec![Cell::from("v")]).unwrap();
        prop_assert_eq!(row.name, "v");
    }
}
