use crate::{
    column::Column,
    error::EvalError,
    obs::{metrics_report, metrics_reset_all},
    predicate::{NoCatalog, Predicate, Select, eval, filter_rows},
    value::Value,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

type TestRow = BTreeMap<String, Value>;
type TestCatalog = BTreeMap<String, Vec<TestRow>>;

const AGE: Column<i64> = Column::qualified("athlete", "age");
const NAME: Column<String> = Column::qualified("athlete", "name");
const JOINED: Column<NaiveDate> = Column::qualified("athlete", "joined_on");
const TEAM_ID: Column<i64> = Column::qualified("athlete", "team_id");
const TEAM_PK: Column<i64> = Column::qualified("team", "id");
const TEAM_TITLE: Column<String> = Column::qualified("team", "title");

fn row(cells: impl IntoIterator<Item = (&'static str, Value)>) -> TestRow {
    cells
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

fn keeps(row: &TestRow, predicate: &Predicate) -> bool {
    eval(row, predicate, &NoCatalog).expect("predicate without sub-queries evaluates")
}

fn teams() -> TestCatalog {
    let mut catalog = TestCatalog::new();
    catalog.insert(
        "team".to_string(),
        vec![
            row([("id", Value::Int(1)), ("title", Value::from("Dynamo"))]),
            row([("id", Value::Int(2)), ("title", Value::from("Spartak"))]),
        ],
    );

    catalog
}

fn dynamo() -> Select<i64> {
    Select::new("team", TEAM_PK).filter(TEAM_TITLE.eq(&"Dynamo".to_string()))
}

// ----------------------------------------------------------------------
// Three-valued logic
// ----------------------------------------------------------------------

#[test]
fn comparison_with_null_rejects_row_even_when_negated() {
    let r = row([("age", Value::Null)]);

    assert!(!keeps(&r, &AGE.eq(&5)));
    assert!(!keeps(&r, &AGE.ne(&5)));
    assert!(!keeps(&r, &Predicate::not(AGE.eq(&5))));
    assert!(!keeps(&r, &AGE.gte(&0)));
}

#[test]
fn missing_column_reads_as_null() {
    let r = row([]);

    assert!(keeps(&r, &AGE.is_null()));
    assert!(!keeps(&r, &AGE.is_not_null()));
    assert!(!keeps(&r, &AGE.eq(&1)));
}

#[test]
fn unknown_or_true_is_true_and_unknown_and_false_is_false() {
    let r = row([("age", Value::Null), ("name", Value::from("Ann"))]);
    let unknown = AGE.eq(&1);

    assert!(keeps(&r, &unknown.clone().or(NAME.is_not_null())));
    assert!(!keeps(&r, &unknown.clone().or(NAME.is_null())));
    assert!(keeps(&r, &Predicate::not(unknown.and(NAME.is_null()))));
}

#[test]
fn membership_with_null_item_is_unknown_unless_matched() {
    let r = row([("age", Value::Int(2))]);

    assert!(!keeps(&r, &AGE.in_list([Some(1_i64), None])));
    assert!(!keeps(&r, &AGE.not_in_list([Some(1_i64), None])));
    assert!(keeps(&r, &AGE.in_list([Some(2_i64), None])));
    assert!(keeps(&r, &AGE.not_in_list([1_i64, 3])));
}

#[test]
fn raw_empty_nodes_are_constants() {
    let empty: [i64; 0] = [];
    let r = row([("age", Value::Null)]);

    assert!(!keeps(&r, &AGE.in_list(empty)));
    assert!(keeps(&r, &AGE.not_in_list(empty)));
    assert!(keeps(&r, &Predicate::And(Vec::new())));
    assert!(!keeps(&r, &Predicate::Or(Vec::new())));
}

#[test]
fn neutral_keeps_every_row() {
    let rows = [row([]), row([("age", Value::Int(40))])];
    let neutral_shapes = [
        Predicate::Neutral,
        Predicate::Not(Box::new(Predicate::Neutral)),
        Predicate::And(vec![Predicate::Neutral, Predicate::Neutral]),
        Predicate::Or(vec![Predicate::Neutral]),
    ];

    for r in &rows {
        for predicate in &neutral_shapes {
            assert!(keeps(r, predicate), "{predicate:?} should keep {r:?}");
        }
    }
}

#[test]
fn raw_neutral_children_do_not_affect_junctions() {
    let r = row([("age", Value::Int(10))]);

    let or = Predicate::Or(vec![Predicate::Neutral, AGE.eq(&11)]);
    assert!(!keeps(&r, &or));

    let and = Predicate::And(vec![Predicate::Neutral, AGE.eq(&10)]);
    assert!(keeps(&r, &and));
}

// ----------------------------------------------------------------------
// Text and dates
// ----------------------------------------------------------------------

#[test]
fn case_insensitive_equality_and_search() {
    let r = row([("name", Value::from("Anna-Maria"))]);

    assert!(keeps(&r, &NAME.eq_ci("ANNA-maria")));
    assert!(!keeps(&r, &NAME.eq(&"anna-maria".to_string())));
    assert!(keeps(&r, &NAME.contains_ci("MARIA")));
    assert!(!keeps(&r, &NAME.contains_ci("maria ")));
}

#[test]
fn search_term_wildcards_match_literally() {
    let discount = row([("name", Value::from("50% off"))]);
    let plain = row([("name", Value::from("Half price"))]);

    assert!(keeps(&discount, &NAME.contains_ci("%")));
    assert!(!keeps(&plain, &NAME.contains_ci("%")));
    assert!(!keeps(&plain, &NAME.contains_ci("h_lf")));
}

#[test]
fn dates_compare_chronologically() {
    let joined = NaiveDate::from_ymd_opt(2022, 6, 15).expect("valid date");
    let r = row([("joined_on", Value::Date(joined))]);
    let cutoff = NaiveDate::from_ymd_opt(2022, 1, 1).expect("valid date");

    assert!(keeps(&r, &JOINED.gte(&cutoff)));
    assert!(!keeps(&r, &JOINED.lt(&cutoff)));
}

// ----------------------------------------------------------------------
// Sub-queries
// ----------------------------------------------------------------------

#[test]
fn eq_subquery_compares_against_single_row() {
    let catalog = teams();
    let predicate = TEAM_ID.eq_select(dynamo());

    let home = row([("team_id", Value::Int(1))]);
    let away = row([("team_id", Value::Int(2))]);

    assert_eq!(eval(&home, &predicate, &catalog), Ok(true));
    assert_eq!(eval(&away, &predicate, &catalog), Ok(false));
}

#[test]
fn empty_subquery_is_unknown() {
    let catalog = teams();
    let select = Select::new("team", TEAM_PK).filter(TEAM_TITLE.eq(&"Zenit".to_string()));
    let r = row([("team_id", Value::Int(1))]);

    let predicate = TEAM_ID.eq_select(select);
    assert_eq!(eval(&r, &predicate, &catalog), Ok(false));
    assert_eq!(eval(&r, &Predicate::not(predicate), &catalog), Ok(false));
}

#[test]
fn multi_row_subquery_is_an_error() {
    let catalog = teams();
    let predicate = TEAM_ID.eq_select(Select::new("team", TEAM_PK));
    let r = row([("team_id", Value::Int(1))]);

    assert_eq!(
        eval(&r, &predicate, &catalog),
        Err(EvalError::SubqueryCardinality {
            table: "team".to_string(),
            column: "id".to_string(),
            rows: 2,
        })
    );
}

#[test]
fn unknown_subquery_table_is_an_error() {
    let predicate = TEAM_ID.eq_select(dynamo());
    let r = row([("team_id", Value::Int(1))]);

    assert_eq!(
        eval(&r, &predicate, &NoCatalog),
        Err(EvalError::UnknownTable {
            table: "team".to_string(),
        })
    );
}

#[test]
fn subquery_scan_is_counted() {
    metrics_reset_all();
    let catalog = teams();
    let r = row([("team_id", Value::Int(1))]);

    eval(&r, &TEAM_ID.eq_select(dynamo()), &catalog).expect("sub-query evaluates");

    let ops = metrics_report().ops;
    assert_eq!(ops.subquery_scans, 1);
    assert_eq!(ops.subquery_rows_scanned, 2);
}

// ----------------------------------------------------------------------
// Scans
// ----------------------------------------------------------------------

#[test]
fn filter_rows_keeps_matching_rows_in_order() {
    let rows = vec![
        row([("age", Value::Int(17))]),
        row([("age", Value::Int(30))]),
        row([("age", Value::Null)]),
        row([("age", Value::Int(25))]),
    ];

    let kept = filter_rows(&rows, &AGE.gte(&18), &NoCatalog).expect("filter evaluates");
    let ages: Vec<&Value> = kept.iter().filter_map(|r| r.get("age")).collect();

    assert_eq!(ages, vec![&Value::Int(30), &Value::Int(25)]);
}
