use crate::{
    column::ColumnRef,
    error::EvalError,
    obs::sink::{self, MetricsEvent},
    predicate::{
        CompareOp, ComparePredicate, Predicate, SubQuery,
        coercion::{CoercionSpec, compare_eq, compare_order},
    },
    value::{TextMode, Value},
};
use std::{cmp::Ordering, collections::BTreeMap};

///
/// Row
///
/// One row visible to the evaluator. A column the row does not carry
/// reads as SQL NULL.
///

pub trait Row {
    fn value(&self, column: ColumnRef) -> Option<&Value>;
}

impl Row for BTreeMap<String, Value> {
    fn value(&self, column: ColumnRef) -> Option<&Value> {
        self.get(column.name())
    }
}

///
/// Catalog
///
/// Table source for sub-query evaluation.
///

pub trait Catalog {
    /// All rows of `table`, or `None` if the table is unknown.
    fn scan(&self, table: &str) -> Option<Vec<&dyn Row>>;
}

impl<R: Row> Catalog for BTreeMap<String, Vec<R>> {
    fn scan(&self, table: &str) -> Option<Vec<&dyn Row>> {
        self.get(table)
            .map(|rows| rows.iter().map(|row| row as &dyn Row).collect())
    }
}

///
/// NoCatalog
///
/// Catalog with no tables, for predicates without sub-queries.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoCatalog;

impl Catalog for NoCatalog {
    fn scan(&self, _table: &str) -> Option<Vec<&dyn Row>> {
        None
    }
}

///
/// Truth
///
/// SQL three-valued logic.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Truth {
    True,
    False,
    Unknown,
}

impl Truth {
    const fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::False, _) | (_, Self::False) => Self::False,
            (Self::True, Self::True) => Self::True,
            _ => Self::Unknown,
        }
    }

    const fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::True, _) | (_, Self::True) => Self::True,
            (Self::False, Self::False) => Self::False,
            _ => Self::Unknown,
        }
    }

    const fn not(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Unknown => Self::Unknown,
        }
    }

    const fn from_bool(b: bool) -> Self {
        if b { Self::True } else { Self::False }
    }

    fn from_option(b: Option<bool>) -> Self {
        b.map_or(Self::Unknown, Self::from_bool)
    }
}

static NULL: Value = Value::Null;

impl Predicate {
    /// Whether `row` passes this condition, as a SQL WHERE clause would decide.
    pub fn eval(&self, row: &dyn Row, catalog: &dyn Catalog) -> Result<bool, EvalError> {
        eval(row, self, catalog)
    }
}

/// Evaluate one predicate against one row.
///
/// Unknown (NULL-involving) results reject the row. A predicate that is
/// entirely neutral keeps it.
pub fn eval(row: &dyn Row, predicate: &Predicate, catalog: &dyn Catalog) -> Result<bool, EvalError> {
    let truth = eval_node(row, predicate, catalog)?;

    Ok(matches!(truth, None | Some(Truth::True)))
}

/// Keep the rows of `rows` that pass `predicate`, in order.
pub fn filter_rows<'r, R: Row>(
    rows: &'r [R],
    predicate: &Predicate,
    catalog: &dyn Catalog,
) -> Result<Vec<&'r R>, EvalError> {
    let mut out = Vec::new();
    for row in rows {
        if eval(row, predicate, catalog)? {
            out.push(row);
        }
    }

    Ok(out)
}

// `None` marks a neutral subtree that its parent must ignore.
fn eval_node(
    row: &dyn Row,
    predicate: &Predicate,
    catalog: &dyn Catalog,
) -> Result<Option<Truth>, EvalError> {
    let truth = match predicate {
        Predicate::Neutral => return Ok(None),
        Predicate::True => Truth::True,
        Predicate::False => Truth::False,
        Predicate::And(children) => {
            return eval_junction(row, children, catalog, Truth::True, Truth::and);
        }
        Predicate::Or(children) => {
            return eval_junction(row, children, catalog, Truth::False, Truth::or);
        }
        Predicate::Not(inner) => return Ok(eval_node(row, inner, catalog)?.map(Truth::not)),
        Predicate::Compare(cmp) => eval_compare(read(row, cmp.column), cmp),
        Predicate::IsNull { column } => Truth::from_bool(read(row, *column).is_null()),
        Predicate::IsNotNull { column } => Truth::from_bool(!read(row, *column).is_null()),
        Predicate::TextContainsCi { column, value } => {
            Truth::from_option(read(row, *column).text_contains(value, TextMode::Ci))
        }
        Predicate::EqSubquery { column, subquery } => {
            eval_eq_subquery(read(row, *column), subquery, catalog)?
        }
    };

    Ok(Some(truth))
}

// A raw empty junction is its identity constant; otherwise neutral
// children are skipped, and an all-neutral junction is itself neutral.
fn eval_junction(
    row: &dyn Row,
    children: &[Predicate],
    catalog: &dyn Catalog,
    empty: Truth,
    op: fn(Truth, Truth) -> Truth,
) -> Result<Option<Truth>, EvalError> {
    if children.is_empty() {
        return Ok(Some(empty));
    }

    let mut acc = None;
    for child in children {
        if let Some(truth) = eval_node(row, child, catalog)? {
            acc = Some(acc.map_or(truth, |prev| op(prev, truth)));
        }
    }

    Ok(acc)
}

fn read(row: &dyn Row, column: ColumnRef) -> &Value {
    row.value(column).unwrap_or(&NULL)
}

fn eval_compare(actual: &Value, cmp: &ComparePredicate) -> Truth {
    let expected = &cmp.value;
    let coercion = &cmp.coercion;
    let ordered = |f: fn(Ordering) -> bool| {
        Truth::from_option(compare_order(actual, expected, coercion).map(f))
    };

    match cmp.op {
        CompareOp::Eq => Truth::from_option(compare_eq(actual, expected, coercion)),
        CompareOp::Ne => Truth::from_option(compare_eq(actual, expected, coercion)).not(),
        CompareOp::Lt => ordered(Ordering::is_lt),
        CompareOp::Lte => ordered(Ordering::is_le),
        CompareOp::Gt => ordered(Ordering::is_gt),
        CompareOp::Gte => ordered(Ordering::is_ge),
        CompareOp::In => in_list(actual, expected, coercion),
        CompareOp::NotIn => in_list(actual, expected, coercion).not(),
    }
}

// SQL IN: a match is true; otherwise any unknown comparison makes the
// whole test unknown. An empty list matches nothing, NULL included.
fn in_list(actual: &Value, list: &Value, coercion: &CoercionSpec) -> Truth {
    let Some(items) = list.as_list() else {
        return Truth::Unknown;
    };
    if items.is_empty() {
        return Truth::False;
    }

    let mut saw_unknown = false;
    for item in items {
        match compare_eq(actual, item, coercion) {
            Some(true) => return Truth::True,
            Some(false) => {}
            None => saw_unknown = true,
        }
    }

    if saw_unknown {
        Truth::Unknown
    } else {
        Truth::False
    }
}

fn eval_eq_subquery(
    actual: &Value,
    subquery: &SubQuery,
    catalog: &dyn Catalog,
) -> Result<Truth, EvalError> {
    let rows = catalog
        .scan(subquery.table)
        .ok_or_else(|| EvalError::UnknownTable {
            table: subquery.table.to_string(),
        })?;

    let mut selected = Vec::new();
    for row in &rows {
        if eval(*row, &subquery.filter, catalog)? {
            selected.push(read(*row, subquery.column));
        }
    }

    sink::record(MetricsEvent::SubqueryScan {
        rows_scanned: rows.len() as u64,
    });

    match selected.as_slice() {
        // NOTE: An empty scalar sub-query yields NULL.
        [] => Ok(Truth::Unknown),
        [value] => Ok(Truth::from_option(compare_eq(
            actual,
            value,
            &CoercionSpec::default(),
        ))),
        many => Err(EvalError::SubqueryCardinality {
            table: subquery.table.to_string(),
            column: subquery.column.name().to_string(),
            rows: many.len(),
        }),
    }
}
