//! Null-safe condition helpers.
//!
//! Every helper takes its filter value as an `Option`. When the value is
//! absent the helper returns [`no_condition`], which composition drops, so
//! an unset filter never narrows (or breaks) the query it is folded into.
//!
//! ```ignore
//! let filter = and_all([
//!     eq(ATHLETE_TEAM, form.team_id),
//!     contains_ignore_case(ATHLETE_NAME, form.search.as_deref()),
//!     within_columns(form.on_date, CONTRACT_FROM, CONTRACT_TO),
//! ]);
//! ```


use crate::{
    column::Column,
    predicate::{Predicate, Select},
    value::FieldValue,
};

/// The neutral condition: "no filter applied".
///
/// It is the identity for both [`and`] and [`or`]. Under OR this is not
/// `Predicate::False`: the same value means "skip this filter" under
/// either connective.
#[must_use]
pub const fn no_condition() -> Predicate {
    Predicate::Neutral
}

// ----------------------------------------------------------------------
// Comparison
// ----------------------------------------------------------------------

/// `column = value`, or no condition when `value` is absent.
#[must_use]
pub fn eq<T: FieldValue>(column: Column<T>, value: Option<T>) -> Predicate {
    value.map_or_else(no_condition, |v| column.eq(&v))
}

/// `column = value`, or `column IS NULL` when `value` is absent.
#[must_use]
pub fn eq_or_null<T: FieldValue>(column: Column<T>, value: Option<T>) -> Predicate {
    value.map_or_else(|| column.is_null(), |v| column.eq(&v))
}

/// Case-insensitive `column = value`, or no condition when `value` is absent.
#[must_use]
pub fn eq_ignore_case(column: Column<String>, value: Option<&str>) -> Predicate {
    value.map_or_else(no_condition, |v| column.eq_ci(v))
}

/// `column <> value`, or no condition when `value` is absent.
#[must_use]
pub fn ne<T: FieldValue>(column: Column<T>, value: Option<T>) -> Predicate {
    value.map_or_else(no_condition, |v| column.ne(&v))
}

/// Case-insensitive substring search for `value` anywhere in `column`.
///
/// The term is matched literally: LIKE wildcards inside it are escaped when
/// rendered. No condition when `value` is absent.
#[must_use]
pub fn contains_ignore_case(column: Column<String>, value: Option<&str>) -> Predicate {
    value.map_or_else(no_condition, |v| column.contains_ci(v))
}

/// `column >= value`, or no condition when `value` is absent.
#[must_use]
pub fn gte<T: FieldValue>(column: Column<T>, value: Option<T>) -> Predicate {
    value.map_or_else(no_condition, |v| column.gte(&v))
}

/// `column <= value`, or no condition when `value` is absent.
#[must_use]
pub fn lte<T: FieldValue>(column: Column<T>, value: Option<T>) -> Predicate {
    value.map_or_else(no_condition, |v| column.lte(&v))
}

/// `column = (SELECT ...)`. The sub-query is always present, so this is
/// never neutral.
#[must_use]
pub fn eq_select<T: FieldValue>(column: Column<T>, select: Select<T>) -> Predicate {
    column.eq_select(select)
}

// ----------------------------------------------------------------------
// Membership
// ----------------------------------------------------------------------

/// `column IN (values)`.
///
/// No condition when `values` is `None` or yields nothing. Items may be
/// `T` or `Option<T>`; `None` items bind SQL NULL.
#[must_use]
pub fn in_list<T, I, V>(column: Column<T>, values: Option<I>) -> Predicate
where
    T: FieldValue,
    I: IntoIterator<Item = V>,
    V: Into<Option<T>>,
{
    membership(values, |items| column.in_list(items))
}

/// `column NOT IN (values)`, with the same absence rules as [`in_list`].
#[must_use]
pub fn not_in_list<T, I, V>(column: Column<T>, values: Option<I>) -> Predicate
where
    T: FieldValue,
    I: IntoIterator<Item = V>,
    V: Into<Option<T>>,
{
    membership(values, |items| column.not_in_list(items))
}

fn membership<I, V>(values: Option<I>, build: impl FnOnce(Vec<V>) -> Predicate) -> Predicate
where
    I: IntoIterator<Item = V>,
{
    let items: Vec<V> = values.into_iter().flatten().collect();
    if items.is_empty() {
        return no_condition();
    }

    build(items)
}

// ----------------------------------------------------------------------
// Ranges
// ----------------------------------------------------------------------

/// `from_column <= value AND to_column >= value`: the value lies within the
/// range stored on the row.
///
/// Only `value` is optional; the bounding columns are schema columns.
#[must_use]
pub fn within_columns<T: FieldValue>(
    value: Option<T>,
    from_column: Column<T>,
    to_column: Column<T>,
) -> Predicate {
    value.map_or_else(no_condition, |v| {
        from_column.lte(&v).and(to_column.gte(&v))
    })
}

/// `from_column > value OR to_column < value`: the value lies outside the
/// range stored on the row.
#[must_use]
pub fn outside_columns<T: FieldValue>(
    value: Option<T>,
    from_column: Column<T>,
    to_column: Column<T>,
) -> Predicate {
    value.map_or_else(no_condition, |v| {
        from_column.gt(&v).or(to_column.lt(&v))
    })
}

/// `column <= to AND column >= from`.
///
/// Both bounds are required. If either is absent the whole range is
/// dropped; no open-ended range is produced.
#[must_use]
pub fn between<T: FieldValue>(column: Column<T>, from: Option<T>, to: Option<T>) -> Predicate {
    match (from, to) {
        (Some(from), Some(to)) => column.lte(&to).and(column.gte(&from)),
        _ => no_condition(),
    }
}

// ----------------------------------------------------------------------
// Composition
// ----------------------------------------------------------------------

/// `left AND right`.
#[must_use]
pub fn and(left: Predicate, right: Predicate) -> Predicate {
    left.and(right)
}

/// `left OR right`.
#[must_use]
pub fn or(left: Predicate, right: Predicate) -> Predicate {
    left.or(right)
}

/// AND over all `conditions`; no condition when there are none.
#[must_use]
pub fn and_all(conditions: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::all(conditions)
}

/// OR over all `conditions`; no condition when there are none.
#[must_use]
pub fn or_all(conditions: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::any(conditions)
}
