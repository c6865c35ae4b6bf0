use crate::{
    predicate::{CoercionId, CompareOp, ComparePredicate, Predicate, Select},
    value::{FieldValue, Value},
};
use derive_more::Deref;
use std::{fmt, marker::PhantomData};

///
/// ColumnRef
///
/// Untyped handle to a queryable column, optionally qualified by its table.
/// This is what the predicate AST stores; `Column<T>` is the typed front door.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ColumnRef {
    table: Option<&'static str>,
    name: &'static str,
}

impl ColumnRef {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { table: None, name }
    }

    #[must_use]
    pub const fn qualified(table: &'static str, name: &'static str) -> Self {
        Self {
            table: Some(table),
            name,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn table(self) -> Option<&'static str> {
        self.table
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.table {
            Some(table) => write!(f, "{table}.{}", self.name),
            None => f.write_str(self.name),
        }
    }
}

///
/// Column
///
/// Typed column reference. `T` is the Rust type of the column's values;
/// every column is nullable at the SQL level.
///
/// The builder methods here are strict: they always produce the comparison.
/// Null-safe variants live in `conditions`.
///

#[derive(Deref)]
pub struct Column<T> {
    #[deref]
    column: ColumnRef,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Column<T> {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            column: ColumnRef::new(name),
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn qualified(table: &'static str, name: &'static str) -> Self {
        Self {
            column: ColumnRef::qualified(table, name),
            _marker: PhantomData,
        }
    }

    /// Erase the value type.
    #[must_use]
    pub const fn column_ref(&self) -> ColumnRef {
        self.column
    }

    // ------------------------------------------------------------------
    // Structural predicates
    // ------------------------------------------------------------------

    /// Column holds SQL NULL.
    #[must_use]
    pub const fn is_null(&self) -> Predicate {
        Predicate::IsNull {
            column: self.column,
        }
    }

    #[must_use]
    pub const fn is_not_null(&self) -> Predicate {
        Predicate::IsNotNull {
            column: self.column,
        }
    }
}

impl<T: FieldValue> Column<T> {
    // ------------------------------------------------------------------
    // Comparison predicates
    // ------------------------------------------------------------------

    #[must_use]
    pub fn eq(&self, value: &T) -> Predicate {
        self.compare(CompareOp::Eq, value.to_value(), CoercionId::Strict)
    }

    #[must_use]
    pub fn ne(&self, value: &T) -> Predicate {
        self.compare(CompareOp::Ne, value.to_value(), CoercionId::Strict)
    }

    #[must_use]
    pub fn lt(&self, value: &T) -> Predicate {
        self.compare(CompareOp::Lt, value.to_value(), CoercionId::Strict)
    }

    #[must_use]
    pub fn lte(&self, value: &T) -> Predicate {
        self.compare(CompareOp::Lte, value.to_value(), CoercionId::Strict)
    }

    #[must_use]
    pub fn gt(&self, value: &T) -> Predicate {
        self.compare(CompareOp::Gt, value.to_value(), CoercionId::Strict)
    }

    #[must_use]
    pub fn gte(&self, value: &T) -> Predicate {
        self.compare(CompareOp::Gte, value.to_value(), CoercionId::Strict)
    }

    /// Membership test against a fixed list. `None` items bind SQL NULL.
    #[must_use]
    pub fn in_list<I, V>(&self, values: I) -> Predicate
    where
        I: IntoIterator<Item = V>,
        V: Into<Option<T>>,
    {
        self.compare(CompareOp::In, list_value::<T, _, _>(values), CoercionId::Strict)
    }

    #[must_use]
    pub fn not_in_list<I, V>(&self, values: I) -> Predicate
    where
        I: IntoIterator<Item = V>,
        V: Into<Option<T>>,
    {
        self.compare(CompareOp::NotIn, list_value::<T, _, _>(values), CoercionId::Strict)
    }

    /// Column equals the single value produced by a scalar sub-query.
    #[must_use]
    pub fn eq_select(&self, select: Select<T>) -> Predicate {
        Predicate::EqSubquery {
            column: self.column,
            subquery: Box::new(select.into_subquery()),
        }
    }

    fn compare(&self, op: CompareOp, value: Value, coercion: CoercionId) -> Predicate {
        Predicate::Compare(ComparePredicate::with_coercion(
            self.column,
            op,
            value,
            coercion,
        ))
    }
}

impl Column<String> {
    /// Case-insensitive text equality.
    #[must_use]
    pub fn eq_ci(&self, value: &str) -> Predicate {
        self.compare(
            CompareOp::Eq,
            Value::Text(value.to_string()),
            CoercionId::TextCasefold,
        )
    }

    /// Case-insensitive substring match. `value` is matched literally.
    #[must_use]
    pub fn contains_ci(&self, value: &str) -> Predicate {
        Predicate::TextContainsCi {
            column: self.column,
            value: Value::Text(value.to_string()),
        }
    }
}

// Manual impls so `Column<T>` is `Copy` for every `T`.
impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Column<T> {}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Column").field(&self.column).finish()
    }
}

impl<T> From<Column<T>> for ColumnRef {
    fn from(column: Column<T>) -> Self {
        column.column
    }
}

fn list_value<T, I, V>(values: I) -> Value
where
    T: FieldValue,
    I: IntoIterator<Item = V>,
    V: Into<Option<T>>,
{
    Value::List(
        values
            .into_iter()
            .map(|v| Into::<Option<T>>::into(v).to_value())
            .collect(),
    )
}
