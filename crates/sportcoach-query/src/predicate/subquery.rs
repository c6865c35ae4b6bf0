use crate::{
    column::{Column, ColumnRef},
    predicate::Predicate,
};
use std::{fmt, marker::PhantomData};

///
/// SubQuery
///
/// Uncorrelated single-column scalar sub-query:
/// `SELECT <column> FROM <table> [WHERE <filter>]`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubQuery {
    pub table: &'static str,
    pub column: ColumnRef,
    pub filter: Predicate,
}

///
/// Select
///
/// Typed front door for `SubQuery`. The value type of the selected column
/// must match the column it is compared against, which the compiler checks
/// at the call site.
///

pub struct Select<T> {
    inner: SubQuery,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Select<T> {
    #[must_use]
    pub fn new(table: &'static str, column: Column<T>) -> Self {
        Self {
            inner: SubQuery {
                table,
                column: column.column_ref(),
                filter: Predicate::Neutral,
            },
            _marker: PhantomData,
        }
    }

    /// AND another condition into the sub-query's WHERE clause.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        let current = std::mem::replace(&mut self.inner.filter, Predicate::Neutral);
        self.inner.filter = current.and(predicate);
        self
    }

    #[must_use]
    pub fn into_subquery(self) -> SubQuery {
        self.inner
    }
}

impl<T> Clone for Select<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Select<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Select").field(&self.inner).finish()
    }
}
