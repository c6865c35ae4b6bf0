use crate::value::{TextMode, Value};
use std::{cmp::Ordering, mem::discriminant};

///
/// Predicate coercion and comparison semantics
///
/// Defines which runtime value comparisons are permitted under an explicit
/// coercion policy, and how those comparisons behave. `None` from any
/// function here means "not comparable", which evaluation treats as SQL
/// unknown.
///

///
/// CoercionId
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CoercionId {
    Strict,
    TextCasefold,
}

///
/// CoercionSpec
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CoercionSpec {
    pub id: CoercionId,
}

impl CoercionSpec {
    #[must_use]
    pub const fn new(id: CoercionId) -> Self {
        Self { id }
    }
}

impl Default for CoercionSpec {
    fn default() -> Self {
        Self::new(CoercionId::Strict)
    }
}

/// Perform equality comparison under an explicit coercion.
#[must_use]
pub fn compare_eq(left: &Value, right: &Value, coercion: &CoercionSpec) -> Option<bool> {
    if left.is_null() || right.is_null() {
        return None;
    }

    match coercion.id {
        CoercionId::Strict => same_variant(left, right).then(|| left == right),
        CoercionId::TextCasefold => left.text_eq(right, TextMode::Ci),
    }
}

/// Perform ordering comparison under an explicit coercion.
#[must_use]
pub fn compare_order(left: &Value, right: &Value, coercion: &CoercionSpec) -> Option<Ordering> {
    match coercion.id {
        CoercionId::Strict => strict_ordering(left, right),
        CoercionId::TextCasefold => {
            let left = Value::fold_ci(left.as_text()?);
            let right = Value::fold_ci(right.as_text()?);
            Some(left.cmp(&right))
        }
    }
}

fn same_variant(left: &Value, right: &Value) -> bool {
    discriminant(left) == discriminant(right)
}

/// Strict ordering for identical scalar variants.
fn strict_ordering(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Uint(a), Value::Uint(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        _ => {
            // NOTE: Null, lists, and mixed variants have no ordering.
            None
        }
    }
}
