use crate::{
    column::ColumnRef,
    predicate::{
        coercion::{CoercionId, CoercionSpec},
        subquery::SubQuery,
    },
    value::Value,
};
use std::ops::{BitAnd, BitOr};

///
/// Predicate AST
///
/// Pure representation of filter conditions. Composition through the
/// methods and operators below is neutral-aware; the raw variants are
/// still public so evaluators, renderers, and tests can match on them.
///

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
}

impl CompareOp {
    /// SQL operator token.
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
        }
    }
}

///
/// ComparePredicate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComparePredicate {
    pub column: ColumnRef,
    pub op: CompareOp,
    pub value: Value,
    pub coercion: CoercionSpec,
}

impl ComparePredicate {
    /// Construct a comparison predicate with an explicit coercion policy.
    #[must_use]
    pub const fn with_coercion(
        column: ColumnRef,
        op: CompareOp,
        value: Value,
        coercion: CoercionId,
    ) -> Self {
        Self {
            column,
            op,
            value,
            coercion: CoercionSpec::new(coercion),
        }
    }
}

///
/// Predicate
///
/// `Neutral` is the "no condition" element: composition drops it, and a
/// predicate that is nothing but `Neutral` keeps every row. It is reused as
/// the identity for both AND and OR. `True` and `False` are ordinary
/// boolean constants and get no such treatment.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Predicate {
    Neutral,
    True,
    False,
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Compare(ComparePredicate),
    IsNull {
        column: ColumnRef,
    },
    IsNotNull {
        column: ColumnRef,
    },
    /// Case-insensitive substring match; `value` is the literal search term.
    TextContainsCi {
        column: ColumnRef,
        value: Value,
    },
    EqSubquery {
        column: ColumnRef,
        subquery: Box<SubQuery>,
    },
}

///
/// Junction
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Junction {
    And,
    Or,
}

impl Predicate {
    #[must_use]
    pub const fn is_neutral(&self) -> bool {
        matches!(self, Self::Neutral)
    }

    /// Combine with `rhs` under AND.
    #[must_use]
    pub fn and(self, rhs: Self) -> Self {
        combine(Junction::And, [self, rhs])
    }

    /// Combine with `rhs` under OR.
    #[must_use]
    pub fn or(self, rhs: Self) -> Self {
        combine(Junction::Or, [self, rhs])
    }

    /// AND over any number of predicates; `Neutral` when there are none.
    #[must_use]
    pub fn all(preds: impl IntoIterator<Item = Self>) -> Self {
        combine(Junction::And, preds)
    }

    /// OR over any number of predicates; `Neutral` when there are none.
    #[must_use]
    pub fn any(preds: impl IntoIterator<Item = Self>) -> Self {
        combine(Junction::Or, preds)
    }

    /// Negate. Negating `Neutral` leaves it neutral.
    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(pred: Self) -> Self {
        match pred {
            Self::Neutral => Self::Neutral,
            other => Self::Not(Box::new(other)),
        }
    }
}

// Fold operands into one junction: drop neutral operands, splice children of
// same-kind junctions, and collapse zero or one survivor.
fn combine(junction: Junction, preds: impl IntoIterator<Item = Predicate>) -> Predicate {
    let mut children = Vec::new();

    for pred in preds {
        match (junction, pred) {
            (_, Predicate::Neutral) => {}
            // Raw empty junctions are constants (true / false); keep them as operands.
            (Junction::And, Predicate::And(inner)) | (Junction::Or, Predicate::Or(inner))
                if !inner.is_empty() =>
            {
                children.extend(inner);
            }
            (_, other) => children.push(other),
        }
    }

    match children.len() {
        0 => Predicate::Neutral,
        1 => children.pop().unwrap_or(Predicate::Neutral),
        _ => match junction {
            Junction::And => Predicate::And(children),
            Junction::Or => Predicate::Or(children),
        },
    }
}

impl BitAnd for Predicate {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl BitAnd for &Predicate {
    type Output = Predicate;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.clone().and(rhs.clone())
    }
}

impl BitOr for Predicate {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl BitOr for &Predicate {
    type Output = Predicate;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.clone().or(rhs.clone())
    }
}
