//! Predicate AST, composition, normalization, and in-memory evaluation.

mod ast;
mod coercion;
mod eval;
mod normalize;
mod subquery;

#[cfg(test)]
mod tests;

pub use ast::{CompareOp, ComparePredicate, Predicate};
pub use coercion::{CoercionId, CoercionSpec, compare_eq, compare_order};
pub use eval::{Catalog, NoCatalog, Row, eval, filter_rows};
pub use normalize::normalize;
pub use subquery::{Select, SubQuery};
