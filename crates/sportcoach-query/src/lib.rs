//! Null-safe SQL conditions for the SportCoach backend: typed columns, a
//! predicate AST with a neutral "no condition" element, SQL rendering with
//! bound parameters, and an in-memory evaluator that follows SQL semantics.
//!
//! Most callers only need the `prelude` and the helpers in `conditions`.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod column;
pub mod conditions;
pub mod config;
pub mod error;
pub mod obs;
pub mod predicate;
pub mod render;
pub mod value;

///
/// Prelude
///
/// Prelude contains only condition-building vocabulary.
/// No errors, evaluators, or metrics are re-exported here.
///

pub mod prelude {
    pub use crate::{
        column::{Column, ColumnRef},
        conditions::{self, no_condition},
        config::RenderConfig,
        predicate::{Predicate, Select},
        render::{Dialect, RenderedCondition, render},
        value::{FieldValue, Value},
    };
}
