use thiserror::Error as ThisError;

///
/// EvalError
///
/// Failures while evaluating a predicate against in-memory rows.
/// Only sub-query nodes can fail; plain conditions always evaluate.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum EvalError {
    #[error("sub-query references unknown table '{table}'")]
    UnknownTable { table: String },

    #[error("scalar sub-query on '{table}.{column}' returned {rows} rows; expected at most one")]
    SubqueryCardinality {
        table: String,
        column: String,
        rows: usize,
    },
}

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid render config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("'{escape}' cannot be used as the LIKE escape character")]
    InvalidLikeEscape { escape: char },
}
