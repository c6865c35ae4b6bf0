//! SQL rendering of predicates with bound parameters.


use crate::{
    column::ColumnRef,
    config::RenderConfig,
    obs::sink::{self, MetricsEvent},
    predicate::{CoercionId, CompareOp, ComparePredicate, Predicate, SubQuery},
    value::Value,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

///
/// CONSTANTS
///

const SQL_TRUE: &str = "1 = 1";
const SQL_FALSE: &str = "1 = 0";

///
/// Dialect
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `$1` placeholders and native `ILIKE`.
    #[default]
    #[display("postgres")]
    Postgres,

    /// `?` placeholders and `lower(..) LIKE lower(..)`, for engines without
    /// `ILIKE` (SQLite, MySQL/MariaDB, H2). Backslash is a string escape in
    /// MySQL literals, so the default LIKE escape here is `!`.
    #[display("generic")]
    Generic,
}

impl Dialect {
    /// LIKE escape character used when the config does not set one.
    #[must_use]
    pub const fn default_like_escape(self) -> char {
        match self {
            Self::Postgres => '\\',
            Self::Generic => '!',
        }
    }
}

///
/// RenderedCondition
///
/// SQL text for one condition plus the values bound to its placeholders,
/// in placeholder order.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderedCondition {
    pub sql: String,
    pub params: Vec<Value>,

    /// The condition filters nothing; callers may omit the WHERE clause.
    pub neutral: bool,
}

impl RenderedCondition {
    /// `WHERE <sql>`, or `None` for a neutral condition.
    #[must_use]
    pub fn where_clause(&self) -> Option<String> {
        (!self.neutral).then(|| format!("WHERE {}", self.sql))
    }
}

/// Render a predicate to SQL with placeholders.
#[must_use]
pub fn render(predicate: &Predicate, config: &RenderConfig) -> RenderedCondition {
    let mut writer = SqlWriter::new(config, Binding::Placeholders);
    writer.predicate(predicate);

    let neutral = is_effectively_neutral(predicate);
    let rendered = RenderedCondition {
        sql: writer.sql,
        params: writer.params,
        neutral,
    };

    log::debug!(
        "rendered condition: dialect={} params={} neutral={}",
        config.dialect,
        rendered.params.len(),
        neutral
    );
    log::trace!("{}", rendered.sql);

    sink::record(MetricsEvent::Render {
        dialect: config.dialect,
        params: rendered.params.len() as u64,
        neutral,
    });

    rendered
}

/// Escape LIKE wildcards in a literal search term.
#[must_use]
pub fn escape_like(term: &str, escape: char) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if ch == '%' || ch == '_' || ch == escape {
            out.push(escape);
        }
        out.push(ch);
    }

    out
}

/// Diagnostic rendering with inline literals and the default config.
impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = RenderConfig::default();
        let mut writer = SqlWriter::new(&config, Binding::Inline);
        writer.predicate(self);

        f.write_str(&writer.sql)
    }
}

// A tree with no non-neutral leaf filters nothing.
fn is_effectively_neutral(predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Neutral => true,
        Predicate::And(children) | Predicate::Or(children) => {
            !children.is_empty() && children.iter().all(is_effectively_neutral)
        }
        Predicate::Not(inner) => is_effectively_neutral(inner),
        _ => false,
    }
}

///
/// Binding
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Binding {
    Placeholders,
    Inline,
}

///
/// SqlWriter
///

struct SqlWriter<'a> {
    config: &'a RenderConfig,
    binding: Binding,
    sql: String,
    params: Vec<Value>,
}

impl<'a> SqlWriter<'a> {
    const fn new(config: &'a RenderConfig, binding: Binding) -> Self {
        Self {
            config,
            binding,
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn predicate(&mut self, predicate: &Predicate) {
        match predicate {
            Predicate::Neutral | Predicate::True => self.sql.push_str(SQL_TRUE),
            Predicate::False => self.sql.push_str(SQL_FALSE),
            Predicate::And(children) => self.junction(children, "AND", SQL_TRUE),
            Predicate::Or(children) => self.junction(children, "OR", SQL_FALSE),
            Predicate::Not(inner) => {
                if is_effectively_neutral(inner) {
                    self.sql.push_str(SQL_TRUE);
                } else {
                    self.sql.push_str("NOT (");
                    self.predicate(inner);
                    self.sql.push(')');
                }
            }
            Predicate::Compare(cmp) => self.compare(cmp),
            Predicate::IsNull { column } => {
                self.column(*column);
                self.sql.push_str(" IS NULL");
            }
            Predicate::IsNotNull { column } => {
                self.column(*column);
                self.sql.push_str(" IS NOT NULL");
            }
            Predicate::TextContainsCi { column, value } => self.contains_ci(*column, value),
            Predicate::EqSubquery { column, subquery } => {
                self.column(*column);
                self.sql.push_str(" = ");
                self.subquery(subquery);
            }
        }
    }

    // Raw empty junctions render their identity constant; neutral children
    // are skipped; an all-neutral junction renders as no condition.
    fn junction(&mut self, children: &[Predicate], keyword: &str, empty: &str) {
        if children.is_empty() {
            self.sql.push_str(empty);
            return;
        }

        let active: Vec<&Predicate> = children
            .iter()
            .filter(|child| !is_effectively_neutral(child))
            .collect();
        if active.is_empty() {
            self.sql.push_str(SQL_TRUE);
            return;
        }

        for (idx, child) in active.into_iter().enumerate() {
            if idx > 0 {
                let _ = write!(self.sql, " {keyword} ");
            }

            if matches!(child, Predicate::And(_) | Predicate::Or(_)) {
                self.sql.push('(');
                self.predicate(child);
                self.sql.push(')');
            } else {
                self.predicate(child);
            }
        }
    }

    fn compare(&mut self, cmp: &ComparePredicate) {
        if let CompareOp::In | CompareOp::NotIn = cmp.op {
            self.membership(cmp);
            return;
        }

        match cmp.coercion.id {
            CoercionId::Strict => {
                self.column(cmp.column);
                let _ = write!(self.sql, " {} ", cmp.op.sql());
                self.bind(cmp.value.clone());
            }
            CoercionId::TextCasefold => {
                self.sql.push_str("lower(");
                self.column(cmp.column);
                let _ = write!(self.sql, ") {} lower(", cmp.op.sql());
                self.bind(cmp.value.clone());
                self.sql.push(')');
            }
        }
    }

    fn membership(&mut self, cmp: &ComparePredicate) {
        let items = match &cmp.value {
            Value::List(items) => items.as_slice(),
            other => std::slice::from_ref(other),
        };

        // Empty IN lists are not valid SQL; substitute the constant outcome.
        if items.is_empty() {
            let constant = if cmp.op == CompareOp::In {
                SQL_FALSE
            } else {
                SQL_TRUE
            };
            self.sql.push_str(constant);
            return;
        }

        let casefold = cmp.coercion.id == CoercionId::TextCasefold;
        if casefold {
            self.sql.push_str("lower(");
            self.column(cmp.column);
            self.sql.push(')');
        } else {
            self.column(cmp.column);
        }

        let _ = write!(self.sql, " {} (", cmp.op.sql());
        for (idx, item) in items.iter().enumerate() {
            if idx > 0 {
                self.sql.push_str(", ");
            }
            if casefold {
                self.sql.push_str("lower(");
                self.bind(item.clone());
                self.sql.push(')');
            } else {
                self.bind(item.clone());
            }
        }
        self.sql.push(')');
    }

    fn contains_ci(&mut self, column: ColumnRef, value: &Value) {
        let escape = self.config.like_escape_char();
        let pattern = match value {
            Value::Text(term) => Value::Text(format!("%{}%", escape_like(term, escape))),
            other => other.clone(),
        };

        match self.config.dialect {
            Dialect::Postgres => {
                self.column(column);
                self.sql.push_str(" ILIKE ");
                self.bind(pattern);
            }
            Dialect::Generic => {
                self.sql.push_str("lower(");
                self.column(column);
                self.sql.push_str(") LIKE lower(");
                self.bind(pattern);
                self.sql.push(')');
            }
        }

        let _ = write!(self.sql, " ESCAPE '{}'", quote_text(&escape.to_string()));
    }

    fn subquery(&mut self, subquery: &SubQuery) {
        self.sql.push_str("(SELECT ");
        self.column(subquery.column);
        let _ = write!(self.sql, " FROM {}", subquery.table);

        if !is_effectively_neutral(&subquery.filter) {
            self.sql.push_str(" WHERE ");
            self.predicate(&subquery.filter);
        }
        self.sql.push(')');
    }

    fn column(&mut self, column: ColumnRef) {
        if self.config.qualify_columns {
            let _ = write!(self.sql, "{column}");
        } else {
            self.sql.push_str(column.name());
        }
    }

    fn bind(&mut self, value: Value) {
        match self.binding {
            Binding::Inline => write_literal(&mut self.sql, &value),
            Binding::Placeholders => {
                self.params.push(value);
                match self.config.dialect {
                    Dialect::Postgres => {
                        let _ = write!(self.sql, "${}", self.params.len());
                    }
                    Dialect::Generic => self.sql.push('?'),
                }
            }
        }
    }
}

fn quote_text(text: &str) -> String {
    text.replace('\'', "''")
}

fn write_literal(out: &mut String, value: &Value) {
    let _ = match value {
        Value::Null => write!(out, "NULL"),
        Value::Bool(true) => write!(out, "TRUE"),
        Value::Bool(false) => write!(out, "FALSE"),
        Value::Int(v) => write!(out, "{v}"),
        Value::Uint(v) => write!(out, "{v}"),
        Value::Text(v) => write!(out, "'{}'", quote_text(v)),
        Value::Date(v) => write!(out, "DATE '{}'", v.format("%Y-%m-%d")),
        Value::DateTime(v) => write!(out, "TIMESTAMP '{}'", v.format("%Y-%m-%d %H:%M:%S%.f")),
        Value::Timestamp(v) => write!(
            out,
            "TIMESTAMP WITH TIME ZONE '{}'",
            v.format("%Y-%m-%d %H:%M:%S%.f%:z")
        ),
        Value::List(items) => {
            out.push('(');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                write_literal(out, item);
            }
            out.push(')');
            Ok(())
        }
    };
}
