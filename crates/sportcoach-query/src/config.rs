use crate::{error::ConfigError, render::Dialect};
use serde::Deserialize;

///
/// RenderConfig
///
/// How predicates are turned into SQL text. Every field has a default, so
/// an empty TOML document is a valid configuration.
///
/// ```toml
/// dialect = "generic"
/// like_escape = "!"
/// qualify_columns = false
/// ```
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub dialect: Dialect,

    /// Escape character for LIKE patterns built from user search terms.
    /// `None` uses the dialect's default.
    pub like_escape: Option<char>,

    /// Render `table.column` for columns that carry a table.
    pub qualify_columns: bool,
}

impl RenderConfig {
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            like_escape: None,
            qualify_columns: true,
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;

        Ok(config)
    }

    /// The LIKE escape character in effect.
    #[must_use]
    pub const fn like_escape_char(&self) -> char {
        match self.like_escape {
            Some(escape) => escape,
            None => self.dialect.default_like_escape(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.like_escape_char() {
            escape @ ('%' | '_' | '\'') => Err(ConfigError::InvalidLikeEscape { escape }),
            _ => Ok(()),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}
