//! `${name[,name...][:default]}` expressions.
//!
//! An [`Expression`] is an immutable raw string. Resolving it scans the text
//! once, replacing each placeholder with the first alternative name that
//! resolves, or with its default text. `$$` is an escaped `$`.
//!
//! Name lookup is a pluggable [`NameResolver`]; the [`StandardResolver`]
//! consults the process property store, then environment variables.
//!
//! ```rust
//! use dmr::expression::{Expression, ExpressionResolver};
//!
//! let resolver = ExpressionResolver::new(|name: &str| {
//!     (name == "user").then(|| "alice".to_string())
//! });
//! let expr = Expression::new("hello ${user}, cost $$5, ${missing:none}");
//! assert_eq!(resolver.resolve(&expr).unwrap(), "hello alice, cost $5, none");
//! ```

pub mod names;
pub mod properties;
mod resolver;

use std::fmt;

pub use names::{
    env_var_key, Environment, MapEnvironment, NameResolver, ProcessEnvironment, StandardResolver,
    PATH_LIST_SEPARATOR,
};
pub use properties::{get_property, remove_property, set_property};
pub use resolver::ExpressionResolver;

use crate::error::ExpressionError;
use crate::model::Value;

/// Raw expression text, possibly containing `${...}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expression(String);

impl Expression {
    /// Wraps raw expression text.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw, unresolved text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves against the process properties and environment.
    pub fn resolve(&self) -> Result<String, ExpressionError> {
        ExpressionResolver::standard().resolve(self)
    }

    /// Resolves with the given resolver.
    pub fn resolve_with<N: NameResolver>(
        &self,
        resolver: &ExpressionResolver<N>,
    ) -> Result<String, ExpressionError> {
        resolver.resolve(self)
    }
}

impl From<&str> for Expression {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Expression {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Value {
    /// Returns a copy with every expression replaced by its resolved string.
    ///
    /// Lists, objects, and properties are resolved recursively. The first
    /// expression that fails aborts the whole call.
    pub fn resolve<N: NameResolver>(
        &self,
        resolver: &ExpressionResolver<N>,
    ) -> Result<Value, ExpressionError> {
        Ok(match self {
            Value::Expression(e) => Value::String(resolver.resolve(e)?),
            Value::List(items) => Value::List(
                items
                    .iter()
                    .map(|v| v.resolve(resolver))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), v.resolve(resolver)?)))
                    .collect::<Result<_, ExpressionError>>()?,
            ),
            Value::Property { name, value } => Value::Property {
                name: name.clone(),
                value: Box::new(value.resolve(resolver)?),
            },
            other => other.clone(),
        })
    }
}
