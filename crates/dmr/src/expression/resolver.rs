//! Single-pass expression scanner.

use crate::error::ExpressionError;
use crate::expression::{Expression, NameResolver, StandardResolver};

/// Scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Copying literal text.
    Initial,
    /// Saw `$`.
    GotDollar,
    /// Inside `${`, collecting a candidate name.
    InName,
    /// A name resolved; skipping to the closing brace.
    Resolved,
    /// Collecting default text after `:`.
    InDefault,
}

/// Resolves `${...}` placeholders using a [`NameResolver`].
///
/// Resolution is a pure function of the input and whatever the name
/// resolver answers at call time; nothing is cached.
#[derive(Debug, Clone, Default)]
pub struct ExpressionResolver<N = StandardResolver> {
    names: N,
}

impl ExpressionResolver<StandardResolver> {
    /// Resolver over the process properties and environment.
    pub fn standard() -> Self {
        Self::new(StandardResolver::new())
    }
}

impl<N: NameResolver> ExpressionResolver<N> {
    /// Creates a resolver that looks names up with `names`.
    pub fn new(names: N) -> Self {
        Self { names }
    }

    /// Returns the name resolver.
    pub fn names(&self) -> &N {
        &self.names
    }

    /// Resolves an expression.
    pub fn resolve(&self, expression: &Expression) -> Result<String, ExpressionError> {
        self.resolve_str(expression.as_str())
    }

    /// Resolves raw expression text.
    ///
    /// Placeholder braces may nest; nested content is kept as literal text
    /// and is never resolved itself.
    pub fn resolve_str(&self, value: &str) -> Result<String, ExpressionError> {
        let mut out = String::with_capacity(value.len());
        let mut state = State::Initial;
        // Byte offset of the placeholder body, later of the default text.
        let mut start = 0usize;
        let mut name_start = 0usize;
        let mut nest = 0usize;

        for (i, ch) in value.char_indices() {
            match state {
                State::Initial => {
                    if ch == '$' {
                        state = State::GotDollar;
                    } else {
                        out.push(ch);
                    }
                }
                State::GotDollar => match ch {
                    '$' => {
                        out.push('$');
                        state = State::Initial;
                    }
                    '{' => {
                        start = i + 1;
                        name_start = start;
                        state = State::InName;
                    }
                    _ => {
                        // Not an escape; keep both characters.
                        out.push('$');
                        out.push(ch);
                        state = State::Initial;
                    }
                },
                State::InName => match ch {
                    '{' => nest += 1,
                    // A leading ':' is part of the name.
                    ':' if name_start == i => {}
                    '}' | ',' | ':' => {
                        if nest > 0 {
                            if ch == '}' {
                                nest -= 1;
                            }
                            continue;
                        }
                        let name = value[name_start..i].trim();
                        match self.names.resolve_name(name) {
                            Some(resolved) if resolved != value => {
                                out.push_str(&resolved);
                                state = if ch == '}' {
                                    State::Initial
                                } else {
                                    State::Resolved
                                };
                            }
                            _ if ch == ',' => name_start = i + 1,
                            _ if ch == ':' => {
                                start = i + 1;
                                state = State::InDefault;
                            }
                            _ => {
                                return Err(ExpressionError::Unresolved {
                                    expression: value[start - 2..=i].to_string(),
                                });
                            }
                        }
                    }
                    _ => {}
                },
                State::Resolved => match ch {
                    '{' => nest += 1,
                    '}' if nest > 0 => nest -= 1,
                    '}' => state = State::Initial,
                    _ => {}
                },
                State::InDefault => match ch {
                    '{' => nest += 1,
                    '}' if nest > 0 => nest -= 1,
                    '}' => {
                        out.push_str(&value[start..i]);
                        state = State::Initial;
                    }
                    _ => {}
                },
            }
        }

        match state {
            State::GotDollar => out.push('$'),
            State::InDefault => out.push_str(&value[start..]),
            State::InName => return Err(ExpressionError::Malformed { partial: out }),
            State::Initial | State::Resolved => {}
        }
        Ok(out)
    }
}
