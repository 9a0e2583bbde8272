//! Name resolution for expression placeholders.
//!
//! [`NameResolver`] is the capability the expression scanner calls for each
//! candidate name. Any `Fn(&str) -> Option<String>` is a resolver. The
//! [`StandardResolver`] implements the default lookup order over an
//! [`Environment`]:
//!
//! 1. `/` and `:` answer the platform path and path-list separators
//! 2. the property store, keyed by the name as written
//! 3. an environment variable named by upper-casing the name and replacing
//!    every character outside `[A-Z0-9]` with `_`
//! 4. for names starting with `env.`, the environment variable named by the
//!    rest of the name

use std::path::MAIN_SEPARATOR;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::expression::properties;

/// Separator between entries of a path list (`PATH`-style variables).
pub const PATH_LIST_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Resolves a single placeholder name. Returns `None` when the name is unknown.
pub trait NameResolver {
    fn resolve_name(&self, name: &str) -> Option<String>;
}

impl<F> NameResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve_name(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Source of properties, environment variables, and path separators.
pub trait Environment {
    /// Looks up a property.
    fn property(&self, key: &str) -> Option<String>;

    /// Looks up an environment variable.
    fn var(&self, key: &str) -> Option<String>;

    /// Separator between path components.
    fn path_separator(&self) -> String {
        MAIN_SEPARATOR.to_string()
    }

    /// Separator between entries of a path list.
    fn path_list_separator(&self) -> String {
        PATH_LIST_SEPARATOR.to_string()
    }
}

/// The running process: the global property store and `std::env`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn property(&self, key: &str) -> Option<String> {
        properties::get_property(key)
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed in-memory environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    properties: FxHashMap<String, String>,
    vars: FxHashMap<String, String>,
    separators: Option<(String, String)>,
}

impl MapEnvironment {
    /// Creates an empty environment with the platform separators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Adds an environment variable.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Overrides the path and path-list separators.
    pub fn with_separators(mut self, path: impl Into<String>, path_list: impl Into<String>) -> Self {
        self.separators = Some((path.into(), path_list.into()));
        self
    }
}

impl Environment for MapEnvironment {
    fn property(&self, key: &str) -> Option<String> {
        self.properties.get(key).cloned()
    }

    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn path_separator(&self) -> String {
        match &self.separators {
            Some((path, _)) => path.clone(),
            None => MAIN_SEPARATOR.to_string(),
        }
    }

    fn path_list_separator(&self) -> String {
        match &self.separators {
            Some((_, path_list)) => path_list.clone(),
            None => PATH_LIST_SEPARATOR.to_string(),
        }
    }
}

/// Default lookup order over an [`Environment`].
#[derive(Debug, Clone, Default)]
pub struct StandardResolver<E = ProcessEnvironment> {
    env: E,
}

impl StandardResolver<ProcessEnvironment> {
    /// Creates a resolver over the running process.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: Environment> StandardResolver<E> {
    /// Creates a resolver over the given environment.
    pub fn with_environment(env: E) -> Self {
        Self { env }
    }

    /// Returns the environment.
    pub fn environment(&self) -> &E {
        &self.env
    }
}

impl<E: Environment> NameResolver for StandardResolver<E> {
    fn resolve_name(&self, name: &str) -> Option<String> {
        match name {
            "/" => return Some(self.env.path_separator()),
            ":" => return Some(self.env.path_list_separator()),
            _ => {}
        }

        if let Some(value) = self.env.property(name) {
            return Some(value);
        }

        let env_key = env_var_key(name);
        if let Some(value) = self.env.var(&env_key) {
            debug!(
                "found environment variable '{}' to resolve the expression name '{}'",
                env_key, name
            );
            return Some(value);
        }

        name.strip_prefix("env.").and_then(|rest| self.env.var(rest))
    }
}

/// Upper-cases `name` and replaces every character outside `[A-Z0-9]` with `_`.
pub fn env_var_key(name: &str) -> String {
    name.chars()
        .map(|c| {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) if u.is_ascii_uppercase() || u.is_ascii_digit() => u,
                _ => '_',
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(env: MapEnvironment) -> StandardResolver<MapEnvironment> {
        StandardResolver::with_environment(env)
    }

    #[test]
    fn test_env_var_key() {
        assert_eq!(env_var_key("foo.bar-baz"), "FOO_BAR_BAZ");
        assert_eq!(env_var_key("Path9"), "PATH9");
        assert_eq!(env_var_key("a b"), "A_B");
        assert_eq!(env_var_key("straße"), "STRA_E");
    }

    #[test]
    fn test_special_names() {
        let r = resolver(MapEnvironment::new().with_separators("/", ":"));
        assert_eq!(r.resolve_name("/"), Some("/".to_string()));
        assert_eq!(r.resolve_name(":"), Some(":".to_string()));

        let win = resolver(MapEnvironment::new().with_separators("\\", ";"));
        assert_eq!(win.resolve_name("/"), Some("\\".to_string()));
        assert_eq!(win.resolve_name(":"), Some(";".to_string()));
    }

    #[test]
    fn test_property_wins_over_env() {
        let r = resolver(
            MapEnvironment::new()
                .with_property("app.home", "/prop")
                .with_var("APP_HOME", "/env"),
        );
        assert_eq!(r.resolve_name("app.home"), Some("/prop".to_string()));
    }

    #[test]
    fn test_derived_env_key() {
        let r = resolver(MapEnvironment::new().with_var("APP_HOME", "/env"));
        assert_eq!(r.resolve_name("app.home"), Some("/env".to_string()));
        assert_eq!(r.resolve_name("other"), None);
    }

    #[test]
    fn test_env_prefix_uses_rest_unmodified() {
        let r = resolver(MapEnvironment::new().with_var("lower_case", "x"));
        assert_eq!(r.resolve_name("env.lower_case"), Some("x".to_string()));
        assert_eq!(r.resolve_name("lower_case"), None);
    }

    #[test]
    fn test_derived_key_checked_before_env_prefix() {
        let r = resolver(
            MapEnvironment::new()
                .with_var("ENV_HOME", "derived")
                .with_var("HOME", "prefixed"),
        );
        assert_eq!(r.resolve_name("env.home"), Some("derived".to_string()));
    }

    #[test]
    fn test_closure_is_a_resolver() {
        let r = |name: &str| (name == "a").then(|| "1".to_string());
        assert_eq!(r.resolve_name("a"), Some("1".to_string()));
        assert_eq!(r.resolve_name("b"), None);
    }

    #[test]
    fn test_process_environment_reads_real_vars() {
        let expected = std::env::var("PATH").ok();
        assert!(expected.is_some());

        let env = ProcessEnvironment;
        assert_eq!(env.var("PATH"), expected);
        assert_eq!(env.var("DMR_SURELY_UNSET_VARIABLE_0x5f3759df"), None);

        let r = StandardResolver::new();
        assert_eq!(r.resolve_name("path"), expected);
        assert_eq!(r.resolve_name("env.PATH"), expected);
    }
}
