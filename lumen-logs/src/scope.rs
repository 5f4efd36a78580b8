//! Instrumentation scope identity.
//!
//! An [`InstrumentationScope`] names the logical library or component that
//! produced a record (name, version, schema URL, attributes). Equality is
//! value based: the provider caches exactly one logger per unique scope.

use serde::{Deserialize, Serialize};

use crate::value::KeyValue;

/// The identity of the library or component producing log records.
///
/// Used as the cache key for per-scope loggers; two scopes with equal
/// fields resolve to the same logger instance for a provider's lifetime.
///
/// # Examples
///
/// ```rust
/// use lumen_logs::{InstrumentationScope, KeyValue};
///
/// let scope = InstrumentationScope::builder("my-library")
///     .version("1.2.3")
///     .attribute(KeyValue::new("module", "auth"))
///     .build();
///
/// assert_eq!(scope.name(), "my-library");
/// assert_eq!(scope.version(), Some("1.2.3"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrumentationScope {
    name: String,
    version: Option<String>,
    schema_url: Option<String>,
    attributes: Vec<KeyValue>,
}

impl InstrumentationScope {
    /// Creates a builder for a scope with the given name.
    pub fn builder(name: impl Into<String>) -> InstrumentationScopeBuilder {
        InstrumentationScopeBuilder {
            scope: InstrumentationScope {
                name: name.into(),
                version: None,
                schema_url: None,
                attributes: Vec::new(),
            },
        }
    }

    /// The scope name, such as a library, package, or class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version of the instrumented library, if any.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The schema URL the emitted records conform to, if any.
    pub fn schema_url(&self) -> Option<&str> {
        self.schema_url.as_deref()
    }

    /// Scope-level attributes.
    pub fn attributes(&self) -> &[KeyValue] {
        &self.attributes
    }
}

/// Builder for [`InstrumentationScope`].
#[derive(Clone, Debug)]
#[must_use]
pub struct InstrumentationScopeBuilder {
    scope: InstrumentationScope,
}

impl InstrumentationScopeBuilder {
    /// Sets the scope version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.scope.version = Some(version.into());
        self
    }

    /// Sets the schema URL.
    pub fn schema_url(mut self, schema_url: impl Into<String>) -> Self {
        self.scope.schema_url = Some(schema_url.into());
        self
    }

    /// Appends a scope-level attribute.
    pub fn attribute(mut self, attribute: KeyValue) -> Self {
        self.scope.attributes.push(attribute);
        self
    }

    /// Builds the scope.
    pub fn build(self) -> InstrumentationScope {
        self.scope
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn equality_is_value_based() {
        let build = || {
            InstrumentationScope::builder("lib")
                .version("0.1.0")
                .attribute(KeyValue::new("weight", 0.5))
                .build()
        };

        assert_eq!(build(), build());
        assert_ne!(build(), InstrumentationScope::builder("lib").build());
    }

    #[test]
    fn usable_as_map_key() {
        let mut map = HashMap::new();
        map.insert(InstrumentationScope::builder("a").build(), 1);
        map.insert(InstrumentationScope::builder("b").build(), 2);

        assert_eq!(map[&InstrumentationScope::builder("a").build()], 1);
        assert_eq!(map.len(), 2);
    }
}
