//! The immutable description of the entity producing log records.

use serde::{Deserialize, Serialize};

use crate::value::{KeyValue, Value};

/// The attribute key naming the producing service.
pub const SERVICE_NAME: &str = "service.name";

const UNKNOWN_SERVICE: &str = "unknown_service";

/// An immutable key-value attribute set describing the producing entity
/// (service name, version, host, ...).
///
/// Built once at provider construction and shared by reference across all
/// loggers of that provider; never mutated afterwards.
///
/// # Examples
///
/// ```rust
/// use lumen_logs::{KeyValue, Resource};
///
/// let resource = Resource::builder()
///     .attribute(KeyValue::new("service.name", "checkout"))
///     .attribute(KeyValue::new("service.version", "2.1.0"))
///     .build();
///
/// assert_eq!(resource.get("service.name").unwrap().to_string(), "\"checkout\"");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    attributes: Vec<KeyValue>,
}

impl Resource {
    /// Creates a builder for a resource.
    pub fn builder() -> ResourceBuilder {
        ResourceBuilder {
            attributes: Vec::new(),
        }
    }

    /// Returns the resource attributes.
    pub fn attributes(&self) -> &[KeyValue] {
        &self.attributes
    }

    /// Looks up an attribute value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|attribute| attribute.key == key)
            .map(|attribute| &attribute.value)
    }
}

impl Default for Resource {
    /// A resource identifying an unnamed service
    /// (`service.name = "unknown_service"`).
    fn default() -> Self {
        Resource::builder()
            .attribute(KeyValue::new(SERVICE_NAME, UNKNOWN_SERVICE))
            .build()
    }
}

/// Builder for [`Resource`].
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct ResourceBuilder {
    attributes: Vec<KeyValue>,
}

impl ResourceBuilder {
    /// Adds an attribute, replacing any earlier value for the same key.
    pub fn attribute(mut self, attribute: KeyValue) -> Self {
        self.attributes
            .retain(|existing| existing.key != attribute.key);
        self.attributes.push(attribute);
        self
    }

    /// Adds all of the given attributes, later keys winning.
    pub fn attributes(self, attributes: impl IntoIterator<Item = KeyValue>) -> Self {
        attributes
            .into_iter()
            .fold(self, |builder, attribute| builder.attribute(attribute))
    }

    /// Builds the resource.
    pub fn build(self) -> Resource {
        Resource {
            attributes: self.attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_resource_names_an_unknown_service() {
        let resource = Resource::default();
        assert_eq!(
            resource.get(SERVICE_NAME),
            Some(&Value::String(UNKNOWN_SERVICE.into()))
        );
    }

    #[test]
    fn later_attributes_replace_earlier_keys() {
        let resource = Resource::builder()
            .attribute(KeyValue::new("host.name", "a"))
            .attribute(KeyValue::new("host.name", "b"))
            .build();

        assert_eq!(resource.get("host.name"), Some(&Value::String("b".into())));
        assert_eq!(resource.attributes().len(), 1);
    }
}
