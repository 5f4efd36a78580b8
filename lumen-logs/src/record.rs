//! Log record data model.
//!
//! A [`LogRecord`] is what producers hand to a [`Logger`] and what backend
//! processors receive. Producers fill in severity, body, attributes, and
//! optionally an event timestamp; the emitting logger stamps the observed
//! timestamp and attaches the provider resource and the emitting scope
//! before fan-out.
//!
//! [`Logger`]: crate::Logger

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::resource::Resource;
use crate::scope::InstrumentationScope;
use crate::value::KeyValue;

/// Log record severity levels.
///
/// These levels follow standard logging conventions, ordered from most
/// verbose to most critical.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// The "trace" level.
    ///
    /// Designates very low priority, often extremely verbose, information.
    Trace,
    /// The "debug" level.
    ///
    /// Designates lower priority information.
    Debug,
    /// The "info" level.
    ///
    /// Designates useful information.
    Info,
    /// The "warn" level.
    ///
    /// Designates hazardous situations.
    Warn,
    /// The "error" level.
    ///
    /// Designates very serious errors.
    Error,
    /// The "fatal" level.
    ///
    /// Designates critical failures that might crash the program.
    Fatal,
}

/// A structured log record.
///
/// # Examples
///
/// ```rust
/// use lumen_logs::{KeyValue, LogRecord, Severity};
///
/// let record = LogRecord::builder()
///     .severity(Severity::Warn)
///     .body("disk nearly full")
///     .attribute(KeyValue::new("free_bytes", 1024))
///     .build();
///
/// assert_eq!(record.severity, Severity::Warn);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogRecord {
    /// When the logged event happened, if the producer knows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,

    /// When the record was seen by the SDK; stamped at emit time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_timestamp: Option<Timestamp>,

    /// The severity level of this record.
    pub severity: Severity,

    /// The message body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Key-value attributes providing additional context.
    pub attributes: Vec<KeyValue>,

    /// How many attributes were dropped by the record limit policy.
    pub dropped_attributes: u32,

    /// The entity that produced this record; attached at emit time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Arc<Resource>>,

    /// The instrumentation scope that produced this record; attached at
    /// emit time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Arc<InstrumentationScope>>,
}

impl LogRecord {
    /// Creates a builder for a record.
    pub fn builder() -> LogRecordBuilder {
        LogRecordBuilder {
            record: LogRecord {
                timestamp: None,
                observed_timestamp: None,
                severity: Severity::Info,
                body: None,
                attributes: Vec::new(),
                dropped_attributes: 0,
                resource: None,
                scope: None,
            },
        }
    }
}

/// Builder for [`LogRecord`].
///
/// Defaults to [`Severity::Info`] with no body and no attributes.
#[derive(Clone, Debug)]
#[must_use]
pub struct LogRecordBuilder {
    record: LogRecord,
}

impl LogRecordBuilder {
    /// Sets the event timestamp.
    pub fn timestamp(mut self, timestamp: Timestamp) -> Self {
        self.record.timestamp = Some(timestamp);
        self
    }

    /// Sets the severity level.
    pub fn severity(mut self, severity: Severity) -> Self {
        self.record.severity = severity;
        self
    }

    /// Sets the message body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.record.body = Some(body.into());
        self
    }

    /// Appends an attribute.
    pub fn attribute(mut self, attribute: KeyValue) -> Self {
        self.record.attributes.push(attribute);
        self
    }

    /// Appends all of the given attributes.
    pub fn attributes(mut self, attributes: impl IntoIterator<Item = KeyValue>) -> Self {
        self.record.attributes.extend(attributes);
        self
    }

    /// Builds the record.
    pub fn build(self) -> LogRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let record = LogRecord::builder().build();

        assert_eq!(record.severity, Severity::Info);
        assert_eq!(record.body, None);
        assert!(record.attributes.is_empty());
        assert_eq!(record.dropped_attributes, 0);
        assert!(record.resource.is_none());
        assert!(record.scope.is_none());
    }

    #[test]
    fn severity_orders_from_verbose_to_critical() {
        assert!(Severity::Trace < Severity::Debug);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn serializes_without_unset_fields() {
        let record = LogRecord::builder().body("hello").build();
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains("\"body\":\"hello\""));
        assert!(!json.contains("timestamp"));
        assert!(!json.contains("resource"));
    }
}
