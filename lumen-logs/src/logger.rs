//! Per-scope log record emitter.

use std::sync::Arc;

use crate::provider::LoggerSharedState;
use crate::record::LogRecord;
use crate::scope::InstrumentationScope;

/// Emits log records for one instrumentation scope.
///
/// Loggers are created through a [`LoggerProvider`] and are otherwise
/// stateless: they hold the provider's shared state and their own scope.
/// Exactly one logger exists per unique scope for a provider's lifetime.
///
/// [`LoggerProvider`]: crate::LoggerProvider
///
/// # Examples
///
/// ```rust
/// use lumen_logs::{KeyValue, LogRecord, LoggerProvider, Severity, SimpleProcessor};
/// use lumen_logs::export::ConsoleJsonExporter;
///
/// let provider = LoggerProvider::builder()
///     .with_processor(SimpleProcessor::new(ConsoleJsonExporter))
///     .build();
///
/// let logger = provider.logger("my-library");
/// logger.emit(
///     LogRecord::builder()
///         .severity(Severity::Info)
///         .body("server started")
///         .attribute(KeyValue::new("port", 8080))
///         .build(),
/// );
/// ```
#[derive(Debug)]
pub struct Logger {
    shared: Arc<LoggerSharedState>,
    scope: Arc<InstrumentationScope>,
    enabled: bool,
}

impl Logger {
    pub(crate) fn new(shared: Arc<LoggerSharedState>, scope: Arc<InstrumentationScope>) -> Self {
        Self {
            shared,
            scope,
            enabled: true,
        }
    }

    /// The shared singleton returned for every scope of a provider with no
    /// processors configured.
    pub(crate) fn disabled(
        shared: Arc<LoggerSharedState>,
        scope: Arc<InstrumentationScope>,
    ) -> Self {
        Self {
            shared,
            scope,
            enabled: false,
        }
    }

    /// The instrumentation scope this logger emits for.
    pub fn scope(&self) -> &InstrumentationScope {
        &self.scope
    }

    /// Finishes a record and fans it out to the provider's processors, on
    /// the calling thread.
    ///
    /// Applies the provider's record limits (read from the policy source
    /// now, not at logger construction), stamps the observed timestamp,
    /// and attaches the provider resource and this logger's scope.
    ///
    /// A no-op on a disabled logger or after the provider has shut down.
    /// Backend failures never propagate to the caller.
    pub fn emit(&self, mut record: LogRecord) {
        if !self.enabled || self.shared.has_been_shutdown() {
            return;
        }

        let limits = self.shared.log_record_limits();
        record.dropped_attributes += limits.apply(&mut record.attributes);

        if record.observed_timestamp.is_none() {
            record.observed_timestamp = Some(self.shared.clock().now());
        }
        record.resource = Some(self.shared.resource());
        record.scope = Some(Arc::clone(&self.scope));

        self.shared.processor_chain().process(&record);
    }
}
