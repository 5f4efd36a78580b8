//! The provider facade and the state shared by its loggers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::completion::Completion;
use crate::limits::LogRecordLimits;
use crate::logger::Logger;
use crate::processor::{LogProcessor, ProcessorChain};
use crate::registry::ScopeRegistry;
use crate::resource::Resource;
use crate::scope::InstrumentationScope;
use crate::value::KeyValue;

/// Scope name used when a logger is requested without one.
const DEFAULT_LOGGER_NAME: &str = "unknown";

type LimitsSupplier = Box<dyn Fn() -> LogRecordLimits + Send + Sync>;

/// State shared by every logger produced from one provider: the resource,
/// the record-limits policy source, the processor chain, the clock, and
/// the shutdown flag.
///
/// The shutdown flag is the only mutable piece; it transitions once,
/// monotonically, via compare-and-set.
pub(crate) struct LoggerSharedState {
    resource: Arc<Resource>,
    limits_supplier: LimitsSupplier,
    processor_chain: ProcessorChain,
    clock: Arc<dyn Clock>,
    has_been_shutdown: AtomicBool,
}

impl LoggerSharedState {
    fn new(
        resource: Resource,
        limits_supplier: LimitsSupplier,
        processor_chain: ProcessorChain,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resource: Arc::new(resource),
            limits_supplier,
            processor_chain,
            clock,
            has_been_shutdown: AtomicBool::new(false),
        }
    }

    pub(crate) fn resource(&self) -> Arc<Resource> {
        Arc::clone(&self.resource)
    }

    /// Reads the current limits from the policy source.
    pub(crate) fn log_record_limits(&self) -> LogRecordLimits {
        (self.limits_supplier)()
    }

    pub(crate) fn processor_chain(&self) -> &ProcessorChain {
        &self.processor_chain
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub(crate) fn has_been_shutdown(&self) -> bool {
        self.has_been_shutdown.load(Ordering::Acquire)
    }

    /// Flushing is always forwarded, shut down or not; whether the backend
    /// honors a flush after shutdown is the backend's contract.
    fn force_flush(&self) -> Completion {
        self.processor_chain.force_flush()
    }

    /// Exactly one caller wins the shutdown transition and drives the
    /// chain; everyone else gets an already-succeeded handle.
    fn shutdown(&self) -> Completion {
        if self
            .has_been_shutdown
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("calling shutdown() multiple times on the same logger provider");
            return Completion::succeeded();
        }

        self.processor_chain.shutdown()
    }
}

impl core::fmt::Debug for LoggerSharedState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoggerSharedState")
            .field("resource", &self.resource)
            .field("processor_chain", &self.processor_chain)
            .field("clock", &self.clock)
            .field("has_been_shutdown", &self.has_been_shutdown)
            .finish_non_exhaustive()
    }
}

/// Creates and caches [`Logger`]s and owns the log processing pipeline.
///
/// Each provider instance owns its own shared state; multiple independent
/// providers can coexist in one process. Dropping the provider does not
/// shut the pipeline down; call [`LoggerProvider::shutdown`] or
/// [`LoggerProvider::close`].
///
/// # Examples
///
/// ```rust
/// use lumen_logs::export::ConsoleJsonExporter;
/// use lumen_logs::{KeyValue, LoggerProvider, Resource, SimpleProcessor};
///
/// let provider = LoggerProvider::builder()
///     .with_resource(
///         Resource::builder()
///             .attribute(KeyValue::new("service.name", "checkout"))
///             .build(),
///     )
///     .with_processor(SimpleProcessor::new(ConsoleJsonExporter))
///     .build();
///
/// let logger = provider.logger("my-library");
/// # drop(logger);
/// provider.close();
/// ```
#[derive(Debug)]
pub struct LoggerProvider {
    shared: Arc<LoggerSharedState>,
    registry: ScopeRegistry<Logger>,
    /// Set when no processors are configured; every scope then gets this
    /// singleton and the registry is bypassed entirely.
    disabled_logger: Option<Arc<Logger>>,
}

impl LoggerProvider {
    /// Returns a builder for a provider.
    pub fn builder() -> LoggerProviderBuilder {
        LoggerProviderBuilder::default()
    }

    /// Gets or creates a logger for the named scope.
    ///
    /// An empty name is normalized to `"unknown"`.
    pub fn logger(&self, name: impl Into<String>) -> Arc<Logger> {
        self.logger_builder(name).build()
    }

    /// Starts building a logger for the named scope, allowing version,
    /// schema URL, and attributes to be set.
    ///
    /// An empty name is normalized to `"unknown"` with a low-severity
    /// diagnostic.
    pub fn logger_builder(&self, name: impl Into<String>) -> LoggerBuilder<'_> {
        let mut name = name.into();
        if name.is_empty() {
            log::debug!("logger requested without an instrumentation scope name");
            name = DEFAULT_LOGGER_NAME.to_owned();
        }

        LoggerBuilder {
            provider: self,
            scope: InstrumentationScope::builder(name),
        }
    }

    /// Requests every processor to export records that have not been
    /// processed yet.
    ///
    /// Returns a handle completing when the flush is finished. Permitted
    /// after shutdown; the request is simply forwarded.
    pub fn force_flush(&self) -> Completion {
        self.shared.force_flush()
    }

    /// Attempts to shut down the processing pipeline.
    ///
    /// The first call drives the processors' shutdown and returns its
    /// handle; repeated calls return an already-succeeded handle and log a
    /// warning. Ongoing waits on earlier handles are unaffected.
    pub fn shutdown(&self) -> Completion {
        self.shared.shutdown()
    }

    /// Best-effort disposal: shuts down and waits up to ten seconds,
    /// discarding the result.
    pub fn close(&self) {
        let _ = self.shutdown().wait(Duration::from_secs(10));
    }
}

/// Builder for [`LoggerProvider`].
#[must_use]
pub struct LoggerProviderBuilder {
    resource: Resource,
    limits_supplier: LimitsSupplier,
    processors: Vec<Box<dyn LogProcessor>>,
    clock: Arc<dyn Clock>,
}

impl Default for LoggerProviderBuilder {
    fn default() -> Self {
        Self {
            resource: Resource::default(),
            limits_supplier: Box::new(LogRecordLimits::default),
            processors: Vec::new(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl LoggerProviderBuilder {
    /// Sets the resource describing the producing entity.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = resource;
        self
    }

    /// Sets fixed record limits.
    pub fn with_log_record_limits(self, limits: LogRecordLimits) -> Self {
        self.with_log_record_limits_supplier(move || limits)
    }

    /// Sets a record-limits policy source, read on every emit.
    ///
    /// Must be cheap and non-blocking; it runs on the emitting thread.
    pub fn with_log_record_limits_supplier<F>(mut self, supplier: F) -> Self
    where
        F: Fn() -> LogRecordLimits + Send + Sync + 'static,
    {
        self.limits_supplier = Box::new(supplier);
        self
    }

    /// Appends a backend processor; records fan out to processors in the
    /// order they were added.
    pub fn with_processor(mut self, processor: impl LogProcessor + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Sets the clock used to stamp observed timestamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Builds the provider.
    ///
    /// With no processors configured the provider is permanently disabled:
    /// every scope resolves to one shared no-op logger and flush/shutdown
    /// complete synchronously.
    pub fn build(self) -> LoggerProvider {
        let processor_chain = ProcessorChain::new(self.processors);
        let is_noop = processor_chain.is_noop();

        let shared = Arc::new(LoggerSharedState::new(
            self.resource,
            self.limits_supplier,
            processor_chain,
            self.clock,
        ));

        let registry = ScopeRegistry::new({
            let shared = Arc::clone(&shared);
            move |scope| Logger::new(Arc::clone(&shared), Arc::new(scope))
        });

        let disabled_logger = is_noop.then(|| {
            Arc::new(Logger::disabled(
                Arc::clone(&shared),
                Arc::new(InstrumentationScope::builder(DEFAULT_LOGGER_NAME).build()),
            ))
        });

        LoggerProvider {
            shared,
            registry,
            disabled_logger,
        }
    }
}

impl core::fmt::Debug for LoggerProviderBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoggerProviderBuilder")
            .field("resource", &self.resource)
            .field("processors", &self.processors)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

/// Builder for a per-scope [`Logger`], created via
/// [`LoggerProvider::logger_builder`].
#[derive(Debug)]
#[must_use]
pub struct LoggerBuilder<'a> {
    provider: &'a LoggerProvider,
    scope: crate::scope::InstrumentationScopeBuilder,
}

impl LoggerBuilder<'_> {
    /// Sets the scope version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.scope = self.scope.version(version);
        self
    }

    /// Sets the scope schema URL.
    pub fn schema_url(mut self, schema_url: impl Into<String>) -> Self {
        self.scope = self.scope.schema_url(schema_url);
        self
    }

    /// Appends a scope-level attribute.
    pub fn attribute(mut self, attribute: KeyValue) -> Self {
        self.scope = self.scope.attribute(attribute);
        self
    }

    /// Gets or creates the logger for the built scope.
    pub fn build(self) -> Arc<Logger> {
        if let Some(disabled) = &self.provider.disabled_logger {
            return Arc::clone(disabled);
        }

        self.provider.registry.get_or_create(&self.scope.build())
    }
}
