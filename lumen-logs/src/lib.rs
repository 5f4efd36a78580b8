//! # `lumen-logs`
//!
//! The log record pipeline of the Lumen telemetry SDK: turns structured
//! log records into exportable data and hands callers asynchronous
//! completion handles for flush and shutdown.
//!
//! A [`LoggerProvider`] owns the pipeline. It caches exactly one
//! [`Logger`] per instrumentation scope, shares one immutable [`Resource`]
//! across all of them, and fans every emitted [`LogRecord`] out to an
//! ordered list of backend [`LogProcessor`]s on the emitting thread.
//! Flush and shutdown outcomes are reported through write-once
//! [`Completion`] handles that aggregate across processors.
//!
//! ## Basic usage
//!
//! ```rust
//! use lumen_logs::export::ConsoleJsonExporter;
//! use lumen_logs::{KeyValue, LogRecord, LoggerProvider, Resource, Severity, SimpleProcessor};
//!
//! let provider = LoggerProvider::builder()
//!     .with_resource(
//!         Resource::builder()
//!             .attribute(KeyValue::new("service.name", "checkout"))
//!             .build(),
//!     )
//!     .with_processor(SimpleProcessor::new(ConsoleJsonExporter))
//!     .build();
//!
//! let logger = provider.logger("my-library");
//! logger.emit(
//!     LogRecord::builder()
//!         .severity(Severity::Info)
//!         .body("server started")
//!         .attribute(KeyValue::new("port", 8080))
//!         .build(),
//! );
//!
//! // Block (up to a timeout) until the pipeline has drained.
//! provider.shutdown().wait(std::time::Duration::from_secs(10));
//! ```
//!
//! ## Lifecycle
//!
//! Shutdown is idempotent: the first call drives the processors' shutdown
//! and returns its aggregated handle, later calls return an
//! already-succeeded handle. A provider built with no processors is
//! permanently disabled and serves one shared no-op logger for every
//! scope.
//!
//! Backend failures never propagate into emitting callers; they surface
//! through the returned [`Completion`] handles or as diagnostics on the
//! [`log`] facade.

#![forbid(unsafe_code)]

pub mod clock;
pub mod export;

mod completion;
mod error;
mod limits;
mod logger;
mod processor;
mod provider;
mod record;
mod registry;
mod resource;
mod scope;
mod value;

pub use completion::{Completion, CompletionOutcome};
pub use error::Error;
pub use limits::LogRecordLimits;
pub use logger::Logger;
pub use processor::{LogProcessor, SimpleProcessor};
pub use provider::{LoggerBuilder, LoggerProvider, LoggerProviderBuilder};
pub use record::{LogRecord, LogRecordBuilder, Severity};
pub use resource::{Resource, ResourceBuilder, SERVICE_NAME};
pub use scope::{InstrumentationScope, InstrumentationScopeBuilder};
pub use value::{KeyValue, Value};
