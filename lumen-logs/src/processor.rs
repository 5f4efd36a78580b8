//! Backend processors and the composite fan-out chain.
//!
//! A [`LogProcessor`] is a pluggable consumer of finished records,
//! responsible for buffering and exporting them. The provider holds an
//! ordered list of processors resolved into a [`ProcessorChain`] at
//! construction; every emitted record fans out to each member in order, on
//! the calling thread.
//!
//! A failing member never prevents the others from receiving data, and
//! never unwinds into the emitting caller: process-time failures are
//! reported through the [`log`] facade, flush/shutdown failures through
//! the returned [`Completion`].

use std::sync::atomic::{AtomicBool, Ordering};

use crate::completion::Completion;
use crate::error::Error;
use crate::export::LogExporter;
use crate::record::LogRecord;

/// A pluggable consumer of emitted log records.
///
/// Implementations must be safe to call from multiple producer threads
/// concurrently, and [`LogProcessor::shutdown`] must tolerate repeated
/// calls without corrupting state.
pub trait LogProcessor: core::fmt::Debug + Send + Sync {
    /// Handles one emitted record, on the emitting thread.
    ///
    /// Errors are isolated by the owning chain: they are logged, not
    /// propagated to the producer.
    fn process(&self, record: &LogRecord) -> Result<(), Error>;

    /// Starts exporting anything buffered and reports through the handle
    /// when done.
    fn force_flush(&self) -> Completion;

    /// Flushes remaining records and releases resources, reporting through
    /// the handle.
    fn shutdown(&self) -> Completion;
}

/// An ordered fan-out over the provider's backend processors.
///
/// Resolved once at provider construction: an empty list becomes the no-op
/// sentinel, which lets the provider skip building real loggers entirely.
/// The member list never changes afterwards.
#[derive(Debug)]
pub(crate) enum ProcessorChain {
    /// No processors configured; everything is a synchronous no-op.
    Noop,
    Single(Box<dyn LogProcessor>),
    Multi(Vec<Box<dyn LogProcessor>>),
}

impl ProcessorChain {
    pub(crate) fn new(mut processors: Vec<Box<dyn LogProcessor>>) -> Self {
        match processors.len() {
            0 => ProcessorChain::Noop,
            1 => ProcessorChain::Single(processors.remove(0)),
            _ => ProcessorChain::Multi(processors),
        }
    }

    /// Whether this chain is the no-op sentinel for "no processors
    /// configured".
    pub(crate) fn is_noop(&self) -> bool {
        matches!(self, ProcessorChain::Noop)
    }

    /// Forwards a record to every member in order, isolating failures.
    pub(crate) fn process(&self, record: &LogRecord) {
        match self {
            ProcessorChain::Noop => {}
            ProcessorChain::Single(processor) => process_isolated(processor.as_ref(), record),
            ProcessorChain::Multi(processors) => {
                for processor in processors {
                    process_isolated(processor.as_ref(), record);
                }
            }
        }
    }

    /// Asks every member to flush, fanning their handles into one.
    pub(crate) fn force_flush(&self) -> Completion {
        match self {
            ProcessorChain::Noop => Completion::succeeded(),
            ProcessorChain::Single(processor) => processor.force_flush(),
            ProcessorChain::Multi(processors) => {
                // Start every flush before aggregating; no short-circuit.
                let handles: Vec<Completion> = processors
                    .iter()
                    .map(|processor| processor.force_flush())
                    .collect();
                Completion::all(handles)
            }
        }
    }

    /// Shuts every member down, fanning their handles into one.
    pub(crate) fn shutdown(&self) -> Completion {
        match self {
            ProcessorChain::Noop => Completion::succeeded(),
            ProcessorChain::Single(processor) => processor.shutdown(),
            ProcessorChain::Multi(processors) => {
                let handles: Vec<Completion> = processors
                    .iter()
                    .map(|processor| processor.shutdown())
                    .collect();
                Completion::all(handles)
            }
        }
    }
}

fn process_isolated(processor: &dyn LogProcessor, record: &LogRecord) {
    if let Err(error) = processor.process(record) {
        log::warn!("log processor failed to process a record: {error}");
    }
}

/// A processor that forwards each record synchronously to its exporter.
///
/// There is no buffering: `process` exports the record on the emitting
/// thread, so flush has nothing to do. After shutdown, records are
/// silently dropped.
///
/// # Examples
///
/// ```rust
/// use lumen_logs::export::ConsoleJsonExporter;
/// use lumen_logs::{LoggerProvider, SimpleProcessor};
///
/// let provider = LoggerProvider::builder()
///     .with_processor(SimpleProcessor::new(ConsoleJsonExporter))
///     .build();
/// ```
#[derive(Debug)]
pub struct SimpleProcessor<E> {
    exporter: E,
    is_shutdown: AtomicBool,
}

impl<E: LogExporter> SimpleProcessor<E> {
    /// Creates a processor forwarding to the given exporter.
    pub fn new(exporter: E) -> Self {
        Self {
            exporter,
            is_shutdown: AtomicBool::new(false),
        }
    }
}

impl<E: LogExporter> LogProcessor for SimpleProcessor<E> {
    fn process(&self, record: &LogRecord) -> Result<(), Error> {
        if self.is_shutdown.load(Ordering::Acquire) {
            return Ok(());
        }
        self.exporter.export(core::slice::from_ref(record))
    }

    fn force_flush(&self) -> Completion {
        Completion::succeeded()
    }

    fn shutdown(&self) -> Completion {
        if self.is_shutdown.swap(true, Ordering::AcqRel) {
            // Repeated shutdown is tolerated by contract.
            return Completion::succeeded();
        }

        match self.exporter.shutdown() {
            Ok(()) => Completion::succeeded(),
            Err(error) => Completion::failed(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::export::TestExporter;

    /// Records call counts and fails configurably, to observe the chain's
    /// isolation and aggregation behavior.
    #[derive(Debug)]
    struct ProbeProcessor {
        processed: Arc<AtomicUsize>,
        fail_process: bool,
        shutdown_error: Option<Error>,
    }

    impl ProbeProcessor {
        fn new(processed: Arc<AtomicUsize>) -> Self {
            Self {
                processed,
                fail_process: false,
                shutdown_error: None,
            }
        }
    }

    impl LogProcessor for ProbeProcessor {
        fn process(&self, _record: &LogRecord) -> Result<(), Error> {
            self.processed.fetch_add(1, Ordering::SeqCst);
            if self.fail_process {
                Err(Error::Export("probe failure".into()))
            } else {
                Ok(())
            }
        }

        fn force_flush(&self) -> Completion {
            Completion::succeeded()
        }

        fn shutdown(&self) -> Completion {
            match &self.shutdown_error {
                Some(error) => Completion::failed(error.clone()),
                None => Completion::succeeded(),
            }
        }
    }

    #[test]
    fn empty_chain_is_the_noop_sentinel() {
        let chain = ProcessorChain::new(Vec::new());

        assert!(chain.is_noop());
        assert!(chain.force_flush().outcome().unwrap().is_success());
        assert!(chain.shutdown().outcome().unwrap().is_success());
    }

    #[test]
    fn non_empty_chain_is_not_noop() {
        let counter = Arc::new(AtomicUsize::new(0));
        let chain = ProcessorChain::new(vec![Box::new(ProbeProcessor::new(counter))]);
        assert!(!chain.is_noop());
    }

    #[test]
    fn failing_member_does_not_stop_the_fan_out() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let third = Arc::new(AtomicUsize::new(0));

        let mut failing = ProbeProcessor::new(Arc::clone(&second));
        failing.fail_process = true;

        let chain = ProcessorChain::new(vec![
            Box::new(ProbeProcessor::new(Arc::clone(&first))),
            Box::new(failing),
            Box::new(ProbeProcessor::new(Arc::clone(&third))),
        ]);

        chain.process(&LogRecord::builder().build());

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(third.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn shutdown_aggregates_member_failures() {
        let counter = Arc::new(AtomicUsize::new(0));

        let mut failing = ProbeProcessor::new(Arc::clone(&counter));
        failing.shutdown_error = Some(Error::Export("disk full".into()));

        let chain = ProcessorChain::new(vec![
            Box::new(ProbeProcessor::new(Arc::clone(&counter))),
            Box::new(failing),
        ]);

        let outcome = chain.shutdown().outcome().unwrap();
        assert_eq!(outcome.error(), Some(&Error::Export("disk full".into())));
    }

    #[test]
    fn simple_processor_exports_synchronously() {
        let (exporter, records) = TestExporter::new();
        let processor = SimpleProcessor::new(exporter);

        processor
            .process(&LogRecord::builder().body("one").build())
            .unwrap();

        assert_eq!(records.lock().unwrap().len(), 1);
    }

    #[test]
    fn simple_processor_drops_records_after_shutdown() {
        let (exporter, records) = TestExporter::new();
        let processor = SimpleProcessor::new(exporter);

        assert!(processor.shutdown().outcome().unwrap().is_success());
        assert!(processor.shutdown().outcome().unwrap().is_success());

        processor
            .process(&LogRecord::builder().body("late").build())
            .unwrap();

        assert!(records.lock().unwrap().is_empty());
    }
}
