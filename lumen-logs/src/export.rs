//! Exporter boundary and built-in exporters.
//!
//! A [`LogExporter`] is the sink side of a processor: it delivers batches
//! of finished records to wherever they need to go (stdout, a file, a
//! network endpoint). Custom exporters implement the trait; the crate
//! ships [`ConsoleJsonExporter`] for JSON-per-line output and
//! [`TestExporter`] for capturing records in memory during tests.

use std::sync::{Arc, Mutex};

use crate::error::Error;
use crate::record::LogRecord;

/// Trait for exporting log records to external systems.
///
/// # Examples
///
/// ```rust
/// use lumen_logs::export::LogExporter;
/// use lumen_logs::{Error, LogRecord};
///
/// #[derive(Debug)]
/// struct CustomExporter;
///
/// impl LogExporter for CustomExporter {
///     fn export(&self, batch: &[LogRecord]) -> Result<(), Error> {
///         for record in batch {
///             println!("exporting: {record:?}");
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait LogExporter: core::fmt::Debug + Send + Sync {
    /// Delivers a batch of records to the backend.
    fn export(&self, batch: &[LogRecord]) -> Result<(), Error>;

    /// Releases any resources held by the exporter.
    ///
    /// Called at most once by the owning processor; must tolerate records
    /// never arriving afterwards.
    fn shutdown(&self) -> Result<(), Error> {
        Ok(())
    }
}

/// An exporter that outputs each record as one JSON object per line on
/// stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleJsonExporter;

impl LogExporter for ConsoleJsonExporter {
    fn export(&self, batch: &[LogRecord]) -> Result<(), Error> {
        for record in batch {
            let line =
                serde_json::to_string(record).map_err(|error| Error::Export(error.to_string()))?;
            println!("{line}");
        }
        Ok(())
    }
}

/// An exporter for testing that stores all records in memory.
///
/// # Examples
///
/// ```rust
/// use lumen_logs::export::TestExporter;
///
/// let (exporter, records) = TestExporter::new();
/// // Wire `exporter` into a processor, emit records, then inspect
/// // `records.lock().unwrap()`.
/// ```
#[derive(Debug)]
pub struct TestExporter {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl TestExporter {
    /// Creates a new test exporter and a shared handle to the storage all
    /// exported records land in.
    pub fn new() -> (Self, Arc<Mutex<Vec<LogRecord>>>) {
        let records = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                records: records.clone(),
            },
            records,
        )
    }
}

impl LogExporter for TestExporter {
    fn export(&self, batch: &[LogRecord]) -> Result<(), Error> {
        self.records.lock().unwrap().extend_from_slice(batch);
        Ok(())
    }
}
