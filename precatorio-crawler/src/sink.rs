//! Record sinks.

use precatorio_core::{CanonicalRecord, PrecatorioError, PrecatorioResult, CSV_COLUMNS};
use std::io::Write;

/// Receives the ordered records of a crawl.
pub trait RecordSink {
    fn write_records(&mut self, records: &[CanonicalRecord]) -> PrecatorioResult<()>;

    /// Flush anything buffered.
    fn finish(&mut self) -> PrecatorioResult<()> {
        Ok(())
    }
}

fn sink_error(e: impl std::fmt::Display) -> PrecatorioError {
    PrecatorioError::Sink {
        reason: e.to_string(),
    }
}

/// CSV output in the fixed column order. The header is written on
/// construction, so an empty crawl still yields a header row.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W) -> PrecatorioResult<Self> {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(inner);
        writer.write_record(CSV_COLUMNS).map_err(sink_error)?;
        Ok(Self { writer, rows: 0 })
    }

    /// Data rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> PrecatorioResult<W> {
        self.writer.into_inner().map_err(sink_error)
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write_records(&mut self, records: &[CanonicalRecord]) -> PrecatorioResult<()> {
        for record in records {
            self.writer.write_record(record.to_row()).map_err(sink_error)?;
            self.rows += 1;
        }
        Ok(())
    }

    fn finish(&mut self) -> PrecatorioResult<()> {
        self.writer.flush().map_err(sink_error)
    }
}

impl<W: Write> std::fmt::Debug for CsvSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvSink").field("rows", &self.rows).finish()
    }
}

/// Keeps records in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub records: Vec<CanonicalRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordSink for MemorySink {
    fn write_records(&mut self, records: &[CanonicalRecord]) -> PrecatorioResult<()> {
        self.records.extend_from_slice(records);
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
