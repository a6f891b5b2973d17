//! Where migration records go.

use std::io::Write;

use crate::errors::SinkError;
use crate::types::report::MigrationRecord;

/// Receives the migration records produced by `AddMigration` requirements.
/// A sink failure is fatal to the run.
pub trait MigrationSink {
    fn record(&mut self, record: MigrationRecord) -> Result<(), SinkError>;
}

/// The default sink: accumulates records in memory so the pipeline can
/// surface them on the final report.
#[derive(Debug, Default)]
pub struct InMemoryMigrationSink {
    records: Vec<MigrationRecord>,
}

impl InMemoryMigrationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[MigrationRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<MigrationRecord> {
        self.records
    }
}

impl MigrationSink for InMemoryMigrationSink {
    fn record(&mut self, record: MigrationRecord) -> Result<(), SinkError> {
        self.records.push(record);
        Ok(())
    }
}

/// Writes one JSON record per line to any writer.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MigrationSink for JsonLinesSink<W> {
    fn record(&mut self, record: MigrationRecord) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, &record)
            .map_err(|e| SinkError::new(e.to_string()))?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| SinkError::new(e.to_string()))
    }
}
