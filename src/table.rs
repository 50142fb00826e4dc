use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{ClassifiedRecord, SoftwareRecord};

/// Output column order.
pub const OUTPUT_COLUMNS: [&str; 4] = ["scale", "caption", "vendor", "brief"];

/// Reads [`SoftwareRecord`]s from a CSV table with a header row.
///
/// Only the `caption` and `vendor` columns are consumed; `name`, the unnamed
/// index column, and anything else are dropped.
pub struct CsvSource<R: Read> {
    reader: csv::Reader<R>,
}

impl CsvSource<File> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("cannot open input table {}", path.display()))?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> CsvSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: csv::Reader::from_reader(reader),
        }
    }

    /// Rows in file order. A row missing `caption` or `vendor` is an error.
    pub fn records(&mut self) -> impl Iterator<Item = Result<SoftwareRecord>> + '_ {
        self.reader
            .deserialize::<SoftwareRecord>()
            .enumerate()
            .map(|(i, row)| row.with_context(|| format!("invalid input row {}", i + 1)))
    }
}

/// Destination for classified rows, written one at a time.
pub trait RowSink {
    fn write_row(&mut self, row: &ClassifiedRecord) -> Result<()>;
}

/// CSV sink that flushes after every row, so an interrupted batch keeps
/// everything written before the row in flight.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("cannot create output table {}", path.display()))?;
        Self::from_writer(file)
    }
}

impl<W: Write> CsvSink<W> {
    /// Writes the header immediately, even if no rows follow.
    pub fn from_writer(writer: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        writer.write_record(OUTPUT_COLUMNS)?;
        writer.flush()?;
        Ok(Self { writer })
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("failed to flush output table: {}", e.error()))
    }
}

impl<W: Write> RowSink for CsvSink<W> {
    fn write_row(&mut self, row: &ClassifiedRecord) -> Result<()> {
        self.writer.serialize(row)?;
        self.writer.flush()?;
        Ok(())
    }
}
