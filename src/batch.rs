use anyhow::Result;
use indicatif::ProgressBar;
use tracing::info;

use crate::classifier::Classifier;
use crate::models::{ClassifiedRecord, SoftwareRecord};
use crate::table::RowSink;

/// Classify every record in order, writing each result to `sink` before
/// moving to the next one.
///
/// Every input row produces exactly one output row. Unparseable model
/// replies are already folded into the sentinel by the classifier; any error
/// reaching this loop (bad input row, transport, sink I/O) stops the batch.
pub async fn run<I, S>(
    records: I,
    sink: &mut S,
    classifier: &Classifier<'_>,
    progress: Option<&ProgressBar>,
) -> Result<Vec<ClassifiedRecord>>
where
    I: IntoIterator<Item = Result<SoftwareRecord>>,
    S: RowSink,
{
    let mut rows = Vec::new();
    let mut failed = 0usize;

    for record in records {
        let record = record?;
        if let Some(pb) = progress {
            pb.set_message(record.caption.clone());
        }

        let result = classifier.classify(&record.caption, &record.vendor).await?;
        if result.is_failed() {
            failed += 1;
        }
        let row = ClassifiedRecord::new(record, result);
        sink.write_row(&row)?;
        rows.push(row);

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    info!(total = rows.len(), failed, "batch complete");

    Ok(rows)
}
