//! Machine-readable dump of a whole batch.

use crate::aggregate::{AggregateEntry, ResultAggregator, SkippedExperiment};
use crate::experiment::BatchStamp;
use crate::protocol::ProtocolDescriptor;
use crate::scale::ScalePoint;
use crate::BatchResult;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct BatchExport<'a> {
    stamp: BatchStamp,
    completed: Vec<&'a AggregateEntry>,
    skipped: &'a [SkippedExperiment],
}

/// Write completed results in run order (protocol-major) plus the skipped runs
pub fn write_json<W: Write>(
    mut writer: W,
    stamp: BatchStamp,
    protocols: &[ProtocolDescriptor],
    scales: &[ScalePoint],
    results: &ResultAggregator,
    skipped: &[SkippedExperiment],
) -> BatchResult<W> {
    let completed = protocols
        .iter()
        .flat_map(|p| scales.iter().filter_map(move |s| results.get(&p.name, *s)))
        .collect();
    let export = BatchExport {
        stamp,
        completed,
        skipped,
    };
    serde_json::to_writer_pretty(&mut writer, &export)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(writer)
}
