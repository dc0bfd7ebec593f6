//! Per-protocol markdown summary.

use super::layout::{format_elapsed, format_start_time, RowLayout};
use crate::checker::ResultRecord;
use crate::protocol::ProtocolDescriptor;
use crate::scale::ScalePoint;
use std::io::{self, Write};

pub const SUMMARY_LAYOUT: RowLayout = RowLayout::new(&[8, 5, 19, 9, 13, 8, 10, 17]);

pub const SUMMARY_TITLES: [&str; 8] = [
    "Replicas",
    "Data",
    "Start Time",
    "# Workers",
    "Checking Time",
    "Diameter",
    "# States",
    "# Distinct States",
];

pub fn summary_header(protocol: &ProtocolDescriptor) -> String {
    format!(
        "# Model checking results of verifying that {}.\n\n{}",
        protocol.verifying_md,
        SUMMARY_LAYOUT.markdown_header(&SUMMARY_TITLES)
    )
}

pub fn summary_row(scale: ScalePoint, workers: usize, result: &ResultRecord) -> String {
    SUMMARY_LAYOUT.markdown_row(&[
        scale.replicas.to_string(),
        scale.data.to_string(),
        format_start_time(&result.start_time),
        workers.to_string(),
        format_elapsed(result.elapsed),
        result.diameter.to_string(),
        result.total_states.to_string(),
        result.distinct_states.to_string(),
    ])
}

/// Markdown summary written a row at a time
#[derive(Debug)]
pub struct MarkdownSummary<W: Write> {
    writer: W,
    rows: usize,
}

impl<W: Write> MarkdownSummary<W> {
    pub fn begin(mut writer: W, protocol: &ProtocolDescriptor) -> io::Result<Self> {
        writer.write_all(summary_header(protocol).as_bytes())?;
        writer.flush()?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn push(&mut self, scale: ScalePoint, workers: usize, result: &ResultRecord) -> io::Result<()> {
        self.writer.write_all(summary_row(scale, workers, result).as_bytes())?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The summary has no trailer; this only flushes
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
