//! Cross-protocol markdown report grouped by scale point.

use super::layout::{format_elapsed, format_start_time, RowLayout};
use crate::aggregate::{AggregateEntry, ResultAggregator};
use crate::scale::{plural_suffix, Alphabet, ScalePoint};
use crate::BatchResult;
use std::io::Write;

pub const COMBINED_LAYOUT: RowLayout = RowLayout::new(&[22, 14, 19, 9, 13, 8, 10, 17]);

pub const COMBINED_TITLES: [&str; 8] = [
    "Protocol",
    "Model",
    "Start Time",
    "# Workers",
    "Checking Time",
    "Diameter",
    "# States",
    "# Distinct States",
];

pub const COMBINED_TITLE: &str = "# Model Checking Result\n";

/// `## 2 Replicas `{r1, r2}` + 1 Data `{a}``
pub fn scale_heading(scale: ScalePoint, alphabet: &Alphabet) -> BatchResult<String> {
    let symbols = alphabet.slice(scale)?;
    Ok(format!(
        "\n## {} Replica{} `{{{}}}` + {} Data{} `{{{}}}`\n",
        scale.replicas,
        plural_suffix(scale.replicas),
        symbols.replica_list(),
        scale.data,
        plural_suffix(scale.data),
        symbols.data_list()
    ))
}

pub fn combined_row(entry: &AggregateEntry) -> String {
    let result = &entry.result;
    COMBINED_LAYOUT.markdown_row(&[
        entry.protocol.clone(),
        entry.experiment.protocol.model.clone(),
        format_start_time(&result.start_time),
        entry.experiment.workers.to_string(),
        format_elapsed(result.elapsed),
        result.diameter.to_string(),
        result.total_states.to_string(),
        result.distinct_states.to_string(),
    ])
}

/// Write every scale group in `scales` order. Groups keep their heading and
/// table header even when no protocol completed that scale.
pub fn write_combined<W: Write>(
    mut writer: W,
    scales: &[ScalePoint],
    alphabet: &Alphabet,
    results: &ResultAggregator,
) -> BatchResult<W> {
    writer.write_all(COMBINED_TITLE.as_bytes())?;
    let header = COMBINED_LAYOUT.markdown_header(&COMBINED_TITLES);
    for scale in scales {
        writer.write_all(scale_heading(*scale, alphabet)?.as_bytes())?;
        writer.write_all(header.as_bytes())?;
        for entry in results.entries(*scale) {
            writer.write_all(combined_row(entry).as_bytes())?;
        }
    }
    writer.flush()?;
    Ok(writer)
}
