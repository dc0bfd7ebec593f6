//! Fixed-width row layouts and value formatting shared by the renderers.

use chrono::NaiveDateTime;
use std::time::Duration;

/// Left-justified fixed-width columns. Values wider than their column are
/// written in full, never cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    pub widths: &'static [usize],
}

impl RowLayout {
    pub const fn new(widths: &'static [usize]) -> Self {
        Self { widths }
    }

    /// Pad each cell to its column width
    pub fn pad<S: AsRef<str>>(&self, cells: &[S]) -> Vec<String> {
        debug_assert_eq!(cells.len(), self.widths.len());
        cells
            .iter()
            .zip(self.widths)
            .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
            .collect()
    }

    /// `| a | b |` markdown row
    pub fn markdown_row<S: AsRef<str>>(&self, cells: &[S]) -> String {
        format!("| {} |\n", self.pad(cells).join(" | "))
    }

    /// Markdown header row followed by its dash separator
    pub fn markdown_header<S: AsRef<str>>(&self, titles: &[S]) -> String {
        let dashes: Vec<String> = self.widths.iter().map(|w| "-".repeat(*w)).collect();
        format!("{}{}", self.markdown_row(titles), self.markdown_row(&dashes))
    }
}

/// `2021-03-04 05:06:07`
pub fn format_start_time(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `H:MM:SS`, sub-second part dropped
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
}
