//! Report renderers.
//!
//! Per protocol: a LaTeX table and a markdown summary, both written one row
//! at a time as runs complete. Per batch: a combined markdown report grouped
//! by scale point and a JSON dump. None of them reorder rows.

pub mod combined;
pub mod json;
pub mod latex;
pub mod layout;
pub mod markdown;

pub use combined::write_combined;
pub use json::write_json;
pub use latex::LatexTable;
pub use layout::{format_elapsed, format_start_time, RowLayout};
pub use markdown::MarkdownSummary;

/// File name of the combined markdown report
pub const COMBINED_FILE: &str = "result-all.md";

/// File name of the JSON dump
pub const JSON_FILE: &str = "result-all.json";
