//! Per-protocol LaTeX table: one row per completed scale point.

use super::layout::{format_elapsed, RowLayout};
use crate::checker::ResultRecord;
use crate::protocol::ProtocolDescriptor;
use crate::scale::ScalePoint;
use std::io::{self, Write};

/// Scale, diameter, states, distinct states, checking time
pub const LATEX_LAYOUT: RowLayout = RowLayout::new(&[12, 10, 18, 18, 12]);

pub const LATEX_TRAILER: &str = r"    \end{tabular}%
  }
\end{table}
";

/// Preamble naming the file, the verified property and the table label
pub fn latex_header(protocol: &ProtocolDescriptor) -> String {
    let mut out = String::new();
    out.push_str(&format!("% file: {}\n\n", protocol.latex_file_name()));
    out.push_str("% \\usepackage{graphicx}\n\\begin{table}[t]\n");
    out.push_str(&format!(
        "  \\caption{{Model checking results of verifying that {}.}}\n",
        protocol.verifying
    ));
    out.push_str(&format!("  \\label{{tbl:tlc-{}}}\n", protocol.label()));
    out.push_str(
        r"  \resizebox{\textwidth}{!}{%
    \centering
    \renewcommand*{\arraystretch}{1.1}
    \begin{tabular}{|c|c|c|c|c|}
    \hline
    \textbf{\incell{TLC Model}{$(\# Replicas, \# Data)$}} & \textbf{Diameter} & \textbf{\# States} & \textbf{\# Distinct States}
    & \textbf{\incell{Checking Time}{$(hh:mm:ss)$}} \\ \hline
    \hline
",
    );
    out
}

/// One table row; every value is wrapped as inline math
pub fn latex_row(scale: ScalePoint, result: &ResultRecord) -> String {
    let cells: Vec<String> = [
        scale.to_string(),
        result.diameter.to_string(),
        result.total_states.to_string(),
        result.distinct_states.to_string(),
        format_elapsed(result.elapsed),
    ]
    .iter()
    .map(|value| format!("${}$", value))
    .collect();
    format!("    {} \\\\ \\hline\n", LATEX_LAYOUT.pad(&cells).join(" & "))
}

/// LaTeX table written a row at a time
#[derive(Debug)]
pub struct LatexTable<W: Write> {
    writer: W,
    rows: usize,
}

impl<W: Write> LatexTable<W> {
    /// Write the preamble
    pub fn begin(mut writer: W, protocol: &ProtocolDescriptor) -> io::Result<Self> {
        writer.write_all(latex_header(protocol).as_bytes())?;
        writer.flush()?;
        Ok(Self { writer, rows: 0 })
    }

    /// Append and flush one row
    pub fn push(&mut self, scale: ScalePoint, result: &ResultRecord) -> io::Result<()> {
        self.writer.write_all(latex_row(scale, result).as_bytes())?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Close the table and hand back the writer
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.write_all(LATEX_TRAILER.as_bytes())?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::ExitState;
    use crate::protocol::default_protocols;
    use chrono::NaiveDate;
    use std::time::Duration;

    fn result() -> ResultRecord {
        ResultRecord {
            start_time: NaiveDate::from_ymd_opt(2021, 3, 4).unwrap().and_hms_opt(5, 6, 7).unwrap(),
            elapsed: Duration::from_secs(62),
            diameter: 12,
            total_states: 1234,
            distinct_states: 567,
            errors: vec![],
            warnings: vec![],
            exit_state: ExitState::Success,
        }
    }

    #[test]
    fn test_row_format() {
        assert_eq!(
            latex_row(ScalePoint::new(2, 3), &result()),
            "    $(2, 3)$     & $12$       & $1234$             & $567$              & $0:01:02$    \\\\ \\hline\n"
        );
    }

    #[test]
    fn test_header_names_file_property_and_label() {
        let header = latex_header(&default_protocols()[0]);
        assert!(header.starts_with("% file: tlc-state-awset-table.tex\n\n"));
        assert!(header.contains(r"\caption{Model checking results of verifying that StateAWSet satisfies $SEC$.}"));
        assert!(header.contains(r"\label{tbl:tlc-stateawset}"));
        assert!(header.ends_with("    \\hline\n"));
    }

    #[test]
    fn test_table_stream() {
        let protocol = &default_protocols()[1];
        let mut table = LatexTable::begin(Vec::new(), protocol).unwrap();
        table.push(ScalePoint::new(2, 2), &result()).unwrap();
        assert_eq!(table.rows(), 1);
        let text = String::from_utf8(table.finish().unwrap()).unwrap();

        assert!(text.starts_with(&latex_header(protocol)));
        assert!(text.ends_with(LATEX_TRAILER));
        assert_eq!(text.matches("\\\\ \\hline\n").count(), 2);
    }
}
