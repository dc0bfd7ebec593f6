//! Static metadata for each protocol under verification.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One protocol under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolDescriptor {
    /// Display name, also the lowercase table label
    pub name: String,

    /// Path of the target `.tla` specification
    pub target: PathBuf,

    /// Model name prefix; the experiment scale and batch stamp are appended
    pub model: String,

    /// Property description for the LaTeX caption
    pub verifying: String,

    /// Property description for markdown headings
    pub verifying_md: String,

    /// File stem of the per-protocol reports
    pub file_stem: String,

    /// Operator bound to `Read(r)` in the generated configuration
    pub read_operator: String,
}

impl ProtocolDescriptor {
    /// Label used inside `\label{tbl:tlc-...}`
    pub fn label(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn latex_file_name(&self) -> String {
        format!("{}.tex", self.file_stem)
    }

    pub fn markdown_file_name(&self) -> String {
        format!("{}.md", self.file_stem)
    }
}

/// The add-wins set variants checked by default
pub fn default_protocols() -> Vec<ProtocolDescriptor> {
    vec![
        ProtocolDescriptor {
            name: "StateAWSet".to_string(),
            target: PathBuf::from("crdt/StateAWSet.tla"),
            model: "model/StateAWSet".to_string(),
            verifying: r"StateAWSet satisfies $SEC$".to_string(),
            verifying_md: r"`StateAWSet` satisfies `$SEC$`".to_string(),
            file_stem: "tlc-state-awset-table".to_string(),
            read_operator: "ReadStateAWSet".to_string(),
        },
        ProtocolDescriptor {
            name: "OpAWSet".to_string(),
            target: PathBuf::from("crdt/OpAWSet.tla"),
            model: "model/OpAWSet".to_string(),
            verifying: r"OpAWSet satisfies $SEC$".to_string(),
            verifying_md: r"`OpAWSet` satisfies `$SEC$`".to_string(),
            file_stem: "tlc-op-awset-table".to_string(),
            read_operator: "ReadOpAWSet".to_string(),
        },
    ]
}
