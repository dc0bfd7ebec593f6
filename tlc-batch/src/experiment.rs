//! Per-run experiment configuration and the batch-wide stamp.

use crate::protocol::ProtocolDescriptor;
use crate::scale::{Alphabet, ScalePoint, SymbolSets};
use crate::template::Bindings;
use crate::BatchResult;
use chrono::{Local, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::fmt;

/// Format of the batch stamp in model names and directory names
pub const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Batch start time. Taken once per invocation and passed to everything
/// that names an artifact of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchStamp(NaiveDateTime);

impl BatchStamp {
    pub fn now() -> Self {
        Self(Local::now().naive_local())
    }

    pub fn at(time: NaiveDateTime) -> Self {
        Self(time)
    }

    pub fn time(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for BatchStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(STAMP_FORMAT))
    }
}

impl Serialize for BatchStamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One (protocol, scale) run, fully materialized
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperimentConfig {
    pub protocol: ProtocolDescriptor,
    pub scale: ScalePoint,
    pub symbols: SymbolSets,

    /// Model name carrying the scale and the batch stamp
    pub model_name: String,

    pub workers: usize,
}

impl ExperimentConfig {
    pub fn new(
        protocol: &ProtocolDescriptor,
        scale: ScalePoint,
        alphabet: &Alphabet,
        workers: usize,
        stamp: BatchStamp,
    ) -> BatchResult<Self> {
        let symbols = alphabet.slice(scale)?;
        let model_name = format!(
            "{} ({} clients, {} chars) {}",
            protocol.model, scale.replicas, scale.data, stamp
        );
        Ok(Self {
            protocol: protocol.clone(),
            scale,
            symbols,
            model_name,
            workers,
        })
    }

    /// Values for the per-experiment placeholders of the checker document
    pub fn bindings(&self) -> Bindings {
        Bindings::new()
            .with("target", self.protocol.target.display())
            .with("model", &self.model_name)
            .with("read_operator", &self.protocol.read_operator)
            .with("replicas", self.symbols.replica_list())
            .with("data", self.symbols.data_list())
    }
}
