//! Experiment matrix: every scale point of a protocol before the next protocol.

use crate::protocol::ProtocolDescriptor;
use crate::scale::ScalePoint;

/// Lazy (protocol, scale) enumeration.
///
/// Scale points of one protocol are contiguous; per-protocol reports are
/// written as the run goes and depend on it.
#[derive(Debug, Clone)]
pub struct ExperimentMatrix<'a> {
    protocols: &'a [ProtocolDescriptor],
    scales: &'a [ScalePoint],
    protocol: usize,
    scale: usize,
}

impl<'a> ExperimentMatrix<'a> {
    pub fn new(protocols: &'a [ProtocolDescriptor], scales: &'a [ScalePoint]) -> Self {
        Self {
            protocols,
            scales,
            protocol: 0,
            scale: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.protocols.len() * self.scales.len()
    }
}

impl<'a> Iterator for ExperimentMatrix<'a> {
    type Item = (&'a ProtocolDescriptor, ScalePoint);

    fn next(&mut self) -> Option<Self::Item> {
        if self.scales.is_empty() {
            return None;
        }
        let protocol = self.protocols.get(self.protocol)?;
        let scale = self.scales[self.scale];

        self.scale += 1;
        if self.scale == self.scales.len() {
            self.scale = 0;
            self.protocol += 1;
        }
        Some((protocol, scale))
    }
}
