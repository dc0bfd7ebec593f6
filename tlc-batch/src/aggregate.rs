//! Results collected across protocols, keyed by scale point.

use crate::checker::ResultRecord;
use crate::experiment::ExperimentConfig;
use crate::scale::ScalePoint;
use indexmap::IndexMap;
use serde::Serialize;

/// One completed experiment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateEntry {
    pub protocol: String,
    pub experiment: ExperimentConfig,
    pub result: ResultRecord,
}

/// An experiment the user interrupted; it has no result anywhere
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedExperiment {
    pub protocol: String,
    pub scale: ScalePoint,
}

/// Append-only store of completed experiments.
///
/// Entries under one scale point keep the order protocols were run in.
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    by_scale: IndexMap<ScalePoint, Vec<AggregateEntry>>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, experiment: ExperimentConfig, result: ResultRecord) {
        self.by_scale
            .entry(experiment.scale)
            .or_default()
            .push(AggregateEntry {
                protocol: experiment.protocol.name.clone(),
                experiment,
                result,
            });
    }

    /// Entries for a scale point; empty when nothing completed there
    pub fn entries(&self, scale: ScalePoint) -> &[AggregateEntry] {
        self.by_scale.get(&scale).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, protocol: &str, scale: ScalePoint) -> Option<&AggregateEntry> {
        self.entries(scale).iter().find(|entry| entry.protocol == protocol)
    }

    pub fn len(&self) -> usize {
        self.by_scale.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::ExitState;
    use crate::experiment::BatchStamp;
    use crate::protocol::default_protocols;
    use crate::scale::Alphabet;
    use chrono::NaiveDate;
    use std::time::Duration;

    fn record(diameter: u64) -> ResultRecord {
        ResultRecord {
            start_time: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            elapsed: Duration::from_secs(1),
            diameter,
            total_states: 10,
            distinct_states: 5,
            errors: vec![],
            warnings: vec![],
            exit_state: ExitState::Success,
        }
    }

    #[test]
    fn test_entries_keep_protocol_order_per_scale() {
        let protocols = default_protocols();
        let stamp = BatchStamp::now();
        let alphabet = Alphabet::default();
        let small = ScalePoint::new(2, 2);
        let large = ScalePoint::new(3, 3);
        let mut aggregator = ResultAggregator::new();

        for protocol in &protocols {
            for (i, scale) in [small, large].into_iter().enumerate() {
                let experiment = ExperimentConfig::new(protocol, scale, &alphabet, 1, stamp).unwrap();
                aggregator.record(experiment, record(i as u64));
            }
        }

        let names: Vec<_> = aggregator.entries(large).iter().map(|e| e.protocol.as_str()).collect();
        assert_eq!(names, vec!["StateAWSet", "OpAWSet"]);
        assert_eq!(aggregator.len(), 4);
        assert_eq!(aggregator.get("OpAWSet", large).unwrap().result.diameter, 1);
        assert!(aggregator.entries(ScalePoint::new(4, 4)).is_empty());
        assert!(aggregator.get("Missing", small).is_none());
    }
}
