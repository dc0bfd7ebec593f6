//! Batch driver: runs the experiment matrix and feeds the reports.

use crate::aggregate::{ResultAggregator, SkippedExperiment};
use crate::checker::{CheckOutcome, ModelChecker, ResultRecord, CONFIG_TEMPLATE, DEFERRED_SYMBOLS};
use crate::experiment::{BatchStamp, ExperimentConfig};
use crate::matrix::ExperimentMatrix;
use crate::protocol::ProtocolDescriptor;
use crate::report::{self, LatexTable, MarkdownSummary};
use crate::scale::ScalePoint;
use crate::settings::BatchSettings;
use crate::template::{Bindings, Template};
use crate::BatchResult;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What a finished batch produced
#[derive(Debug)]
pub struct BatchSummary {
    /// Directory holding every artifact of the batch
    pub out_dir: PathBuf,
    pub results: ResultAggregator,
    pub skipped: Vec<SkippedExperiment>,
}

/// The two report streams of the protocol currently running
struct ProtocolReports {
    protocol: String,
    latex: LatexTable<BufWriter<File>>,
    summary: MarkdownSummary<BufWriter<File>>,
}

impl ProtocolReports {
    fn open(dir: &Path, protocol: &ProtocolDescriptor) -> BatchResult<Self> {
        let latex = File::create(dir.join(protocol.latex_file_name()))?;
        let summary = File::create(dir.join(protocol.markdown_file_name()))?;
        Ok(Self {
            protocol: protocol.name.clone(),
            latex: LatexTable::begin(BufWriter::new(latex), protocol)?,
            summary: MarkdownSummary::begin(BufWriter::new(summary), protocol)?,
        })
    }

    fn push(&mut self, scale: ScalePoint, workers: usize, result: &ResultRecord) -> BatchResult<()> {
        self.latex.push(scale, result)?;
        self.summary.push(scale, workers, result)?;
        Ok(())
    }

    fn close(self) -> BatchResult<()> {
        debug!(
            "Closing reports for {} ({} rows)",
            self.protocol,
            self.latex.rows()
        );
        self.latex.finish()?;
        self.summary.finish()?;
        Ok(())
    }
}

/// Sequential batch runner
#[derive(Debug)]
pub struct BatchDriver<C> {
    settings: BatchSettings,
    checker: C,
    workers: usize,
    stamp: BatchStamp,
    out_dir: PathBuf,
}

impl<C: ModelChecker> BatchDriver<C> {
    /// Artifacts go to `<result_dir>/<stamp>/`
    pub fn new(
        settings: BatchSettings,
        checker: C,
        workers: usize,
        stamp: BatchStamp,
        result_dir: &Path,
    ) -> Self {
        Self {
            out_dir: result_dir.join(stamp.to_string()),
            settings,
            checker,
            workers,
            stamp,
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn checker(&self) -> &C {
        &self.checker
    }

    /// Checker document with the batch-wide values filled in
    fn base_template(&self) -> Template {
        let batch = Bindings::new()
            .with("workers", self.workers)
            .with("distinct_limit", self.settings.distinct_state_limit);
        Template::parse(CONFIG_TEMPLATE).bind(&batch, DEFERRED_SYMBOLS)
    }

    /// Run every experiment in matrix order.
    ///
    /// Per-protocol reports get a row as soon as a run completes. An
    /// interrupted run is logged and left out of every report. Any checker
    /// error aborts the batch.
    pub async fn run(&self) -> BatchResult<BatchSummary> {
        fs::create_dir_all(&self.out_dir)?;
        let matrix = ExperimentMatrix::new(&self.settings.protocols, &self.settings.scales);
        info!(
            "Running {} experiments into {}",
            matrix.total(),
            self.out_dir.display()
        );

        let base = self.base_template();
        let mut results = ResultAggregator::new();
        let mut skipped = Vec::new();
        let mut open: Option<ProtocolReports> = None;

        for (protocol, scale) in matrix {
            let reports = match open.take() {
                Some(current) if current.protocol == protocol.name => open.insert(current),
                previous => {
                    if let Some(done) = previous {
                        done.close()?;
                    }
                    open.insert(ProtocolReports::open(&self.out_dir, protocol)?)
                }
            };

            let experiment = ExperimentConfig::new(
                protocol,
                scale,
                &self.settings.alphabet,
                self.workers,
                self.stamp,
            )?;
            let document = base.fill(&experiment.bindings());

            info!(
                "starting \"{}\" : {} replicas, {} data",
                protocol.name, scale.replicas, scale.data
            );
            match self.checker.check(&document, &experiment).await? {
                CheckOutcome::Skipped => {
                    warn!(
                        "Interrupted: \"{}\" with {} replicas, {} data",
                        protocol.name, scale.replicas, scale.data
                    );
                    skipped.push(SkippedExperiment {
                        protocol: protocol.name.clone(),
                        scale,
                    });
                }
                CheckOutcome::Completed(result) => {
                    reports.push(scale, self.workers, &result)?;
                    for error in &result.errors {
                        debug!("{} {}: error: {}", protocol.name, scale, error);
                    }
                    for warning in &result.warnings {
                        debug!("{} {}: warning: {}", protocol.name, scale, warning);
                    }
                    info!(
                        "errors: {}, warnings: {}, exit_state: {}",
                        result.errors.len(),
                        result.warnings.len(),
                        result.exit_state
                    );
                    results.record(experiment, result);
                }
            }
        }
        if let Some(done) = open.take() {
            done.close()?;
        }

        let combined = File::create(self.out_dir.join(report::COMBINED_FILE))?;
        report::write_combined(
            BufWriter::new(combined),
            &self.settings.scales,
            &self.settings.alphabet,
            &results,
        )?;
        let json = File::create(self.out_dir.join(report::JSON_FILE))?;
        report::write_json(
            BufWriter::new(json),
            self.stamp,
            &self.settings.protocols,
            &self.settings.scales,
            &results,
            &skipped,
        )?;

        info!(
            "Batch finished: {} completed, {} skipped",
            results.len(),
            skipped.len()
        );
        Ok(BatchSummary {
            out_dir: self.out_dir.clone(),
            results,
            skipped,
        })
    }
}
