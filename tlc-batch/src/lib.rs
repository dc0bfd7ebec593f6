//! TLC Batch Runner
//!
//! Model checks a set of CRDT protocol specifications with TLC across a grid
//! of replica/data scale points, one run at a time, and renders the results
//! as per-protocol LaTeX and markdown tables plus a combined report.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use tlc_batch::{BatchDriver, BatchSettings, BatchStamp, TlcChecker};
//!
//! # async fn run() -> tlc_batch::BatchResult<()> {
//! let settings = BatchSettings::load(None)?;
//! let checker = TlcChecker::new(&settings.tlc);
//! let driver = BatchDriver::new(settings, checker, 4, BatchStamp::now(), Path::new("results"));
//!
//! let summary = driver.run().await?;
//! println!("{} completed, {} skipped", summary.results.len(), summary.skipped.len());
//! # Ok(())
//! # }
//! ```
//!
//! Pressing Ctrl+C while TLC runs abandons only that run; the batch moves on
//! to the next experiment and the interrupted one is left out of every report.

pub mod aggregate;
pub mod checker;
pub mod driver;
pub mod error;
pub mod experiment;
pub mod matrix;
pub mod protocol;
pub mod report;
pub mod scale;
pub mod settings;
pub mod template;

pub use aggregate::{AggregateEntry, ResultAggregator, SkippedExperiment};
pub use checker::{CheckOutcome, ExitState, ModelChecker, ResultRecord, TlcChecker};
pub use driver::{BatchDriver, BatchSummary};
pub use error::{BatchError, BatchResult};
pub use experiment::{BatchStamp, ExperimentConfig};
pub use matrix::ExperimentMatrix;
pub use protocol::ProtocolDescriptor;
pub use scale::{Alphabet, ScalePoint};
pub use settings::{BatchSettings, TlcSettings};
pub use template::{Bindings, Template};
