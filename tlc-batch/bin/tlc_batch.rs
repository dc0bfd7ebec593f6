//! Runs the TLC model checking batch and writes its reports.
//!
//! Reports land in `<RESULT_DIR>/<YYYYmmdd-HHMMSS>/`. Ctrl+C during a run
//! skips that experiment only.

use anyhow::Context;
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tlc_batch::{BatchDriver, BatchSettings, BatchStamp, TlcChecker};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "tlc-batch",
    version,
    about = "Model check CRDT protocol specifications with TLC across replica/data scales"
)]
struct Cli {
    /// Directory receiving the timestamped result folder
    result_dir: PathBuf,

    /// TLC worker threads (defaults to the available parallelism)
    workers: Option<NonZeroUsize>,

    /// TOML file overriding the built-in batch settings
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// TLC executable, overriding the settings
    #[arg(long, value_name = "PROGRAM")]
    tlc: Option<String>,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    print_settings: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = BatchSettings::load(cli.settings.as_deref()).context("Failed to load batch settings")?;
    if let Some(program) = cli.tlc {
        settings.tlc.program = program;
        settings.validate()?;
    }
    if cli.print_settings {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    let workers = cli
        .workers
        .or_else(|| std::thread::available_parallelism().ok())
        .map_or(1, NonZeroUsize::get);
    let stamp = BatchStamp::now();
    let checker = TlcChecker::new(&settings.tlc);
    let driver = BatchDriver::new(settings, checker, workers, stamp, &cli.result_dir);
    info!("Batch {} with {} workers", stamp, workers);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    let summary = runtime
        .block_on(driver.run())
        .with_context(|| format!("Batch {} failed", stamp))?;

    println!(
        "{} experiments completed, {} skipped; reports in {}",
        summary.results.len(),
        summary.skipped.len(),
        summary.out_dir.display()
    );
    Ok(())
}
