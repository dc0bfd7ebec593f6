//! Running TLC as a child process.

use super::document::CheckerDocument;
use super::output::RunSummary;
use super::{CheckOutcome, ExitState, ModelChecker, ResultRecord};
use crate::experiment::ExperimentConfig;
use crate::settings::TlcSettings;
use crate::{BatchError, BatchResult};
use async_trait::async_trait;
use chrono::Local;
use futures::future::BoxFuture;
use std::io::{Cursor, Write};
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Produces a future that resolves when the current run should be abandoned.
/// Called once per run.
pub type InterruptSource = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Interrupt on Ctrl+C
pub fn ctrl_c() -> InterruptSource {
    Arc::new(|| {
        Box::pin(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C, runs cannot be interrupted: {}", e);
                futures::future::pending::<()>().await;
            }
        })
    })
}

/// [`ModelChecker`] backed by the TLC command line
#[derive(Clone)]
pub struct TlcChecker {
    program: String,
    args: Vec<String>,
    interrupt: InterruptSource,
}

impl std::fmt::Debug for TlcChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlcChecker")
            .field("program", &self.program)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl TlcChecker {
    pub fn new(settings: &TlcSettings) -> Self {
        Self {
            program: settings.program.clone(),
            args: settings.args.clone(),
            interrupt: ctrl_c(),
        }
    }

    /// Replace the Ctrl+C listener
    pub fn with_interrupt(mut self, interrupt: InterruptSource) -> Self {
        self.interrupt = interrupt;
        self
    }

    fn launch(
        &self,
        dir: &Path,
        module_file: &str,
        cfg_file: &str,
        metadir: &Path,
        workers: usize,
    ) -> BatchResult<Child> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg("-tool")
            .arg("-workers")
            .arg(workers.to_string())
            .arg("-config")
            .arg(cfg_file)
            .arg("-metadir")
            .arg(metadir)
            .arg(module_file)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        debug!("Launching {:?}", command);

        command.spawn().map_err(|source| BatchError::Launch {
            program: self.program.clone(),
            source,
        })
    }
}

#[async_trait]
impl ModelChecker for TlcChecker {
    async fn check(
        &self,
        document: &str,
        experiment: &ExperimentConfig,
    ) -> BatchResult<CheckOutcome> {
        let doc = CheckerDocument::parse(Cursor::new(document))?;
        let dir = doc.target_dir().to_path_buf();

        // Generated files sit next to the target so TLC resolves its EXTENDS.
        // They are removed when these handles drop, interrupted or not.
        let mut module_file = tempfile::Builder::new()
            .prefix("MC_")
            .suffix(".tla")
            .tempfile_in(&dir)?;
        let module_file_name = file_name(module_file.path())?;
        let module_name = module_file_name.trim_end_matches(".tla").to_string();
        module_file.write_all(doc.render_module(&module_name)?.as_bytes())?;
        module_file.flush()?;

        let mut cfg_file = tempfile::Builder::new()
            .prefix(&format!("{}_", module_name))
            .suffix(".cfg")
            .tempfile_in(&dir)?;
        cfg_file.write_all(doc.render_cfg().as_bytes())?;
        cfg_file.flush()?;
        let cfg_file_name = file_name(cfg_file.path())?;

        let metadir = tempfile::Builder::new().prefix("tlc-states-").tempdir()?;
        let workers = doc.workers.unwrap_or(experiment.workers);

        let launched_at = Local::now().naive_local();
        let started = Instant::now();
        let mut child = self.launch(&dir, &module_file_name, &cfg_file_name, metadir.path(), workers)?;

        let finished = tokio::select! {
            biased;
            _ = (self.interrupt)() => None,
            result = collect_output(&mut child) => Some(result?),
        };

        let (status, stdout, stderr) = match finished {
            Some(finished) => finished,
            None => {
                if let Err(e) = child.kill().await {
                    warn!("Failed to stop interrupted TLC run for {}: {}", experiment.model_name, e);
                }
                return Ok(CheckOutcome::Skipped);
            }
        };
        let elapsed = started.elapsed();

        let code = match status.code() {
            Some(code) => code,
            // terminated by a signal, most likely the same Ctrl+C
            None => return Ok(CheckOutcome::Skipped),
        };

        let summary = RunSummary::from_output(&stdout);
        let exit_state = ExitState::from_code(code);
        let mut errors = summary.errors;
        let stderr = stderr.trim();
        if !exit_state.is_success() && !stderr.is_empty() {
            errors.push(stderr.to_string());
        }

        Ok(CheckOutcome::Completed(ResultRecord {
            start_time: summary.start_time.unwrap_or(launched_at),
            elapsed,
            diameter: summary.diameter,
            total_states: summary.total_states,
            distinct_states: summary.distinct_states,
            errors,
            warnings: summary.warnings,
            exit_state,
        }))
    }
}

fn file_name(path: &Path) -> BatchResult<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(String::from)
        .ok_or_else(|| BatchError::InvalidTarget(path.to_path_buf()))
}

/// Drain both pipes while waiting for exit
async fn collect_output(child: &mut Child) -> std::io::Result<(ExitStatus, String, String)> {
    let mut stdout = child.stdout.take();
    let mut stderr = child.stderr.take();

    let read_stdout = async {
        let mut buf = Vec::new();
        if let Some(pipe) = stdout.as_mut() {
            pipe.read_to_end(&mut buf).await?;
        }
        Ok::<_, std::io::Error>(String::from_utf8_lossy(&buf).into_owned())
    };
    let read_stderr = async {
        let mut buf = Vec::new();
        if let Some(pipe) = stderr.as_mut() {
            pipe.read_to_end(&mut buf).await?;
        }
        Ok::<_, std::io::Error>(String::from_utf8_lossy(&buf).into_owned())
    };

    let (stdout, stderr, status) = tokio::try_join!(read_stdout, read_stderr, child.wait())?;
    Ok((status, stdout, stderr))
}
