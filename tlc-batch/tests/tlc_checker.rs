#![cfg(unix)]
//! `TlcChecker` against shell scripts standing in for TLC.
//!
//! The scripts run through `sh` so nothing has to be made executable.

use futures::FutureExt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tlc_batch::checker::{InterruptSource, CONFIG_TEMPLATE, DEFERRED_SYMBOLS};
use tlc_batch::protocol::default_protocols;
use tlc_batch::{
    Alphabet, BatchError, BatchStamp, Bindings, CheckOutcome, ExitState, ExperimentConfig,
    ModelChecker, ScalePoint, Template, TlcChecker, TlcSettings,
};

const TOOL_OUTPUT: &str = "\
@!@!@STARTMSG 2185:0 @!@!@
Starting... (2021-03-04 05:06:07)
@!@!@ENDMSG 2185 @!@!@
@!@!@STARTMSG 2110:1 @!@!@
Invariant SEC is violated.
@!@!@ENDMSG 2110 @!@!@
@!@!@STARTMSG 2199:0 @!@!@
1,234 states generated, 567 distinct states found, 0 states left on queue.
@!@!@ENDMSG 2199 @!@!@
@!@!@STARTMSG 2194:0 @!@!@
The depth of the complete state graph search is 12.
@!@!@ENDMSG 2194 @!@!@";

/// A workspace with a target spec under `spec/` and room for a fake TLC
struct Fixture {
    root: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("spec")).unwrap();
        fs::write(root.path().join("spec/StateAWSet.tla"), "---- MODULE StateAWSet ----\n====\n").unwrap();
        Self { root }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    fn spec_dir(&self) -> PathBuf {
        self.path("spec")
    }

    /// Write `body` as the fake TLC and return a checker running it
    fn checker(&self, body: &str, interrupt: InterruptSource) -> TlcChecker {
        let script = self.path("fake-tlc.sh");
        fs::write(&script, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let settings = TlcSettings {
            program: "sh".to_string(),
            args: vec![script.display().to_string()],
        };
        TlcChecker::new(&settings).with_interrupt(interrupt)
    }

    fn experiment(&self) -> (String, ExperimentConfig) {
        let protocol = tlc_batch::ProtocolDescriptor {
            target: self.path("spec/StateAWSet.tla"),
            ..default_protocols()[0].clone()
        };
        let experiment =
            ExperimentConfig::new(&protocol, ScalePoint::new(2, 3), &Alphabet::default(), 2, BatchStamp::now())
                .unwrap();
        let batch = Bindings::new().with("workers", 2).with("distinct_limit", 1000);
        let document = Template::parse(CONFIG_TEMPLATE)
            .bind(&batch, DEFERRED_SYMBOLS)
            .fill(&experiment.bindings());
        (document, experiment)
    }
}

fn never() -> InterruptSource {
    Arc::new(|| futures::future::pending().boxed())
}

fn after(delay: Duration) -> InterruptSource {
    Arc::new(move || tokio::time::sleep(delay).boxed())
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_completed_run_is_parsed_and_cleaned_up() {
    let fixture = Fixture::new();
    let body = format!(
        "echo \"$@\" > '{args}'\nls > '{seen}'\ncat <<'EOF'\n{output}\nEOF\necho 'java.lang.OutOfMemoryError' >&2\nexit 12",
        args = fixture.path("args.txt").display(),
        seen = fixture.path("seen.txt").display(),
        output = TOOL_OUTPUT,
    );
    let checker = fixture.checker(&body, never());
    let (document, experiment) = fixture.experiment();

    let outcome = checker.check(&document, &experiment).await.unwrap();
    let record = match outcome {
        CheckOutcome::Completed(record) => record,
        CheckOutcome::Skipped => panic!("run was not interrupted"),
    };

    assert_eq!(record.exit_state, ExitState::SafetyViolation);
    assert_eq!(record.total_states, 1234);
    assert_eq!(record.distinct_states, 567);
    assert_eq!(record.diameter, 12);
    assert_eq!(record.start_time.to_string(), "2021-03-04 05:06:07");
    assert_eq!(
        record.errors,
        vec!["Invariant SEC is violated.".to_string(), "java.lang.OutOfMemoryError".to_string()]
    );
    assert!(record.warnings.is_empty());

    let args = fs::read_to_string(fixture.path("args.txt")).unwrap();
    assert!(args.starts_with("-tool -workers 2 -config MC_"));
    assert!(args.trim_end().ends_with(".tla"));

    // the generated module and cfg existed beside the target while TLC ran
    let seen = fs::read_to_string(fixture.path("seen.txt")).unwrap();
    assert!(seen.lines().any(|name| name.starts_with("MC_") && name.ends_with(".tla")));
    assert!(seen.lines().any(|name| name.starts_with("MC_") && name.ends_with(".cfg")));
    assert_eq!(dir_entries(&fixture.spec_dir()), vec!["StateAWSet.tla"]);
}

#[tokio::test]
async fn test_interrupt_skips_and_cleans_up() {
    let fixture = Fixture::new();
    let checker = fixture.checker("exec sleep 30", after(Duration::from_millis(200)));
    let (document, experiment) = fixture.experiment();

    let started = Instant::now();
    let outcome = checker.check(&document, &experiment).await.unwrap();

    assert_eq!(outcome, CheckOutcome::Skipped);
    assert!(started.elapsed() < Duration::from_secs(20));
    assert_eq!(dir_entries(&fixture.spec_dir()), vec!["StateAWSet.tla"]);
}

#[tokio::test]
async fn test_signal_terminated_run_counts_as_skipped() {
    let fixture = Fixture::new();
    let checker = fixture.checker("kill -9 $$", never());
    let (document, experiment) = fixture.experiment();

    let outcome = checker.check(&document, &experiment).await.unwrap();
    assert_eq!(outcome, CheckOutcome::Skipped);
}

#[tokio::test]
async fn test_clean_exit_without_stats() {
    let fixture = Fixture::new();
    let checker = fixture.checker("echo 'not tool mode output' >&2\nexit 0", never());
    let (document, experiment) = fixture.experiment();

    let outcome = checker.check(&document, &experiment).await.unwrap();
    let CheckOutcome::Completed(record) = outcome else {
        panic!("run was not interrupted");
    };
    assert_eq!(record.exit_state, ExitState::Success);
    assert_eq!(record.total_states, 0);
    // stderr only counts as an error for failed runs
    assert!(record.errors.is_empty());
}

#[tokio::test]
async fn test_missing_program_is_a_launch_error() {
    let fixture = Fixture::new();
    let settings = TlcSettings {
        program: fixture.path("no-such-tlc").display().to_string(),
        args: vec![],
    };
    let checker = TlcChecker::new(&settings).with_interrupt(never());
    let (document, experiment) = fixture.experiment();

    let err = checker.check(&document, &experiment).await.unwrap_err();
    assert!(matches!(err, BatchError::Launch { .. }));
    assert_eq!(dir_entries(&fixture.spec_dir()), vec!["StateAWSet.tla"]);
}

#[tokio::test]
async fn test_malformed_document_is_rejected() {
    let fixture = Fixture::new();
    let checker = fixture.checker("exit 0", never());
    let (_, experiment) = fixture.experiment();

    let err = checker
        .check("[options]\nmodel name: no target\n", &experiment)
        .await
        .unwrap_err();
    assert!(matches!(err, BatchError::Document { .. }));
}
