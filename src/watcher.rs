//! Drop-folder watcher.
//!
//! Polls an inbox for `*.csv` payroll files and evaluates each one
//! in-process against an explicit configuration file. Every run gets its
//! own output folder `<outputs>/<YYYYmmdd_HHMMSS>_<stem>/` holding the
//! findings CSV (when there are findings) and a `run_summary.txt`.
//! Evaluated files move to `processed/`; files that could not be evaluated
//! move to `failed/`.
//!
//! The summary reports the legacy verdict consumed by downstream tooling:
//! GREEN and YELLOW are `SAFE`, RED is `NOT SAFE`.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use chrono::Local;
use tracing::{debug, error, info, warn};

use crate::config::ConfigLoader;
use crate::engine::evaluate;
use crate::error::{PreflightError, PreflightResult};
use crate::io::{read_hours_csv, read_payroll_csv, summary_lines, write_findings_csv};
use crate::models::{ComplianceStatus, EvaluationResult, HoursHistory};

/// File name of the findings CSV inside each run folder.
pub const FINDINGS_FILE_NAME: &str = "exceptions.csv";

/// File name of the run summary inside each run folder.
pub const SUMMARY_FILE_NAME: &str = "run_summary.txt";

/// Maps a verdict to the legacy SAFE / NOT SAFE label.
pub fn legacy_status(status: ComplianceStatus) -> &'static str {
    match status {
        ComplianceStatus::Green | ComplianceStatus::Yellow => "SAFE",
        ComplianceStatus::Red => "NOT SAFE",
    }
}

/// The folders the watcher works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatcherPaths {
    /// Where new payroll files are dropped.
    pub inbox: PathBuf,
    /// Where evaluated files are moved.
    pub processed: PathBuf,
    /// Where files that could not be evaluated are moved.
    pub failed: PathBuf,
    /// Parent of the per-run output folders.
    pub outputs: PathBuf,
}

impl WatcherPaths {
    /// Uses `inbox`, `processed`, `failed` and `preflight_outputs` under `root`.
    pub fn under<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            inbox: root.join("inbox"),
            processed: root.join("processed"),
            failed: root.join("failed"),
            outputs: root.join("preflight_outputs"),
        }
    }

    /// Creates any folder that does not exist yet.
    pub fn ensure_exists(&self) -> PreflightResult<()> {
        for dir in [&self.inbox, &self.processed, &self.failed, &self.outputs] {
            fs::create_dir_all(dir).map_err(|err| output_error(dir, err))?;
        }
        Ok(())
    }
}

/// What happened to one inbox file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The batch was evaluated; the file moved to `processed/`.
    Evaluated {
        /// The verdict.
        status: ComplianceStatus,
        /// The findings CSV, when one was written.
        findings_csv: Option<PathBuf>,
    },
    /// Loading or validating failed; the file moved to `failed/`.
    Failed {
        /// The error message recorded in the summary.
        error: String,
    },
}

/// The result of processing one inbox file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    /// Where the input file ended up.
    pub moved_to: PathBuf,
    /// The run folder holding the summary.
    pub run_dir: PathBuf,
    /// Evaluation outcome.
    pub outcome: FileOutcome,
}

/// Polls an inbox and evaluates each new payroll file once.
#[derive(Debug)]
pub struct InboxWatcher {
    paths: WatcherPaths,
    config_path: PathBuf,
    hours_path: Option<PathBuf>,
    interval: Duration,
    seen: HashSet<OsString>,
}

impl InboxWatcher {
    /// Creates a watcher. The configuration is re-read for every file so
    /// edits take effect without a restart.
    pub fn new(
        paths: WatcherPaths,
        config_path: impl Into<PathBuf>,
        hours_path: Option<PathBuf>,
        interval: Duration,
    ) -> Self {
        Self {
            paths,
            config_path: config_path.into(),
            hours_path,
            interval,
            seen: HashSet::new(),
        }
    }

    /// The folders this watcher uses.
    pub fn paths(&self) -> &WatcherPaths {
        &self.paths
    }

    /// Polls forever. Only folder creation failures end the loop.
    pub fn run(&mut self) -> PreflightResult<()> {
        self.paths.ensure_exists()?;
        info!(
            inbox = %self.paths.inbox.display(),
            config = %self.config_path.display(),
            interval_secs = self.interval.as_secs(),
            "Watching inbox for new CSV files"
        );
        loop {
            if let Err(err) = self.poll_once() {
                error!(error = %err, "Inbox poll failed");
            }
            thread::sleep(self.interval);
        }
    }

    /// Processes every CSV file in the inbox not seen before, in name order.
    pub fn poll_once(&mut self) -> PreflightResult<Vec<ProcessedFile>> {
        self.paths.ensure_exists()?;
        let mut candidates = self.new_csv_files()?;
        candidates.sort();

        let mut processed = Vec::with_capacity(candidates.len());
        for path in candidates {
            if let Some(name) = path.file_name() {
                self.seen.insert(name.to_os_string());
            }
            info!(file = %path.display(), "Found new file");
            match self.process_file(&path) {
                Ok(result) => processed.push(result),
                Err(err) => error!(file = %path.display(), error = %err, "Could not process file"),
            }
        }
        Ok(processed)
    }

    fn new_csv_files(&self) -> PreflightResult<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.paths.inbox).map_err(|err| {
            PreflightError::InputParseError {
                path: self.paths.inbox.display().to_string(),
                message: err.to_string(),
            }
        })?;

        Ok(entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
            .filter(|path| {
                path.file_name()
                    .is_some_and(|name| !self.seen.contains(name))
            })
            .collect())
    }

    /// Evaluates one file, writes its run folder and moves it out of the inbox.
    ///
    /// A file whose run output cannot be written still leaves the inbox: it
    /// is moved to `failed/` with the write error as its outcome.
    pub fn process_file(&self, path: &Path) -> PreflightResult<ProcessedFile> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let run_dir = self.paths.outputs.join(format!(
            "{}_{}",
            Local::now().format("%Y%m%d_%H%M%S"),
            stem
        ));

        let outcome = match self.write_run(path, &file_name, &run_dir) {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(
                    file = %file_name,
                    run_dir = %run_dir.display(),
                    error = %err,
                    "Could not write run output"
                );
                FileOutcome::Failed {
                    error: err.to_string(),
                }
            }
        };

        let target_dir = match outcome {
            FileOutcome::Evaluated { .. } => &self.paths.processed,
            FileOutcome::Failed { .. } => &self.paths.failed,
        };
        let moved_to = move_file(path, target_dir)?;

        match &outcome {
            FileOutcome::Evaluated { status, .. } => info!(
                file = %file_name,
                status = %status,
                legacy_status = legacy_status(*status),
                run_dir = %run_dir.display(),
                "Processed file"
            ),
            FileOutcome::Failed { .. } => info!(
                file = %file_name,
                run_dir = %run_dir.display(),
                "Moved file to failed"
            ),
        }

        Ok(ProcessedFile {
            moved_to,
            run_dir,
            outcome,
        })
    }

    /// Creates the run folder, evaluates the file and writes its artifacts.
    /// Evaluation errors become a `Failed` outcome; write errors are returned.
    fn write_run(
        &self,
        path: &Path,
        file_name: &str,
        run_dir: &Path,
    ) -> PreflightResult<FileOutcome> {
        fs::create_dir_all(run_dir).map_err(|err| output_error(run_dir, err))?;

        match self.evaluate_file(path) {
            Ok(result) => {
                let findings_csv = if result.findings.is_empty() {
                    None
                } else {
                    let csv_path = run_dir.join(FINDINGS_FILE_NAME);
                    write_findings_csv(&csv_path, &result.findings)?;
                    Some(csv_path)
                };
                let summary = run_summary(file_name, &result, findings_csv.as_deref());
                write_summary(run_dir, &summary)?;
                Ok(FileOutcome::Evaluated {
                    status: result.status,
                    findings_csv,
                })
            }
            Err(err) => {
                warn!(file = %file_name, error = %err, "Evaluation failed");
                write_summary(run_dir, &failure_summary(file_name, &err))?;
                Ok(FileOutcome::Failed {
                    error: err.to_string(),
                })
            }
        }
    }

    fn evaluate_file(&self, path: &Path) -> PreflightResult<EvaluationResult> {
        let config = ConfigLoader::load(&self.config_path)?.into_config();
        let batch = read_payroll_csv(path)?;
        let hours = if config.ltpt.enabled {
            self.load_hours()
        } else {
            None
        };
        Ok(evaluate(&batch, hours.as_ref(), &config))
    }

    /// A missing or unreadable hours file disables LTPT for the run rather
    /// than failing it.
    fn load_hours(&self) -> Option<HoursHistory> {
        let path = self.hours_path.as_ref()?;
        match read_hours_csv(path) {
            Ok(history) => Some(history),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "LTPT enabled but hours history unavailable; skipping LTPT"
                );
                None
            }
        }
    }
}

fn run_summary(file_name: &str, result: &EvaluationResult, findings_csv: Option<&Path>) -> String {
    let mut lines = vec![
        format!("Input filename: {file_name}"),
        format!("Status: {}", legacy_status(result.status)),
        format!("RED Findings: {}", result.violation_count),
        format!("YELLOW Findings: {}", result.potential_count),
    ];
    if !result.top_employee_ids.is_empty() {
        lines.push(format!(
            "Top employee IDs: {}",
            result.top_employee_ids.join(", ")
        ));
    }
    lines.push(format!(
        "Output CSV path: {}",
        findings_csv
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    ));
    lines.push(String::new());
    lines.push("--- Console Output ---".to_string());
    lines.extend(summary_lines(result, findings_csv));

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn failure_summary(file_name: &str, err: &PreflightError) -> String {
    format!("Input filename: {file_name}\nStatus: ERROR\nError: {err}\n")
}

fn write_summary(run_dir: &Path, text: &str) -> PreflightResult<()> {
    let path = run_dir.join(SUMMARY_FILE_NAME);
    fs::write(&path, text).map_err(|err| output_error(&path, err))?;
    debug!(path = %path.display(), "Wrote run summary");
    Ok(())
}

/// Moves `path` into `dir`, keeping its name.
fn move_file(path: &Path, dir: &Path) -> PreflightResult<PathBuf> {
    let name = path.file_name().unwrap_or(path.as_os_str());
    let destination = dir.join(name);
    if fs::rename(path, &destination).is_err() {
        // rename fails across filesystems
        fs::copy(path, &destination).map_err(|err| output_error(&destination, err))?;
        fs::remove_file(path).map_err(|err| output_error(path, err))?;
    }
    Ok(destination)
}

fn output_error(path: &Path, err: std::io::Error) -> PreflightError {
    PreflightError::OutputError {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
