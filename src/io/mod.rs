//! File boundary of the preflight engine.
//!
//! Readers turn CSV text into validated models, the writer turns findings
//! back into CSV, and the summary renders the console lines. The engine
//! itself never touches the filesystem.

mod findings_csv;
mod hours_csv;
mod payroll_csv;
mod summary;

pub use findings_csv::{FINDINGS_COLUMNS, write_findings, write_findings_csv};
pub use hours_csv::{parse_hours_csv, read_hours_csv};
pub use payroll_csv::{REQUIRED_COLUMNS, parse_payroll_csv, read_payroll_csv};
pub use summary::{print_summary, summary_lines};

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{PreflightError, PreflightResult};

/// Opens an input file, separating "not there" from "not readable".
fn open_input(path: &Path) -> PreflightResult<File> {
    File::open(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => PreflightError::InputNotFound {
            path: path.display().to_string(),
        },
        _ => PreflightError::InputParseError {
            path: path.display().to_string(),
            message: err.to_string(),
        },
    })
}
