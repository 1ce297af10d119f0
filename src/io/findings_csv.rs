//! Findings CSV writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::error::{PreflightError, PreflightResult};
use crate::models::Finding;

/// Output columns, in order.
pub const FINDINGS_COLUMNS: [&str; 10] = [
    "employee_id",
    "employee_name",
    "violation_type",
    "violation_description",
    "projected_annual_compensation",
    "catch_up_amount",
    "catch_up_type",
    "pay_period_start",
    "pay_period_end",
    "severity",
];

/// One CSV row; field order matches [`FINDINGS_COLUMNS`].
#[derive(Serialize)]
struct FindingRow<'a> {
    employee_id: &'a str,
    employee_name: &'a str,
    violation_type: &'static str,
    violation_description: &'a str,
    projected_annual_compensation: String,
    catch_up_amount: String,
    catch_up_type: &'static str,
    pay_period_start: String,
    pay_period_end: String,
    severity: &'static str,
}

impl<'a> From<&'a Finding> for FindingRow<'a> {
    fn from(finding: &'a Finding) -> Self {
        Self {
            employee_id: &finding.employee_id,
            employee_name: &finding.employee_name,
            violation_type: finding.violation_type.as_str(),
            violation_description: &finding.violation_description,
            projected_annual_compensation: money(finding.projected_annual_compensation),
            catch_up_amount: money(finding.catch_up_amount),
            catch_up_type: finding.catch_up_type.as_str(),
            pay_period_start: finding.pay_period_start.format("%Y-%m-%d").to_string(),
            pay_period_end: finding.pay_period_end.format("%Y-%m-%d").to_string(),
            severity: finding.severity.as_str(),
        }
    }
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Writes findings to `path`, replacing any existing file.
pub fn write_findings_csv<P: AsRef<Path>>(path: P, findings: &[Finding]) -> PreflightResult<()> {
    let path = path.as_ref();
    let output_error = |message: String| PreflightError::OutputError {
        path: path.display().to_string(),
        message,
    };

    let file = File::create(path).map_err(|err| output_error(err.to_string()))?;
    write_findings(file, findings).map_err(|err| output_error(err.to_string()))?;
    info!(path = %path.display(), rows = findings.len(), "Wrote findings CSV");
    Ok(())
}

/// Writes the header and one row per finding to any writer.
pub fn write_findings<W: Write>(writer: W, findings: &[Finding]) -> csv::Result<()> {
    let mut writer = Writer::from_writer(writer);
    if findings.is_empty() {
        writer.write_record(FINDINGS_COLUMNS)?;
    }
    for finding in findings {
        writer.serialize(FindingRow::from(finding))?;
    }
    writer.flush()?;
    Ok(())
}
