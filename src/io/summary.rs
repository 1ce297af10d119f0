//! Console summary of an evaluation.

use std::path::Path;

use crate::models::EvaluationResult;

/// Renders the summary lines printed after a run.
///
/// `output` is the findings CSV path, when one was written.
///
/// # Example
///
/// ```
/// use secure_preflight::io::summary_lines;
/// use secure_preflight::models::{ComplianceStatus, EvaluationResult};
///
/// let result = EvaluationResult {
///     status: ComplianceStatus::Green,
///     exit_code: 0,
///     violation_count: 0,
///     potential_count: 0,
///     top_employee_ids: vec![],
///     findings: vec![],
/// };
/// assert_eq!(
///     summary_lines(&result, None),
///     vec!["STATUS: GREEN", "RED Findings: 0", "YELLOW Findings: 0"]
/// );
/// ```
pub fn summary_lines(result: &EvaluationResult, output: Option<&Path>) -> Vec<String> {
    let mut lines = vec![
        format!("STATUS: {}", result.status),
        format!("RED Findings: {}", result.violation_count),
        format!("YELLOW Findings: {}", result.potential_count),
    ];
    if !result.top_employee_ids.is_empty() {
        lines.push(format!(
            "Top employee IDs: {}",
            result.top_employee_ids.join(", ")
        ));
    }
    if let Some(path) = output {
        lines.push(format!("Output: {}", path.display()));
    }
    lines
}

/// Prints the summary to stdout.
pub fn print_summary(result: &EvaluationResult, output: Option<&Path>) {
    for line in summary_lines(result, output) {
        println!("{line}");
    }
}
