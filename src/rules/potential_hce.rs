//! Informational potential-HCE rule.

use tracing::debug;

use crate::calculation::{meets_hce_threshold, project};
use crate::config::PreflightConfig;
use crate::models::{Finding, PayrollRecord, ViolationType};

use super::format_currency;

/// Flags every record whose projected compensation meets the HCE limit.
///
/// Always runs, independent of catch-up activity. These findings also pad
/// the top employee list when there are fewer than ten hard violations.
pub fn check_potential_hce(records: &[PayrollRecord], config: &PreflightConfig) -> Vec<Finding> {
    let findings: Vec<Finding> = records
        .iter()
        .filter_map(|record| {
            let projection = project(record, config);
            if !meets_hce_threshold(projection.amount, config) {
                return None;
            }
            let description = format!(
                "Potential HCE based on projected annual compensation: {}",
                format_currency(projection.amount)
            );
            Some(
                Finding::new(record, ViolationType::PotentialHce, description)
                    .with_compensation(projection.amount, record),
            )
        })
        .collect();

    debug!(count = findings.len(), "Potential HCE rule complete");
    findings
}
