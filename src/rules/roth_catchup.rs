//! Roth-only catch-up rule for Highly Compensated Employees.
//!
//! From the configured risk year onward, an HCE's catch-up contributions
//! fall under the Roth-only requirement. Every Roth catch-up made by a
//! projected HCE is reported RED so payroll enforcement can be reviewed.

use tracing::debug;

use crate::calculation::{meets_hce_threshold, project};
use crate::config::PreflightConfig;
use crate::models::{CatchUpType, Finding, PayrollRecord, ViolationType};

use super::format_currency;

/// Flags HCEs with a positive Roth catch-up contribution.
///
/// All four conditions must hold for a record to be flagged:
/// - `current_year >= roth_only_risk_year`
/// - `catch_up_contribution > 0`
/// - `catch_up_type` is Roth
/// - projected compensation meets the HCE limit
pub fn check_roth_only_catchup_hce(
    records: &[PayrollRecord],
    config: &PreflightConfig,
) -> Vec<Finding> {
    let current_year = config.hce_threshold.current_year;
    let risk_year = config.catch_up.roth_only_risk_year;
    if current_year < risk_year {
        debug!(
            current_year,
            risk_year, "Roth-only catch-up rule not yet in effect"
        );
        return Vec::new();
    }

    let findings: Vec<Finding> = records
        .iter()
        .filter(|r| r.has_catch_up() && r.catch_up_type == CatchUpType::Roth)
        .filter_map(|record| {
            let projection = project(record, config);
            if !meets_hce_threshold(projection.amount, config) {
                return None;
            }
            debug!(
                employee_id = %record.employee_id,
                projected = %projection.amount.round_dp(2),
                method = %projection.method_used,
                "Roth catch-up by projected HCE"
            );
            let description = format!(
                "Catch-up contributions must be Roth for this projected HCE under SECURE 2.0 \
                 (Roth-only requirement). Review payroll enforcement. \
                 Projected annual compensation: {}",
                format_currency(projection.amount)
            );
            Some(
                Finding::new(record, ViolationType::RothOnlyCatchupHce, description)
                    .with_compensation(projection.amount, record),
            )
        })
        .collect();

    debug!(count = findings.len(), "Roth-only catch-up rule complete");
    findings
}
