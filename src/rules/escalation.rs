//! Automatic escalation heuristic.
//!
//! An enrolled employee still deferring below the plan default once the
//! escalation month has been reached may have missed a scheduled increase.
//! The payroll data cannot confirm the plan schedule, so findings are
//! worded as advisory.

use chrono::Datelike;
use tracing::debug;

use crate::config::PreflightConfig;
use crate::models::{Finding, PayrollRecord, PayrollSchema, ViolationType};

use super::format_percent;

/// Flags enrolled employees below the default rate on or after the
/// escalation effective month.
///
/// Only the month of `pay_period_end` is compared; the year is not checked.
pub fn check_escalation_miss(
    records: &[PayrollRecord],
    schema: PayrollSchema,
    config: &PreflightConfig,
) -> Vec<Finding> {
    let effective_month = config.escalation.effective_month;
    if !config.escalation.enabled {
        debug!("Escalation rule disabled");
        return Vec::new();
    }
    if !schema.auto_enroll_columns {
        debug!("Auto-enroll columns absent, skipping escalation rule");
        return Vec::new();
    }

    let default_rate = config.auto_enroll.default_rate;
    let findings: Vec<Finding> = records
        .iter()
        .filter(|record| record.has_deferral_start())
        .filter(|record| record.pay_period_end.month() >= effective_month)
        .filter_map(|record| {
            let rate = record.parsed_deferral_rate()?;
            if rate >= default_rate {
                return None;
            }
            let description = format!(
                "Possible escalation miss detected: deferral_rate={} is below default={} \
                 after escalation effective month ({}). This may indicate an escalation issue; \
                 please verify plan schedule and employee election history to confirm.",
                format_percent(rate),
                format_percent(default_rate),
                effective_month
            );
            Some(Finding::new(
                record,
                ViolationType::EscalationPossibleMiss,
                description,
            ))
        })
        .collect();

    debug!(
        count = findings.len(),
        effective_month, "Escalation rule complete"
    );
    findings
}
