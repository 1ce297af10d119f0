//! Auto-enrollment rules.
//!
//! Both rules need the optional `hire_date`, `deferral_rate` and
//! `deferral_start_date` columns. When the batch schema does not declare
//! them the rules return no findings.
//!
//! - **Auto-enroll miss** (RED, behind `auto_enroll_enabled`): the employee
//!   passed the enrollment date but has no deferral start or a zero rate.
//! - **Below default** (YELLOW, always on): an enrolled employee defers
//!   less than the plan default.

use chrono::Days;
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::PreflightConfig;
use crate::models::{Finding, PayrollRecord, PayrollSchema, ViolationType};

use super::format_percent;

/// Flags employees past their auto-enrollment date with no active deferral.
///
/// Records with a missing or unparseable hire date are skipped, as are
/// records whose pay period ends before `hire_date + wait_days`.
pub fn check_auto_enroll_miss(
    records: &[PayrollRecord],
    schema: PayrollSchema,
    config: &PreflightConfig,
) -> Vec<Finding> {
    let settings = &config.auto_enroll;
    if !settings.enabled {
        debug!("Auto-enroll miss rule disabled");
        return Vec::new();
    }
    if !schema.auto_enroll_columns {
        debug!("Auto-enroll columns absent, skipping auto-enroll miss rule");
        return Vec::new();
    }

    let findings: Vec<Finding> = records
        .iter()
        .filter_map(|record| {
            let hire_date = record.parsed_hire_date()?;
            let enrollment_date =
                hire_date.checked_add_days(Days::new(u64::from(settings.wait_days)))?;
            if record.pay_period_end < enrollment_date {
                return None;
            }

            let deferring =
                record.has_deferral_start() && record.deferral_rate_or_zero() != Decimal::ZERO;
            if deferring {
                return None;
            }

            let description = format!(
                "Auto-enrollment miss: Employee hired {}, eligible from {}, \
                 but no deferral start date or deferral rate is 0",
                hire_date.format("%Y-%m-%d"),
                enrollment_date.format("%Y-%m-%d")
            );
            Some(Finding::new(record, ViolationType::AutoEnrollMiss, description))
        })
        .collect();

    debug!(count = findings.len(), "Auto-enroll miss rule complete");
    findings
}

/// Flags enrolled employees deferring below the plan default rate.
pub fn check_auto_enroll_below_default(
    records: &[PayrollRecord],
    schema: PayrollSchema,
    config: &PreflightConfig,
) -> Vec<Finding> {
    if !schema.auto_enroll_columns {
        debug!("Auto-enroll columns absent, skipping below-default rule");
        return Vec::new();
    }

    let default_rate = config.auto_enroll.default_rate;
    let findings: Vec<Finding> = records
        .iter()
        .filter(|record| record.has_deferral_start())
        .filter_map(|record| {
            let rate = record.parsed_deferral_rate()?;
            if rate >= default_rate {
                return None;
            }
            let description = format!(
                "Auto-enrolled employee below default rate: deferral_rate={}, default={}",
                format_percent(rate),
                format_percent(default_rate)
            );
            Some(Finding::new(
                record,
                ViolationType::AutoEnrollBelowDefault,
                description,
            ))
        })
        .collect();

    debug!(count = findings.len(), "Auto-enroll below-default rule complete");
    findings
}
