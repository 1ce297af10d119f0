//! The preflight evaluation entry point.
//!
//! [`evaluate`] runs every rule over a validated batch in a fixed order,
//! concatenates the findings and derives the overall verdict:
//!
//! 1. Roth-only catch-up (RED)
//! 2. Potential HCE (YELLOW)
//! 3. Auto-enroll miss (RED)
//! 4. Auto-enroll below default (YELLOW)
//! 5. Escalation possible miss (YELLOW)
//! 6. LTPT possible eligibility (YELLOW)
//!
//! Finding order matters to the CSV writer and the top-ID list, so it is
//! stable for identical inputs.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//! use secure_preflight::config::{CatchUpConfig, HceThreshold, LegacyMethod, PreflightConfig, ProjectionMethod};
//! use secure_preflight::engine::evaluate;
//! use secure_preflight::models::{CatchUpType, ComplianceStatus, PayrollBatch, PayrollRecord, PayrollSchema};
//!
//! let config = PreflightConfig::new(
//!     HceThreshold { current_year: 2024, compensation_limit: Decimal::new(150_000, 0) },
//!     CatchUpConfig { roth_only_risk_year: 2024 },
//!     ProjectionMethod::legacy(LegacyMethod::GrossOrYtd),
//! );
//! let record = PayrollRecord {
//!     employee_id: "EMP001".into(),
//!     employee_name: "Alex Smith".into(),
//!     gross_pay: Decimal::new(10_000, 0),
//!     ytd_gross_pay: Decimal::ZERO,
//!     pay_period_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     pay_period_end: NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
//!     catch_up_contribution: Decimal::new(750, 0),
//!     catch_up_type: CatchUpType::Roth,
//!     hire_date: None,
//!     deferral_rate: None,
//!     deferral_start_date: None,
//! };
//! let batch = PayrollBatch::new(vec![record], PayrollSchema::default(), 2).unwrap();
//!
//! let result = evaluate(&batch, None, &config);
//! assert_eq!(result.status, ComplianceStatus::Red);
//! assert_eq!(result.exit_code, 2);
//! assert_eq!(result.top_employee_ids, vec!["EMP001"]);
//! ```

use std::collections::HashSet;
use std::time::Instant;

use tracing::info;

use crate::config::PreflightConfig;
use crate::models::{
    ComplianceStatus, EvaluationResult, Finding, HoursHistory, PayrollBatch, ViolationType,
};
use crate::rules::{
    check_auto_enroll_below_default, check_auto_enroll_miss, check_escalation_miss,
    check_ltpt_eligibility, check_potential_hce, check_roth_only_catchup_hce,
};

/// Maximum number of employee IDs in the display list.
pub const TOP_EMPLOYEE_LIMIT: usize = 10;

/// Evaluates a validated batch against every rule and aggregates the result.
///
/// Pure apart from logging: the same batch, hours and configuration always
/// produce the same findings in the same order.
pub fn evaluate(
    batch: &PayrollBatch,
    hours: Option<&HoursHistory>,
    config: &PreflightConfig,
) -> EvaluationResult {
    let start_time = Instant::now();
    let records = batch.records();
    let schema = batch.schema();

    let mut findings: Vec<Finding> = Vec::new();
    findings.extend(check_roth_only_catchup_hce(records, config));
    findings.extend(check_potential_hce(records, config));
    findings.extend(check_auto_enroll_miss(records, schema, config));
    findings.extend(check_auto_enroll_below_default(records, schema, config));
    findings.extend(check_escalation_miss(records, schema, config));
    findings.extend(check_ltpt_eligibility(records, hours, config));

    let result = aggregate(findings);
    info!(
        records = records.len(),
        status = %result.status,
        violations = result.violation_count,
        potential = result.potential_count,
        projection = %config.projection,
        duration_us = start_time.elapsed().as_micros(),
        "Evaluation complete"
    );
    result
}

/// Classifies ordered findings and derives status, exit code and the
/// top employee list.
pub fn aggregate(findings: Vec<Finding>) -> EvaluationResult {
    let violation_count = findings.iter().filter(|f| f.is_violation()).count();
    let potential_count = findings.len() - violation_count;
    let status = status_for(violation_count, potential_count);

    EvaluationResult {
        status,
        exit_code: status.exit_code(),
        violation_count,
        potential_count,
        top_employee_ids: top_employee_ids(&findings),
        findings,
    }
}

/// RED beats YELLOW beats GREEN.
pub fn status_for(violation_count: usize, potential_count: usize) -> ComplianceStatus {
    if violation_count > 0 {
        ComplianceStatus::Red
    } else if potential_count > 0 {
        ComplianceStatus::Yellow
    } else {
        ComplianceStatus::Green
    }
}

/// RED-finding employees first, padded with potential-HCE employees,
/// without duplicates and capped at [`TOP_EMPLOYEE_LIMIT`].
fn top_employee_ids(findings: &[Finding]) -> Vec<String> {
    let red = findings.iter().filter(|f| f.is_violation());
    let potential_hce = findings
        .iter()
        .filter(|f| f.violation_type == ViolationType::PotentialHce);

    let mut seen = HashSet::new();
    red.chain(potential_hce)
        .map(|f| f.employee_id.as_str())
        .filter(|id| seen.insert(*id))
        .take(TOP_EMPLOYEE_LIMIT)
        .map(String::from)
        .collect()
}
