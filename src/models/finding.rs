//! Findings emitted by the compliance rules.
//!
//! A [`Finding`] is the output unit of the engine: one flagged condition
//! for one payroll record. Its severity follows from its [`ViolationType`].

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CatchUpType, PayrollRecord};

/// Traffic-light severity of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Confirmed violation.
    Red,
    /// Advisory or potential issue.
    Yellow,
}

impl Severity {
    /// Returns the label used in CSV output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Red => "RED",
            Severity::Yellow => "YELLOW",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of condition a finding reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationType {
    /// HCE making Roth catch-up contributions at or after the risk year.
    RothOnlyCatchupHce,
    /// Projected compensation meets the HCE threshold.
    PotentialHce,
    /// Eligible employee was never auto-enrolled.
    AutoEnrollMiss,
    /// Auto-enrolled employee deferring below the default rate.
    AutoEnrollBelowDefault,
    /// Deferral rate still below default after the escalation month.
    EscalationPossibleMiss,
    /// Hours history suggests long-term part-time eligibility.
    LtptPossibleEligible,
}

impl ViolationType {
    /// Returns the tag written to the `violation_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationType::RothOnlyCatchupHce => "ROTH_ONLY_CATCHUP_HCE",
            ViolationType::PotentialHce => "POTENTIAL_HCE",
            ViolationType::AutoEnrollMiss => "AUTO_ENROLL_MISS",
            ViolationType::AutoEnrollBelowDefault => "AUTO_ENROLL_BELOW_DEFAULT",
            ViolationType::EscalationPossibleMiss => "ESCALATION_POSSIBLE_MISS",
            ViolationType::LtptPossibleEligible => "LTPT_POSSIBLE_ELIGIBLE",
        }
    }

    /// Severity class: the two hard violations are RED, everything else YELLOW.
    pub fn severity(&self) -> Severity {
        match self {
            ViolationType::RothOnlyCatchupHce | ViolationType::AutoEnrollMiss => Severity::Red,
            _ => Severity::Yellow,
        }
    }
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported rule outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Employee identifier from the payroll record.
    pub employee_id: String,
    /// Employee name from the payroll record.
    pub employee_name: String,
    /// The kind of condition reported.
    pub violation_type: ViolationType,
    /// Human-readable explanation.
    pub violation_description: String,
    /// Projected annual compensation (zero for rules that do not project).
    pub projected_annual_compensation: Decimal,
    /// Catch-up amount carried from the record (zero when not relevant).
    pub catch_up_amount: Decimal,
    /// Catch-up type carried from the record.
    pub catch_up_type: CatchUpType,
    /// Pay period start of the flagged record.
    pub pay_period_start: NaiveDate,
    /// Pay period end of the flagged record.
    pub pay_period_end: NaiveDate,
    /// RED or YELLOW.
    pub severity: Severity,
}

impl Finding {
    /// Creates a finding for a record with no compensation context.
    pub fn new(
        record: &PayrollRecord,
        violation_type: ViolationType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            employee_id: record.employee_id.clone(),
            employee_name: record.employee_name.clone(),
            violation_type,
            violation_description: description.into(),
            projected_annual_compensation: Decimal::ZERO,
            catch_up_amount: Decimal::ZERO,
            catch_up_type: CatchUpType::None,
            pay_period_start: record.pay_period_start,
            pay_period_end: record.pay_period_end,
            severity: violation_type.severity(),
        }
    }

    /// Attaches the projection and catch-up details of the record.
    pub fn with_compensation(
        mut self,
        projected_annual_compensation: Decimal,
        record: &PayrollRecord,
    ) -> Self {
        self.projected_annual_compensation = projected_annual_compensation;
        self.catch_up_amount = record.catch_up_contribution;
        self.catch_up_type = record.catch_up_type;
        self
    }

    /// Returns true for RED findings.
    pub fn is_violation(&self) -> bool {
        self.severity == Severity::Red
    }
}
