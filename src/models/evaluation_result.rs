//! The aggregated outcome of one engine run.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Finding;

/// Overall traffic-light verdict for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComplianceStatus {
    /// No findings at all.
    Green,
    /// Advisory findings only.
    Yellow,
    /// At least one hard violation.
    Red,
}

impl ComplianceStatus {
    /// The process exit code for this verdict: 2 for RED, otherwise 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            ComplianceStatus::Red => 2,
            ComplianceStatus::Green | ComplianceStatus::Yellow => 0,
        }
    }

    /// Returns the label printed in the console summary.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Green => "GREEN",
            ComplianceStatus::Yellow => "YELLOW",
            ComplianceStatus::Red => "RED",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The complete result of evaluating a payroll batch.
///
/// `findings` keeps the fixed rule order; downstream CSV rows and the
/// top-ID list depend on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Overall verdict.
    pub status: ComplianceStatus,
    /// Exit code callers should report (0 or 2).
    pub exit_code: i32,
    /// Number of RED findings.
    pub violation_count: usize,
    /// Number of YELLOW findings.
    pub potential_count: usize,
    /// Up to ten employee IDs for display, RED first.
    pub top_employee_ids: Vec<String>,
    /// All findings in rule order.
    pub findings: Vec<Finding>,
}

impl EvaluationResult {
    /// Returns the RED findings in order.
    pub fn violations(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_violation())
    }

    /// Returns true when nothing was flagged.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}
