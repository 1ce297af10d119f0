//! Core data models for the preflight engine.
//!
//! Payroll and hours inputs, the findings the rules emit, and the
//! aggregated evaluation result.

mod batch;
mod evaluation_result;
mod finding;
mod hours;
mod payroll_record;

pub use batch::{AUTO_ENROLL_COLUMNS, PayrollBatch, PayrollSchema};
pub use evaluation_result::{ComplianceStatus, EvaluationResult};
pub use finding::{Finding, Severity, ViolationType};
pub use hours::{HoursHistory, HoursRecord};
pub use payroll_record::{CatchUpType, PayrollRecord};
