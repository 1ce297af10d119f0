//! Request types for the preflight API.

use serde::{Deserialize, Serialize};

use crate::error::PreflightResult;
use crate::models::{HoursHistory, HoursRecord, PayrollBatch, PayrollRecord, PayrollSchema};

/// Label used for errors about the request body.
const REQUEST_SOURCE: &str = "request body";

/// JSON arrays are numbered from 1.
const FIRST_RECORD_ROW: usize = 1;

/// Request body for the `/evaluate` endpoint.
///
/// ```json
/// {
///   "records": [{ "employee_id": "EMP001", "employee_name": "Alex", "gross_pay": "5000",
///                 "ytd_gross_pay": "5000", "pay_period_start": "2024-01-01",
///                 "pay_period_end": "2024-01-14" }],
///   "hours": [{ "employee_id": "EMP001", "year": 2024, "hours": "600" }],
///   "schema": { "auto_enroll_columns": true }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// Payroll records to evaluate.
    pub records: Vec<PayrollRecord>,
    /// Optional hours history for the LTPT rule.
    #[serde(default)]
    pub hours: Vec<HoursRecord>,
    /// Declared column schema. Inferred from the records when omitted.
    #[serde(default)]
    pub schema: Option<PayrollSchema>,
}

impl EvaluationRequest {
    /// Trims employee IDs, validates the records (fail-fast) and folds the
    /// hours history.
    pub fn into_inputs(mut self) -> PreflightResult<(PayrollBatch, Option<HoursHistory>)> {
        for record in &mut self.records {
            record.employee_id = record.employee_id.trim().to_string();
        }
        let schema = self
            .schema
            .unwrap_or_else(|| PayrollSchema::from_records(&self.records));
        let batch =
            PayrollBatch::non_empty(self.records, schema, FIRST_RECORD_ROW, REQUEST_SOURCE)?;
        let hours = (!self.hours.is_empty()).then(|| HoursHistory::from_records(self.hours));
        Ok((batch, hours))
    }
}
