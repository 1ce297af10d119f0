//! Payroll batch and its declared column schema.

use serde::{Deserialize, Serialize};

use super::PayrollRecord;
use crate::error::{PreflightError, PreflightResult};

/// Column names that make up the optional auto-enrollment schema.
pub const AUTO_ENROLL_COLUMNS: [&str; 3] = ["hire_date", "deferral_rate", "deferral_start_date"];

/// Which optional column families a payroll batch carries.
///
/// Decided once when the batch is loaded, never by sampling rows inside
/// the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PayrollSchema {
    /// True when `hire_date`, `deferral_rate` and `deferral_start_date` are
    /// all available, which enables the auto-enrollment rule family.
    pub auto_enroll_columns: bool,
}

impl PayrollSchema {
    /// Declares the schema from a CSV header.
    ///
    /// ```
    /// use secure_preflight::models::PayrollSchema;
    ///
    /// let schema = PayrollSchema::from_headers(["employee_id", "hire_date", "deferral_rate"]);
    /// assert!(!schema.auto_enroll_columns);
    /// ```
    pub fn from_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let headers: Vec<String> = headers
            .into_iter()
            .map(|h| h.as_ref().trim().to_string())
            .collect();
        Self {
            auto_enroll_columns: AUTO_ENROLL_COLUMNS
                .iter()
                .all(|column| headers.iter().any(|h| h == column)),
        }
    }

    /// Declares the schema for records that arrived without a header
    /// (e.g. JSON): the columns are available when any record carries all
    /// three fields.
    pub fn from_records(records: &[PayrollRecord]) -> Self {
        Self {
            auto_enroll_columns: records.iter().any(|r| {
                r.hire_date.is_some()
                    && r.deferral_rate.is_some()
                    && r.deferral_start_date.is_some()
            }),
        }
    }
}

/// A validated, immutable batch of payroll records.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollBatch {
    records: Vec<PayrollRecord>,
    schema: PayrollSchema,
}

impl PayrollBatch {
    /// Validates every record (fail-fast) and builds the batch.
    ///
    /// Row numbers in errors start at `first_row` and increase by one per
    /// record, so CSV callers pass 2 (the header is row 1) and JSON callers
    /// pass 1.
    pub fn new(
        records: Vec<PayrollRecord>,
        schema: PayrollSchema,
        first_row: usize,
    ) -> PreflightResult<Self> {
        for (offset, record) in records.iter().enumerate() {
            record.validate(first_row + offset)?;
        }
        Ok(Self { records, schema })
    }

    /// Same as [`PayrollBatch::new`] but also rejects an empty batch.
    pub fn non_empty(
        records: Vec<PayrollRecord>,
        schema: PayrollSchema,
        first_row: usize,
        source: &str,
    ) -> PreflightResult<Self> {
        if records.is_empty() {
            return Err(PreflightError::EmptyInput {
                path: source.to_string(),
            });
        }
        Self::new(records, schema, first_row)
    }

    /// The records in input order.
    pub fn records(&self) -> &[PayrollRecord] {
        &self.records
    }

    /// The declared column schema.
    pub fn schema(&self) -> PayrollSchema {
        self.schema
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true when the batch holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
