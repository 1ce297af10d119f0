//! Hours-history records used by the long-term part-time rule.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Hours worked by one employee in one plan year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursRecord {
    /// Employee identifier, matched against payroll records.
    pub employee_id: String,
    /// Plan year.
    pub year: i32,
    /// Hours worked in that year.
    pub hours: Decimal,
}

/// Hours history folded into `employee_id -> {year -> hours}`.
///
/// A later record for the same employee and year replaces an earlier one.
///
/// # Example
///
/// ```
/// use secure_preflight::models::{HoursHistory, HoursRecord};
/// use rust_decimal::Decimal;
///
/// let history = HoursHistory::from_records(vec![
///     HoursRecord { employee_id: "E1".into(), year: 2024, hours: Decimal::new(400, 0) },
///     HoursRecord { employee_id: "E1".into(), year: 2024, hours: Decimal::new(600, 0) },
/// ]);
/// assert_eq!(history.hours("E1", 2024), Some(Decimal::new(600, 0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoursHistory {
    by_employee: HashMap<String, BTreeMap<i32, Decimal>>,
}

impl HoursHistory {
    /// Folds records in order, last write wins.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = HoursRecord>,
    {
        let mut history = Self::default();
        for record in records {
            history.insert(record);
        }
        history
    }

    /// Adds one record, replacing any earlier value for the same year.
    pub fn insert(&mut self, record: HoursRecord) {
        self.by_employee
            .entry(record.employee_id.trim().to_string())
            .or_default()
            .insert(record.year, record.hours);
    }

    /// The year map for one employee.
    pub fn employee(&self, employee_id: &str) -> Option<&BTreeMap<i32, Decimal>> {
        self.by_employee.get(employee_id)
    }

    /// Hours for one employee in one year.
    pub fn hours(&self, employee_id: &str, year: i32) -> Option<Decimal> {
        self.employee(employee_id)
            .and_then(|years| years.get(&year).copied())
    }

    /// Number of employees with any history.
    pub fn employee_count(&self) -> usize {
        self.by_employee.len()
    }

    /// Returns true when no hours were supplied.
    pub fn is_empty(&self) -> bool {
        self.by_employee.is_empty()
    }
}
