//! Payroll record model and related types.
//!
//! A [`PayrollRecord`] is one employee for one pay period. The auto-enrollment
//! columns (`hire_date`, `deferral_rate`, `deferral_start_date`) are kept as the
//! raw trimmed text from the input: the rules decide per record what an empty
//! or unparseable value means, so they are parsed lazily through accessors.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PreflightError, PreflightResult};

/// The tax treatment of a catch-up contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CatchUpType {
    /// Post-tax (Roth) catch-up.
    Roth,
    /// Pre-tax catch-up.
    Traditional,
    /// No catch-up type recorded.
    #[default]
    #[serde(rename = "")]
    None,
}

impl CatchUpType {
    /// Returns the label used in CSV input and output.
    pub fn as_str(&self) -> &'static str {
        match self {
            CatchUpType::Roth => "Roth",
            CatchUpType::Traditional => "Traditional",
            CatchUpType::None => "",
        }
    }
}

impl fmt::Display for CatchUpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatchUpType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Roth" => Ok(CatchUpType::Roth),
            "Traditional" => Ok(CatchUpType::Traditional),
            "" => Ok(CatchUpType::None),
            _ => Err("must be 'Roth' or 'Traditional'".to_string()),
        }
    }
}

/// One employee, one pay period.
///
/// # Example
///
/// ```
/// use secure_preflight::models::{CatchUpType, PayrollRecord};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let record = PayrollRecord {
///     employee_id: "EMP001".to_string(),
///     employee_name: "Ada Lovelace".to_string(),
///     gross_pay: Decimal::new(5000, 0),
///     ytd_gross_pay: Decimal::ZERO,
///     pay_period_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     pay_period_end: NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
///     catch_up_contribution: Decimal::ZERO,
///     catch_up_type: CatchUpType::None,
///     hire_date: None,
///     deferral_rate: None,
///     deferral_start_date: None,
/// };
/// assert_eq!(record.period_length_days(), 14);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Employee identifier (non-empty, trimmed).
    pub employee_id: String,
    /// Employee display name.
    pub employee_name: String,
    /// Gross pay for this period.
    pub gross_pay: Decimal,
    /// Year-to-date gross pay as of the period end.
    pub ytd_gross_pay: Decimal,
    /// First day of the pay period (inclusive).
    pub pay_period_start: NaiveDate,
    /// Last day of the pay period (inclusive).
    pub pay_period_end: NaiveDate,
    /// Catch-up contribution amount for this period.
    #[serde(default)]
    pub catch_up_contribution: Decimal,
    /// Tax treatment of the catch-up contribution.
    #[serde(default)]
    pub catch_up_type: CatchUpType,
    /// Raw hire date text (`YYYY-MM-DD`), if the column was supplied.
    #[serde(
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub hire_date: Option<String>,
    /// Raw deferral rate text (a fraction such as `0.03`).
    #[serde(
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub deferral_rate: Option<String>,
    /// Raw deferral start date text.
    #[serde(
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub deferral_start_date: Option<String>,
}

impl PayrollRecord {
    /// Checks the structural invariants of a record.
    ///
    /// `row` is only used for error reporting.
    pub fn validate(&self, row: usize) -> PreflightResult<()> {
        let invalid = |field: &str, message: &str| PreflightError::InvalidRecord {
            row,
            field: field.to_string(),
            message: message.to_string(),
        };

        if self.employee_id.trim().is_empty() {
            return Err(invalid("employee_id", "must not be empty"));
        }
        if self.pay_period_start > self.pay_period_end {
            return Err(invalid("pay_period_start", "must be <= pay_period_end"));
        }
        if self.gross_pay < Decimal::ZERO {
            return Err(invalid("gross_pay", "must be non-negative"));
        }
        if self.ytd_gross_pay < Decimal::ZERO {
            return Err(invalid("ytd_gross_pay", "must be non-negative"));
        }
        if self.catch_up_contribution < Decimal::ZERO {
            return Err(invalid("catch_up_contribution", "must be non-negative"));
        }
        Ok(())
    }

    /// Inclusive pay period length in days, floored to 1.
    pub fn period_length_days(&self) -> i64 {
        ((self.pay_period_end - self.pay_period_start).num_days() + 1).max(1)
    }

    /// Returns true when this period carries a positive catch-up contribution.
    pub fn has_catch_up(&self) -> bool {
        self.catch_up_contribution > Decimal::ZERO
    }

    /// The hire date, when present and parseable.
    pub fn parsed_hire_date(&self) -> Option<NaiveDate> {
        non_empty(&self.hire_date).and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }

    /// Returns true when a deferral start date is recorded (parseable or not).
    pub fn has_deferral_start(&self) -> bool {
        non_empty(&self.deferral_start_date).is_some()
    }

    /// The deferral rate, or `None` when absent or unparseable.
    pub fn parsed_deferral_rate(&self) -> Option<Decimal> {
        non_empty(&self.deferral_rate).and_then(|s| Decimal::from_str(s).ok())
    }

    /// The deferral rate with absent and unparseable values read as zero.
    pub fn deferral_rate_or_zero(&self) -> Decimal {
        self.parsed_deferral_rate().unwrap_or(Decimal::ZERO)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Accepts either a string or a bare number for the optional text columns,
/// so JSON clients may send `"deferral_rate": 0.03`.
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(
        Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
            TextOrNumber::Text(s) => s.trim().to_string(),
            TextOrNumber::Integer(n) => n.to_string(),
            TextOrNumber::Float(n) => n.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create_test_record() -> PayrollRecord {
        PayrollRecord {
            employee_id: "EMP001".to_string(),
            employee_name: "Test Employee".to_string(),
            gross_pay: dec("5000.00"),
            ytd_gross_pay: dec("0"),
            pay_period_start: date("2024-01-01"),
            pay_period_end: date("2024-01-14"),
            catch_up_contribution: dec("0"),
            catch_up_type: CatchUpType::None,
            hire_date: None,
            deferral_rate: None,
            deferral_start_date: None,
        }
    }

    #[test]
    fn test_valid_record_passes_validation() {
        assert!(create_test_record().validate(2).is_ok());
    }

    #[test]
    fn test_inverted_period_is_rejected() {
        let mut record = create_test_record();
        record.pay_period_start = date("2024-01-15");

        match record.validate(4) {
            Err(PreflightError::InvalidRecord { row, field, .. }) => {
                assert_eq!(row, 4);
                assert_eq!(field, "pay_period_start");
            }
            other => panic!("Expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_amounts_are_rejected() {
        let mut record = create_test_record();
        record.catch_up_contribution = dec("-1");
        assert!(record.validate(2).is_err());

        let mut record = create_test_record();
        record.ytd_gross_pay = dec("-0.01");
        assert!(record.validate(2).is_err());
    }

    #[test]
    fn test_blank_employee_id_is_rejected() {
        let mut record = create_test_record();
        record.employee_id = "   ".to_string();
        assert!(record.validate(2).is_err());
    }

    #[test]
    fn test_period_length_is_inclusive() {
        let mut record = create_test_record();
        assert_eq!(record.period_length_days(), 14);

        record.pay_period_end = record.pay_period_start;
        assert_eq!(record.period_length_days(), 1);
    }

    #[test]
    fn test_catch_up_type_parsing() {
        assert_eq!("Roth".parse::<CatchUpType>(), Ok(CatchUpType::Roth));
        assert_eq!(
            " Traditional ".parse::<CatchUpType>(),
            Ok(CatchUpType::Traditional)
        );
        assert_eq!("".parse::<CatchUpType>(), Ok(CatchUpType::None));
        assert!("roth".parse::<CatchUpType>().is_err());
    }

    #[test]
    fn test_optional_columns_parse_lazily() {
        let mut record = create_test_record();
        record.hire_date = Some("2023-13-45".to_string());
        record.deferral_rate = Some("abc".to_string());
        record.deferral_start_date = Some("not-a-date".to_string());

        assert_eq!(record.parsed_hire_date(), None);
        assert_eq!(record.parsed_deferral_rate(), None);
        assert_eq!(record.deferral_rate_or_zero(), Decimal::ZERO);
        // Any non-empty start date text counts as enrolled.
        assert!(record.has_deferral_start());
    }

    #[test]
    fn test_blank_optional_columns_are_absent() {
        let mut record = create_test_record();
        record.deferral_start_date = Some("  ".to_string());
        record.hire_date = Some(String::new());
        assert!(!record.has_deferral_start());
        assert_eq!(record.parsed_hire_date(), None);
    }

    #[test]
    fn test_deserialize_record_with_numeric_deferral_rate() {
        let json = r#"{
            "employee_id": "EMP002",
            "employee_name": "Grace Hopper",
            "gross_pay": "10000.00",
            "ytd_gross_pay": "0",
            "pay_period_start": "2024-01-01",
            "pay_period_end": "2024-01-14",
            "catch_up_contribution": "750.00",
            "catch_up_type": "Roth",
            "hire_date": "2023-06-01",
            "deferral_rate": 0.03
        }"#;

        let record: PayrollRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.catch_up_type, CatchUpType::Roth);
        assert_eq!(record.parsed_deferral_rate(), Some(dec("0.03")));
        assert_eq!(record.parsed_hire_date(), Some(date("2023-06-01")));
        assert_eq!(record.deferral_start_date, None);
    }

    #[test]
    fn test_deserialize_record_defaults_catch_up() {
        let json = r#"{
            "employee_id": "EMP003",
            "employee_name": "Alan Turing",
            "gross_pay": "100",
            "ytd_gross_pay": "100",
            "pay_period_start": "2024-01-01",
            "pay_period_end": "2024-01-07"
        }"#;

        let record: PayrollRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.catch_up_contribution, Decimal::ZERO);
        assert_eq!(record.catch_up_type, CatchUpType::None);
        assert!(!record.has_catch_up());
    }

    #[test]
    fn test_catch_up_type_serialization() {
        assert_eq!(
            serde_json::to_string(&CatchUpType::Roth).unwrap(),
            "\"Roth\""
        );
        assert_eq!(serde_json::to_string(&CatchUpType::None).unwrap(), "\"\"");
    }
}
