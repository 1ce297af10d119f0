//! Payroll CSV reader.
//!
//! The header decides two things up front: whether every required column
//! is present, and whether the optional auto-enrollment columns are
//! available for the whole batch. Rows are then parsed and validated in
//! order, and the first bad row aborts the load.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{PreflightError, PreflightResult};
use crate::models::{CatchUpType, PayrollBatch, PayrollRecord, PayrollSchema};

use super::open_input;

/// Columns every payroll file must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "employee_id",
    "employee_name",
    "gross_pay",
    "ytd_gross_pay",
    "pay_period_start",
    "pay_period_end",
];

/// CSV data rows start after the header line.
const FIRST_DATA_ROW: usize = 2;

/// Reads and validates a payroll CSV file.
pub fn read_payroll_csv<P: AsRef<Path>>(path: P) -> PreflightResult<PayrollBatch> {
    let path = path.as_ref();
    let file = open_input(path)?;
    parse_payroll_csv(file, &path.display().to_string())
}

/// Parses payroll CSV from any reader. `source` labels errors.
///
/// # Example
///
/// ```
/// use secure_preflight::io::parse_payroll_csv;
///
/// let csv = "employee_id,employee_name,gross_pay,ytd_gross_pay,pay_period_start,pay_period_end\n\
///            EMP001,Alex Smith,5000.00,5000.00,2024-01-01,2024-01-14\n";
/// let batch = parse_payroll_csv(csv.as_bytes(), "inline").unwrap();
/// assert_eq!(batch.len(), 1);
/// assert!(!batch.schema().auto_enroll_columns);
/// ```
pub fn parse_payroll_csv<R: Read>(reader: R, source: &str) -> PreflightResult<PayrollBatch> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|err| input_error(source, &err))?
        .clone();
    let columns = ColumnIndex::new(&headers)?;
    let schema = PayrollSchema::from_headers(headers.iter());
    debug!(
        source,
        auto_enroll_columns = schema.auto_enroll_columns,
        "Read payroll header"
    );

    let mut records = Vec::new();
    for (offset, row) in reader.records().enumerate() {
        let row_number = FIRST_DATA_ROW + offset;
        let row = row.map_err(|err| input_error(source, &err))?;
        let record = columns.parse_row(&row, row_number)?;
        record.validate(row_number)?;
        records.push(record);
    }

    let batch = PayrollBatch::non_empty(records, schema, FIRST_DATA_ROW, source)?;
    info!(
        source,
        records = batch.len(),
        auto_enroll_columns = schema.auto_enroll_columns,
        "Loaded payroll data"
    );
    Ok(batch)
}

fn input_error(source: &str, err: &csv::Error) -> PreflightError {
    PreflightError::InputParseError {
        path: source.to_string(),
        message: err.to_string(),
    }
}

/// Header positions of the known columns.
struct ColumnIndex {
    employee_id: usize,
    employee_name: usize,
    gross_pay: usize,
    ytd_gross_pay: usize,
    pay_period_start: usize,
    pay_period_end: usize,
    catch_up_contribution: Option<usize>,
    catch_up_type: Option<usize>,
    hire_date: Option<usize>,
    deferral_rate: Option<usize>,
    deferral_start_date: Option<usize>,
}

impl ColumnIndex {
    fn new(headers: &StringRecord) -> PreflightResult<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|&&column| find(column).is_none())
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PreflightError::MissingColumns { columns: missing });
        }

        let required = |name: &str| {
            find(name).ok_or_else(|| PreflightError::MissingColumns {
                columns: vec![name.to_string()],
            })
        };

        Ok(Self {
            employee_id: required("employee_id")?,
            employee_name: required("employee_name")?,
            gross_pay: required("gross_pay")?,
            ytd_gross_pay: required("ytd_gross_pay")?,
            pay_period_start: required("pay_period_start")?,
            pay_period_end: required("pay_period_end")?,
            catch_up_contribution: find("catch_up_contribution"),
            catch_up_type: find("catch_up_type"),
            hire_date: find("hire_date"),
            deferral_rate: find("deferral_rate"),
            deferral_start_date: find("deferral_start_date"),
        })
    }

    fn parse_row(&self, row: &StringRecord, row_number: usize) -> PreflightResult<PayrollRecord> {
        let field = |index: usize| row.get(index).unwrap_or("");
        let optional = |index: Option<usize>| index.map(field).unwrap_or("");

        let catch_up_contribution = match optional(self.catch_up_contribution) {
            "" => Decimal::ZERO,
            value => parse_decimal(value, "catch_up_contribution", row_number)?,
        };
        let catch_up_type = CatchUpType::from_str(optional(self.catch_up_type)).map_err(
            |message| PreflightError::InvalidRecord {
                row: row_number,
                field: "catch_up_type".to_string(),
                message,
            },
        )?;

        Ok(PayrollRecord {
            employee_id: field(self.employee_id).to_string(),
            employee_name: field(self.employee_name).to_string(),
            gross_pay: parse_decimal(field(self.gross_pay), "gross_pay", row_number)?,
            ytd_gross_pay: parse_decimal(field(self.ytd_gross_pay), "ytd_gross_pay", row_number)?,
            pay_period_start: parse_date(
                field(self.pay_period_start),
                "pay_period_start",
                row_number,
            )?,
            pay_period_end: parse_date(field(self.pay_period_end), "pay_period_end", row_number)?,
            catch_up_contribution,
            catch_up_type,
            hire_date: self.hire_date.map(|i| field(i).to_string()),
            deferral_rate: self.deferral_rate.map(|i| field(i).to_string()),
            deferral_start_date: self.deferral_start_date.map(|i| field(i).to_string()),
        })
    }
}

fn parse_decimal(value: &str, field: &str, row: usize) -> PreflightResult<Decimal> {
    Decimal::from_str(value).map_err(|_| PreflightError::InvalidRecord {
        row,
        field: field.to_string(),
        message: "must be a valid number".to_string(),
    })
}

fn parse_date(value: &str, field: &str, row: usize) -> PreflightResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| PreflightError::InvalidRecord {
        row,
        field: field.to_string(),
        message: "must be in YYYY-MM-DD format".to_string(),
    })
}
