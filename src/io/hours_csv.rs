//! Hours-history CSV reader (`employee_id,year,hours`).
//!
//! Unlike payroll input, hours rows are advisory: a row that cannot be
//! read is logged and skipped rather than aborting the run.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::{PreflightError, PreflightResult};
use crate::models::{HoursHistory, HoursRecord};

use super::open_input;

const HOURS_COLUMNS: [&str; 3] = ["employee_id", "year", "hours"];

/// Reads an hours-history CSV file.
pub fn read_hours_csv<P: AsRef<Path>>(path: P) -> PreflightResult<HoursHistory> {
    let path = path.as_ref();
    let file = open_input(path)?;
    parse_hours_csv(file, &path.display().to_string())
}

/// Parses hours-history CSV from any reader, folding rows last-write-wins.
pub fn parse_hours_csv<R: Read>(reader: R, source: &str) -> PreflightResult<HoursHistory> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|err| PreflightError::InputParseError {
            path: source.to_string(),
            message: err.to_string(),
        })?
        .clone();
    let positions = column_positions(&headers)?;

    let mut history = HoursHistory::default();
    let mut skipped = 0usize;
    for (offset, row) in reader.records().enumerate() {
        let row_number = offset + 2;
        let parsed = row
            .ok()
            .and_then(|row| parse_row(&row, positions));
        match parsed {
            Some(record) => history.insert(record),
            None => {
                skipped += 1;
                warn!(source, row = row_number, "Skipping unreadable hours row");
            }
        }
    }

    info!(
        source,
        employees = history.employee_count(),
        skipped,
        "Loaded hours history"
    );
    Ok(history)
}

fn column_positions(headers: &StringRecord) -> PreflightResult<[usize; 3]> {
    let find = |name: &str| headers.iter().position(|h| h == name);
    match HOURS_COLUMNS.map(find) {
        [Some(id), Some(year), Some(hours)] => Ok([id, year, hours]),
        found => Err(PreflightError::MissingColumns {
            columns: HOURS_COLUMNS
                .iter()
                .zip(found)
                .filter(|(_, position)| position.is_none())
                .map(|(name, _)| name.to_string())
                .collect(),
        }),
    }
}

fn parse_row(row: &StringRecord, [id, year, hours]: [usize; 3]) -> Option<HoursRecord> {
    let employee_id = row.get(id).filter(|s| !s.is_empty())?;
    Some(HoursRecord {
        employee_id: employee_id.to_string(),
        year: row.get(year)?.parse().ok()?,
        hours: Decimal::from_str(row.get(hours)?).ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_hours_history() {
        let csv = "employee_id,year,hours\nEMP001,2023,600\nEMP001,2024,550.5\nEMP002,2024,100\n";
        let history = parse_hours_csv(csv.as_bytes(), "hours.csv").unwrap();

        assert_eq!(history.employee_count(), 2);
        assert_eq!(history.hours("EMP001", 2023), Some(dec("600")));
        assert_eq!(history.hours("EMP001", 2024), Some(dec("550.5")));
    }

    #[test]
    fn test_bad_rows_skipped() {
        let csv = "employee_id,year,hours\n,2024,600\nEMP001,twenty,600\nEMP001,2024,lots\nEMP002,2024,700\n";
        let history = parse_hours_csv(csv.as_bytes(), "hours.csv").unwrap();

        assert_eq!(history.employee_count(), 1);
        assert_eq!(history.hours("EMP002", 2024), Some(dec("700")));
    }

    #[test]
    fn test_last_write_wins() {
        let csv = "employee_id,year,hours\nEMP001,2024,600\nEMP001,2024,200\n";
        let history = parse_hours_csv(csv.as_bytes(), "hours.csv").unwrap();
        assert_eq!(history.hours("EMP001", 2024), Some(dec("200")));
    }

    #[test]
    fn test_missing_columns() {
        match parse_hours_csv("employee_id,hours\nEMP001,600\n".as_bytes(), "hours.csv") {
            Err(PreflightError::MissingColumns { columns }) => assert_eq!(columns, vec!["year"]),
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }
}
