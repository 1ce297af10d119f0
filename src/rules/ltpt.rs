//! Long-term part-time (LTPT) eligibility rule.
//!
//! An employee who worked at least `ltpt_hours_threshold` hours in each of
//! the most recent N consecutive years ending at `ltpt_latest_year` may be
//! eligible to participate. The streak must be unbroken: a missing or short
//! year anywhere in the window suppresses the finding.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::PreflightConfig;
use crate::models::{Finding, HoursHistory, PayrollRecord, ViolationType};

/// Consecutive-year windows the rule evaluates. Any other configured value
/// disables the rule.
pub const LTPT_SUPPORTED_WINDOWS: [u32; 2] = [2, 3];

/// Flags employees with an unbroken streak of qualifying years.
///
/// Skipped entirely when LTPT is disabled, no hours history was supplied,
/// or the configured window is unsupported.
pub fn check_ltpt_eligibility(
    records: &[PayrollRecord],
    hours: Option<&HoursHistory>,
    config: &PreflightConfig,
) -> Vec<Finding> {
    let settings = &config.ltpt;
    if !settings.enabled {
        debug!("LTPT rule disabled");
        return Vec::new();
    }
    let Some(hours) = hours.filter(|h| !h.is_empty()) else {
        debug!("No hours history supplied, skipping LTPT rule");
        return Vec::new();
    };
    let window = settings.consecutive_years_required;
    if !LTPT_SUPPORTED_WINDOWS.contains(&window) {
        warn!(window, "Unsupported LTPT consecutive-year window, skipping rule");
        return Vec::new();
    }

    let findings: Vec<Finding> = records
        .iter()
        .filter_map(|record| {
            let streak = qualifying_streak(hours, record, config)?;
            if settings.requires_deferral_absent
                && (record.has_deferral_start() || record.deferral_rate_or_zero() > Decimal::ZERO)
            {
                return None;
            }

            let years = streak
                .iter()
                .map(|(year, worked)| format!("{year} ({} hrs)", worked.round_dp(0)))
                .collect::<Vec<_>>()
                .join(", ");
            let description = format!(
                "Possible LTPT eligibility: Employee worked >= {} hours in {} consecutive years ({}). \
                 Verify eligibility and enrollment status.",
                settings.hours_threshold.round_dp(0),
                window,
                years
            );
            Some(Finding::new(
                record,
                ViolationType::LtptPossibleEligible,
                description,
            ))
        })
        .collect();

    debug!(
        count = findings.len(),
        employees_with_hours = hours.employee_count(),
        "LTPT rule complete"
    );
    findings
}

/// Walks back from the latest year and returns the qualifying years in
/// chronological order, or `None` when the streak breaks before reaching
/// the required length.
fn qualifying_streak(
    hours: &HoursHistory,
    record: &PayrollRecord,
    config: &PreflightConfig,
) -> Option<Vec<(i32, Decimal)>> {
    let settings = &config.ltpt;
    let by_year = hours.employee(&record.employee_id)?;

    let mut streak = Vec::with_capacity(settings.consecutive_years_required as usize);
    for offset in 0..settings.consecutive_years_required {
        let year = settings.latest_year - offset as i32;
        match by_year.get(&year) {
            Some(&worked) if worked >= settings.hours_threshold => streak.push((year, worked)),
            _ => break,
        }
    }

    if streak.len() != settings.consecutive_years_required as usize {
        return None;
    }
    streak.reverse();
    Some(streak)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatchUpConfig, HceThreshold, LegacyMethod, ProjectionMethod};
    use crate::models::{CatchUpType, HoursRecord, Severity};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_config(window: u32, requires_deferral_absent: bool) -> PreflightConfig {
        let mut config = PreflightConfig::new(
            HceThreshold {
                current_year: 2024,
                compensation_limit: dec("150000"),
            },
            CatchUpConfig {
                roth_only_risk_year: 2024,
            },
            ProjectionMethod::legacy(LegacyMethod::GrossOrYtd),
        );
        config.ltpt.enabled = true;
        config.ltpt.hours_threshold = dec("500");
        config.ltpt.consecutive_years_required = window;
        config.ltpt.latest_year = 2024;
        config.ltpt.requires_deferral_absent = requires_deferral_absent;
        config
    }

    fn create_record(id: &str) -> PayrollRecord {
        PayrollRecord {
            employee_id: id.to_string(),
            employee_name: format!("Part Timer {id}"),
            gross_pay: dec("800"),
            ytd_gross_pay: dec("8000"),
            pay_period_start: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            pay_period_end: NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
            catch_up_contribution: Decimal::ZERO,
            catch_up_type: CatchUpType::None,
            hire_date: None,
            deferral_rate: None,
            deferral_start_date: None,
        }
    }

    fn history(rows: &[(&str, i32, &str)]) -> HoursHistory {
        HoursHistory::from_records(rows.iter().map(|(id, year, hours)| HoursRecord {
            employee_id: id.to_string(),
            year: *year,
            hours: dec(hours),
        }))
    }

    fn check_single(hours: &HoursHistory, window: u32) -> Vec<Finding> {
        let records = [create_record("EMP001")];
        check_ltpt_eligibility(&records, Some(hours), &create_config(window, false))
    }

    #[test]
    fn test_three_consecutive_years_flagged() {
        let hours = history(&[
            ("EMP001", 2022, "600"),
            ("EMP001", 2023, "550"),
            ("EMP001", 2024, "700"),
        ]);
        let findings =
            check_ltpt_eligibility(&[create_record("EMP001")], Some(&hours), &create_config(3, false));

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].violation_type, ViolationType::LtptPossibleEligible);
        assert_eq!(findings[0].severity, Severity::Yellow);
        assert_eq!(
            findings[0].violation_description,
            "Possible LTPT eligibility: Employee worked >= 500 hours in 3 consecutive years \
             (2022 (600 hrs), 2023 (550 hrs), 2024 (700 hrs)). Verify eligibility and enrollment status."
        );
    }

    #[test]
    fn test_gap_in_window_suppresses_finding() {
        // Three qualifying years exist, but 2023 breaks the streak
        let hours = history(&[
            ("EMP001", 2021, "900"),
            ("EMP001", 2022, "600"),
            ("EMP001", 2023, "499"),
            ("EMP001", 2024, "700"),
        ]);
        assert!(check_single(&hours, 3).is_empty());
    }

    #[test]
    fn test_missing_latest_year_suppresses_finding() {
        let hours = history(&[("EMP001", 2022, "600"), ("EMP001", 2023, "600")]);
        assert!(check_single(&hours, 2).is_empty());
    }

    #[test]
    fn test_two_year_window() {
        let hours = history(&[("EMP001", 2023, "500"), ("EMP001", 2024, "500")]);
        assert_eq!(check_single(&hours, 2).len(), 1);
    }

    #[test]
    fn test_later_hours_row_overwrites_earlier() {
        let hours = history(&[
            ("EMP001", 2023, "600"),
            ("EMP001", 2024, "600"),
            ("EMP001", 2024, "100"),
        ]);
        assert!(check_single(&hours, 2).is_empty());
    }

    #[test]
    fn test_unsupported_window_skips_rule() {
        let hours = history(&[
            ("EMP001", 2021, "600"),
            ("EMP001", 2022, "600"),
            ("EMP001", 2023, "600"),
            ("EMP001", 2024, "600"),
        ]);
        assert!(check_single(&hours, 4).is_empty());
    }

    #[test]
    fn test_requires_deferral_absent() {
        let hours = history(&[("EMP001", 2023, "600"), ("EMP001", 2024, "600")]);
        let config = create_config(2, true);

        let mut deferring = create_record("EMP001");
        deferring.deferral_rate = Some("0.02".to_string());
        assert!(check_ltpt_eligibility(&[deferring], Some(&hours), &config).is_empty());

        let mut started = create_record("EMP001");
        started.deferral_start_date = Some("2024-01-01".to_string());
        assert!(check_ltpt_eligibility(&[started], Some(&hours), &config).is_empty());

        assert_eq!(
            check_ltpt_eligibility(&[create_record("EMP001")], Some(&hours), &config).len(),
            1
        );
    }

    #[test]
    fn test_disabled_or_no_hours() {
        let hours = history(&[("EMP001", 2023, "600"), ("EMP001", 2024, "600")]);
        let mut disabled = create_config(2, false);
        disabled.ltpt.enabled = false;

        assert!(
            check_ltpt_eligibility(&[create_record("EMP001")], Some(&hours), &disabled).is_empty()
        );
        assert!(
            check_ltpt_eligibility(&[create_record("EMP001")], None, &create_config(2, false))
                .is_empty()
        );
        assert!(
            check_ltpt_eligibility(
                &[create_record("EMP001")],
                Some(&HoursHistory::default()),
                &create_config(2, false)
            )
            .is_empty()
        );
    }

    #[test]
    fn test_employee_without_history_skipped() {
        let hours = history(&[("EMP001", 2023, "600"), ("EMP001", 2024, "600")]);
        let findings = check_ltpt_eligibility(
            &[create_record("EMP001"), create_record("EMP002")],
            Some(&hours),
            &create_config(2, false),
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].employee_id, "EMP001");
    }
}
