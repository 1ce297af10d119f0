//! Annual compensation projection.
//!
//! Estimates a full-year compensation figure from one payroll record under
//! the configured [`ProjectionMethod`]. Two generations of methods exist:
//!
//! **Legacy** (`gross`, `ytd`, `gross_or_ytd`) scales by calendar days:
//! - YTD: `ytd_gross_pay × 365 / days_elapsed`, where `days_elapsed` counts
//!   Jan 1 of the plan year through the period end inclusive (floored to 1)
//! - gross: `gross_pay × 365 / period_length_days`
//!
//! **Generation 2** scales by pay frequency:
//! - `ytd_annualize`: `ytd_gross_pay / days_elapsed × 365`
//! - `period_annualize`: `gross_pay × periods_per_year`
//! - `blend`: `weight_ytd × ytd_annualize + weight_period × period_annualize`
//!
//! Every YTD-based method falls back to its period counterpart when
//! `ytd_gross_pay` is zero.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{LegacyMethod, PreflightConfig, ProjectionMethod};
use crate::models::PayrollRecord;

use super::PayFrequency;

/// Days used to scale partial-year figures to a year.
pub const DAYS_PER_YEAR: Decimal = Decimal::from_parts(365, 0, 0, false, 0);

/// Which computation actually produced a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionBasis {
    /// Legacy YTD day-count projection.
    YearToDate,
    /// Legacy gross-pay day-count projection.
    GrossPeriod,
    /// Generation-2 YTD projection.
    YtdAnnualize,
    /// Generation-2 frequency projection.
    PeriodAnnualize(PayFrequency),
    /// Weighted blend of the two generation-2 projections.
    Blend,
}

impl fmt::Display for ProjectionBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionBasis::YearToDate => f.write_str("ytd"),
            ProjectionBasis::GrossPeriod => f.write_str("gross"),
            ProjectionBasis::YtdAnnualize => f.write_str("ytd_annualize"),
            ProjectionBasis::PeriodAnnualize(frequency) => {
                write!(f, "period_annualize({frequency})")
            }
            ProjectionBasis::Blend => f.write_str("blend"),
        }
    }
}

/// A projected annual compensation figure and how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    /// Projected annual compensation.
    pub amount: Decimal,
    /// The computation that produced `amount`.
    pub method_used: ProjectionBasis,
}

impl Projection {
    fn new(amount: Decimal, method_used: ProjectionBasis) -> Self {
        Self {
            amount,
            method_used,
        }
    }
}

/// Projects a record's annual compensation under the configured method.
///
/// Pure and deterministic: identical inputs always give the same result.
///
/// # Examples
///
/// ```
/// use secure_preflight::calculation::project;
/// use secure_preflight::config::{
///     CatchUpConfig, HceThreshold, LegacyMethod, PreflightConfig, ProjectionMethod,
/// };
/// use secure_preflight::models::{CatchUpType, PayrollRecord};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let config = PreflightConfig::new(
///     HceThreshold { current_year: 2024, compensation_limit: Decimal::from(150_000) },
///     CatchUpConfig { roth_only_risk_year: 2024 },
///     ProjectionMethod::legacy(LegacyMethod::Gross),
/// );
/// let record = PayrollRecord {
///     employee_id: "EMP001".to_string(),
///     employee_name: "Test".to_string(),
///     gross_pay: Decimal::from(1000),
///     ytd_gross_pay: Decimal::ZERO,
///     pay_period_start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     pay_period_end: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     catch_up_contribution: Decimal::ZERO,
///     catch_up_type: CatchUpType::None,
///     hire_date: None,
///     deferral_rate: None,
///     deferral_start_date: None,
/// };
///
/// assert_eq!(project(&record, &config).amount, Decimal::from(365_000));
/// ```
pub fn project(record: &PayrollRecord, config: &PreflightConfig) -> Projection {
    let current_year = config.hce_threshold.current_year;

    match config.projection {
        ProjectionMethod::Legacy { legacy } => match legacy {
            LegacyMethod::Ytd | LegacyMethod::GrossOrYtd
                if record.ytd_gross_pay > Decimal::ZERO =>
            {
                let days = Decimal::from(days_elapsed(record.pay_period_end, current_year));
                Projection::new(
                    scale_by_days(record.ytd_gross_pay, days),
                    ProjectionBasis::YearToDate,
                )
            }
            _ => Projection::new(annualize_gross(record), ProjectionBasis::GrossPeriod),
        },
        ProjectionMethod::YtdAnnualize => ytd_annualize(record, current_year),
        ProjectionMethod::PeriodAnnualize => period_annualize(record),
        ProjectionMethod::Blend {
            weight_ytd,
            weight_period,
        } => {
            let ytd = ytd_annualize(record, current_year).amount;
            let period = period_annualize(record).amount;
            Projection::new(
                weight_ytd
                    .saturating_mul(ytd)
                    .saturating_add(weight_period.saturating_mul(period)),
                ProjectionBasis::Blend,
            )
        }
    }
}

/// Days from Jan 1 of `current_year` through `period_end` inclusive,
/// floored to 1.
pub fn days_elapsed(period_end: NaiveDate, current_year: i32) -> i64 {
    NaiveDate::from_ymd_opt(current_year, 1, 1)
        .map(|year_start| (period_end - year_start).num_days() + 1)
        .unwrap_or(1)
        .max(1)
}

/// `amount × 365 / days`. Saturates at `Decimal::MAX` instead of
/// overflowing; `days` is at least 1.
fn scale_by_days(amount: Decimal, days: Decimal) -> Decimal {
    amount
        .checked_mul(DAYS_PER_YEAR)
        .and_then(|annual| annual.checked_div(days))
        .unwrap_or_else(|| (amount / days).saturating_mul(DAYS_PER_YEAR))
}

/// Legacy gross annualization: `gross_pay × 365 / period_length_days`.
fn annualize_gross(record: &PayrollRecord) -> Decimal {
    scale_by_days(record.gross_pay, Decimal::from(record.period_length_days()))
}

fn ytd_annualize(record: &PayrollRecord, current_year: i32) -> Projection {
    if record.ytd_gross_pay <= Decimal::ZERO {
        return period_annualize(record);
    }
    let days = Decimal::from(days_elapsed(record.pay_period_end, current_year));
    Projection::new(
        (record.ytd_gross_pay / days).saturating_mul(DAYS_PER_YEAR),
        ProjectionBasis::YtdAnnualize,
    )
}

fn period_annualize(record: &PayrollRecord) -> Projection {
    let frequency = PayFrequency::from_period_length(record.period_length_days());
    Projection::new(
        record
            .gross_pay
            .saturating_mul(Decimal::from(frequency.periods_per_year())),
        ProjectionBasis::PeriodAnnualize(frequency),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatchUpConfig, HceThreshold};
    use crate::models::CatchUpType;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn config_with(projection: ProjectionMethod) -> PreflightConfig {
        PreflightConfig::new(
            HceThreshold {
                current_year: 2024,
                compensation_limit: dec("150000"),
            },
            CatchUpConfig {
                roth_only_risk_year: 2024,
            },
            projection,
        )
    }

    fn legacy(method: LegacyMethod) -> PreflightConfig {
        config_with(ProjectionMethod::legacy(method))
    }

    fn create_record(gross: &str, ytd: &str, start: &str, end: &str) -> PayrollRecord {
        PayrollRecord {
            employee_id: "EMP001".to_string(),
            employee_name: "Test Employee".to_string(),
            gross_pay: dec(gross),
            ytd_gross_pay: dec(ytd),
            pay_period_start: date(start),
            pay_period_end: date(end),
            catch_up_contribution: Decimal::ZERO,
            catch_up_type: CatchUpType::None,
            hire_date: None,
            deferral_rate: None,
            deferral_start_date: None,
        }
    }

    #[test]
    fn test_gross_biweekly_projection() {
        let record = create_record("5000", "0", "2024-01-01", "2024-01-14");
        let projection = project(&record, &legacy(LegacyMethod::Gross));

        // 5000 × 365 / 14
        assert_eq!(projection.amount.round_dp(2), dec("130357.14"));
        assert_eq!(projection.method_used, ProjectionBasis::GrossPeriod);
    }

    #[test]
    fn test_gross_monthly_projection() {
        let record = create_record("10000", "0", "2024-01-01", "2024-01-31");
        let projection = project(&record, &legacy(LegacyMethod::Gross));

        // 10000 × 365 / 31
        assert_eq!(projection.amount.round_dp(2), dec("117741.94"));
    }

    #[test]
    fn test_single_day_period_projects_exactly() {
        let record = create_record("1000", "0", "2024-03-05", "2024-03-05");
        assert_eq!(
            project(&record, &legacy(LegacyMethod::Gross)).amount,
            dec("365000")
        );
    }

    #[test]
    fn test_gross_ignores_ytd() {
        let record = create_record("5000", "60000", "2024-03-27", "2024-04-09");
        let projection = project(&record, &legacy(LegacyMethod::Gross));
        assert_eq!(projection.method_used, ProjectionBasis::GrossPeriod);
    }

    #[test]
    fn test_gross_or_ytd_prefers_ytd() {
        // 2024-04-09 is day 100 of 2024
        let record = create_record("5000", "60000", "2024-03-27", "2024-04-09");
        let projection = project(&record, &legacy(LegacyMethod::GrossOrYtd));

        assert_eq!(projection.amount, dec("219000"));
        assert_eq!(projection.method_used, ProjectionBasis::YearToDate);
    }

    #[test]
    fn test_gross_or_ytd_falls_back_to_gross_when_ytd_zero() {
        let record = create_record("5000", "0", "2024-01-01", "2024-01-14");
        let projection = project(&record, &legacy(LegacyMethod::GrossOrYtd));

        assert_eq!(projection.amount.round_dp(2), dec("130357.14"));
        assert_eq!(projection.method_used, ProjectionBasis::GrossPeriod);
    }

    #[test]
    fn test_ytd_method_uses_ytd() {
        // Day 180 of 2024 is 2024-06-28
        let record = create_record("5000", "80000", "2024-06-15", "2024-06-28");
        let projection = project(&record, &legacy(LegacyMethod::Ytd));

        // 80000 × 365 / 180
        assert_eq!(projection.amount.round_dp(2), dec("162222.22"));
    }

    #[test]
    fn test_period_end_before_plan_year_floors_days_elapsed() {
        let record = create_record("5000", "1000", "2023-12-01", "2023-12-14");
        // Period ends before Jan 1 2024, so days_elapsed floors to 1.
        let projection = project(&record, &legacy(LegacyMethod::Ytd));
        assert_eq!(projection.amount, dec("365000"));
    }

    #[test]
    fn test_days_elapsed() {
        assert_eq!(days_elapsed(date("2024-01-01"), 2024), 1);
        assert_eq!(days_elapsed(date("2024-04-09"), 2024), 100);
        assert_eq!(days_elapsed(date("2024-12-31"), 2024), 366);
        assert_eq!(days_elapsed(date("2023-06-30"), 2024), 1);
    }

    #[test]
    fn test_period_annualize_uses_frequency() {
        let config = config_with(ProjectionMethod::PeriodAnnualize);

        let biweekly = create_record("5000", "0", "2024-01-01", "2024-01-14");
        assert_eq!(project(&biweekly, &config).amount, dec("130000"));
        assert_eq!(
            project(&biweekly, &config).method_used,
            ProjectionBasis::PeriodAnnualize(PayFrequency::Biweekly)
        );

        let weekly = create_record("1000", "0", "2024-01-01", "2024-01-07");
        assert_eq!(project(&weekly, &config).amount, dec("52000"));

        let semi_monthly = create_record("5000", "0", "2024-01-01", "2024-01-16");
        assert_eq!(project(&semi_monthly, &config).amount, dec("120000"));

        let monthly = create_record("10000", "0", "2024-01-01", "2024-01-31");
        assert_eq!(project(&monthly, &config).amount, dec("120000"));

        let irregular = create_record("1000", "0", "2024-01-01", "2024-01-20");
        assert_eq!(project(&irregular, &config).amount, dec("26000"));
    }

    #[test]
    fn test_ytd_annualize() {
        let config = config_with(ProjectionMethod::YtdAnnualize);
        let record = create_record("5000", "60000", "2024-03-27", "2024-04-09");

        let projection = project(&record, &config);
        assert_eq!(projection.amount, dec("219000"));
        assert_eq!(projection.method_used, ProjectionBasis::YtdAnnualize);
    }

    #[test]
    fn test_ytd_annualize_falls_back_to_period() {
        let config = config_with(ProjectionMethod::YtdAnnualize);
        let record = create_record("5000", "0", "2024-01-01", "2024-01-14");

        let projection = project(&record, &config);
        assert_eq!(projection.amount, dec("130000"));
        assert_eq!(
            projection.method_used,
            ProjectionBasis::PeriodAnnualize(PayFrequency::Biweekly)
        );
    }

    #[test]
    fn test_blend_uses_configured_weights() {
        let config = config_with(ProjectionMethod::Blend {
            weight_ytd: dec("0.7"),
            weight_period: dec("0.3"),
        });
        let record = create_record("5000", "60000", "2024-03-27", "2024-04-09");

        // 0.7 × 219000 + 0.3 × 130000
        let projection = project(&record, &config);
        assert_eq!(projection.amount, dec("192300"));
        assert_eq!(projection.method_used, ProjectionBasis::Blend);
    }

    #[test]
    fn test_blend_weights_need_not_sum_to_one() {
        let config = config_with(ProjectionMethod::Blend {
            weight_ytd: dec("1"),
            weight_period: dec("1"),
        });
        let record = create_record("5000", "60000", "2024-03-27", "2024-04-09");

        assert_eq!(project(&record, &config).amount, dec("349000"));
    }

    #[test]
    fn test_projection_is_deterministic() {
        let config = legacy(LegacyMethod::GrossOrYtd);
        let record = create_record("4321.09", "12345.67", "2024-02-01", "2024-02-14");
        assert_eq!(project(&record, &config), project(&record, &config));
    }

    #[test]
    fn test_oversized_pay_saturates_instead_of_overflowing() {
        let record = create_record(
            "10000000000000000000000000000",
            "10000000000000000000000000000",
            "2024-01-01",
            "2024-01-01",
        );
        let methods = [
            ProjectionMethod::legacy(LegacyMethod::Gross),
            ProjectionMethod::legacy(LegacyMethod::Ytd),
            ProjectionMethod::YtdAnnualize,
            ProjectionMethod::PeriodAnnualize,
        ];
        for method in methods {
            assert_eq!(project(&record, &config_with(method)).amount, Decimal::MAX);
        }

        let blend = config_with(ProjectionMethod::Blend {
            weight_ytd: dec("0.7"),
            weight_period: dec("0.3"),
        });
        assert!(project(&record, &blend).amount > dec("150000"));
    }

    #[test]
    fn test_basis_labels() {
        assert_eq!(ProjectionBasis::YearToDate.to_string(), "ytd");
        assert_eq!(
            ProjectionBasis::PeriodAnnualize(PayFrequency::Monthly).to_string(),
            "period_annualize(monthly)"
        );
    }
}
