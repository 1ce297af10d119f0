//! Highly Compensated Employee classification.

use rust_decimal::Decimal;

use crate::config::PreflightConfig;
use crate::models::PayrollRecord;

use super::project;

/// Returns true when `amount` meets the configured HCE limit (inclusive).
pub fn meets_hce_threshold(amount: Decimal, config: &PreflightConfig) -> bool {
    amount >= config.hce_threshold.compensation_limit
}

/// Returns true when the record's projected compensation meets the limit.
pub fn is_hce(record: &PayrollRecord, config: &PreflightConfig) -> bool {
    meets_hce_threshold(project(record, config).amount, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatchUpConfig, HceThreshold, LegacyMethod, ProjectionMethod};
    use crate::models::CatchUpType;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn config(limit: &str) -> PreflightConfig {
        PreflightConfig::new(
            HceThreshold {
                current_year: 2024,
                compensation_limit: dec(limit),
            },
            CatchUpConfig {
                roth_only_risk_year: 2024,
            },
            ProjectionMethod::legacy(LegacyMethod::GrossOrYtd),
        )
    }

    fn single_day_record(gross: &str) -> PayrollRecord {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        PayrollRecord {
            employee_id: "EMP001".to_string(),
            employee_name: "Test".to_string(),
            gross_pay: dec(gross),
            ytd_gross_pay: Decimal::ZERO,
            pay_period_start: day,
            pay_period_end: day,
            catch_up_contribution: Decimal::ZERO,
            catch_up_type: CatchUpType::None,
            hire_date: None,
            deferral_rate: None,
            deferral_start_date: None,
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 1000 × 365 = 365000 exactly
        assert!(is_hce(&single_day_record("1000"), &config("365000")));
    }

    #[test]
    fn test_just_below_threshold_is_not_hce() {
        assert!(!is_hce(&single_day_record("999.99"), &config("365000")));
    }

    #[test]
    fn test_above_threshold_is_hce() {
        assert!(is_hce(&single_day_record("1000"), &config("150000")));
    }

    #[test]
    fn test_meets_hce_threshold() {
        let config = config("150000");
        assert!(meets_hce_threshold(dec("150000"), &config));
        assert!(meets_hce_threshold(dec("150000.01"), &config));
        assert!(!meets_hce_threshold(dec("149999.99"), &config));
    }
}
