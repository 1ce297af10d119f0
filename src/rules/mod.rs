//! Compliance rules for the preflight engine.
//!
//! Each rule is a pure function over the validated records and the
//! configuration, returning fresh findings in record order:
//!
//! | Rule | Finding | Severity | Gate |
//! |------|---------|----------|------|
//! | Roth-only catch-up | `ROTH_ONLY_CATCHUP_HCE` | RED | `current_year >= roth_only_risk_year` |
//! | Potential HCE | `POTENTIAL_HCE` | YELLOW | always |
//! | Auto-enroll miss | `AUTO_ENROLL_MISS` | RED | enabled + auto-enroll columns |
//! | Below default | `AUTO_ENROLL_BELOW_DEFAULT` | YELLOW | auto-enroll columns |
//! | Escalation | `ESCALATION_POSSIBLE_MISS` | YELLOW | enabled + auto-enroll columns |
//! | LTPT | `LTPT_POSSIBLE_ELIGIBLE` | YELLOW | enabled + hours history |

mod auto_enroll;
mod escalation;
mod ltpt;
mod potential_hce;
mod roth_catchup;

pub use auto_enroll::{check_auto_enroll_below_default, check_auto_enroll_miss};
pub use escalation::check_escalation_miss;
pub use ltpt::{LTPT_SUPPORTED_WINDOWS, check_ltpt_eligibility};
pub use potential_hce::check_potential_hce;
pub use roth_catchup::check_roth_only_catchup_hce;

use rust_decimal::Decimal;

/// Formats money as `$1,234,567.89`.
pub(crate) fn format_currency(amount: Decimal) -> String {
    let rounded = format!("{:.2}", amount.round_dp(2).abs());
    let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !amount.round_dp(2).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{fraction}")
}

/// Formats a fractional rate as a percentage with one decimal, `0.025` -> `2.5%`.
pub(crate) fn format_percent(rate: Decimal) -> String {
    format!(
        "{:.1}%",
        rate.saturating_mul(Decimal::ONE_HUNDRED).round_dp(1)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_eq!(format_currency(dec("130357.142857")), "$130,357.14");
        assert_eq!(format_currency(dec("1234567.891")), "$1,234,567.89");
        assert_eq!(format_currency(dec("999")), "$999.00");
        assert_eq!(format_currency(dec("0")), "$0.00");
        assert_eq!(format_currency(dec("365000")), "$365,000.00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec("-1500.5")), "-$1,500.50");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec("0.03")), "3.0%");
        assert_eq!(format_percent(dec("0.025")), "2.5%");
        assert_eq!(format_percent(dec("0")), "0.0%");
    }

    #[test]
    fn test_format_percent_saturates_on_huge_rates() {
        assert_eq!(
            format_percent(Decimal::MIN),
            format!("{:.1}%", Decimal::MIN)
        );
    }
}
