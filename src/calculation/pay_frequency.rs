//! Pay frequency inference from pay period length.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How often an employee is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// 52 periods per year.
    Weekly,
    /// 26 periods per year.
    Biweekly,
    /// 24 periods per year.
    SemiMonthly,
    /// 12 periods per year.
    Monthly,
}

impl PayFrequency {
    /// Infers the frequency from an inclusive period length in days.
    ///
    /// Ranges are checked in order: 13-15 biweekly, 6-8 weekly, 14-17
    /// semi-monthly, 28-32 monthly. Biweekly is checked first, so 14 and 15
    /// day periods are biweekly and only 16-17 reach semi-monthly. Any other
    /// length is treated as biweekly.
    ///
    /// ```
    /// use secure_preflight::calculation::PayFrequency;
    ///
    /// assert_eq!(PayFrequency::from_period_length(14), PayFrequency::Biweekly);
    /// assert_eq!(PayFrequency::from_period_length(16), PayFrequency::SemiMonthly);
    /// assert_eq!(PayFrequency::from_period_length(45), PayFrequency::Biweekly);
    /// ```
    pub fn from_period_length(days: i64) -> Self {
        match days {
            13..=15 => PayFrequency::Biweekly,
            6..=8 => PayFrequency::Weekly,
            14..=17 => PayFrequency::SemiMonthly,
            28..=32 => PayFrequency::Monthly,
            _ => PayFrequency::Biweekly,
        }
    }

    /// Number of pay periods in a year.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PayFrequency::Weekly => 52,
            PayFrequency::Biweekly => 26,
            PayFrequency::SemiMonthly => 24,
            PayFrequency::Monthly => 12,
        }
    }

    /// Lowercase label used in logs and method descriptions.
    pub fn as_str(&self) -> &'static str {
        match self {
            PayFrequency::Weekly => "weekly",
            PayFrequency::Biweekly => "biweekly",
            PayFrequency::SemiMonthly => "semi_monthly",
            PayFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
