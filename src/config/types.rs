//! Configuration types for the preflight engine.
//!
//! [`RawConfig`] mirrors the YAML file one-to-one and is deliberately loose
//! (every section optional) so that a missing key is reported as an
//! [`PreflightError::InvalidConfig`] naming the key. [`RawConfig::validate`]
//! turns it into the immutable [`PreflightConfig`] every rule reads.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PreflightError, PreflightResult};

/// Smallest plan year accepted in configuration.
pub const MIN_PLAN_YEAR: i32 = 2000;
/// Largest plan year accepted in configuration.
pub const MAX_PLAN_YEAR: i32 = 2100;

/// HCE threshold section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HceThreshold {
    /// The plan year being checked.
    pub current_year: i32,
    /// Projected compensation at or above this is treated as HCE.
    pub compensation_limit: Decimal,
}

/// Catch-up section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchUpConfig {
    /// First plan year the Roth-only catch-up rule applies.
    pub roth_only_risk_year: i32,
}

/// Legacy `annualization` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualizationConfig {
    /// One of `gross`, `ytd`, `gross_or_ytd`.
    pub method: String,
}

/// First-generation annualization methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyMethod {
    /// Always annualize the period's gross pay.
    Gross,
    /// Project year-to-date pay, falling back to gross.
    Ytd,
    /// Prefer year-to-date pay when positive, otherwise gross.
    GrossOrYtd,
}

impl LegacyMethod {
    /// Parses the `annualization.method` value.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "gross" => Some(LegacyMethod::Gross),
            "ytd" => Some(LegacyMethod::Ytd),
            "gross_or_ytd" => Some(LegacyMethod::GrossOrYtd),
            _ => None,
        }
    }

    /// The configuration spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            LegacyMethod::Gross => "gross",
            LegacyMethod::Ytd => "ytd",
            LegacyMethod::GrossOrYtd => "gross_or_ytd",
        }
    }
}

/// The single, resolved compensation projection strategy.
///
/// `projection_method` takes precedence over `annualization.method`; the
/// `Legacy` variant carries whichever legacy method was configured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ProjectionMethod {
    /// First-generation day-count annualization.
    Legacy {
        /// The configured legacy method.
        legacy: LegacyMethod,
    },
    /// Year-to-date pay per elapsed day, times 365.
    YtdAnnualize,
    /// Gross pay times the inferred number of pay periods per year.
    PeriodAnnualize,
    /// Weighted sum of the two generation-2 projections.
    Blend {
        /// Weight applied to the YTD projection.
        weight_ytd: Decimal,
        /// Weight applied to the period projection.
        weight_period: Decimal,
    },
}

impl ProjectionMethod {
    /// Shorthand for a legacy strategy.
    pub fn legacy(method: LegacyMethod) -> Self {
        ProjectionMethod::Legacy { legacy: method }
    }
}

impl fmt::Display for ProjectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionMethod::Legacy { legacy } => write!(f, "legacy:{}", legacy.as_str()),
            ProjectionMethod::YtdAnnualize => f.write_str("ytd_annualize"),
            ProjectionMethod::PeriodAnnualize => f.write_str("period_annualize"),
            ProjectionMethod::Blend {
                weight_ytd,
                weight_period,
            } => write!(f, "blend({weight_ytd}/{weight_period})"),
        }
    }
}

/// Auto-enrollment settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoEnrollSettings {
    /// Enables the auto-enroll miss rule.
    pub enabled: bool,
    /// Days after hire before enrollment is due.
    pub wait_days: u32,
    /// The plan's default deferral rate (a fraction).
    pub default_rate: Decimal,
}

/// Automatic escalation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationSettings {
    /// Enables the escalation miss rule.
    pub enabled: bool,
    /// Calendar month (1-12) from which escalation should have applied.
    pub effective_month: u32,
}

/// Long-term part-time eligibility settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LtptSettings {
    /// Enables the LTPT rule.
    pub enabled: bool,
    /// Minimum hours for a year to qualify.
    pub hours_threshold: Decimal,
    /// Consecutive qualifying years required (the rule only runs for 2 or 3).
    pub consecutive_years_required: u32,
    /// The most recent year of the window.
    pub latest_year: i32,
    /// Only flag employees with no deferral recorded.
    pub requires_deferral_absent: bool,
}

/// The validated, immutable engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreflightConfig {
    /// HCE threshold.
    pub hce_threshold: HceThreshold,
    /// Catch-up settings.
    pub catch_up: CatchUpConfig,
    /// Resolved projection strategy.
    pub projection: ProjectionMethod,
    /// Auto-enrollment settings.
    pub auto_enroll: AutoEnrollSettings,
    /// Escalation settings.
    pub escalation: EscalationSettings,
    /// LTPT settings.
    pub ltpt: LtptSettings,
}

impl PreflightConfig {
    /// Builds a configuration with the required sections and default
    /// settings for every optional rule family (all disabled).
    pub fn new(
        hce_threshold: HceThreshold,
        catch_up: CatchUpConfig,
        projection: ProjectionMethod,
    ) -> Self {
        let latest_year = hce_threshold.current_year;
        Self {
            hce_threshold,
            catch_up,
            projection,
            auto_enroll: AutoEnrollSettings {
                enabled: false,
                wait_days: 0,
                default_rate: default_auto_enroll_rate(),
            },
            escalation: EscalationSettings {
                enabled: false,
                effective_month: 1,
            },
            ltpt: LtptSettings {
                enabled: false,
                hours_threshold: default_ltpt_hours_threshold(),
                consecutive_years_required: 3,
                latest_year,
                requires_deferral_absent: false,
            },
        }
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_str(content: &str, source: &str) -> PreflightResult<Self> {
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| PreflightError::ConfigParseError {
                path: source.to_string(),
                message: e.to_string(),
            })?;
        raw.validate()
    }
}

fn default_auto_enroll_rate() -> Decimal {
    Decimal::new(3, 2)
}

fn default_ltpt_hours_threshold() -> Decimal {
    Decimal::from(500)
}

fn default_blend_weight_ytd() -> Decimal {
    Decimal::new(7, 1)
}

fn default_blend_weight_period() -> Decimal {
    Decimal::new(3, 1)
}

/// The configuration file exactly as written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    /// `hce_threshold` section (required).
    pub hce_threshold: Option<HceThreshold>,
    /// `catch_up` section (required).
    pub catch_up: Option<CatchUpConfig>,
    /// `annualization` section (required for the legacy path).
    pub annualization: Option<AnnualizationConfig>,
    /// Generation-2 selector.
    pub projection_method: Option<String>,
    /// Blend weight for the YTD projection.
    pub blend_weight_ytd: Option<Decimal>,
    /// Blend weight for the period projection.
    pub blend_weight_period: Option<Decimal>,
    /// Enables the auto-enroll miss rule.
    #[serde(default)]
    pub auto_enroll_enabled: bool,
    /// Days after hire before enrollment is due.
    pub auto_enroll_wait_days: Option<i64>,
    /// Default deferral rate.
    pub auto_enroll_default_rate: Option<Decimal>,
    /// Enables the escalation rule.
    #[serde(default)]
    pub escalation_enabled: bool,
    /// Escalation effective month.
    pub escalation_effective_month: Option<i64>,
    /// Enables the LTPT rule.
    #[serde(default)]
    pub ltpt_enabled: bool,
    /// LTPT hours threshold.
    pub ltpt_hours_threshold: Option<Decimal>,
    /// LTPT consecutive years.
    pub ltpt_consecutive_years_required: Option<i64>,
    /// LTPT window end year.
    pub ltpt_latest_year: Option<i32>,
    /// LTPT deferral-absent filter.
    #[serde(default)]
    pub ltpt_requires_deferral_absent: bool,
}

impl RawConfig {
    /// Validates ranges and enum membership and resolves the projection
    /// strategy.
    pub fn validate(self) -> PreflightResult<PreflightConfig> {
        let hce_threshold = self
            .hce_threshold
            .ok_or_else(|| invalid("hce_threshold", "missing required key"))?;
        check_year("hce_threshold.current_year", hce_threshold.current_year)?;
        if hce_threshold.compensation_limit <= Decimal::ZERO {
            return Err(invalid(
                "hce_threshold.compensation_limit",
                "must be positive",
            ));
        }

        let catch_up = self
            .catch_up
            .ok_or_else(|| invalid("catch_up", "missing required key"))?;
        check_year("catch_up.roth_only_risk_year", catch_up.roth_only_risk_year)?;

        let legacy = match &self.annualization {
            Some(section) => Some(LegacyMethod::parse(&section.method).ok_or_else(|| {
                invalid(
                    "annualization.method",
                    "must be one of: gross, ytd, gross_or_ytd",
                )
            })?),
            None => None,
        };
        let require_legacy = || {
            legacy
                .map(ProjectionMethod::legacy)
                .ok_or_else(|| invalid("annualization", "missing required key"))
        };

        let projection = match self.projection_method.as_deref().map(str::trim) {
            Some("ytd_annualize") => ProjectionMethod::YtdAnnualize,
            Some("period_annualize") => ProjectionMethod::PeriodAnnualize,
            Some("blend") => ProjectionMethod::Blend {
                weight_ytd: self.blend_weight_ytd.unwrap_or_else(default_blend_weight_ytd),
                weight_period: self
                    .blend_weight_period
                    .unwrap_or_else(default_blend_weight_period),
            },
            None | Some("legacy") => require_legacy()?,
            Some(other) => {
                warn!(
                    projection_method = other,
                    "Unrecognized projection_method, falling back to legacy annualization"
                );
                require_legacy()?
            }
        };

        let wait_days = self.auto_enroll_wait_days.unwrap_or(0);
        let wait_days = u32::try_from(wait_days)
            .map_err(|_| invalid("auto_enroll_wait_days", "must be a non-negative integer"))?;

        let default_rate = self
            .auto_enroll_default_rate
            .unwrap_or_else(default_auto_enroll_rate);
        if default_rate < Decimal::ZERO {
            return Err(invalid("auto_enroll_default_rate", "must be non-negative"));
        }

        let effective_month = self.escalation_effective_month.unwrap_or(1);
        if !(1..=12).contains(&effective_month) {
            return Err(invalid(
                "escalation_effective_month",
                "must be between 1 and 12",
            ));
        }

        let hours_threshold = self
            .ltpt_hours_threshold
            .unwrap_or_else(default_ltpt_hours_threshold);
        if hours_threshold < Decimal::ZERO {
            return Err(invalid("ltpt_hours_threshold", "must be non-negative"));
        }

        let consecutive_years = self.ltpt_consecutive_years_required.unwrap_or(3);
        let consecutive_years_required = u32::try_from(consecutive_years).map_err(|_| {
            invalid(
                "ltpt_consecutive_years_required",
                "must be a non-negative integer",
            )
        })?;
        if !(2..=3).contains(&consecutive_years_required) {
            warn!(
                consecutive_years_required,
                "ltpt_consecutive_years_required must be 2 or 3; the LTPT rule will be skipped"
            );
        }

        let latest_year = self.ltpt_latest_year.unwrap_or(hce_threshold.current_year);

        Ok(PreflightConfig {
            hce_threshold,
            catch_up,
            projection,
            auto_enroll: AutoEnrollSettings {
                enabled: self.auto_enroll_enabled,
                wait_days,
                default_rate,
            },
            escalation: EscalationSettings {
                enabled: self.escalation_enabled,
                // Range-checked above.
                effective_month: effective_month as u32,
            },
            ltpt: LtptSettings {
                enabled: self.ltpt_enabled,
                hours_threshold,
                consecutive_years_required,
                latest_year,
                requires_deferral_absent: self.ltpt_requires_deferral_absent,
            },
        })
    }
}

fn invalid(field: &str, message: &str) -> PreflightError {
    PreflightError::InvalidConfig {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn check_year(field: &str, year: i32) -> PreflightResult<()> {
    if (MIN_PLAN_YEAR..=MAX_PLAN_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(invalid(
            field,
            &format!("must be a valid year ({MIN_PLAN_YEAR}-{MAX_PLAN_YEAR})"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const MINIMAL: &str = r#"
hce_threshold:
  current_year: 2024
  compensation_limit: 150000
catch_up:
  roth_only_risk_year: 2024
annualization:
  method: gross_or_ytd
"#;

    fn parse(yaml: &str) -> PreflightResult<PreflightConfig> {
        PreflightConfig::from_yaml_str(yaml, "test.yaml")
    }

    fn expect_invalid(yaml: &str, expected_field: &str) {
        match parse(yaml) {
            Err(PreflightError::InvalidConfig { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("Expected InvalidConfig for {expected_field}, got {:?}", other),
        }
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse(MINIMAL).unwrap();

        assert_eq!(config.hce_threshold.current_year, 2024);
        assert_eq!(config.hce_threshold.compensation_limit, dec("150000"));
        assert_eq!(
            config.projection,
            ProjectionMethod::legacy(LegacyMethod::GrossOrYtd)
        );
        assert!(!config.auto_enroll.enabled);
        assert_eq!(config.auto_enroll.wait_days, 0);
        assert_eq!(config.auto_enroll.default_rate, dec("0.03"));
        assert_eq!(config.escalation.effective_month, 1);
        assert_eq!(config.ltpt.hours_threshold, dec("500"));
        assert_eq!(config.ltpt.consecutive_years_required, 3);
        assert_eq!(config.ltpt.latest_year, 2024);
    }

    #[test]
    fn test_projection_method_takes_precedence() {
        let yaml = format!("{MINIMAL}projection_method: period_annualize\n");
        assert_eq!(
            parse(&yaml).unwrap().projection,
            ProjectionMethod::PeriodAnnualize
        );
    }

    #[test]
    fn test_blend_weights_default_and_override() {
        let yaml = format!("{MINIMAL}projection_method: blend\n");
        assert_eq!(
            parse(&yaml).unwrap().projection,
            ProjectionMethod::Blend {
                weight_ytd: dec("0.7"),
                weight_period: dec("0.3"),
            }
        );

        let yaml = format!(
            "{MINIMAL}projection_method: blend\nblend_weight_ytd: 0.5\nblend_weight_period: 0.8\n"
        );
        assert_eq!(
            parse(&yaml).unwrap().projection,
            ProjectionMethod::Blend {
                weight_ytd: dec("0.5"),
                weight_period: dec("0.8"),
            }
        );
    }

    #[test]
    fn test_unknown_projection_method_falls_back_to_legacy() {
        let yaml = format!("{MINIMAL}projection_method: moon_phase\n");
        assert_eq!(
            parse(&yaml).unwrap().projection,
            ProjectionMethod::legacy(LegacyMethod::GrossOrYtd)
        );
    }

    #[test]
    fn test_generation_two_method_does_not_need_annualization() {
        let yaml = r#"
hce_threshold: { current_year: 2024, compensation_limit: 150000 }
catch_up: { roth_only_risk_year: 2024 }
projection_method: ytd_annualize
"#;
        assert_eq!(parse(yaml).unwrap().projection, ProjectionMethod::YtdAnnualize);
    }

    #[test]
    fn test_legacy_path_requires_annualization() {
        let yaml = r#"
hce_threshold: { current_year: 2024, compensation_limit: 150000 }
catch_up: { roth_only_risk_year: 2024 }
"#;
        expect_invalid(yaml, "annualization");
    }

    #[test]
    fn test_missing_required_sections() {
        expect_invalid(
            "catch_up: { roth_only_risk_year: 2024 }\nannualization: { method: gross }\n",
            "hce_threshold",
        );
        expect_invalid(
            "hce_threshold: { current_year: 2024, compensation_limit: 1 }\nannualization: { method: gross }\n",
            "catch_up",
        );
    }

    #[test]
    fn test_invalid_annualization_method() {
        expect_invalid(
            &MINIMAL.replace("gross_or_ytd", "monthly"),
            "annualization.method",
        );
    }

    #[test]
    fn test_year_bounds() {
        expect_invalid(
            &MINIMAL.replace("current_year: 2024", "current_year: 1999"),
            "hce_threshold.current_year",
        );
        expect_invalid(
            &MINIMAL.replace("roth_only_risk_year: 2024", "roth_only_risk_year: 2101"),
            "catch_up.roth_only_risk_year",
        );
    }

    #[test]
    fn test_compensation_limit_must_be_positive() {
        expect_invalid(
            &MINIMAL.replace("compensation_limit: 150000", "compensation_limit: 0"),
            "hce_threshold.compensation_limit",
        );
    }

    #[test]
    fn test_escalation_month_range() {
        expect_invalid(
            &format!("{MINIMAL}escalation_effective_month: 13\n"),
            "escalation_effective_month",
        );
        expect_invalid(
            &format!("{MINIMAL}escalation_effective_month: 0\n"),
            "escalation_effective_month",
        );
    }

    #[test]
    fn test_negative_wait_days_rejected() {
        expect_invalid(
            &format!("{MINIMAL}auto_enroll_wait_days: -5\n"),
            "auto_enroll_wait_days",
        );
    }

    #[test]
    fn test_out_of_window_ltpt_years_is_accepted() {
        let config = parse(&format!("{MINIMAL}ltpt_consecutive_years_required: 5\n")).unwrap();
        assert_eq!(config.ltpt.consecutive_years_required, 5);
    }

    #[test]
    fn test_full_feature_config() {
        let yaml = format!(
            "{MINIMAL}auto_enroll_enabled: true\nauto_enroll_wait_days: 30\nauto_enroll_default_rate: 0.04\n\
             escalation_enabled: true\nescalation_effective_month: 7\nltpt_enabled: true\n\
             ltpt_hours_threshold: 1000\nltpt_consecutive_years_required: 2\nltpt_latest_year: 2023\n\
             ltpt_requires_deferral_absent: true\n"
        );
        let config = parse(&yaml).unwrap();

        assert!(config.auto_enroll.enabled);
        assert_eq!(config.auto_enroll.wait_days, 30);
        assert_eq!(config.auto_enroll.default_rate, dec("0.04"));
        assert!(config.escalation.enabled);
        assert_eq!(config.escalation.effective_month, 7);
        assert!(config.ltpt.enabled);
        assert_eq!(config.ltpt.hours_threshold, dec("1000"));
        assert_eq!(config.ltpt.consecutive_years_required, 2);
        assert_eq!(config.ltpt.latest_year, 2023);
        assert!(config.ltpt.requires_deferral_absent);
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        assert!(matches!(
            parse("hce_threshold: [unterminated"),
            Err(PreflightError::ConfigParseError { .. })
        ));
    }
}
