//! Configuration loading and validation for the preflight engine.
//!
//! The configuration is a single YAML file holding the HCE threshold, the
//! catch-up risk year, the compensation projection selector and the
//! settings of the optional rule families.
//!
//! # Example
//!
//! ```no_run
//! use secure_preflight::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/secure20_preflight.yaml").unwrap();
//! println!("Projection: {}", config.config().projection);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AnnualizationConfig, AutoEnrollSettings, CatchUpConfig, EscalationSettings, HceThreshold,
    LegacyMethod, LtptSettings, MAX_PLAN_YEAR, MIN_PLAN_YEAR, PreflightConfig, ProjectionMethod,
    RawConfig,
};
