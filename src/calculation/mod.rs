//! Compensation calculations for the preflight engine.
//!
//! This module contains the annual compensation projector, the pay
//! frequency inference it relies on, and the HCE classifier built on top
//! of the projection.

mod hce;
mod pay_frequency;
mod projection;

pub use hce::{is_hce, meets_hce_threshold};
pub use pay_frequency::PayFrequency;
pub use projection::{DAYS_PER_YEAR, Projection, ProjectionBasis, days_elapsed, project};
