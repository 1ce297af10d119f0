//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading and validating
//! the preflight configuration from a YAML file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{PreflightError, PreflightResult};

use super::types::PreflightConfig;

/// Loads and provides access to the preflight configuration.
///
/// # Example
///
/// ```no_run
/// use secure_preflight::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/secure20_preflight.yaml")?;
/// println!("Checking plan year {}", loader.config().hce_threshold.current_year);
/// # Ok::<(), secure_preflight::error::PreflightError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
    config: PreflightConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing or unreadable
    /// - The file contains invalid YAML
    /// - A required key is missing or a value is out of range
    pub fn load<P: AsRef<Path>>(path: P) -> PreflightResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PreflightError::ConfigNotFound {
            path: path_str.clone(),
        })?;
        debug!(path = %path_str, bytes = content.len(), "Read configuration file");

        let config = PreflightConfig::from_yaml_str(&content, &path_str)?;
        info!(
            path = %path_str,
            current_year = config.hce_threshold.current_year,
            projection = %config.projection,
            auto_enroll = config.auto_enroll.enabled,
            escalation = config.escalation.enabled,
            ltpt = config.ltpt.enabled,
            "Loaded preflight configuration"
        );

        Ok(Self {
            path: path.to_path_buf(),
            config,
        })
    }

    /// Returns the validated configuration.
    pub fn config(&self) -> &PreflightConfig {
        &self.config
    }

    /// Returns the path the configuration was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> PreflightConfig {
        self.config
    }
}
