//! Runtime configuration
//!
//! Settings come from an optional YAML file; every field has a default so a
//! partial file, or none at all, is valid.
//!
//! ```yaml
//! api_base_url: https://api.openf1.org/v1
//! request_timeout_secs: 30
//! database_path: f1_analysis.db
//! print_report: true
//! persist: true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::outlier::OutlierPolicy;
use crate::{PaddockError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddockConfig {
    /// Timing API root, without a trailing slash
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// SQLite database file
    pub database_path: PathBuf,
    /// Print the text report after each analysis
    pub print_report: bool,
    /// Store each analysis in the database
    pub persist: bool,
    /// Outlier thresholds; change with care, results are only comparable
    /// under the same policy
    pub outlier_policy: OutlierPolicy,
}

impl Default for PaddockConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.openf1.org/v1".to_string(),
            request_timeout_secs: 30,
            user_agent: format!("paddock/{}", env!("CARGO_PKG_VERSION")),
            database_path: PathBuf::from("f1_analysis.db"),
            print_report: true,
            persist: true,
            outlier_policy: OutlierPolicy::default(),
        }
    }
}

impl PaddockConfig {
    /// Load a YAML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| PaddockError::file_error(path.to_path_buf(), e))?;
        let config = Self::from_yaml(&text, path)?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse YAML text; `origin` names the source in errors.
    pub fn from_yaml(text: &str, origin: &Path) -> Result<Self> {
        // An empty document deserializes as null, not as an empty map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml_ng::from_str(text)
            .map_err(|e| PaddockError::Config { path: origin.to_path_buf(), details: e.to_string() })?;
        config.validate(origin)?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(&self, origin: &Path) -> Result<()> {
        let invalid = |details: &str| PaddockError::Config { path: origin.to_path_buf(), details: details.to_string() };

        if self.api_base_url.trim().is_empty() {
            return Err(invalid("api_base_url must not be empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs must be positive"));
        }
        let policy = &self.outlier_policy;
        if !(0.0..=1.0).contains(&policy.percentile_keep) {
            return Err(invalid("outlier_policy.percentile_keep must be within 0..=1"));
        }
        if policy.race_pace_tolerance < 1.0 || policy.soft_tolerance < 1.0 {
            return Err(invalid("outlier_policy tolerances must be at least 1.0"));
        }
        Ok(())
    }
}
