//! Clustering configuration, injected into the coordinator at construction.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, similarity::DEFAULT_THRESHOLD_DAYS};

/// Upper bound accepted for `threshold_days` (roughly ten years).
pub const MAX_THRESHOLD_DAYS: u32 = 3650;

/// What the wiping phase removes before new rows are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WipeScope {
  /// Only the mapping relation. Incidents from earlier rebuilds are left
  /// behind, unreferenced.
  Mappings,
  /// Mapping rows and incident rows.
  #[default]
  Full,
}

/// The `[cluster]` section of the server configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
  /// Maximum date distance, in days, for two articles to match.
  pub threshold_days: u32,
  pub wipe:           WipeScope,
}

impl Default for ClusterConfig {
  fn default() -> Self {
    Self { threshold_days: DEFAULT_THRESHOLD_DAYS, wipe: WipeScope::Full }
  }
}

impl ClusterConfig {
  pub fn validate(&self) -> Result<()> {
    if self.threshold_days > MAX_THRESHOLD_DAYS {
      return Err(Error::InvalidConfig(format!(
        "threshold_days must be at most {MAX_THRESHOLD_DAYS}, got {}",
        self.threshold_days
      )));
    }
    Ok(())
  }
}
