// =============================================================================
// Runtime Configuration
// =============================================================================
//
// Service-level tunables. The indicator pipeline itself is not configurable
// (the smoothing period is a fixed part of the reproduced sheet); everything
// here shapes the HTTP surface around it.
//
// All fields carry `#[serde(default)]` so that a config file written for an
// older version keeps loading after new fields are added.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_output_precision() -> u32 {
    6
}

fn default_preview_rows() -> usize {
    10
}

fn default_max_stored_sheets() -> usize {
    50
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the sheet service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Address the API server binds to. Overridable at startup via the
    /// `ADX_SHEET_BIND_ADDR` environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Decimal places used when rendering numeric cells for preview and CSV
    /// download. The reference sheet compares at 6 places.
    #[serde(default = "default_output_precision")]
    pub output_precision: u32,

    /// Number of leading rows returned in the upload/metadata preview.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    /// Maximum number of computed sheets retained for download; the oldest
    /// is evicted first.
    #[serde(default = "default_max_stored_sheets")]
    pub max_stored_sheets: usize,

    /// Upper bound on the accepted upload body size, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            output_precision: default_output_precision(),
            preview_rows: default_preview_rows(),
            max_stored_sheets: default_max_stored_sheets(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist or fails to parse, returns an error so the
    /// caller can fall back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(path = %path.display(), "Runtime config loaded");
        Ok(config)
    }
}
