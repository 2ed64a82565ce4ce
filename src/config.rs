//! Filter configuration
//!
//! The domain constants (status-column marker, discard statuses, font) are
//! configurable through a TOML file in the user config directory, an
//! explicit `--config` path, or per-field CLI overrides. Every field has a
//! default matching the audit-report conventions the tool was built for,
//! so a missing or partial config file is fine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// Substring that identifies the status column in a table's header row.
    pub status_marker: String,
    /// Status values (trimmed, exact) whose rows are dropped.
    pub discard_statuses: Vec<String>,
    /// Font family applied to rewritten cells, East Asian and Latin alike.
    pub font_name: String,
    /// Font size in half-points (21 = 10.5 pt, the conventional small font).
    pub font_size_half_points: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            status_marker: "符合情况".to_string(),
            discard_statuses: vec!["符合".to_string(), "不适用".to_string()],
            font_name: "宋体".to_string(),
            font_size_half_points: 21,
        }
    }
}

impl FilterConfig {
    /// Load config from the user config directory, falling back to the
    /// defaults when no file exists.
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path()
            && config_path.exists()
        {
            return Self::load_from(&config_path);
        }
        Ok(FilterConfig::default())
    }

    /// Load config from an explicit path. Unlike `load`, a missing file
    /// here is an error: the user asked for this exact file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: FilterConfig = toml::from_str(&content)
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Path to the default config file.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("doctrim").join("config.toml"))
    }
}
