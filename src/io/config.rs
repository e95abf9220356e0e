//! Pipeline configuration stored in `press.toml` at the project root.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::rules::QaPolicy;

/// Pipeline configuration (TOML).
///
/// This file is intended to be edited by humans and must remain stable and
/// automatable. Missing fields default to the values the checklist was
/// written against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PressConfig {
    /// Ceiling on QA loop attempts for `generate --iterate`.
    pub max_attempts: u32,

    /// Wall-clock budget for one PDF render, in seconds.
    pub render_timeout_secs: u64,

    /// Settle delay after network idle, for asynchronous font loading.
    pub settle_delay_ms: u64,

    /// Truncate renderer stdout/stderr beyond this many bytes.
    pub renderer_output_limit_bytes: usize,

    pub policy: QaPolicy,
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            render_timeout_secs: 60,
            settle_delay_ms: 3000,
            renderer_output_limit_bytes: 100_000,
            policy: QaPolicy::default(),
        }
    }
}

impl PressConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(anyhow!("max_attempts must be > 0"));
        }
        if self.render_timeout_secs == 0 {
            return Err(anyhow!("render_timeout_secs must be > 0"));
        }
        if self.renderer_output_limit_bytes == 0 {
            return Err(anyhow!("renderer_output_limit_bytes must be > 0"));
        }
        if self.policy.min_images == 0 {
            return Err(anyhow!("policy.min_images must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `PressConfig::default()`.
pub fn load_config(path: &Path) -> Result<PressConfig> {
    if !path.exists() {
        let cfg = PressConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: PressConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &PressConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
