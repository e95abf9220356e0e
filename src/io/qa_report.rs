//! Persistence for the QA verdict artifact (`output/qa-report.json`).
//!
//! The same file is read by the iteration loop's operator output and by the
//! session gate, possibly many agent turns later, so writes are atomic.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::verdict::Verdict;

/// Load a persisted verdict.
///
/// Errors on a missing file or malformed content; callers that need a
/// conservative default (the session gate) handle the error themselves.
pub fn load_verdict(path: &Path) -> Result<Verdict> {
    debug!(path = %path.display(), "loading qa report");
    let contents =
        fs::read_to_string(path).with_context(|| format!("read qa report {}", path.display()))?;
    let verdict: Verdict = serde_json::from_str(&contents)
        .with_context(|| format!("parse qa report {}", path.display()))?;
    debug!(status = ?verdict.status, issues = verdict.issues.len(), "qa report loaded");
    Ok(verdict)
}

/// Atomically write a verdict to disk (temp file + rename).
pub fn write_verdict(path: &Path, verdict: &Verdict) -> Result<()> {
    debug!(path = %path.display(), status = ?verdict.status, "writing qa report");
    let mut buf = serde_json::to_string_pretty(verdict)?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("qa report path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp qa report {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace qa report {}", path.display()))?;
    Ok(())
}
