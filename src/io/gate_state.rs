//! Persisted session-gate state: the in-progress marker and retry counter.
//!
//! Both files are session memory shared with an external, non-cooperating
//! process (the hosting agent runtime invokes the gate at stop time, long
//! after the generation run returned). Reads use conservative defaults:
//! a missing or garbled counter reads as zero.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Whether a report session is in flight.
pub fn marker_present(marker_path: &Path) -> bool {
    marker_path.exists()
}

/// Create the in-progress marker (empty file).
pub fn create_marker(marker_path: &Path) -> Result<()> {
    if let Some(parent) = marker_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    fs::write(marker_path, "").with_context(|| format!("write {}", marker_path.display()))
}

/// Read the retry counter. Missing file or unparseable content reads as 0.
pub fn read_iteration_count(counter_path: &Path) -> u32 {
    match fs::read_to_string(counter_path) {
        Ok(contents) => contents.trim().parse().unwrap_or(0),
        Err(_) => 0,
    }
}

/// Atomically write the retry counter (plain integer text).
pub fn write_iteration_count(counter_path: &Path, count: u32) -> Result<()> {
    let parent = counter_path
        .parent()
        .with_context(|| format!("counter path missing parent {}", counter_path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = counter_path.with_extension("tmp");
    fs::write(&tmp_path, format!("{count}\n"))
        .with_context(|| format!("write temp counter {}", tmp_path.display()))?;
    fs::rename(&tmp_path, counter_path)
        .with_context(|| format!("replace counter {}", counter_path.display()))?;
    Ok(())
}

/// Clear all persisted gate state. Marker and counter go together on any
/// terminal transition; missing files are not an error.
pub fn clear(marker_path: &Path, counter_path: &Path) -> Result<()> {
    debug!("clearing session gate state");
    remove_if_present(marker_path)?;
    remove_if_present(counter_path)?;
    Ok(())
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).with_context(|| format!("remove {}", path.display())),
    }
}
