//! Canonical artifact locations under the project root.
//!
//! The artifact store is a path contract, not logic: the authored HTML, the
//! rendered PDF, the persisted QA verdict, and the session-gate state files
//! all hang off these locations.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub output_dir: PathBuf,
    /// Authored HTML report (produced by the external authoring step).
    pub html_path: PathBuf,
    /// Default rendered PDF location; `--output` may override.
    pub pdf_path: PathBuf,
    /// Persisted verdict consumed by the iteration loop and the session gate.
    pub qa_report_path: PathBuf,
    /// Marker file: present while a report session is in flight.
    pub marker_path: PathBuf,
    /// Session-gate retry counter (plain integer text).
    pub counter_path: PathBuf,
    pub presets_dir: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: &Path) -> Self {
        let output_dir = root.join("output");
        Self {
            root: root.to_path_buf(),
            html_path: output_dir.join("report.html"),
            pdf_path: output_dir.join("report.pdf"),
            qa_report_path: output_dir.join("qa-report.json"),
            marker_path: root.join(".report-in-progress"),
            counter_path: output_dir.join(".qa-iteration-count"),
            presets_dir: root.join("presets"),
            output_dir,
        }
    }
}
