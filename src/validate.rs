//! Artifact-level validation: resolve a report path to document text and
//! run the checklist.
//!
//! PDF content is never parsed. A `.pdf` argument validates the sibling
//! `.html` with the same stem when one exists; without one there is no
//! structural signal, so the fallback is deliberately permissive.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::rules::{Document, QaPolicy, evaluate};
use crate::verdict::Verdict;

/// Note appended when a PDF is validated through its HTML source.
const PDF_VIA_HTML_NOTE: &str =
    "PDF validated via HTML source. Visual inspection recommended for final sign-off.";
/// Note used when only the PDF exists.
const PDF_ONLY_NOTE: &str = "PDF-only validation: manual visual inspection required.";

/// Validate a report artifact and produce a verdict.
///
/// Error paths (missing file, unsupported suffix) degrade to structured
/// verdicts rather than errors: the validator always has an answer.
pub fn validate_artifact(path: &Path, policy: &QaPolicy) -> Verdict {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => validate_html(path, policy),
        Some("pdf") => {
            let html_path = path.with_extension("html");
            if html_path.exists() {
                debug!(html = %html_path.display(), "validating pdf via html source");
                let verdict = validate_html(&html_path, policy);
                let mut notes = verdict.notes;
                notes.push(PDF_VIA_HTML_NOTE.to_string());
                Verdict::from_findings(verdict.issues, notes, verdict.stats)
            } else {
                debug!(pdf = %path.display(), "no html sibling, permissive fallback");
                Verdict::notes_only(vec![PDF_ONLY_NOTE.to_string()])
            }
        }
        _ => Verdict::failure(format!("Unsupported file type: {}", path.display())),
    }
}

/// Validate an HTML file against the checklist.
pub fn validate_html(path: &Path, policy: &QaPolicy) -> Verdict {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return Verdict::failure(format!("File not found: {}", path.display())),
    };
    let document = Document::parse(contents);
    evaluate(&document, policy)
}
