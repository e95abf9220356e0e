//! Verdict data model: the structured result of one validation pass.

use serde::{Deserialize, Serialize};

/// Tri-state validation status.
///
/// Not a boolean: `PassWithNotes` distinguishes "acceptable but flagged"
/// from a perfect `Pass`. Wire tokens match the persisted QA report format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Status {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "PASS WITH NOTES")]
    PassWithNotes,
    #[serde(rename = "FAIL")]
    Fail,
}

impl Status {
    /// Whether this status allows the artifact to ship.
    pub fn is_passing(self) -> bool {
        matches!(self, Status::Pass | Status::PassWithNotes)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            Status::Pass => "PASS",
            Status::PassWithNotes => "PASS WITH NOTES",
            Status::Fail => "FAIL",
        };
        f.write_str(token)
    }
}

/// Named counters extracted from the document. Informational only; stats
/// never gate the status by themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentStats {
    pub images: usize,
    pub figure_captions: usize,
    pub list_groups: usize,
    pub list_items: usize,
    pub h2_sections: usize,
    pub h3_subsections: usize,
    pub css_classes: usize,
}

/// The result of one validation pass.
///
/// Invariant: `status == Pass` ⟺ `issues` and `notes` are both empty, and
/// `status == Fail` ⟺ `issues` is non-empty. [`Verdict::from_findings`]
/// derives the status, so verdicts built through it always satisfy this.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verdict {
    pub status: Status,
    /// Non-empty issues force `Fail`.
    #[serde(default)]
    pub issues: Vec<String>,
    /// Non-empty notes with empty issues force `PassWithNotes`.
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub stats: DocumentStats,
}

impl Verdict {
    /// Build a verdict, deriving the status from the findings.
    pub fn from_findings(issues: Vec<String>, notes: Vec<String>, stats: DocumentStats) -> Self {
        let status = if !issues.is_empty() {
            Status::Fail
        } else if !notes.is_empty() {
            Status::PassWithNotes
        } else {
            Status::Pass
        };
        Self {
            status,
            issues,
            notes,
            stats,
        }
    }

    /// A failing verdict carrying a single issue (error-path verdicts such
    /// as a missing file or an unsupported suffix).
    pub fn failure(issue: impl Into<String>) -> Self {
        Self::from_findings(vec![issue.into()], Vec::new(), DocumentStats::default())
    }

    /// A passing-with-notes verdict (the permissive PDF-only fallback).
    pub fn notes_only(notes: Vec<String>) -> Self {
        Self::from_findings(Vec::new(), notes, DocumentStats::default())
    }

    pub fn passed(&self) -> bool {
        self.status.is_passing()
    }
}
