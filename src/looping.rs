//! Bounded QA iteration loop for `press generate --iterate`.
//!
//! Each attempt validates the rendered artifact, persists the verdict for
//! the session gate, and decides: stop on a passing verdict, continue on a
//! failing one while attempts remain, give up when the ceiling is reached.
//! Content revision between attempts is an out-of-band authoring step; the
//! loop re-validates, it does not re-render.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::io::qa_report::write_verdict;
use crate::rules::QaPolicy;
use crate::validate::validate_artifact;
use crate::verdict::{Status, Verdict};

/// Abstraction over verdict production, so tests can script a sequence of
/// verdicts without touching the filesystem rules.
pub trait QaRunner {
    fn validate(&self, artifact: &Path) -> Result<Verdict>;
}

/// Runner that evaluates the checklist in-process.
pub struct ChecklistRunner {
    pub policy: QaPolicy,
}

impl QaRunner for ChecklistRunner {
    fn validate(&self, artifact: &Path) -> Result<Verdict> {
        Ok(validate_artifact(artifact, &self.policy))
    }
}

/// Reason why the loop stopped. Exactly three outcomes; there is no fourth
/// silent state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopStop {
    /// A verdict passed clean.
    Passed,
    /// A verdict passed with advisory notes for the operator.
    PassedWithNotes { notes: Vec<String> },
    /// Attempts exhausted; ship with known issues, last verdict preserved.
    IssuesRemain { last: Verdict },
}

/// Summary of a loop invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaLoopOutcome {
    /// Number of validation attempts performed (1-based count).
    pub attempts: u32,
    pub stop: LoopStop,
}

/// Run the QA loop against a rendered artifact, up to `max_attempts`.
///
/// `on_attempt` observes every verdict with its 0-based attempt index; the
/// CLI uses it to surface issues to the operator between attempts. The
/// verdict is persisted to `qa_report_path` after every attempt so the
/// session gate always sees the latest state.
pub fn run_qa_loop<R: QaRunner, F: FnMut(u32, &Verdict)>(
    artifact: &Path,
    qa_report_path: &Path,
    max_attempts: u32,
    runner: &R,
    mut on_attempt: F,
) -> Result<QaLoopOutcome> {
    debug_assert!(max_attempts > 0);
    let mut attempt_index = 0u32;
    loop {
        let verdict = runner
            .validate(artifact)
            .with_context(|| format!("validate {}", artifact.display()))?;
        write_verdict(qa_report_path, &verdict)
            .with_context(|| format!("persist verdict {}", qa_report_path.display()))?;
        on_attempt(attempt_index, &verdict);

        let attempts = attempt_index + 1;
        match verdict.status {
            Status::Pass => {
                info!(attempts, "qa passed");
                return Ok(QaLoopOutcome {
                    attempts,
                    stop: LoopStop::Passed,
                });
            }
            Status::PassWithNotes => {
                info!(attempts, notes = verdict.notes.len(), "qa passed with notes");
                return Ok(QaLoopOutcome {
                    attempts,
                    stop: LoopStop::PassedWithNotes {
                        notes: verdict.notes,
                    },
                });
            }
            Status::Fail => {
                debug!(
                    attempt = attempt_index,
                    issues = verdict.issues.len(),
                    "qa failed"
                );
                if attempts >= max_attempts {
                    info!(attempts, "qa attempts exhausted, shipping with known issues");
                    return Ok(QaLoopOutcome {
                        attempts,
                        stop: LoopStop::IssuesRemain { last: verdict },
                    });
                }
                attempt_index += 1;
            }
        }
    }
}
