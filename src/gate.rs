//! Session-stop gate: decides whether the hosting agent session may end.
//!
//! Triggered by the agent runtime on every attempted session termination,
//! decoupled in time from the generation run itself. The gate reads the
//! persisted QA verdict plus a file-backed retry counter and defaults to
//! distrust: any inability to confirm a passing verdict blocks the stop.
//! A forced-retry ceiling keeps the blocking bounded.

use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::io::gate_state;
use crate::io::paths::ProjectPaths;
use crate::io::qa_report::load_verdict;
use crate::verdict::Verdict;

/// Forced-retry ceiling; at the ceiling the gate allows the stop
/// unconditionally and clears all persisted state (circuit breaker against
/// indefinite blocking).
pub const MAX_FORCED_RETRIES: u32 = 3;

/// Stop payload from the hosting runtime.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GateRequest {
    /// True when the runtime signals this stop is already a retry of a
    /// previously blocked stop.
    #[serde(default)]
    pub stop_hook_active: bool,
}

impl GateRequest {
    /// Parse the runtime's stdin payload. Unparseable input degrades to
    /// "not a forced retry" so a broken payload can never burn the retry
    /// budget or bypass the gate.
    pub fn from_payload(payload: &str) -> Self {
        serde_json::from_str(payload).unwrap_or_default()
    }
}

/// Gate decision for one stop attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Block { reason: String },
}

/// Evaluate one stop attempt against the persisted gate state.
pub fn evaluate_stop(paths: &ProjectPaths, request: &GateRequest) -> Result<GateDecision> {
    if !gate_state::marker_present(&paths.marker_path) {
        debug!("no report session in flight, allowing stop");
        return Ok(GateDecision::Allow);
    }

    if request.stop_hook_active {
        let count = gate_state::read_iteration_count(&paths.counter_path) + 1;
        if count >= MAX_FORCED_RETRIES {
            warn!(count, "forced-retry ceiling reached, allowing stop");
            gate_state::clear(&paths.marker_path, &paths.counter_path)?;
            return Ok(GateDecision::Allow);
        }
        gate_state::write_iteration_count(&paths.counter_path, count)?;
    }

    let verdict = match load_verdict(&paths.qa_report_path) {
        Ok(verdict) => verdict,
        Err(err) => {
            if paths.qa_report_path.exists() {
                // Unreadable content counts as failing, never as success.
                warn!(err = %err, "qa report unreadable, treating as failing");
                return Ok(GateDecision::Block {
                    reason: format!(
                        "QA report at {} is unreadable; treating it as failing. \
                         Re-run `press validate` to produce a fresh report before stopping.",
                        paths.qa_report_path.display()
                    ),
                });
            }
            return Ok(GateDecision::Block {
                reason: format!(
                    "Report generation is still in progress: no QA report at {}. \
                     Complete the pipeline (render the PDF, then run `press generate \
                     --iterate` or `press validate`) before stopping.",
                    paths.qa_report_path.display()
                ),
            });
        }
    };

    if verdict.status.is_passing() {
        info!(status = ?verdict.status, "qa passed, allowing stop");
        gate_state::clear(&paths.marker_path, &paths.counter_path)?;
        return Ok(GateDecision::Allow);
    }

    Ok(GateDecision::Block {
        reason: blocking_reason(&verdict),
    })
}

fn blocking_reason(verdict: &Verdict) -> String {
    let mut reason = format!(
        "QA has not passed ({} issues). {}",
        verdict.issues.len(),
        routing_hint(verdict)
    );
    for issue in &verdict.issues {
        reason.push_str("\n- ");
        reason.push_str(issue);
    }
    reason
}

/// Remediation path derived from the leading issue's category, so the
/// calling agent knows where to resume work.
fn routing_hint(verdict: &Verdict) -> String {
    let category = verdict
        .issues
        .first()
        .and_then(|issue| issue.split(':').next())
        .unwrap_or("");
    let target = match category {
        "CONTENT" => "Revise the report copy",
        "TYPOGRAPHY" | "COLOR" => "Rework the stylesheet",
        "LAYOUT" => "Fix the print CSS",
        "STRUCTURE" => "Fix the document structure",
        _ => "Revise the report",
    };
    format!("{target} in output/report.html, then re-run `press generate --iterate`.")
}
