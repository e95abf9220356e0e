//! End-to-end pipeline flow over a temp project: authored HTML in, QA loop
//! verdicts persisted, session gate consulted at stop time.

use std::fs;

use press::gate::{GateDecision, GateRequest, evaluate_stop};
use press::io::gate_state;
use press::io::paths::ProjectPaths;
use press::looping::{ChecklistRunner, LoopStop, run_qa_loop};
use press::rules::QaPolicy;
use press::verdict::Status;

/// Authored HTML that clears the whole checklist.
fn clean_report_html() -> String {
    let figures: String = (0..5)
        .map(|i| {
            format!(
                "<figure><img src=\"assets/billboard-{i}.png\">\
                 <figcaption>Billboard variant {i}</figcaption></figure>"
            )
        })
        .collect();
    let blocks: String = (0..16)
        .map(|i| format!("<div class=\"panel-{i}\">Panel {i}</div>"))
        .collect();
    format!(
        "<html><head>\
         <link href=\"https://fonts.googleapis.com/css2?family=Libre+Baskerville\" \
         rel=\"stylesheet\">\
         <style>@page {{ size: letter; margin: 0; }} \
         body {{ font-family: 'Libre Baskerville', Georgia, serif; color: #1a2b3c; }} \
         p {{ orphans: 3; widows: 3; print-color-adjust: exact; }} \
         .section {{ page-break-inside: avoid; }}</style></head>\
         <body><div class=\"cover\">The Annual Review</div>\
         {figures}{blocks}\
         <table><tr><td>Criteria</td><td>Result</td></tr></table>\
         </body></html>"
    )
}

fn author_report(paths: &ProjectPaths, html: &str) {
    fs::create_dir_all(&paths.output_dir).expect("mkdir output");
    fs::write(&paths.html_path, html).expect("write report.html");
}

#[test]
fn passing_report_unblocks_the_session_gate() {
    let temp = tempfile::tempdir().expect("tempdir");
    let paths = ProjectPaths::new(temp.path());
    author_report(&paths, &clean_report_html());
    gate_state::create_marker(&paths.marker_path).expect("marker");

    // While no QA report exists, the gate refuses to let the session end.
    let early = evaluate_stop(&paths, &GateRequest::default()).expect("gate");
    assert!(matches!(early, GateDecision::Block { .. }));

    // The loop validates the PDF via its HTML sibling and persists the verdict.
    let runner = ChecklistRunner {
        policy: QaPolicy::default(),
    };
    let outcome = run_qa_loop(&paths.pdf_path, &paths.qa_report_path, 3, &runner, |_, _| {})
        .expect("loop");
    assert_eq!(outcome.attempts, 1);
    let LoopStop::PassedWithNotes { notes } = outcome.stop else {
        panic!("expected pass with the via-HTML note");
    };
    assert!(notes.iter().any(|n| n.contains("Visual inspection")));
    assert!(paths.qa_report_path.is_file());

    // Now the gate allows the stop and clears its persisted state.
    let decision = evaluate_stop(&paths, &GateRequest::default()).expect("gate");
    assert_eq!(decision, GateDecision::Allow);
    assert!(!paths.marker_path.exists());
    assert!(!paths.counter_path.exists());
}

#[test]
fn failing_report_blocks_until_the_circuit_breaker_trips() {
    let temp = tempfile::tempdir().expect("tempdir");
    let paths = ProjectPaths::new(temp.path());
    author_report(
        &paths,
        "<html><body><p>Time for a deep dive.</p></body></html>",
    );
    gate_state::create_marker(&paths.marker_path).expect("marker");

    let runner = ChecklistRunner {
        policy: QaPolicy::default(),
    };
    let outcome = run_qa_loop(&paths.pdf_path, &paths.qa_report_path, 3, &runner, |_, _| {})
        .expect("loop");
    assert_eq!(outcome.attempts, 3);
    let LoopStop::IssuesRemain { last } = outcome.stop else {
        panic!("expected exhausted attempts");
    };
    assert_eq!(last.status, Status::Fail);

    // The gate surfaces the persisted issues and a remediation hint.
    let decision = evaluate_stop(&paths, &GateRequest::default()).expect("gate");
    let GateDecision::Block { reason } = decision else {
        panic!("expected block");
    };
    assert!(reason.contains("deep dive"));
    assert!(reason.contains("output/report.html"));
    assert!(paths.marker_path.exists());

    // Forced retries are bounded: the third one is allowed unconditionally.
    let forced = GateRequest {
        stop_hook_active: true,
    };
    assert!(matches!(
        evaluate_stop(&paths, &forced).expect("gate"),
        GateDecision::Block { .. }
    ));
    assert!(matches!(
        evaluate_stop(&paths, &forced).expect("gate"),
        GateDecision::Block { .. }
    ));
    assert_eq!(
        evaluate_stop(&paths, &forced).expect("gate"),
        GateDecision::Allow
    );
    assert!(!paths.marker_path.exists());
    assert!(!paths.counter_path.exists());
}

#[test]
fn gate_is_a_noop_for_projects_without_a_report_session() {
    let temp = tempfile::tempdir().expect("tempdir");
    let paths = ProjectPaths::new(temp.path());
    let decision = evaluate_stop(&paths, &GateRequest::default()).expect("gate");
    assert_eq!(decision, GateDecision::Allow);
}

#[test]
fn pdf_only_artifact_passes_permissively_and_unblocks() {
    let temp = tempfile::tempdir().expect("tempdir");
    let paths = ProjectPaths::new(temp.path());
    fs::create_dir_all(&paths.output_dir).expect("mkdir output");
    fs::write(&paths.pdf_path, b"%PDF-1.4").expect("write pdf");
    gate_state::create_marker(&paths.marker_path).expect("marker");

    let runner = ChecklistRunner {
        policy: QaPolicy::default(),
    };
    let outcome = run_qa_loop(&paths.pdf_path, &paths.qa_report_path, 3, &runner, |_, _| {})
        .expect("loop");
    assert!(matches!(outcome.stop, LoopStop::PassedWithNotes { .. }));

    let decision = evaluate_stop(&paths, &GateRequest::default()).expect("gate");
    assert_eq!(decision, GateDecision::Allow);
}
