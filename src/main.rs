//! PDF report pipeline CLI.
//!
//! `generate` turns the authored HTML report into a paginated PDF and can
//! run the bounded QA loop; `validate` checks one artifact against the QA
//! checklist; `gate` is the session-stop hook for the hosting agent runtime.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};

use press::exit_codes;
use press::gate::{GateDecision, GateRequest, evaluate_stop};
use press::io::config::{PressConfig, load_config};
use press::io::paths::ProjectPaths;
use press::io::preset::load_preset;
use press::logging;
use press::looping::{ChecklistRunner, LoopStop, run_qa_loop};
use press::render::{PlaywrightEngine, render_pdf};
use press::validate::validate_artifact;
use press::verdict::Verdict;

#[derive(Parser)]
#[command(
    name = "press",
    version,
    about = "PDF report pipeline with a bounded QA loop"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the authored HTML report to PDF, optionally running the QA loop.
    Generate {
        /// Path to the source data (JSON file or directory), relative to the project root.
        #[arg(long)]
        data: PathBuf,
        /// Template name (e.g. 'report').
        #[arg(long)]
        template: String,
        /// Output PDF path, relative to the project root.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Stop after the HTML preview, skip PDF rendering.
        #[arg(long)]
        preview: bool,
        /// Run the QA loop after rendering.
        #[arg(long)]
        iterate: bool,
        /// Report type preset.
        #[arg(long, default_value = "consultant-report")]
        preset: String,
    },
    /// Validate a rendered report against the QA checklist.
    ///
    /// Prints the verdict as JSON on stdout and a human-readable summary on
    /// stderr. Always exits 0; failure is communicated via `status`.
    Validate {
        /// Report artifact (.html or .pdf).
        report_path: PathBuf,
    },
    /// Session-stop gate for the hosting agent runtime.
    ///
    /// Reads the stop payload from stdin and prints a block decision as JSON
    /// when the session must keep working.
    Gate,
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::INVALID);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let root = std::env::current_dir().context("read current directory")?;
    match cli.command {
        Command::Generate {
            data,
            template,
            output,
            preview,
            iterate,
            preset,
        } => cmd_generate(&root, GenerateArgs {
            data,
            template,
            output,
            preview,
            iterate,
            preset,
        }),
        Command::Validate { report_path } => cmd_validate(&root, &report_path),
        Command::Gate => cmd_gate(&root),
    }
}

struct GenerateArgs {
    data: PathBuf,
    template: String,
    output: Option<PathBuf>,
    preview: bool,
    iterate: bool,
    preset: String,
}

fn cmd_generate(root: &Path, args: GenerateArgs) -> Result<()> {
    let config = load_config(&root.join("press.toml"))?;
    let paths = ProjectPaths::new(root);

    let preset = load_preset(&paths.presets_dir, &args.preset)?;
    println!("Preset loaded: {}", preset.name);

    let item_count = load_data(root, &args.data)?;
    println!("Data loaded: {item_count} items");

    // The HTML arrives pre-rendered from the authoring step; the template
    // name is recorded for the operator but selects nothing yet.
    if !paths.html_path.exists() {
        bail!(
            "HTML report not found at {} (template '{}'): run the authoring step first",
            paths.html_path.display(),
            args.template
        );
    }
    println!("HTML report ready: {}", paths.html_path.display());

    if args.preview {
        println!("\nPreview ready: {}", paths.html_path.display());
        println!("Open in a browser to review before PDF rendering.");
        return Ok(());
    }

    let pdf_path = match args.output {
        Some(output) => root.join(output),
        None => bail!("--output is required for PDF generation (or use --preview)"),
    };

    let rendered = render_pdf(root, &paths.html_path, &pdf_path, &PlaywrightEngine, &config)?;
    if !rendered {
        return Err(anyhow!("pdf render failed: {}", pdf_path.display()));
    }
    println!("PDF rendered: {}", pdf_path.display());

    if args.iterate {
        run_iteration_loop(&paths, &pdf_path, &config)?;
    }

    println!("\nDone. Output: {}", pdf_path.display());
    Ok(())
}

fn run_iteration_loop(paths: &ProjectPaths, pdf_path: &Path, config: &PressConfig) -> Result<()> {
    let runner = ChecklistRunner {
        policy: config.policy.clone(),
    };
    let max_attempts = config.max_attempts;
    let outcome = run_qa_loop(
        pdf_path,
        &paths.qa_report_path,
        max_attempts,
        &runner,
        |attempt_index, verdict| {
            println!(
                "\n--- QA attempt {}/{max_attempts} ---",
                attempt_index + 1
            );
            if !verdict.issues.is_empty() {
                println!("QA FAILED ({} issues):", verdict.issues.len());
                for issue in &verdict.issues {
                    println!("  - {issue}");
                }
            }
        },
    )?;

    match outcome.stop {
        LoopStop::Passed => println!("QA PASSED. Report is ready."),
        LoopStop::PassedWithNotes { notes } => {
            println!("QA PASSED WITH NOTES:");
            for note in &notes {
                println!("  - {note}");
            }
        }
        LoopStop::IssuesRemain { .. } => {
            println!("\nMax attempts ({max_attempts}) reached.");
            println!("Shipping best version with QA notes attached.");
        }
    }
    Ok(())
}

/// Inventory the data input: a directory counts its files, a JSON file
/// counts its top-level entries. Missing data is an input error.
fn load_data(root: &Path, data: &Path) -> Result<usize> {
    let path = root.join(data);
    if !path.exists() {
        bail!("data path not found: {}", path.display());
    }
    if path.is_dir() {
        let count = fs::read_dir(&path)
            .with_context(|| format!("read data dir {}", path.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .count();
        return Ok(count);
    }
    let contents =
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    Ok(match value {
        serde_json::Value::Object(map) => map.len(),
        serde_json::Value::Array(items) => items.len(),
        _ => 1,
    })
}

fn cmd_validate(root: &Path, report_path: &Path) -> Result<()> {
    let config = load_config(&root.join("press.toml"))?;
    let verdict = validate_artifact(&root.join(report_path), &config.policy);

    // JSON on stdout for programmatic consumption.
    println!("{}", serde_json::to_string_pretty(&verdict)?);
    print_summary(&verdict);
    Ok(())
}

/// Human-readable mirror of the verdict, on the diagnostic stream.
fn print_summary(verdict: &Verdict) {
    eprintln!("\n{}", "=".repeat(50));
    eprintln!("QA Result: {}", verdict.status);
    eprintln!("{}", "=".repeat(50));

    if !verdict.issues.is_empty() {
        eprintln!("\nISSUES:");
        for issue in &verdict.issues {
            eprintln!("  FAIL  {issue}");
        }
    }
    if !verdict.notes.is_empty() {
        eprintln!("\nNOTES:");
        for note in &verdict.notes {
            eprintln!("  NOTE  {note}");
        }
    }
    if let Ok(stats) = serde_json::to_string(&verdict.stats) {
        eprintln!("\nStats: {stats}");
    }
}

fn cmd_gate(root: &Path) -> Result<()> {
    let mut payload = String::new();
    // An unreadable payload degrades to "not a forced retry".
    let _ = std::io::stdin().read_to_string(&mut payload);
    let request = GateRequest::from_payload(&payload);

    let paths = ProjectPaths::new(root);
    match evaluate_stop(&paths, &request)? {
        GateDecision::Allow => {}
        GateDecision::Block { reason } => {
            let decision = serde_json::json!({
                "decision": "block",
                "reason": reason,
            });
            println!("{decision}");
        }
    }
    Ok(())
}
