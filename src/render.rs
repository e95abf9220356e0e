//! PDF rendering through an external headless browser engine.
//!
//! The [`PdfEngine`] trait decouples render orchestration from the actual
//! engine (currently Playwright's Chromium driven through `node`). Tests use
//! fake engines that return predetermined outcomes without spawning
//! processes. Every engine failure mode is reported as a boolean outcome to
//! the caller, never a crash.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::io::config::PressConfig;
use crate::io::process::run_command_with_timeout;
use crate::io::server::StaticServer;

/// Fixed render script executed by the engine. The navigation target, output
/// path, and settle delay arrive through environment variables; no source
/// text is ever interpolated per invocation.
const RENDER_SCRIPT: &str = r#"
const { chromium } = require('playwright');

(async () => {
    const browser = await chromium.launch();
    const page = await browser.newPage();
    await page.goto(process.env.PRESS_URL, { waitUntil: 'networkidle', timeout: 30000 });

    // Let asynchronously loaded fonts settle before printing.
    await page.waitForTimeout(Number(process.env.PRESS_SETTLE_MS || '3000'));

    await page.pdf({
        path: process.env.PRESS_PDF_PATH,
        format: 'Letter',
        printBackground: true,
        preferCSSPageSize: true,
        margin: { top: '0', right: '0', bottom: '0', left: '0' }
    });

    await browser.close();
    console.log('PDF generated successfully');
})().catch((err) => {
    console.error(err);
    process.exit(1);
});
"#;

/// Parameters for one engine invocation.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Served URL of the authored HTML.
    pub url: String,
    /// Where the engine must write the PDF.
    pub pdf_path: PathBuf,
    /// Settle delay after network idle (font loading).
    pub settle: Duration,
    /// Wall-clock budget for the whole render.
    pub timeout: Duration,
    /// Truncate engine stdout/stderr beyond this many bytes.
    pub output_limit_bytes: usize,
}

/// Outcome of one engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    /// The engine binary is not installed.
    EngineMissing,
    /// The engine exceeded the wall-clock budget.
    TimedOut,
    /// The engine exited non-zero; `detail` carries its diagnostics.
    Failed { detail: String },
}

/// Abstraction over browser engine backends.
pub trait PdfEngine {
    fn render(&self, request: &RenderRequest) -> Result<RenderOutcome>;
}

/// Engine that drives Playwright's Chromium via `node`.
pub struct PlaywrightEngine;

impl PdfEngine for PlaywrightEngine {
    #[instrument(skip_all, fields(timeout_secs = request.timeout.as_secs()))]
    fn render(&self, request: &RenderRequest) -> Result<RenderOutcome> {
        let mut cmd = Command::new("node");
        cmd.arg("-e")
            .arg(RENDER_SCRIPT)
            .env("PRESS_URL", &request.url)
            .env("PRESS_PDF_PATH", &request.pdf_path)
            .env("PRESS_SETTLE_MS", request.settle.as_millis().to_string());

        let output =
            match run_command_with_timeout(cmd, request.timeout, request.output_limit_bytes) {
                Ok(output) => output,
                Err(err) => {
                    let not_found = err
                        .root_cause()
                        .downcast_ref::<std::io::Error>()
                        .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound);
                    if not_found {
                        return Ok(RenderOutcome::EngineMissing);
                    }
                    return Err(err);
                }
            };

        if output.timed_out {
            return Ok(RenderOutcome::TimedOut);
        }
        if !output.status.success() {
            return Ok(RenderOutcome::Failed {
                detail: output.stderr_text(),
            });
        }
        Ok(RenderOutcome::Rendered)
    }
}

/// Render one HTML file to one PDF file.
///
/// Starts the transient static server rooted at `root` (so relative asset
/// paths resolve), drives the engine against the served URL, and reports the
/// result as a boolean. The server is torn down on every exit path.
pub fn render_pdf<E: PdfEngine>(
    root: &Path,
    html_path: &Path,
    pdf_path: &Path,
    engine: &E,
    config: &PressConfig,
) -> Result<bool> {
    if let Some(parent) = pdf_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir {}", parent.display()))?;
    }

    let rel = html_path.strip_prefix(root).with_context(|| {
        format!(
            "html path {} is not under project root {}",
            html_path.display(),
            root.display()
        )
    })?;

    let server = StaticServer::serve(root).context("start static server")?;
    let request = RenderRequest {
        url: server.url_for(&rel.to_string_lossy().replace('\\', "/")),
        pdf_path: pdf_path.to_path_buf(),
        settle: Duration::from_millis(config.settle_delay_ms),
        timeout: Duration::from_secs(config.render_timeout_secs),
        output_limit_bytes: config.renderer_output_limit_bytes,
    };
    info!(url = %request.url, "rendering pdf");
    let outcome = engine.render(&request)?;
    drop(server);

    match outcome {
        RenderOutcome::Rendered => {
            info!(pdf = %pdf_path.display(), "pdf rendered");
            Ok(true)
        }
        RenderOutcome::EngineMissing => {
            warn!("node not found; install Node.js and playwright to render PDFs");
            Ok(false)
        }
        RenderOutcome::TimedOut => {
            warn!(
                timeout_secs = config.render_timeout_secs,
                "pdf render timed out"
            );
            Ok(false)
        }
        RenderOutcome::Failed { detail } => {
            warn!(detail = %detail, "pdf render failed");
            Ok(false)
        }
    }
}
