//! Document-production pipeline with a bounded QA feedback loop.
//!
//! An authored HTML report is rendered to a paginated PDF through a headless
//! browser engine, then checked against a fixed quality checklist. The
//! architecture keeps a strict separation:
//!
//! - **[`rules`]**: Pure, deterministic rule evaluation over document text.
//!   No I/O, fully testable against minimal synthetic documents.
//! - **[`io`]**: Side-effecting operations (filesystem, child processes, the
//!   transient static file server). Isolated to enable mocking in tests.
//!
//! Orchestration modules ([`validate`], [`render`], [`looping`], [`gate`])
//! coordinate rule evaluation with I/O to implement the CLI commands, and the
//! session gate that keeps a hosting agent from stopping before QA passes.

pub mod exit_codes;
pub mod gate;
pub mod io;
pub mod logging;
pub mod looping;
pub mod render;
pub mod rules;
pub mod validate;
pub mod verdict;
