//! Side-effecting operations: filesystem layout, persisted state, child
//! processes, and the transient static file server.

pub mod config;
pub mod gate_state;
pub mod paths;
pub mod preset;
pub mod process;
pub mod qa_report;
pub mod server;
