//! TUI debugger for the VM.
//!
//! Provides an interactive terminal-based debugger with:
//! - Register file view
//! - Memory view, eight bytes per row, IP and SP rows highlighted
//! - Step/run/breakpoint/resume controls
//! - Disassembly and a live event log

mod app;
mod ui;

pub use app::{DebuggerApp, run_debugger};
