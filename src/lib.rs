#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # Playdeck
//!
//! Console front end for an Ansible-style server automation backend: list
//! servers, templates, execution logs and schedules, run commands, upload
//! playbooks and attach live terminals.
//!
//! The views themselves live in `playdeck-core`; this crate wires them to
//! the native adapters in `playdeck-client` and prints them as text.

pub mod cli;
pub mod commands;
pub mod output;

// Re-export commonly used items
pub use cli::{Cli, Commands};
pub use commands::{execute_command, run_terminal};
