//! Tooling & Integration Layer
//!
//! Command-line access to the agent console.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
