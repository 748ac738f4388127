//! minish: a small line-oriented command shell.
//!
//! A command line is parsed into a generic tree, rewritten into
//! [`Sequence`](parse::CommandTree::Sequence) / [`Pipeline`](parse::CommandTree::Pipeline) /
//! [`Call`](parse::CommandTree::Call) nodes with quotes unwrapped and
//! redirections and command substitutions extracted, then executed against a
//! [`Registry`](crate::exec::Registry) of builtin applications. Pipes are
//! in-memory buffers of lines; nothing forks.
//!
//! # Architecture
//!
//! - **[`parse`]**: grammar, quote reconstruction, command-tree types.
//! - **[`exec`]**: execution engine, output channels, dispatch and redirection.
//! - **[`commands`]**: the [`Application`](commands::Application) trait and builtins.
//! - **[`complete`]**: tab-completion candidates for the line editor.
//! - **[`config`]**: embedded defaults + user overlay merge.
//! - **[`logging`]**: file logger setup.
//! - **[`error`]**: shell and application error types.

/// Application trait and builtin implementations.
pub mod commands;
/// Line-editor completion.
pub mod complete;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
pub mod error;
/// Execution engine: tree walking, pipes, substitution, dispatch.
pub mod exec;
/// File-based logging.
pub mod logging;
/// Command-line grammar, rewriter, and tree types.
pub mod parse;

pub use error::{AppError, ShellError};

/// Run one command line with the default registry and empty input.
///
/// This is the main entry point for tests and simple usage. For the
/// interactive shell or user config, build a [`exec::Shell`] directly.
pub fn run(line: &str) -> Result<Vec<String>, ShellError> {
    let config = config::Config::default_config();
    let registry = exec::Registry::from_config(&config.applications);
    let mut shell = exec::Shell::with_input(registry, std::io::empty());
    let mut out = exec::OutputChannel::new();
    shell.run_line(line, &mut out)?;
    Ok(out.into_lines())
}
