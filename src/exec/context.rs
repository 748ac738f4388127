use std::io::BufRead;

use crate::error::ShellError;
use crate::parse::{Direction, RedirectMode, Redirection};

/// Ordered, append-only buffer of output fragments (normally whole lines).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputChannel {
    fragments: Vec<String>,
}

impl OutputChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: impl Into<String>) {
        self.fragments.push(fragment.into());
    }

    /// Push `line`, adding a terminator if it has none.
    pub fn push_line(&mut self, line: impl Into<String>) {
        let mut line = line.into();
        if !line.ends_with('\n') {
            line.push('\n');
        }
        self.fragments.push(line);
    }

    /// Move everything from `other` to the end of this channel.
    pub fn append(&mut self, other: &mut OutputChannel) {
        self.fragments.append(&mut other.fragments);
    }

    /// Take all fragments out, leaving the channel empty.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.fragments)
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.fragments.iter()
    }

    /// All fragments concatenated.
    pub fn joined(&self) -> String {
        self.fragments.concat()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.fragments
    }
}

/// `<` or `<<` on a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRedirection {
    pub file: String,
    /// `<<`: `file` is the delimiter line, not a path.
    pub heredoc: bool,
}

/// `>` or `>>` on a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRedirection {
    pub file: String,
    pub append: bool,
}

/// Everything an application sees besides its arguments and output channel.
///
/// Lives for a single call.
pub struct ExecutionContext<'a> {
    pub input_redirection: Option<InputRedirection>,
    pub output_redirection: Option<OutputRedirection>,
    /// Output of the previous pipeline stage.
    pub piped_contents: Option<Vec<String>>,
    /// The shell's own input stream, for heredocs and bare reads.
    pub stdin: &'a mut dyn BufRead,
}

/// Split a call's redirections by direction.
///
/// Two redirections of the same direction on one call are an error.
pub fn split_redirections(
    redirections: &[Redirection],
) -> Result<(Option<InputRedirection>, Option<OutputRedirection>), ShellError> {
    let mut input = None;
    let mut output = None;
    for r in redirections {
        match r.direction {
            Direction::Input => {
                if input.is_some() {
                    return Err(ShellError::execution("multiple input redirections"));
                }
                input = Some(InputRedirection {
                    file: r.filename.clone(),
                    heredoc: r.mode == RedirectMode::Heredoc,
                });
            }
            Direction::Output => {
                if output.is_some() {
                    return Err(ShellError::execution("multiple output redirections"));
                }
                output = Some(OutputRedirection {
                    file: r.filename.clone(),
                    append: r.mode == RedirectMode::Append,
                });
            }
        }
    }
    Ok((input, output))
}

impl<'a> ExecutionContext<'a> {
    /// A context with no redirections or piped input.
    pub fn bare(stdin: &'a mut dyn BufRead) -> Self {
        Self {
            input_redirection: None,
            output_redirection: None,
            piped_contents: None,
            stdin,
        }
    }
}
