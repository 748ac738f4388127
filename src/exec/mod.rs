//! Execution engine: walks a [`CommandTree`], threading output channels
//! through sequences and pipelines and running command substitutions.

mod context;
mod dispatch;

pub use context::{
    ExecutionContext, InputRedirection, OutputChannel, OutputRedirection, split_redirections,
};
pub use dispatch::{Registry, dispatch};

use std::io::{self, BufRead, BufReader};

use log::info;

use crate::error::ShellError;
use crate::parse::{self, CallNode, CommandTree, Substitution, SubstitutionPayload};

/// A registry plus the input stream heredocs and bare reads draw from.
pub struct Shell {
    registry: Registry,
    input: Box<dyn BufRead>,
}

impl Shell {
    /// A shell reading the process's standard input.
    pub fn new(registry: Registry) -> Self {
        Self::with_input(registry, BufReader::new(io::stdin()))
    }

    pub fn with_input(registry: Registry, input: impl BufRead + 'static) -> Self {
        Self {
            registry,
            input: Box::new(input),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Parse and run one command line, appending its output to `out`.
    ///
    /// On failure `out` keeps whatever was produced before the failing call.
    pub fn run_line(&mut self, line: &str, out: &mut OutputChannel) -> Result<(), ShellError> {
        info!("run: {line}");
        let tree = parse::parse_line(line)?;
        self.execute(&tree, out)
    }

    /// Run an already rewritten tree.
    pub fn execute(&mut self, tree: &CommandTree, out: &mut OutputChannel) -> Result<(), ShellError> {
        self.execute_piped(tree, out, None)
    }

    fn execute_piped(
        &mut self,
        tree: &CommandTree,
        out: &mut OutputChannel,
        piped: Option<Vec<String>>,
    ) -> Result<(), ShellError> {
        match tree {
            CommandTree::Sequence(children) => {
                // Each child gets its own channel so none sees another's output.
                for child in children {
                    let mut local = OutputChannel::new();
                    let result = self.execute_piped(child, &mut local, None);
                    out.append(&mut local);
                    result?;
                }
                Ok(())
            }
            CommandTree::Pipeline(stages) => {
                let Some((last, rest)) = stages.split_last() else {
                    return Ok(());
                };
                let mut carried = piped;
                for stage in rest {
                    let mut local = OutputChannel::new();
                    self.execute_piped(stage, &mut local, carried.take())?;
                    carried = Some(local.drain());
                }
                self.execute_piped(last, out, carried)
            }
            CommandTree::Call(call) => self.execute_call(call, out, piped),
        }
    }

    fn execute_call(
        &mut self,
        call: &CallNode,
        out: &mut OutputChannel,
        piped: Option<Vec<String>>,
    ) -> Result<(), ShellError> {
        // Redirection conflicts are reported before a substitution gets to run.
        let (input_redirection, output_redirection) = split_redirections(&call.redirections)?;

        let cmdline = match &call.substitution {
            Some(substitution) if !call.disqualified => self.substitute(substitution)?,
            _ => call.literal_text.clone(),
        };

        let Self { registry, input } = self;
        let mut ctx = ExecutionContext {
            input_redirection,
            output_redirection,
            piped_contents: piped,
            stdin: input.as_mut(),
        };
        let mut local = OutputChannel::new();
        let result = dispatch(registry, &cmdline, &mut local, &mut ctx);
        out.append(&mut local);
        result
    }

    /// Run a substitution and splice its output into the surrounding text.
    fn substitute(&mut self, substitution: &Substitution) -> Result<String, ShellError> {
        let mut scratch = OutputChannel::new();
        match &substitution.payload {
            SubstitutionPayload::Raw(text) => self.run_line(text, &mut scratch)?,
            SubstitutionPayload::Parsed(tree) => self.execute(tree, &mut scratch)?,
        }
        let output = flatten_output(&scratch.joined());
        Ok(format!("{}{output}{}", substitution.before, substitution.after))
    }
}

/// One trailing newline dropped, the remaining ones turned into spaces.
fn flatten_output(output: &str) -> String {
    output
        .strip_suffix('\n')
        .unwrap_or(output)
        .replace('\n', " ")
}
