//! Builtin applications.
//!
//! Every builtin implements [`Application`]. The registry maps names to
//! boxed applications; the error-suppressing `_name` variants wrap the
//! plain ones in [`Unsafe`].

/// `cd`, `pwd`, `ls`, `find`: working directory and file-system walking.
pub mod files;
/// `--help`.
pub mod help;
/// Shared input helpers: file reading, globbing, current-input fallback.
pub mod input;
/// `echo`, `cat`, `head`, `tail`, `grep`, `sort`, `uniq`, `cut`.
pub mod text;

use crate::error::AppError;
use crate::exec::{ExecutionContext, OutputChannel};

/// A named application the shell can dispatch to.
pub trait Application: Send + Sync {
    /// Run with the given arguments, appending newline-terminated lines to `out`.
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputChannel,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), AppError>;

    /// Receive the whole rest of the command line as a single argument.
    fn raw_arguments(&self) -> bool {
        false
    }
}

/// Runs an inner application and turns its failure into an output line.
pub struct Unsafe {
    inner: Box<dyn Application>,
}

impl Unsafe {
    pub fn new(inner: Box<dyn Application>) -> Self {
        Self { inner }
    }
}

impl Application for Unsafe {
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputChannel,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), AppError> {
        if let Err(e) = self.inner.execute(args, out, ctx) {
            log::warn!("suppressed application error: {e}");
            out.push_line(format!("Error: {e}"));
        }
        Ok(())
    }

    fn raw_arguments(&self) -> bool {
        self.inner.raw_arguments()
    }
}

/// Builds a fresh instance of a builtin.
pub type Factory = fn() -> Box<dyn Application>;

fn boxed<A: Application + Default + 'static>() -> Box<dyn Application> {
    Box::new(A::default())
}

/// Every builtin with its name, and whether it also gets an unsafe variant.
pub fn builtins() -> Vec<(&'static str, Factory, bool)> {
    vec![
        ("cd", boxed::<files::Cd> as Factory, true),
        ("pwd", boxed::<files::Pwd> as Factory, true),
        ("ls", boxed::<files::Ls> as Factory, true),
        ("find", boxed::<files::Find> as Factory, true),
        ("echo", boxed::<text::Echo> as Factory, true),
        ("cat", boxed::<text::Cat> as Factory, true),
        ("head", boxed::<text::Head> as Factory, true),
        ("tail", boxed::<text::Tail> as Factory, true),
        ("grep", boxed::<text::Grep> as Factory, true),
        ("sort", boxed::<text::Sort> as Factory, true),
        ("uniq", boxed::<text::Uniq> as Factory, true),
        ("cut", boxed::<text::Cut> as Factory, true),
        ("--help", boxed::<help::Help> as Factory, false),
    ]
}
