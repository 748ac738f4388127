use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use log::debug;

use super::context::{ExecutionContext, OutputChannel, OutputRedirection};
use crate::commands::{self, Application, Unsafe};
use crate::config::ApplicationsConfig;
use crate::error::ShellError;

/// Registry of all applications, keyed by the name typed at the prompt.
pub struct Registry {
    apps: HashMap<String, Box<dyn Application>>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            apps: HashMap::new(),
        }
    }

    /// Build the registry from configuration.
    pub fn from_config(config: &ApplicationsConfig) -> Self {
        let mut registry = Self::new();
        for (name, factory, has_unsafe) in commands::builtins() {
            if config.disabled.iter().any(|d| d == name) {
                continue;
            }
            registry.insert(name, factory());
            if has_unsafe && !config.unsafe_prefix.is_empty() {
                let unsafe_name = format!("{}{name}", config.unsafe_prefix);
                registry.insert(unsafe_name, Box::new(Unsafe::new(factory())));
            }
        }
        registry
    }

    /// Register `app` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, app: Box<dyn Application>) {
        self.apps.insert(name.into(), app);
    }

    /// Look up an application by exact name.
    pub fn get(&self, name: &str) -> Option<&dyn Application> {
        self.apps.get(name).map(|b| b.as_ref())
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.apps.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one finished command line against the registry.
///
/// The first whitespace-delimited word names the application. Applications
/// that take raw arguments get everything after the name and one separating
/// character as a single argument; the rest get whitespace-split words.
///
/// An output redirection on `ctx` is honored whatever happens before it,
/// including a missing or unknown application name; that earlier error
/// takes precedence over a write failure.
pub fn dispatch(
    registry: &Registry,
    cmdline: &str,
    out: &mut OutputChannel,
    ctx: &mut ExecutionContext<'_>,
) -> Result<(), ShellError> {
    let result = run_application(registry, cmdline, out, ctx);
    let written = match &ctx.output_redirection {
        Some(target) => write_redirection(target, out),
        None => Ok(()),
    };
    result.and(written)
}

fn run_application(
    registry: &Registry,
    cmdline: &str,
    out: &mut OutputChannel,
    ctx: &mut ExecutionContext<'_>,
) -> Result<(), ShellError> {
    let trimmed = cmdline.trim_start();
    let Some(name) = trimmed.split_whitespace().next() else {
        return Err(ShellError::dispatch("no application provided"));
    };
    let Some(app) = registry.get(name) else {
        return Err(ShellError::dispatch(format!("unknown application: {name}")));
    };

    let rest = &trimmed[name.len()..];
    let args: Vec<String> = if app.raw_arguments() {
        let mut chars = rest.chars();
        chars.next();
        vec![chars.as_str().to_string()]
    } else {
        rest.split_whitespace().map(String::from).collect()
    };
    debug!("dispatch {name} {args:?}");

    app.execute(&args, out, ctx)
        .map_err(|source| ShellError::Application {
            app: name.to_string(),
            source,
        })
}

/// Move the channel's contents into the redirection target.
fn write_redirection(target: &OutputRedirection, out: &mut OutputChannel) -> Result<(), ShellError> {
    let redirect_error = |source| ShellError::Redirect {
        path: PathBuf::from(&target.file),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(target.append)
        .truncate(!target.append)
        .open(&target.file)
        .map_err(redirect_error)?;
    file.write_all(out.joined().as_bytes())
        .map_err(redirect_error)?;
    out.clear();
    Ok(())
}
