use std::io::Write;
use std::process::ExitCode;

use minish::complete;
use minish::config::{self, Config};
use minish::exec::{OutputChannel, Registry, Shell};
use minish::logging;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

const USAGE: &str = "usage: minish [-c COMMAND]";

/// Completes application names and paths.
struct ShellHelper {
    names: Vec<String>,
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, candidates) = complete::candidates(&line[..pos], &self.names);
        let pairs = candidates
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

/// Print the channel, then the error if any. Returns whether the line succeeded.
fn report(out: &OutputChannel, result: Result<(), minish::ShellError>) -> bool {
    let mut stdout = std::io::stdout().lock();
    for fragment in out.iter() {
        let _ = stdout.write_all(fragment.as_bytes());
    }
    let _ = stdout.flush();
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("{e}");
            eprintln!("minish: {e}");
            false
        }
    }
}

fn run_command(shell: &mut Shell, line: &str) -> ExitCode {
    let mut out = OutputChannel::new();
    let result = shell.run_line(line, &mut out);
    if report(&out, result) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn interactive(shell: &mut Shell, config: &Config) -> ExitCode {
    let mut editor = match Editor::<ShellHelper, DefaultHistory>::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("minish: cannot start line editor: {e}");
            return ExitCode::FAILURE;
        }
    };
    editor.set_helper(Some(ShellHelper {
        names: shell.registry().names(),
    }));
    let history = config::expand_path(&config.settings.history_file);
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    loop {
        let cwd = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        match editor.readline(&format!("{cwd}> ")) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());
                let mut out = OutputChannel::new();
                let result = shell.run_line(&line, &mut out);
                report(&out, result);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("minish: {e}");
                break;
            }
        }
    }

    if let Some(path) = &history {
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        let _ = editor.save_history(path);
    }
    ExitCode::SUCCESS
}

// ─── Entry point ─────────────────────────────────────

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Config::load();
    logging::init(&config.settings);

    let mut shell = Shell::new(Registry::from_config(&config.applications));
    match args.as_slice() {
        [] => interactive(&mut shell, &config),
        [flag, line] if flag == "-c" => run_command(&mut shell, line),
        [flag] if flag == "-c" => {
            eprintln!("minish: -c requires a command\n{USAGE}");
            ExitCode::from(2)
        }
        _ => {
            eprintln!("minish: unexpected arguments: {}\n{USAGE}", args.join(" "));
            ExitCode::from(2)
        }
    }
}
