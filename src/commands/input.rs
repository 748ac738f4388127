use std::fs;
use std::io::BufRead;

use crate::error::AppError;
use crate::exec::ExecutionContext;

/// Split text into lines, each ending in `\n`.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(terminated).collect()
}

fn terminated(line: &str) -> String {
    if line.ends_with('\n') {
        line.to_string()
    } else {
        format!("{line}\n")
    }
}

pub fn read_file(path: &str) -> Result<Vec<String>, AppError> {
    let text = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    Ok(split_lines(&text))
}

/// Expand every argument containing `*` into its sorted matches.
///
/// A pattern with no match is kept as written.
pub fn expand_globs(args: &[String]) -> Result<Vec<String>, AppError> {
    let mut expanded = Vec::with_capacity(args.len());
    for arg in args {
        if !arg.contains('*') {
            expanded.push(arg.clone());
            continue;
        }
        let mut matches: Vec<String> = glob::glob(arg)?
            .filter_map(Result::ok)
            .map(|path| path.display().to_string())
            .collect();
        if matches.is_empty() {
            expanded.push(arg.clone());
        } else {
            matches.sort();
            expanded.extend(matches);
        }
    }
    Ok(expanded)
}

/// Concatenated lines of every named file, globs expanded.
pub fn read_files(names: &[String]) -> Result<Vec<String>, AppError> {
    let mut lines = Vec::new();
    for name in expand_globs(names)? {
        lines.extend(read_file(&name)?);
    }
    Ok(lines)
}

/// Lines of the implicit input.
///
/// Piped contents win, then `<` / `<<` redirection, then the shell's stdin
/// up to end of input.
pub fn current_input(ctx: &mut ExecutionContext<'_>) -> Result<Vec<String>, AppError> {
    if let Some(piped) = ctx.piped_contents.take() {
        return Ok(split_lines(&piped.concat()));
    }
    match &ctx.input_redirection {
        Some(r) if r.heredoc => read_until(&mut *ctx.stdin, Some(&r.file)),
        Some(r) => read_file(&r.file),
        None => read_until(&mut *ctx.stdin, None),
    }
}

/// Lines of `filename`, or of the implicit input when it is absent.
pub fn contents(filename: Option<&str>, ctx: &mut ExecutionContext<'_>) -> Result<Vec<String>, AppError> {
    match filename {
        Some(name) => read_files(&[name.to_string()]),
        None => current_input(ctx),
    }
}

/// Read lines until end of input or a line equal to `delimiter`.
fn read_until(stdin: &mut dyn BufRead, delimiter: Option<&str>) -> Result<Vec<String>, AppError> {
    let mut lines = Vec::new();
    let mut buf = String::new();
    loop {
        buf.clear();
        let n = stdin
            .read_line(&mut buf)
            .map_err(|e| AppError::io("<stdin>", e))?;
        if n == 0 {
            break;
        }
        if let Some(delimiter) = delimiter
            && buf.trim_end_matches(['\n', '\r']) == delimiter
        {
            break;
        }
        lines.push(terminated(&buf));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::InputRedirection;
    use std::io::Cursor;

    #[test]
    fn split_lines_terminates_last() {
        assert_eq!(split_lines("a\nb"), vec!["a\n", "b\n"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn piped_contents_are_resplit() {
        let mut stdin = std::io::empty();
        let mut ctx = ExecutionContext::bare(&mut stdin);
        ctx.piped_contents = Some(vec!["a\nb\n".into(), "c".into()]);
        assert_eq!(current_input(&mut ctx).unwrap(), vec!["a\n", "b\n", "c\n"]);
    }

    #[test]
    fn heredoc_stops_at_delimiter() {
        let mut stdin = Cursor::new("one\ntwo\nEOF\nthree\n");
        let mut ctx = ExecutionContext::bare(&mut stdin);
        ctx.input_redirection = Some(InputRedirection {
            file: "EOF".into(),
            heredoc: true,
        });
        assert_eq!(current_input(&mut ctx).unwrap(), vec!["one\n", "two\n"]);
    }

    #[test]
    fn bare_read_takes_all_of_stdin() {
        let mut stdin = Cursor::new("x\ny");
        let mut ctx = ExecutionContext::bare(&mut stdin);
        assert_eq!(current_input(&mut ctx).unwrap(), vec!["x\n", "y\n"]);
    }

    #[test]
    fn unmatched_glob_is_kept() {
        let args = vec!["/definitely/not/here/*.nothing".to_string()];
        assert_eq!(expand_globs(&args).unwrap(), args);
    }

    #[test]
    fn glob_expands_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.txt", "c.log"] {
            fs::write(dir.path().join(name), "x\n").unwrap();
        }
        let pattern = format!("{}/*.txt", dir.path().display());
        let expanded = expand_globs(&[pattern]).unwrap();
        assert_eq!(expanded.len(), 2);
        assert!(expanded[0].ends_with("a.txt"));
        assert!(expanded[1].ends_with("b.txt"));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(read_file("/no/such/file"), Err(AppError::Io { .. })));
    }
}
