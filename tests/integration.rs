use std::fs;
use std::io::Cursor;

use minish::ShellError;
use minish::config::Config;
use minish::exec::{OutputChannel, Registry, Shell};

fn output_for(line: &str) -> Vec<String> {
    minish::run(line).unwrap_or_else(|e| panic!("line {line:?} failed: {e}"))
}

fn error_for(line: &str) -> ShellError {
    match minish::run(line) {
        Ok(out) => panic!("line {line:?} succeeded with {out:?}"),
        Err(e) => e,
    }
}

fn shell_with_input(input: &str) -> Shell {
    let registry = Registry::from_config(&Config::default_config().applications);
    Shell::with_input(registry, Cursor::new(input.to_string()))
}

macro_rules! output_test {
    ($name:ident, $line:expr, [$($expected:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            let expected: Vec<&str> = vec![$($expected),*];
            assert_eq!(output_for($line), expected, "line: {}", $line);
        }
    };
}

macro_rules! error_test {
    ($name:ident, $line:expr, $variant:ident) => {
        #[test]
        fn $name() {
            let err = error_for($line);
            assert!(
                matches!(err, ShellError::$variant { .. }),
                "line: {}, error: {err:?}",
                $line,
            );
        }
    };
}

// ── Calls and quoting ──

output_test!(echo_simple, "echo foo", ["foo\n"]);
output_test!(echo_collapses_literal_spacing, "echo   a    b", ["a b\n"]);
output_test!(echo_keeps_quoted_spacing, "echo 'a   b'", ["a   b\n"]);
output_test!(single_inside_double, "echo \"'abc'\"", ["'abc'\n"]);
output_test!(double_inside_single, "echo '\"abc\"'", ["\"abc\"\n"]);
output_test!(adjacent_quotes_join, "echo a'b'\"c\"", ["abc\n"]);
output_test!(quoted_operators_are_text, "echo 'a ; b | c > d'", ["a ; b | c > d\n"]);
output_test!(echo_bare, "echo", ["\n"]);

// ── Sequences ──

output_test!(sequence_in_order, "echo hello ; echo world", ["hello\n", "world\n"]);
output_test!(sequence_trailing_semicolon, "echo a;", ["a\n"]);
output_test!(sequence_does_not_pipe, "echo a ; cat", ["a\n"]);
output_test!(sequence_of_pipelines, "echo b | cat ; echo c", ["b\n", "c\n"]);

// ── Pipelines ──

output_test!(pipe_into_cat, "echo foo | cat", ["foo\n"]);
output_test!(pipe_chain, "echo foo | cat | cat | cat", ["foo\n"]);
output_test!(pipe_into_cut, "echo abcdef | cut -b 2-3,5", ["bce\n"]);
output_test!(pipe_into_grep_miss, "echo abc | grep z", []);
output_test!(pipe_into_head, "echo a | head -n 0", []);
output_test!(pipe_into_uniq, "echo a ; echo a | uniq", ["a\n", "a\n"]);

// ── Command substitution ──

output_test!(substitution_simple, "echo `echo hi`", ["hi\n"]);
output_test!(substitution_in_double_quotes, "echo \"x `echo hi` y\"", ["x hi y\n"]);
output_test!(substitution_joins_lines, "echo `echo a; echo b`", ["a b\n"]);
output_test!(substitution_names_application, "`echo echo` hi", ["hi\n"]);
output_test!(substitution_of_pipeline, "echo `echo x | cat`", ["x\n"]);
output_test!(single_quotes_disqualify, "echo '`echo hi`'", ["`echo hi`\n"]);
output_test!(empty_backquote_is_literal, "echo a `` b", ["a `` b\n"]);

// ── Unsafe variants ──

#[test]
fn unsafe_variant_prints_error_and_continues() {
    let out = output_for("_cat /definitely/not/here ; echo after");
    assert_eq!(out.len(), 2);
    assert!(out[0].starts_with("Error: "), "got {out:?}");
    assert_eq!(out[1], "after\n");
}

output_test!(unsafe_variant_passes_through, "_echo ok", ["ok\n"]);

// ── Syntax errors ──

error_test!(unterminated_single, "echo 'abc", Syntax);
error_test!(unterminated_backquote, "echo `abc", Syntax);
error_test!(nested_backquote, "echo `echo \"`echo x`\"`", Syntax);
error_test!(two_substitutions, "echo `echo a` `echo b`", Syntax);
error_test!(output_mid_pipeline, "echo a > f | cat", Syntax);
error_test!(blank_pipeline_stage, "echo a | | cat", Syntax);
error_test!(missing_redirect_target, "echo a >", Syntax);
error_test!(empty_line, "   ", Syntax);
error_test!(lone_semicolon, ";", Syntax);

// ── Execution and dispatch errors ──

error_test!(two_output_redirections, "echo a > f > g", Execution);
error_test!(two_input_redirections, "cat < f < g", Execution);
error_test!(unknown_application, "frobnicate", Dispatch);
error_test!(unknown_in_substitution, "echo `frobnicate`", Dispatch);
error_test!(builtin_failure, "cat /definitely/not/here", Application);
error_test!(bad_head_count, "echo a | head -n many", Application);

#[test]
fn execution_errors_are_classified() {
    assert!(error_for("echo a > f > g").is_execution());
    assert!(error_for("cat /definitely/not/here").is_execution());
    assert!(!error_for("frobnicate").is_execution());
}

#[test]
fn sequence_failure_keeps_earlier_output() {
    let mut shell = shell_with_input("");
    let mut out = OutputChannel::new();
    let err = shell
        .run_line("echo one ; cat /definitely/not/here ; echo three", &mut out)
        .unwrap_err();
    assert!(matches!(err, ShellError::Application { .. }));
    assert_eq!(out.into_lines(), vec!["one\n"]);
}

// ── Files, redirection and globbing ──

fn fixture() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "apple\nbanana\ncherry\n").unwrap();
    fs::write(dir.path().join("b.txt"), "blueberry\napricot\n").unwrap();
    fs::write(dir.path().join("notes.md"), "b\na\nb\nb\n").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/c.txt"), "x\n").unwrap();
    let root = dir.path().display().to_string();
    (dir, root)
}

#[test]
fn pipeline_redirected_to_file() {
    let (_dir, root) = fixture();
    let out = output_for(&format!("cat {root}/a.txt | grep an > {root}/out.txt"));
    assert!(out.is_empty());
    assert_eq!(fs::read_to_string(format!("{root}/out.txt")).unwrap(), "banana\n");
}

#[test]
fn failing_builtin_still_creates_redirect_target() {
    let (_dir, root) = fixture();
    let err = error_for(&format!("cat /definitely/not/here > {root}/f"));
    assert!(matches!(err, ShellError::Application { .. }));
    assert_eq!(fs::read_to_string(format!("{root}/f")).unwrap(), "");
}

#[test]
fn unknown_application_still_truncates_redirect_target() {
    let (_dir, root) = fixture();
    fs::write(format!("{root}/out.txt"), "stale\n").unwrap();
    let err = error_for(&format!("frobnicate > {root}/out.txt"));
    assert!(matches!(err, ShellError::Dispatch(_)));
    assert_eq!(fs::read_to_string(format!("{root}/out.txt")).unwrap(), "");

    let err = error_for(&format!("frobnicate > {root}/fresh.txt"));
    assert!(matches!(err, ShellError::Dispatch(_)));
    assert!(std::path::Path::new(&format!("{root}/fresh.txt")).exists());
}

#[test]
fn append_redirection_accumulates() {
    let (_dir, root) = fixture();
    output_for(&format!("echo one > {root}/log ; echo two >> {root}/log"));
    assert_eq!(fs::read_to_string(format!("{root}/log")).unwrap(), "one\ntwo\n");
}

#[test]
fn redirected_call_does_not_capture_siblings() {
    let (_dir, root) = fixture();
    let out = output_for(&format!("echo kept ; echo moved > {root}/f"));
    assert_eq!(out, vec!["kept\n"]);
    assert_eq!(fs::read_to_string(format!("{root}/f")).unwrap(), "moved\n");
}

#[test]
fn input_redirection_reads_file() {
    let (_dir, root) = fixture();
    assert_eq!(
        output_for(&format!("sort -r < {root}/a.txt")),
        vec!["cherry\n", "banana\n", "apple\n"]
    );
}

#[test]
fn heredoc_reads_until_delimiter() {
    let mut shell = shell_with_input("zeta\nalpha\nEND\nignored\n");
    let mut out = OutputChannel::new();
    shell.run_line("sort << END", &mut out).unwrap();
    assert_eq!(out.into_lines(), vec!["alpha\n", "zeta\n"]);
}

#[test]
fn head_tail_and_uniq_on_files() {
    let (_dir, root) = fixture();
    assert_eq!(output_for(&format!("head -n 1 {root}/a.txt")), vec!["apple\n"]);
    assert_eq!(output_for(&format!("tail -n 1 {root}/a.txt")), vec!["cherry\n"]);
    assert_eq!(
        output_for(&format!("uniq {root}/notes.md")),
        vec!["b\n", "a\n", "b\n"]
    );
}

#[test]
fn grep_prefixes_with_several_files() {
    let (_dir, root) = fixture();
    assert_eq!(
        output_for(&format!("grep ^a {root}/*.txt")),
        vec![
            format!("{root}/a.txt:apple\n"),
            format!("{root}/b.txt:apricot\n"),
        ]
    );
}

#[test]
fn cat_expands_globs() {
    let (_dir, root) = fixture();
    assert_eq!(output_for(&format!("cat {root}/*.txt")).len(), 5);
}

#[test]
fn echo_expands_globs() {
    let (_dir, root) = fixture();
    assert_eq!(
        output_for(&format!("echo {root}/*.txt")),
        vec![format!("{root}/a.txt {root}/b.txt\n")]
    );
}

#[test]
fn ls_and_find() {
    let (_dir, root) = fixture();
    assert_eq!(
        output_for(&format!("ls {root}")),
        vec!["a.txt\n", "b.txt\n", "notes.md\n", "sub\n"]
    );
    assert_eq!(
        output_for(&format!("find {root} -name '*.txt'")),
        vec![
            format!("{root}/a.txt\n"),
            format!("{root}/b.txt\n"),
            format!("{root}/sub/c.txt\n"),
        ]
    );
}

#[test]
fn substitution_reads_file_names() {
    let (_dir, root) = fixture();
    fs::write(format!("{root}/list"), format!("{root}/b.txt\n")).unwrap();
    assert_eq!(
        output_for(&format!("cat `cat {root}/list`")),
        vec!["blueberry\n", "apricot\n"]
    );
}

#[test]
fn help_lists_applications() {
    let out = output_for("--help");
    assert!(out.iter().any(|line| line.contains("cut -b LIST")));
}
