use regex::Regex;

use super::Application;
use super::input::{contents, current_input, expand_globs, read_file, read_files};
use crate::error::AppError;
use crate::exec::{ExecutionContext, OutputChannel};

const DEFAULT_LINES: usize = 10;

/// Prints its argument line. Words containing `*` are glob-expanded.
#[derive(Debug, Default)]
pub struct Echo;

impl Application for Echo {
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputChannel,
        _ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), AppError> {
        let line = args.join(" ");
        if line.contains('*') {
            let words: Vec<String> = line.split_whitespace().map(String::from).collect();
            out.push(format!("{}\n", expand_globs(&words)?.join(" ")));
        } else {
            out.push(format!("{line}\n"));
        }
        Ok(())
    }

    fn raw_arguments(&self) -> bool {
        true
    }
}

#[derive(Debug, Default)]
pub struct Cat;

impl Application for Cat {
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputChannel,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), AppError> {
        let lines = if args.is_empty() {
            current_input(ctx)?
        } else {
            read_files(args)?
        };
        lines.into_iter().for_each(|line| out.push(line));
        Ok(())
    }
}

/// `[-n N] [FILE]`
fn count_and_file<'a>(
    app: &'static str,
    args: &'a [String],
) -> Result<(usize, Option<&'a str>), AppError> {
    let count = |n: &str| n.parse::<usize>().map_err(|_| AppError::InvalidArguments(app));
    match args {
        [] => Ok((DEFAULT_LINES, None)),
        [file] if file != "-n" => Ok((DEFAULT_LINES, Some(file.as_str()))),
        [flag, n] if flag == "-n" => Ok((count(n)?, None)),
        [flag, n, file] if flag == "-n" => Ok((count(n)?, Some(file.as_str()))),
        _ => Err(AppError::InvalidArguments(app)),
    }
}

/// `[FLAG] [FILE]`
fn flag_and_file<'a>(
    app: &'static str,
    flag: &str,
    args: &'a [String],
) -> Result<(bool, Option<&'a str>), AppError> {
    match args {
        [] => Ok((false, None)),
        [f] if f == flag => Ok((true, None)),
        [file] => Ok((false, Some(file.as_str()))),
        [f, file] if f == flag => Ok((true, Some(file.as_str()))),
        _ => Err(AppError::InvalidArguments(app)),
    }
}

#[derive(Debug, Default)]
pub struct Head;

impl Application for Head {
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputChannel,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), AppError> {
        let (n, file) = count_and_file("head", args)?;
        contents(file, ctx)?
            .into_iter()
            .take(n)
            .for_each(|line| out.push(line));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Tail;

impl Application for Tail {
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputChannel,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), AppError> {
        let (n, file) = count_and_file("tail", args)?;
        let lines = contents(file, ctx)?;
        let skip = lines.len().saturating_sub(n);
        lines.into_iter().skip(skip).for_each(|line| out.push(line));
        Ok(())
    }
}

/// `grep PATTERN [FILE...]`; with several files each match is prefixed `file:`.
#[derive(Debug, Default)]
pub struct Grep;

impl Application for Grep {
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputChannel,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), AppError> {
        let Some((pattern, files)) = args.split_first() else {
            return Err(AppError::InvalidArguments("grep"));
        };
        let regex = Regex::new(pattern)?;
        let matches = |line: &String| regex.is_match(line.trim_end_matches('\n'));

        if files.is_empty() {
            current_input(ctx)?
                .into_iter()
                .filter(matches)
                .for_each(|line| out.push(line));
            return Ok(());
        }

        let files = expand_globs(files)?;
        let prefixed = files.len() > 1;
        for file in &files {
            for line in read_file(file)?.into_iter().filter(matches) {
                if prefixed {
                    out.push(format!("{file}:{line}"));
                } else {
                    out.push(line);
                }
            }
        }
        Ok(())
    }
}

/// `sort [-r] [FILE]`
#[derive(Debug, Default)]
pub struct Sort;

impl Application for Sort {
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputChannel,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), AppError> {
        let (reverse, file) = flag_and_file("sort", "-r", args)?;
        let mut lines = contents(file, ctx)?;
        lines.sort();
        if reverse {
            lines.reverse();
        }
        lines.into_iter().for_each(|line| out.push(line));
        Ok(())
    }
}

/// `uniq [-i] [FILE]`: drops lines equal to the one before.
#[derive(Debug, Default)]
pub struct Uniq;

impl Application for Uniq {
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputChannel,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), AppError> {
        let (ignore_case, file) = flag_and_file("uniq", "-i", args)?;
        let mut last: Option<String> = None;
        for line in contents(file, ctx)? {
            let key = if ignore_case {
                line.to_lowercase()
            } else {
                line.clone()
            };
            if last.as_ref() != Some(&key) {
                out.push(line);
                last = Some(key);
            }
        }
        Ok(())
    }
}

/// `cut -b LIST [FILE]`
#[derive(Debug, Default)]
pub struct Cut;

/// Zero-based start, exclusive end; `None` runs to end of line.
type ByteRange = (usize, Option<usize>);

impl Cut {
    fn parse_ranges(list: &str) -> Result<Vec<ByteRange>, AppError> {
        let position = |s: &str| {
            s.parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or(AppError::InvalidArguments("cut"))
        };
        let mut ranges = Vec::new();
        for part in list.split(',') {
            let range = match part.split_once('-') {
                Some((start, end)) => {
                    let start = if start.is_empty() { 0 } else { position(start)? - 1 };
                    let end = if end.is_empty() { None } else { Some(position(end)?) };
                    (start, end)
                }
                None => {
                    let at = position(part)?;
                    (at - 1, Some(at))
                }
            };
            ranges.push(range);
        }
        Ok(Self::merge(ranges))
    }

    /// Union overlapping or touching ranges so no byte is printed twice.
    fn merge(mut ranges: Vec<ByteRange>) -> Vec<ByteRange> {
        ranges.sort_by_key(|&(start, end)| (start, end.unwrap_or(usize::MAX)));
        let mut merged: Vec<ByteRange> = Vec::with_capacity(ranges.len());
        for (start, end) in ranges {
            match merged.last_mut() {
                Some((_, last_end)) if last_end.is_none_or(|e| start <= e) => {
                    *last_end = match (*last_end, end) {
                        (Some(a), Some(b)) => Some(a.max(b)),
                        _ => None,
                    };
                }
                _ => merged.push((start, end)),
            }
        }
        merged
    }

    fn cut_line(line: &str, ranges: &[ByteRange]) -> String {
        let bytes = line.trim_end_matches('\n').as_bytes();
        let mut picked = Vec::new();
        for &(start, end) in ranges {
            let end = end.unwrap_or(bytes.len()).min(bytes.len());
            if start < end {
                picked.extend_from_slice(&bytes[start..end]);
            }
        }
        String::from_utf8_lossy(&picked).into_owned()
    }
}

impl Application for Cut {
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputChannel,
        ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), AppError> {
        let (list, file) = match args {
            [flag, list] if flag == "-b" => (list, None),
            [flag, list, file] if flag == "-b" => (list, Some(file.as_str())),
            _ => return Err(AppError::InvalidArguments("cut")),
        };
        let ranges = Self::parse_ranges(list)?;
        for line in contents(file, ctx)? {
            out.push_line(Self::cut_line(&line, &ranges));
        }
        Ok(())
    }
}
