use std::env;
use std::fs;
use std::path::Path;

use super::Application;
use super::input::expand_globs;
use crate::error::AppError;
use crate::exec::{ExecutionContext, OutputChannel};

/// Change the process working directory. `~` expands to home.
#[derive(Debug, Default)]
pub struct Cd;

impl Application for Cd {
    fn execute(
        &self,
        args: &[String],
        _out: &mut OutputChannel,
        _ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), AppError> {
        let [dir] = args else {
            return Err(AppError::InvalidArguments("cd"));
        };
        let dir = shellexpand::tilde(dir);
        env::set_current_dir(&*dir).map_err(|e| AppError::io(&*dir, e))
    }
}

#[derive(Debug, Default)]
pub struct Pwd;

impl Application for Pwd {
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputChannel,
        _ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), AppError> {
        if !args.is_empty() {
            return Err(AppError::InvalidArguments("pwd"));
        }
        let cwd = env::current_dir().map_err(|e| AppError::io(".", e))?;
        out.push_line(cwd.display().to_string());
        Ok(())
    }
}

/// `ls [DIR|PATTERN]`: visible entries, sorted, one per line.
#[derive(Debug, Default)]
pub struct Ls;

impl Application for Ls {
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputChannel,
        _ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), AppError> {
        let target = match args {
            [] => ".".to_string(),
            [target] => target.clone(),
            _ => return Err(AppError::InvalidArguments("ls")),
        };

        if target.contains('*') {
            for entry in expand_globs(&[target])? {
                out.push_line(entry);
            }
            return Ok(());
        }

        let mut names: Vec<String> = fs::read_dir(&target)
            .map_err(|e| AppError::io(&target, e))?
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();
        names.into_iter().for_each(|name| out.push_line(name));
        Ok(())
    }
}

/// `find [PATH] -name PATTERN`: files below PATH whose name matches.
#[derive(Debug, Default)]
pub struct Find;

impl Find {
    fn walk(dir: &Path, pattern: &glob::Pattern, found: &mut Vec<String>) -> Result<(), AppError> {
        let entries = fs::read_dir(dir).map_err(|e| AppError::io(dir, e))?;
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            let Ok(kind) = entry.file_type() else {
                continue;
            };
            if kind.is_dir() {
                Self::walk(&path, pattern, found)?;
            } else if pattern.matches(&entry.file_name().to_string_lossy()) {
                found.push(path.display().to_string());
            }
        }
        Ok(())
    }
}

impl Application for Find {
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputChannel,
        _ctx: &mut ExecutionContext<'_>,
    ) -> Result<(), AppError> {
        let (root, pattern) = match args {
            [flag, pattern] if flag == "-name" => (".", pattern),
            [root, flag, pattern] if flag == "-name" => (root.as_str(), pattern),
            _ => return Err(AppError::InvalidArguments("find")),
        };
        let pattern = glob::Pattern::new(pattern)?;
        let mut found = Vec::new();
        Self::walk(Path::new(root), &pattern, &mut found)?;
        found.sort();
        found.into_iter().for_each(|path| out.push_line(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(app: &dyn Application, args: &[String]) -> Result<Vec<String>, AppError> {
        let mut stdin = std::io::empty();
        let mut ctx = ExecutionContext::bare(&mut stdin);
        let mut out = OutputChannel::new();
        app.execute(args, &mut out, &mut ctx)?;
        Ok(out.into_lines())
    }

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
        fs::write(dir.path().join("a.txt"), "a\n").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        fs::write(dir.path().join("sub/b.txt"), "b\n").unwrap();
        fs::write(dir.path().join("sub/deeper/c.txt"), "c\n").unwrap();
        fs::write(dir.path().join("sub/deeper/d.log"), "d\n").unwrap();
        dir
    }

    fn root(dir: &tempfile::TempDir) -> String {
        dir.path().display().to_string()
    }

    #[test]
    fn ls_lists_visible_sorted() {
        let dir = tree();
        assert_eq!(run(&Ls, &[root(&dir)]).unwrap(), vec!["a.txt\n", "sub\n"]);
    }

    #[test]
    fn ls_expands_globs() {
        let dir = tree();
        let lines = run(&Ls, &[format!("{}/sub/deeper/*.txt", root(&dir))]).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("c.txt\n"));
    }

    #[test]
    fn ls_missing_dir_is_error() {
        assert!(run(&Ls, &["/no/such/dir".into()]).is_err());
        assert!(run(&Ls, &["a".into(), "b".into()]).is_err());
    }

    #[test]
    fn find_walks_recursively() {
        let dir = tree();
        let r = root(&dir);
        let lines = run(&Find, &[r.clone(), "-name".into(), "*.txt".into()]).unwrap();
        assert_eq!(
            lines,
            vec![
                format!("{r}/a.txt\n"),
                format!("{r}/sub/b.txt\n"),
                format!("{r}/sub/deeper/c.txt\n"),
            ]
        );
    }

    #[test]
    fn find_needs_name_flag() {
        assert!(matches!(
            run(&Find, &["x".into()]),
            Err(AppError::InvalidArguments("find"))
        ));
    }

    #[test]
    fn pwd_and_cd_arity() {
        assert_eq!(run(&Pwd, &[]).unwrap().len(), 1);
        assert!(run(&Pwd, &["x".into()]).is_err());
        assert!(run(&Cd, &[]).is_err());
        assert!(matches!(
            run(&Cd, &["/no/such/dir".into()]),
            Err(AppError::Io { .. })
        ));
    }
}
