use std::fs::OpenOptions;

use simplelog::{LevelFilter, WriteLogger};

use crate::config::{Settings, expand_path};

/// Install a file logger at the configured level.
/// Best-effort: failures are silently ignored (logging must never block the shell).
pub fn init(settings: &Settings) {
    let level = parse_level(&settings.log_level);
    if level == LevelFilter::Off {
        return;
    }
    let Some(path) = expand_path(&settings.log_file) else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let _ = WriteLogger::init(level, simplelog::Config::default(), file);
}

/// Unknown names fall back to `warn`.
fn parse_level(name: &str) -> LevelFilter {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" | "" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    }
}
