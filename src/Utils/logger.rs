use chrono::Local;
use simplelog::*;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Value of the `log.file` task key that asks for a time-stamped file name.
pub const AUTO_LOG_FILE: &str = "auto";

#[derive(Debug)]
pub enum LoggerError {
    UnknownLevel(String),
    File { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for LoggerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoggerError::UnknownLevel(name) => write!(
                f,
                "loglevel must be debug, info, warn, error or off (got \"{}\")",
                name
            ),
            LoggerError::File { path, source } => {
                write!(f, "cannot create log file {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for LoggerError {}

/// Maps a level name to a filter. Names are case-insensitive.
pub fn parse_level(name: &str) -> Result<LevelFilter, LoggerError> {
    match name.trim().to_lowercase().as_str() {
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" => Ok(LevelFilter::Off),
        _ => Err(LoggerError::UnknownLevel(name.to_string())),
    }
}

/// log_<date>_<time>.txt in the working directory
pub fn timestamped_log_name() -> PathBuf {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    PathBuf::from(format!("log_{}.txt", date_and_time))
}

/// Resolves the `log.file` setting: `auto` becomes a time-stamped name.
pub fn resolve_log_file(setting: &str) -> PathBuf {
    if setting.trim().eq_ignore_ascii_case(AUTO_LOG_FILE) {
        timestamped_log_name()
    } else {
        PathBuf::from(setting.trim())
    }
}

/// Installs the terminal logger and, when `log_file` is given, a file logger next to it.
/// Returns `Ok(false)` if a global logger was already installed; that is not an error.
pub fn init_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<bool, LoggerError> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));
    if let Some(path) = log_file {
        let file = File::create(path).map_err(|source| LoggerError::File {
            path: path.to_path_buf(),
            source,
        })?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    Ok(CombinedLogger::init(loggers).is_ok())
}
