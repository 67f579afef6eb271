//! Logger setup.

use std::path::PathBuf;

use ftlog::{
    appender::{FileAppender, Period},
    LevelFilter, LoggerGuard,
};

/// The log levels selectable on the command line.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

/// Configures the logger.
///
/// With a `file_name`, logs go to `./logs/<file_name>.log`, rotated daily,
/// and the appender's own messages go to `./logs/<file_name>.err.log`.
/// Otherwise logs go to stderr.
///
/// Returns the guard, which must be held until the program exits, and the
/// path of the log file if there is one.
///
/// # Errors
///
/// - If a logs directory could not be located/created.
/// - If the logger could not be initialized.
pub fn configure_logger(level: LogLevel, file_name: Option<&str>) -> Result<(LoggerGuard, Option<PathBuf>), String> {
    let builder = ftlog::Builder::new().max_log_level(level.into());

    let Some(file_name) = file_name else {
        let guard = builder.root(std::io::stderr()).try_init().map_err(|e| e.to_string())?;
        return Ok((guard, None));
    };

    let logs_dir = PathBuf::from(".")
        .canonicalize()
        .map_err(|e| e.to_string())?
        .join("logs");
    if !logs_dir.exists() {
        std::fs::create_dir(&logs_dir).map_err(|e| e.to_string())?;
    }
    let log_path = logs_dir.join(format!("{file_name}.log"));
    let err_path = log_path.with_extension("err.log");

    let writer = FileAppender::builder().path(&log_path).rotate(Period::Day).build();
    let guard = builder
        .root(writer)
        .filter("ftlog::appender", "ftlog-appender", LevelFilter::Debug)
        .appender("ftlog-appender", FileAppender::new(err_path))
        .try_init()
        .map_err(|e| e.to_string())?;

    Ok((guard, Some(log_path)))
}
