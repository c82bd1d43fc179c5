use crate::error::{Result as ServerErrorResult, ServerError};

use rtg_config::{LogFormat, LoggingConfig};

use std::fmt::Arguments;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{Record, info};
use serde_json::json;

/// Initialize logger with fern
///
/// `json` writes one object per line; `text` writes
/// `[timestamp - LEVEL] message [file:line]`. Output goes to the configured
/// file (appended, never colored) or stdout. `tracing` spans reach this
/// dispatch through tracing's `log` feature.
#[track_caller]
pub fn initialize(config: &LoggingConfig) -> ServerErrorResult<()> {
    let level_filter = *config.level;
    let log_file = config.file.as_deref().map(PathBuf::from);

    let formatted = match config.format {
        LogFormat::Json => Dispatch::new().format(json_line),
        LogFormat::Text if config.colored && log_file.is_none() => {
            let colors = ColoredLevelConfig::new()
                .trace(Color::Magenta)
                .debug(Color::Blue)
                .info(Color::Green)
                .warn(Color::Yellow)
                .error(Color::Red);

            Dispatch::new().format(move |out, message, record| {
                out.finish(format_args!(
                    "[{date} - {level}] {message} [{file}:{line}]",
                    date = humantime::format_rfc3339(SystemTime::now()),
                    level = colors.color(record.level()),
                    message = message,
                    file = record.file().unwrap_or("unknown"),
                    line = record.line().unwrap_or(0),
                ))
            })
        }
        LogFormat::Text => Dispatch::new().format(text_line),
    };

    let dispatch = match log_file {
        Some(ref path) => formatted.chain(open_log_file(path)?),
        None => formatted.chain(std::io::stdout()),
    };

    Dispatch::new()
        .level(level_filter)
        .chain(dispatch)
        .apply()
        .map_err(|e| ServerError::Logger {
            message: format!("Failed to initialize logger: {e}"),
        })?;

    match log_file {
        Some(ref path) => info!(
            "Logger initialized: level={:?}, format={}, file={}",
            level_filter,
            config.format.as_str(),
            path.display()
        ),
        None => info!(
            "Logger initialized: level={:?}, format={}, stdout",
            level_filter,
            config.format.as_str()
        ),
    }

    Ok(())
}

fn json_line(out: FormatCallback<'_>, message: &Arguments<'_>, record: &Record<'_>) {
    let line = json!({
        "timestamp": humantime::format_rfc3339_millis(SystemTime::now()).to_string(),
        "level": record.level().as_str(),
        "target": record.target(),
        "message": message.to_string(),
        "file": record.file().unwrap_or("unknown"),
        "line": record.line().unwrap_or(0),
    });
    out.finish(format_args!("{line}"))
}

fn text_line(out: FormatCallback<'_>, message: &Arguments<'_>, record: &Record<'_>) {
    out.finish(format_args!(
        "[{date} - {level}] {message} [{file}:{line}]",
        date = humantime::format_rfc3339(SystemTime::now()),
        level = record.level(),
        message = message,
        file = record.file().unwrap_or("unknown"),
        line = record.line().unwrap_or(0),
    ))
}

fn open_log_file(path: &Path) -> ServerErrorResult<std::fs::File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| ServerError::Logger {
            message: format!("Failed to create log directory {}: {}", dir.display(), e),
        })?;
    }

    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ServerError::Logger {
            message: format!("Failed to open log file {}: {}", path.display(), e),
        })
}
