//! Logging system initialization
//!
//! Wires tracing to stdout or to a (optionally rotating) log file,
//! driven entirely by the loaded configuration.

use crate::config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

/// Initialize the tracing subscriber
///
/// Must be called exactly once, after configuration is loaded.
///
/// # Returns
/// * `WorkerGuard` - Must be kept alive for the duration of the program
///   to ensure non-blocking log writes are flushed
///
/// # Panics
/// * If creating the log appender fails
/// * If a global subscriber is already installed
pub fn init_logging(config: &LoggingConfig) -> WorkerGuard {
    let log_to_file = config.file.as_deref().is_some_and(|f| !f.is_empty());

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(make_writer(config));
    let filter = tracing_subscriber::EnvFilter::new(config.level.clone());

    let builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(!log_to_file);

    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    guard
}

/// 选择日志输出目标
///
/// 未配置文件（或文件名为空）时写 stdout；配置了文件且开启轮转时
/// 按天滚动并保留 max_backups 份历史。
fn make_writer(config: &LoggingConfig) -> Box<dyn std::io::Write + Send + Sync> {
    let Some(log_file) = config.file.as_deref().filter(|f| !f.is_empty()) else {
        return Box::new(std::io::stdout());
    };

    if config.enable_rotation {
        let path = std::path::Path::new(log_file);
        let dir = path.parent().unwrap_or(std::path::Path::new("."));
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("trackpixel.log");

        let appender = rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(filename.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.max_backups as usize)
            .build(dir)
            .expect("Failed to create rolling log appender");
        Box::new(appender)
    } else {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .expect("Failed to open log file");
        Box::new(file)
    }
}
