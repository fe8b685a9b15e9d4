use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use log::{LevelFilter, Metadata, Record};
use once_cell::sync::Lazy;

use crate::datasource::file_path::LOG_LEVEL_PATH;

// Console logger, the service wrapper redirects stdout to the log file
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        // 级别过滤由 max_level 完成
        true
    }

    fn log(&self, record: &Record) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        println!("[{}][{}]: {}", timestamp, record.level(), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: Lazy<ConsoleLogger> = Lazy::new(|| ConsoleLogger);

pub fn init_logger() -> Result<()> {
    let log_level = read_log_level_config(LOG_LEVEL_PATH);

    log::set_logger(&*LOGGER)
        .map(|()| log::set_max_level(log_level))
        .context("Failed to set logger")?;

    log::info!("Logger initialized with level: {log_level}");
    log::info!("Log level config path: {LOG_LEVEL_PATH}");

    Ok(())
}

pub fn parse_log_level(content: &str) -> Option<LevelFilter> {
    match content.trim().to_lowercase().as_str() {
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warn" => Some(LevelFilter::Warn),
        "error" => Some(LevelFilter::Error),
        _ => None,
    }
}

/// 读取日志等级，文件缺失或内容无效时为 Info
pub fn read_log_level_config<P: AsRef<Path>>(path: P) -> LevelFilter {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| parse_log_level(&content))
        .unwrap_or(LevelFilter::Info)
}

pub fn update_log_level() {
    let new_level = read_log_level_config(LOG_LEVEL_PATH);
    if new_level != log::max_level() {
        log::set_max_level(new_level);
        log::info!("Log level updated to: {new_level}");
    }
}
