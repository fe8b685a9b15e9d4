pub mod constants;
pub mod file_helper;
pub mod inotify;
pub mod log_monitor;
pub mod logger;
