pub mod config_parser;
pub mod file_path;
pub mod governor;
pub mod hint_monitor;
pub mod property;
pub mod request_parser;
pub mod video_metadata;
