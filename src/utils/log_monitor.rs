use std::path::Path;

use anyhow::Result;
use inotify::WatchMask;
use log::info;

use crate::{
    datasource::file_path::{LOG_LEVEL_PATH, LOG_LEVEL_THREAD},
    utils::{
        inotify::{InotifyWatcher, ensure_node},
        logger::update_log_level,
    },
};

pub fn monitor_log_level() -> Result<()> {
    info!("{LOG_LEVEL_THREAD} Start");

    ensure_node(LOG_LEVEL_PATH)?;
    info!("Using log level path: {LOG_LEVEL_PATH}");

    let mut inotify = InotifyWatcher::new()?;
    inotify.add(LOG_LEVEL_PATH, WatchMask::CLOSE_WRITE | WatchMask::MODIFY)?;

    loop {
        let changed = inotify.wait_and_handle()?;
        if changed.iter().any(|p| p == Path::new(LOG_LEVEL_PATH)) {
            update_log_level();
        }
    }
}
