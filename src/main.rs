use std::{
    env,
    path::Path,
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use anyhow::Result;
use log::{error, info, warn};

use powerhal::{
    datasource::{
        config_parser::config_read,
        file_path::*,
        hint_monitor::{expire_boosts_loop, monitor_hints},
        property::detect_variant,
    },
    model::{power_hal::PowerHal, vr_hal::VrHal},
    utils::{
        constants::{AUTHOR, NOTES, VERSION, daemon},
        log_monitor::monitor_log_level,
        logger::init_logger,
    },
};

fn print_banner() {
    println!("{NOTES}");
    println!("{AUTHOR}");
}

/// 等待调频节点出现，开机早期 sysfs 可能尚未就绪
fn wait_for_sysfs(root: &Path) {
    let governor = root.join(SCALING_GOVERNOR_PATH);
    for _ in 0..daemon::SYSFS_READY_RETRIES {
        if governor.exists() {
            return;
        }
        thread::sleep(Duration::from_millis(daemon::SYSFS_READY_INTERVAL_MS));
    }
    warn!("{} not found, continuing anyway", governor.display());
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if let Some(arg) = args.get(1) {
        match arg.as_str() {
            "-h" => {
                print_banner();
                println!("Usage:");
                println!("\t-v show version");
                println!("\t-h show help");
                println!("Requests are read line by line from {HINT_NODE_PATH}");
            }
            "-v" => {
                print_banner();
                println!("{VERSION}");
            }
            _ => {
                println!("Unknown argument: {arg}");
                println!("Use -h for help");
            }
        }
        return Ok(());
    }

    init_logger()?;

    info!("{NOTES}");
    info!("{AUTHOR}");
    info!("{VERSION}");

    let config = config_read(CONFIG_PATH);
    wait_for_sysfs(&config.sysfs_root);

    let mut hal = PowerHal::new(&config.sysfs_root, config.display_hint);
    hal.set_device_variant(detect_variant(&config));
    let hal = Arc::new(Mutex::new(hal));
    let vr = VrHal::new(&config.sysfs_root);

    let boost_hal = Arc::clone(&hal);
    let poll = Duration::from_millis(config.boost_poll_ms.max(1));
    thread::Builder::new()
        .name(BOOST_THREAD.to_string())
        .spawn(move || expire_boosts_loop(boost_hal, poll))?;

    thread::Builder::new()
        .name(LOG_LEVEL_THREAD.to_string())
        .spawn(move || {
            if let Err(e) = monitor_log_level() {
                error!("Log level monitor error: {e:#}");
            }
        })?;

    if let Err(e) = monitor_hints(hal, vr) {
        error!("Hint monitor error: {e:#}");
        return Err(e);
    }

    Ok(())
}
