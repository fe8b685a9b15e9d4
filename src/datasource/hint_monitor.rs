use std::{
    fs,
    path::Path,
    sync::{Arc, Mutex, PoisonError},
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use inotify::WatchMask;
use log::{debug, info, warn};

use crate::{
    datasource::{
        file_path::*,
        request_parser::{Request, parse_requests},
    },
    model::{hint::HintResult, power_hal::PowerHal, vr_hal::VrHal},
    utils::{
        file_helper::FileHelper,
        inotify::{InotifyWatcher, create_node, ensure_node},
    },
};

pub fn handle_request(hal: &Mutex<PowerHal>, vr: &VrHal, request: Request) -> HintResult {
    // VR HAL 不共享电源 HAL 的状态
    if let Request::VrHal(enabled) = request {
        vr.set_vr_mode(enabled);
        return HintResult::Handled;
    }

    let mut hal = hal.lock().unwrap_or_else(PoisonError::into_inner);
    match request {
        Request::Hint(hint) => hal.hint(hint),
        Request::PowerProfile(id) => hal.set_power_profile(id),
        Request::Interactive(on) => hal.set_interactive(on),
        Request::VrHal(_) => HintResult::Handled,
    }
}

/// 处理一批请求，返回已处理的行数
pub fn handle_batch(hal: &Mutex<PowerHal>, vr: &VrHal, content: &str) -> usize {
    let mut handled = 0;
    for request in parse_requests(content) {
        match request {
            Ok(request) => {
                let label = format!("{request:?}");
                let result = handle_request(hal, vr, request);
                debug!("{label} -> {result:?}");
                handled += 1;
            }
            Err(e) => warn!("{e}"),
        }
    }
    handled
}

fn write_status(hal: &Mutex<PowerHal>) {
    let status = hal.lock().unwrap_or_else(PoisonError::into_inner).to_string();
    FileHelper::write_string_safe(STATUS_PATH, &status);
}

/// 取走请求节点的全部内容：先改名到私有路径再重建空节点，
/// 改名之后客户端写入的请求落在新节点上，留给下一轮处理
pub fn take_requests(node: &Path, work: &Path) -> Result<Option<String>> {
    let pending = fs::metadata(node).map(|m| m.len() > 0).unwrap_or(false);
    if !pending {
        return Ok(None);
    }

    fs::rename(node, work)
        .with_context(|| format!("Failed to move {} to {}", node.display(), work.display()))?;
    create_node(node)?;

    let content = fs::read_to_string(work)
        .with_context(|| format!("Failed to read hint batch: {}", work.display()))?;
    fs::remove_file(work)
        .with_context(|| format!("Failed to remove hint batch: {}", work.display()))?;

    Ok(Some(content))
}

fn drain_hint_node(hal: &Mutex<PowerHal>, vr: &VrHal) -> Result<()> {
    let Some(content) = take_requests(Path::new(HINT_NODE_PATH), Path::new(HINT_WORK_PATH))?
    else {
        return Ok(());
    };

    let handled = handle_batch(hal, vr, &content);
    debug!("Handled {handled} request(s)");
    write_status(hal);
    Ok(())
}

pub fn monitor_hints(hal: Arc<Mutex<PowerHal>>, vr: VrHal) -> Result<()> {
    info!("{HINT_THREAD} Start");

    ensure_node(HINT_NODE_PATH)?;
    ensure_node(STATUS_PATH)?;
    write_status(&hal);
    info!("Using hint node: {HINT_NODE_PATH}");

    // 监控目录而不是节点本身，节点被改名重建后监控依然有效
    let mut inotify = InotifyWatcher::new()?;
    inotify.add(DAEMON_DIR, WatchMask::CLOSE_WRITE | WatchMask::MOVED_TO)?;

    // 启动前残留的请求
    drain_hint_node(&hal, &vr)?;

    loop {
        let changed = inotify.wait_and_handle()?;
        if changed.iter().any(|p| p == Path::new(HINT_NODE_PATH)) {
            drain_hint_node(&hal, &vr)?;
        }
    }
}

/// 定期撤销到期的短时加速
pub fn expire_boosts_loop(hal: Arc<Mutex<PowerHal>>, poll: Duration) {
    info!("{BOOST_THREAD} Start, poll every {}ms", poll.as_millis());

    loop {
        thread::sleep(poll);
        let expired = hal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .expire_boosts(Instant::now());
        if expired > 0 {
            debug!("Expired {expired} boost(s)");
        }
    }
}
