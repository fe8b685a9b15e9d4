use std::{
    collections::HashMap,
    ffi::{CString, OsStr, OsString},
    fs::{self, OpenOptions},
    os::unix::ffi::OsStrExt,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use inotify::{EventMask, Inotify, WatchDescriptor, WatchMask};
use log::debug;

const WAIT_MOVE_US: u64 = 500 * 1000;
const NODE_DEFAULT_PERM: libc::mode_t = 0o666;

struct Watch {
    path: PathBuf,
    mask: WatchMask,
    is_dir: bool,
}

/// 文件监控，被删除或移动的节点会自动重新建立监控
pub struct InotifyWatcher {
    inotify: Inotify,
    watches: HashMap<WatchDescriptor, Watch>,
}

impl InotifyWatcher {
    pub fn new() -> Result<Self> {
        let inotify = Inotify::init().context("Failed to initialize inotify")?;

        Ok(Self {
            inotify,
            watches: HashMap::new(),
        })
    }

    pub fn add<P: AsRef<Path>>(&mut self, path: P, mask: WatchMask) -> Result<()> {
        let path = path.as_ref();
        let mask = mask | WatchMask::DELETE_SELF | WatchMask::MOVE_SELF;
        let wd = self
            .inotify
            .watches()
            .add(path, mask)
            .with_context(|| format!("Failed to add watch for: {}", path.display()))?;

        self.watches.insert(
            wd,
            Watch {
                path: path.to_path_buf(),
                mask,
                is_dir: path.is_dir(),
            },
        );
        Ok(())
    }

    /// 阻塞等待事件，返回发生变化的路径；目录监控返回目录下具体的文件
    pub fn wait_and_handle(&mut self) -> Result<Vec<PathBuf>> {
        let mut buffer = [0; 4096];
        let events: Vec<(WatchDescriptor, EventMask, Option<OsString>)> = self
            .inotify
            .read_events_blocking(&mut buffer)
            .context("Failed to read inotify events")?
            .map(|e| (e.wd, e.mask, e.name.map(OsStr::to_os_string)))
            .collect();

        let mut changed = Vec::new();
        for (wd, mask, name) in events {
            let Some(watch) = self.watches.get(&wd) else {
                continue;
            };
            let path = match name {
                Some(name) => watch.path.join(name),
                None => watch.path.clone(),
            };

            if mask.intersects(EventMask::IGNORED | EventMask::DELETE_SELF | EventMask::MOVE_SELF) {
                self.rearm(&wd)?;
            }

            if !changed.contains(&path) {
                changed.push(path);
            }
        }

        Ok(changed)
    }

    fn rearm(&mut self, wd: &WatchDescriptor) -> Result<()> {
        let Some(watch) = self.watches.remove(wd) else {
            return Ok(());
        };
        debug!("Re-arming watch on {}", watch.path.display());

        if watch.is_dir {
            fs::create_dir_all(&watch.path)
                .with_context(|| format!("Failed to create directory: {}", watch.path.display()))?;
        } else {
            ensure_node(&watch.path)?;
        }

        let new_wd = self
            .inotify
            .watches()
            .add(&watch.path, watch.mask)
            .with_context(|| format!("Failed to re-add watch for: {}", watch.path.display()))?;
        self.watches.insert(new_wd, watch);
        Ok(())
    }
}

/// 节点不存在时创建空文件，并放开读写权限
pub fn ensure_node<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }

    // 让并发的重命名先完成
    thread::sleep(Duration::from_micros(WAIT_MOVE_US));
    if path.exists() {
        return Ok(());
    }

    create_node(path)
}

/// 立即创建节点，已有内容保持不变
pub fn create_node(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("Failed to create node: {}", path.display()))?;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .with_context(|| format!("Invalid path: {}", path.display()))?;
    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call.
    unsafe {
        libc::chmod(c_path.as_ptr(), NODE_DEFAULT_PERM);
    }

    Ok(())
}
