use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::{
    datasource::file_path::{DEVFREQ_BUS_SPEED_PATH, GPU_INFLIGHT_PATH},
    utils::file_helper::FileHelper,
};

struct VrTunable {
    node: &'static str,
    value: i64,
    value_vr: i64,
}

// Only the low latency inflight count matters: it is used once more than one
// GL context exists, which is when preemption kicks in.
const VR_TUNABLES: [VrTunable; 2] = [
    VrTunable {
        node: GPU_INFLIGHT_PATH,
        value: 4,
        value_vr: 2,
    },
    VrTunable {
        node: DEVFREQ_BUS_SPEED_PATH,
        value: 0,
        value_vr: 7904,
    },
];

/// VR HAL：切换 GPU 调度与总线节点
pub struct VrHal {
    root: PathBuf,
}

impl VrHal {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn set_vr_mode(&self, enabled: bool) {
        debug!("VR HAL: {}", if enabled { "enabled" } else { "disabled" });

        for tunable in &VR_TUNABLES {
            let value = if enabled { tunable.value_vr } else { tunable.value };
            FileHelper::write_int_safe(self.root.join(tunable.node), value);
        }

        info!(
            "VR performance configuration {}",
            if enabled { "set" } else { "reset" }
        );
    }
}
