use std::{fs, path::Path};

use crate::{datasource::file_path::*, model::tunable::TunableKey};

/// Creates a fake control node below `root` holding `value`.
pub fn mock_node(root: &Path, node: &str, value: &str) {
    let path = root.join(node);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, value).unwrap();
}

pub fn read_node(root: &Path, node: &str) -> String {
    fs::read_to_string(root.join(node)).unwrap().trim().to_string()
}

pub fn read_key(root: &Path, key: TunableKey) -> String {
    read_node(root, key.node())
}

/// Populates every tunable node plus the GPU and governor nodes with a
/// recognizable baseline.
pub fn mock_sysfs(root: &Path, governor: &str) {
    for key in ALL_KEYS {
        mock_node(root, key.node(), "7");
    }
    mock_node(root, GPU_MAX_FREQ_PATH, "624000000");
    mock_node(root, GPU_MIN_FREQ_PATH, "133000000");
    mock_node(root, SCALING_GOVERNOR_PATH, &format!("{governor}\n"));
    mock_node(root, GPU_INFLIGHT_PATH, "4");
    mock_node(root, DEVFREQ_BUS_SPEED_PATH, "0");
}

pub const ALL_KEYS: [TunableKey; 24] = [
    TunableKey::SchedBoost,
    TunableKey::PowerCollapseDisable,
    TunableKey::CpusOnlineMinBig,
    TunableKey::CpusOnlineMinLittle,
    TunableKey::CpusOnlineMaxLimitBig,
    TunableKey::CpusOnlineMaxLimitLittle,
    TunableKey::MinFreqBig,
    TunableKey::MinFreqLittle,
    TunableKey::MaxFreqBig,
    TunableKey::MaxFreqLittle,
    TunableKey::AboveHispeedDelayBig,
    TunableKey::AboveHispeedDelayLittle,
    TunableKey::GoHispeedLoadBig,
    TunableKey::GoHispeedLoadLittle,
    TunableKey::HispeedFreqBig,
    TunableKey::HispeedFreqLittle,
    TunableKey::TargetLoadsBig,
    TunableKey::TargetLoadsLittle,
    TunableKey::LowPowerCeilMbps,
    TunableKey::LowPowerIoPercent,
    TunableKey::CpubwHwmonV1,
    TunableKey::CpubwHwmonSampleMs,
    TunableKey::CpubwHwmonMinFreq,
    TunableKey::StorageClockScaleDisable,
];
