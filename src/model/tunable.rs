use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::{
    datasource::file_path::*,
    error::HalResult,
    utils::file_helper::FileHelper,
};

/// 频率取值为该哨兵时表示"不限"，写入后由内核钳制到硬件上限
pub const FREQ_MAX_SENTINEL: i32 = 0xFFF;

/// 可调节的内核控制节点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TunableKey {
    SchedBoost,
    PowerCollapseDisable,
    CpusOnlineMinBig,
    CpusOnlineMinLittle,
    CpusOnlineMaxLimitBig,
    CpusOnlineMaxLimitLittle,
    MinFreqBig,
    MinFreqLittle,
    MaxFreqBig,
    MaxFreqLittle,
    AboveHispeedDelayBig,
    AboveHispeedDelayLittle,
    GoHispeedLoadBig,
    GoHispeedLoadLittle,
    HispeedFreqBig,
    HispeedFreqLittle,
    TargetLoadsBig,
    TargetLoadsLittle,
    LowPowerCeilMbps,
    LowPowerIoPercent,
    CpubwHwmonV1,
    CpubwHwmonSampleMs,
    CpubwHwmonMinFreq,
    StorageClockScaleDisable,
}

/// 表中的值如何转换成节点内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Raw,
    /// MHz -> kHz
    Mhz,
    Scaled(i64),
    /// 表中 1 表示关闭，节点语义相反
    Inverted,
}

impl Encoding {
    pub fn encode(self, value: i32) -> String {
        match self {
            Encoding::Raw => value.to_string(),
            Encoding::Mhz if value == FREQ_MAX_SENTINEL => u32::MAX.to_string(),
            Encoding::Mhz => (i64::from(value) * 1000).to_string(),
            Encoding::Scaled(factor) => (i64::from(value) * factor).to_string(),
            Encoding::Inverted => (if value == 0 { "1" } else { "0" }).to_string(),
        }
    }
}

/// 多个动作同时持有一个节点时，取偏向性能的一方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    Higher,
    Lower,
}

impl Preference {
    pub fn pick(self, a: i32, b: i32) -> i32 {
        match self {
            Preference::Higher => a.max(b),
            Preference::Lower => a.min(b),
        }
    }
}

impl TunableKey {
    pub fn node(self) -> &'static str {
        use TunableKey::*;
        match self {
            SchedBoost => SCHED_BOOST_PATH,
            PowerCollapseDisable => LPM_SLEEP_DISABLED_PATH,
            CpusOnlineMinBig => "sys/devices/system/cpu/cpu2/core_ctl/min_cpus",
            CpusOnlineMinLittle => "sys/devices/system/cpu/cpu0/core_ctl/min_cpus",
            CpusOnlineMaxLimitBig => "sys/devices/system/cpu/cpu2/core_ctl/max_cpus",
            CpusOnlineMaxLimitLittle => "sys/devices/system/cpu/cpu0/core_ctl/max_cpus",
            MinFreqBig => "sys/devices/system/cpu/cpu2/cpufreq/scaling_min_freq",
            MinFreqLittle => "sys/devices/system/cpu/cpu0/cpufreq/scaling_min_freq",
            MaxFreqBig => "sys/devices/system/cpu/cpu2/cpufreq/scaling_max_freq",
            MaxFreqLittle => "sys/devices/system/cpu/cpu0/cpufreq/scaling_max_freq",
            AboveHispeedDelayBig => "sys/devices/system/cpu/cpu2/cpufreq/interactive/above_hispeed_delay",
            AboveHispeedDelayLittle => "sys/devices/system/cpu/cpu0/cpufreq/interactive/above_hispeed_delay",
            GoHispeedLoadBig => "sys/devices/system/cpu/cpu2/cpufreq/interactive/go_hispeed_load",
            GoHispeedLoadLittle => "sys/devices/system/cpu/cpu0/cpufreq/interactive/go_hispeed_load",
            HispeedFreqBig => "sys/devices/system/cpu/cpu2/cpufreq/interactive/hispeed_freq",
            HispeedFreqLittle => "sys/devices/system/cpu/cpu0/cpufreq/interactive/hispeed_freq",
            TargetLoadsBig => "sys/devices/system/cpu/cpu2/cpufreq/interactive/target_loads",
            TargetLoadsLittle => "sys/devices/system/cpu/cpu0/cpufreq/interactive/target_loads",
            LowPowerCeilMbps => "sys/class/devfreq/soc:qcom,cpubw/bw_hwmon/low_power_ceil_mbps",
            LowPowerIoPercent => "sys/class/devfreq/soc:qcom,cpubw/bw_hwmon/low_power_io_percent",
            CpubwHwmonV1 => "sys/class/devfreq/soc:qcom,cpubw/bw_hwmon/use_v1",
            CpubwHwmonSampleMs => "sys/class/devfreq/soc:qcom,cpubw/bw_hwmon/sample_ms",
            CpubwHwmonMinFreq => "sys/class/devfreq/soc:qcom,cpubw/min_freq",
            StorageClockScaleDisable => UFS_CLKSCALE_PATH,
        }
    }

    pub fn encoding(self) -> Encoding {
        use TunableKey::*;
        match self {
            MinFreqBig | MinFreqLittle | MaxFreqBig | MaxFreqLittle | HispeedFreqBig
            | HispeedFreqLittle => Encoding::Mhz,
            // 10ms 为单位，节点为微秒
            AboveHispeedDelayBig | AboveHispeedDelayLittle => Encoding::Scaled(10_000),
            CpubwHwmonMinFreq => Encoding::Scaled(100),
            StorageClockScaleDisable => Encoding::Inverted,
            _ => Encoding::Raw,
        }
    }

    /// interactive 调频器的延迟与负载阈值越小越激进
    pub fn preference(self) -> Preference {
        use TunableKey::*;
        match self {
            AboveHispeedDelayBig | AboveHispeedDelayLittle | GoHispeedLoadBig
            | GoHispeedLoadLittle | TargetLoadsBig | TargetLoadsLittle => Preference::Lower,
            _ => Preference::Higher,
        }
    }

    /// 节点无法读取时使用的基线值
    pub fn fallback(self) -> Option<&'static str> {
        use TunableKey::*;
        match self {
            SchedBoost | PowerCollapseDisable | CpusOnlineMinBig | CpusOnlineMinLittle => {
                Some("0")
            }
            CpusOnlineMaxLimitBig | CpusOnlineMaxLimitLittle => Some("2"),
            StorageClockScaleDisable => Some("1"),
            _ => None,
        }
    }
}

pub type TunablePair = (TunableKey, i32);

/// 原生节点子系统：负责键到节点的映射、编码和基线记录
pub struct SysfsTunables {
    root: PathBuf,
    baseline: HashMap<TunableKey, Option<String>>,
}

impl SysfsTunables {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            baseline: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, node: &str) -> PathBuf {
        self.root.join(node)
    }

    /// 首次写入前记录节点原始内容
    fn capture(&mut self, key: TunableKey) {
        if self.baseline.contains_key(&key) {
            return;
        }

        let path = self.path_of(key.node());
        let value = match FileHelper::read_trimmed(&path) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!("No baseline for {key:?}: {e}");
                key.fallback().map(str::to_string)
            }
        };
        debug!("Baseline {key:?} = {value:?}");
        self.baseline.insert(key, value);
    }

    pub fn write(&mut self, key: TunableKey, value: i32) -> HalResult<()> {
        self.capture(key);
        let content = key.encoding().encode(value);
        FileHelper::write_string(self.path_of(key.node()), &content)
    }

    pub fn restore(&mut self, key: TunableKey) -> HalResult<()> {
        let value = match self.baseline.get(&key) {
            Some(Some(v)) => v.clone(),
            _ => match key.fallback() {
                Some(v) => v.to_string(),
                None => {
                    warn!("No baseline recorded for {key:?}, leaving node untouched");
                    return Ok(());
                }
            },
        };
        FileHelper::write_string(self.path_of(key.node()), &value)
    }

    pub fn baseline(&self, key: TunableKey) -> Option<&str> {
        self.baseline.get(&key).and_then(|v| v.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn encodes_frequency_and_delay_units() {
        assert_eq!(Encoding::Mhz.encode(0x3E8), "1000000");
        assert_eq!(Encoding::Mhz.encode(FREQ_MAX_SENTINEL), "4294967295");
        assert_eq!(Encoding::Scaled(10_000).encode(4), "40000");
        assert_eq!(Encoding::Inverted.encode(1), "0");
        assert_eq!(Encoding::Raw.encode(0x5A), "90");
    }

    #[test]
    fn preference_picks_the_aggressive_value() {
        assert_eq!(TunableKey::MinFreqBig.preference().pick(0x3E8, FREQ_MAX_SENTINEL), FREQ_MAX_SENTINEL);
        assert_eq!(TunableKey::TargetLoadsBig.preference().pick(90, 80), 80);
        assert_eq!(TunableKey::AboveHispeedDelayLittle.preference(), Preference::Lower);
    }

    #[test]
    fn restore_writes_back_value_seen_before_first_write() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        mock_node(root, TunableKey::MinFreqBig.node(), "307200\n");

        let mut tunables = SysfsTunables::new(root);
        tunables.write(TunableKey::MinFreqBig, 0x3E8).unwrap();
        tunables.write(TunableKey::MinFreqBig, 0x578).unwrap();
        assert_eq!(tunables.baseline(TunableKey::MinFreqBig), Some("307200"));

        tunables.restore(TunableKey::MinFreqBig).unwrap();
        let node = root.join(TunableKey::MinFreqBig.node());
        assert_eq!(fs::read_to_string(node).unwrap(), "307200");
    }

    #[test]
    fn unreadable_node_falls_back_to_static_default() {
        let dir = tempdir().unwrap();
        let mut tunables = SysfsTunables::new(dir.path());

        assert!(tunables.write(TunableKey::SchedBoost, 1).is_err());
        assert_eq!(tunables.baseline(TunableKey::SchedBoost), Some("0"));
    }
}
