use std::fmt;

use crate::model::tunable::{TunableKey::*, TunablePair, FREQ_MAX_SENTINEL};

/// 对外公开的性能档位数量
pub const NUMBER_OF_PROFILES: i32 = 5;

/// 互斥的性能档位；SustainedPerformance 与 Vr 为内部虚拟档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    PowerSave,
    #[default]
    Balanced,
    HighPerformance,
    BiasPower,
    BiasPerformance,
    SustainedPerformance,
    Vr,
}

impl Profile {
    /// 只接受公开档位编号
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(Profile::PowerSave),
            1 => Some(Profile::Balanced),
            2 => Some(Profile::HighPerformance),
            3 => Some(Profile::BiasPower),
            4 => Some(Profile::BiasPerformance),
            _ => None,
        }
    }

    pub fn id(self) -> i32 {
        match self {
            Profile::PowerSave => 0,
            Profile::Balanced => 1,
            Profile::HighPerformance => 2,
            Profile::BiasPower => 3,
            Profile::BiasPerformance => 4,
            Profile::SustainedPerformance => 1337,
            Profile::Vr => 1338,
        }
    }

    /// 固定档位对应的表，虚拟档位的表由机型调优集提供
    pub fn static_table(self) -> Option<&'static [TunablePair]> {
        match self {
            Profile::PowerSave => Some(PROFILE_POWER_SAVE),
            Profile::HighPerformance => Some(PROFILE_HIGH_PERFORMANCE),
            Profile::BiasPower => Some(PROFILE_BIAS_POWER),
            Profile::BiasPerformance => Some(PROFILE_BIAS_PERFORMANCE),
            Profile::Balanced | Profile::SustainedPerformance | Profile::Vr => None,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Profile::PowerSave => "power_save",
            Profile::Balanced => "balanced",
            Profile::HighPerformance => "high_performance",
            Profile::BiasPower => "bias_power",
            Profile::BiasPerformance => "bias_performance",
            Profile::SustainedPerformance => "sustained_performance",
            Profile::Vr => "vr",
        };
        f.write_str(name)
    }
}

pub const PROFILE_HIGH_PERFORMANCE: &[TunablePair] = &[
    (SchedBoost, 0x1),
    (PowerCollapseDisable, 0x1),
    (CpusOnlineMinBig, 0x2),
    (CpusOnlineMinLittle, 0x2),
    (MinFreqBig, FREQ_MAX_SENTINEL),
    (MinFreqLittle, FREQ_MAX_SENTINEL),
];

pub const PROFILE_POWER_SAVE: &[TunablePair] = &[
    (CpusOnlineMaxLimitBig, 0x1),
    (MaxFreqBig, 0x3E8),
    (MaxFreqLittle, 0x3E8),
];

pub const PROFILE_BIAS_POWER: &[TunablePair] = &[(MaxFreqBig, 0x514), (MaxFreqLittle, 0x3E8)];

pub const PROFILE_BIAS_PERFORMANCE: &[TunablePair] = &[
    (CpusOnlineMaxLimitBig, 0x2),
    (CpusOnlineMaxLimitLittle, 0x2),
    (MinFreqBig, 0x578),
];

// interactive: 40ms above_hispeed_delay, go_hispeed 95, hispeed 806/556MHz, target 90
// cpubw: low power ceil 2500MBps, io 50%, hwmon v2, 10ms sample
pub const VIDEO_ENCODE: &[TunablePair] = &[
    (AboveHispeedDelayBig, 0x4),
    (GoHispeedLoadBig, 0x5F),
    (HispeedFreqBig, 0x326),
    (TargetLoadsBig, 0x5A),
    (AboveHispeedDelayLittle, 0x4),
    (GoHispeedLoadLittle, 0x5F),
    (HispeedFreqLittle, 0x22C),
    (TargetLoadsLittle, 0x5A),
    (LowPowerCeilMbps, 0x9C4),
    (LowPowerIoPercent, 0x32),
    (CpubwHwmonV1, 0x0),
    (CpubwHwmonSampleMs, 0xA),
];

pub const LAUNCH_BOOST: &[TunablePair] = &[
    (SchedBoost, 0x1),
    (MaxFreqBig, FREQ_MAX_SENTINEL),
    (MaxFreqLittle, FREQ_MAX_SENTINEL),
    (MinFreqBig, FREQ_MAX_SENTINEL),
    (MinFreqLittle, FREQ_MAX_SENTINEL),
    (CpubwHwmonMinFreq, 0x8C),
    (PowerCollapseDisable, 0x1),
    (StorageClockScaleDisable, 0x1),
];

pub const CPU_BOOST: &[TunablePair] = &[(SchedBoost, 0x1), (MinFreqBig, 0x3E8)];

pub const INTERACTION_FLING_BOOST: &[TunablePair] = &[
    (CpubwHwmonMinFreq, 0x33),
    (MinFreqBig, 0x3E8),
    (MinFreqLittle, 0x3E8),
    (SchedBoost, 0x1),
];

pub const INTERACTION_BOOST: &[TunablePair] = &[(MinFreqBig, 0x3E8)];
