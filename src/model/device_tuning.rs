use log::{error, info};

use crate::{
    error::HalError,
    model::tunable::{TunableKey::*, TunablePair},
};

pub const PROJECT_OP: i32 = 15801;
pub const PROJECT_OPT: i32 = 15811;

/// 机型调优集，启动时选定后不再修改
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceTuningSet {
    pub gpu_max_def: &'static str,
    pub gpu_max_lim: &'static str,
    pub gpu_min_def: &'static str,
    pub gpu_min_lim: &'static str,
    pub sustained_perf: &'static [TunablePair],
    pub vr: &'static [TunablePair],
}

// big cluster offline, little capped at 1190MHz
const LIMITED_CLUSTERS: &[TunablePair] = &[(CpusOnlineMaxLimitBig, 0x0), (MaxFreqLittle, 0x4A6)];

pub const TUNING_OP: DeviceTuningSet = DeviceTuningSet {
    gpu_max_def: "624000000",
    gpu_max_lim: "560000000",
    gpu_min_def: "133000000",
    gpu_min_lim: "401800000",
    sustained_perf: LIMITED_CLUSTERS,
    vr: LIMITED_CLUSTERS,
};

pub const TUNING_OPT: DeviceTuningSet = DeviceTuningSet {
    gpu_max_def: "652800000",
    gpu_max_lim: "560000000",
    gpu_min_def: "133000000",
    gpu_min_lim: "401800000",
    sustained_perf: LIMITED_CLUSTERS,
    vr: LIMITED_CLUSTERS,
};

impl DeviceTuningSet {
    pub fn try_select(variant: i32) -> Result<Self, HalError> {
        match variant {
            PROJECT_OP => {
                info!("Detected OnePlus 3 ({variant})");
                Ok(TUNING_OP)
            }
            PROJECT_OPT => {
                info!("Detected OnePlus 3T ({variant})");
                Ok(TUNING_OPT)
            }
            _ => Err(HalError::Configuration(format!(
                "Unknown device variant {variant}"
            ))),
        }
    }

    /// 未知机型退化为空调优集
    pub fn select(variant: i32) -> Self {
        Self::try_select(variant).unwrap_or_else(|e| {
            error!("{e}, tuning unavailable");
            Self::default()
        })
    }

    pub fn is_available(&self) -> bool {
        !self.gpu_max_def.is_empty()
            && !self.gpu_max_lim.is_empty()
            && !self.gpu_min_def.is_empty()
            && !self.gpu_min_lim.is_empty()
    }
}
