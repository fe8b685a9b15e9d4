use std::{fmt, path::Path, time::Instant};

use log::{debug, error, info, warn};

use crate::{
    datasource::{
        file_path::{GPU_MAX_FREQ_PATH, GPU_MIN_FREQ_PATH},
        governor::{current_governor, is_interactive},
    },
    model::{
        boost::BoostTracker,
        device_tuning::DeviceTuningSet,
        hint::{Hint, HintResult},
        hint_action::{ActionId, HintActionEngine},
        interaction::{BoostKind, DEFAULT_INTERACTION_MS, InteractionThrottle},
        profile::{self, NUMBER_OF_PROFILES, Profile},
        tunable::SysfsTunables,
        video_encode::process_video_encode_hint,
    },
    utils::file_helper::FileHelper,
};

const LAUNCH_BOOST_MS: i32 = 2000;

/// 电源 HAL 的全部可变状态，调用方负责串行化访问
pub struct PowerHal {
    engine: HintActionEngine,
    boosts: BoostTracker,
    throttle: InteractionThrottle,
    tuning: DeviceTuningSet,
    current_profile: Profile,
    saved_profile: Profile,
    sustained_perf_active: bool,
    vr_active: bool,
    /// 亮灭屏提示开关，默认关闭
    display_hint: bool,
}

impl PowerHal {
    pub fn new<P: AsRef<Path>>(sysfs_root: P, display_hint: bool) -> Self {
        Self {
            engine: HintActionEngine::new(SysfsTunables::new(sysfs_root)),
            boosts: BoostTracker::new(),
            throttle: InteractionThrottle::new(),
            tuning: DeviceTuningSet::default(),
            current_profile: Profile::Balanced,
            saved_profile: Profile::Balanced,
            sustained_perf_active: false,
            vr_active: false,
            display_hint,
        }
    }

    fn root(&self) -> &Path {
        self.engine.tunables().root()
    }

    pub fn set_device_variant(&mut self, variant: i32) {
        debug!("set_device_variant: variant={variant}");
        self.tuning = DeviceTuningSet::select(variant);
    }

    pub fn number_of_profiles(&self) -> i32 {
        NUMBER_OF_PROFILES
    }

    fn set_profile(&mut self, profile: Profile) {
        if profile == self.current_profile {
            return;
        }

        debug!("set_profile: {} -> {}", self.current_profile, profile);

        if self.current_profile != Profile::Balanced {
            self.engine.undo_action(ActionId::DEFAULT_PROFILE);
            debug!("Profile {} undone", self.current_profile);
        }

        let table = match profile {
            Profile::SustainedPerformance => Some(self.tuning.sustained_perf),
            Profile::Vr => Some(self.tuning.vr),
            p => p.static_table(),
        };
        if let Some(table) = table {
            self.engine.apply_action(ActionId::DEFAULT_PROFILE, table);
        }
        info!("Set {profile} mode");

        self.current_profile = profile;
    }

    /// 外部档位请求；模式生效期间只记录，待模式结束后恢复
    pub fn set_power_profile(&mut self, id: i32) -> HintResult {
        let Some(profile) = Profile::from_id(id) else {
            warn!("Ignoring unknown power profile {id}");
            return HintResult::NotHandled;
        };

        if self.in_mode() {
            info!("Profile {profile} deferred until sustained/VR mode ends");
            self.saved_profile = profile;
        } else {
            self.set_profile(profile);
        }
        HintResult::Handled
    }

    fn in_mode(&self) -> bool {
        self.sustained_perf_active || self.vr_active
    }

    fn write_gpu(&self, node: &str, value: &str) {
        if value.is_empty() {
            warn!("Refusing to write empty value to {node}");
            return;
        }
        FileHelper::write_string_safe(self.root().join(node), value);
    }

    pub fn set_sustained_performance(&mut self, enable: bool) {
        debug!("Sustained performance: {}", if enable { "enable" } else { "disable" });

        if !self.tuning.is_available() {
            warn!("Sustained performance ignored: device tuning unavailable");
            return;
        }

        if enable && !self.sustained_perf_active {
            if !self.vr_active {
                self.saved_profile = self.current_profile;
                self.set_profile(Profile::SustainedPerformance);
            }
            self.write_gpu(GPU_MAX_FREQ_PATH, self.tuning.gpu_max_lim);
            self.sustained_perf_active = true;
        } else if !enable && self.sustained_perf_active {
            self.sustained_perf_active = false;
            if !self.vr_active {
                self.set_profile(self.saved_profile);
            }
            self.write_gpu(GPU_MAX_FREQ_PATH, self.tuning.gpu_max_def);
        }
    }

    pub fn set_vr_mode(&mut self, enable: bool) {
        debug!("VR mode: {}", if enable { "enable" } else { "disable" });

        if !self.tuning.is_available() {
            warn!("VR mode ignored: device tuning unavailable");
            return;
        }

        if enable && !self.vr_active {
            if !self.sustained_perf_active {
                self.saved_profile = self.current_profile;
                self.set_profile(Profile::Vr);
            }
            self.write_gpu(GPU_MIN_FREQ_PATH, self.tuning.gpu_min_lim);
            self.vr_active = true;
        } else if !enable && self.vr_active {
            self.vr_active = false;
            if !self.sustained_perf_active {
                self.set_profile(self.saved_profile);
            }
            self.write_gpu(GPU_MIN_FREQ_PATH, self.tuning.gpu_min_def);
        }
    }

    pub fn hint(&mut self, hint: Hint) -> HintResult {
        self.hint_at(hint, Instant::now())
    }

    pub fn hint_at(&mut self, hint: Hint, now: Instant) -> HintResult {
        match hint {
            Hint::SustainedPerformance(Some(enable)) => {
                self.set_sustained_performance(enable);
                HintResult::Handled
            }
            Hint::VrMode(Some(enable)) => {
                self.set_vr_mode(enable);
                HintResult::Handled
            }
            Hint::SetProfile(id) => self.set_power_profile(id),
            // 持续性能/VR 期间忽略其余提示
            _ if self.in_mode() => HintResult::Handled,
            // 省电档位下忽略其余提示
            _ if self.current_profile == Profile::PowerSave => HintResult::Handled,
            Hint::Interaction(duration) => {
                self.interaction(duration.unwrap_or(DEFAULT_INTERACTION_MS), now)
            }
            Hint::Launch => {
                self.boosts.boost(
                    &mut self.engine,
                    ActionId::LAUNCH,
                    LAUNCH_BOOST_MS,
                    profile::LAUNCH_BOOST,
                    now,
                );
                HintResult::Handled
            }
            Hint::CpuBoost(micros) => {
                let duration = micros / 1000;
                if duration <= 0 {
                    return HintResult::NotHandled;
                }
                self.boosts
                    .boost(&mut self.engine, ActionId::CPU_BOOST, duration, profile::CPU_BOOST, now);
                HintResult::Handled
            }
            Hint::VideoEncode(metadata) => {
                let root = self.root().to_path_buf();
                process_video_encode_hint(&mut self.engine, &root, metadata.as_deref())
            }
            Hint::SustainedPerformance(None) | Hint::VrMode(None) => HintResult::NotHandled,
        }
    }

    fn interaction(&mut self, duration: i32, now: Instant) -> HintResult {
        let table = match self.throttle.evaluate(duration, now) {
            Some(BoostKind::Fling) => profile::INTERACTION_FLING_BOOST,
            Some(BoostKind::Interaction) => profile::INTERACTION_BOOST,
            None => return HintResult::Handled,
        };
        self.boosts
            .boost(&mut self.engine, ActionId::INTERACTION, duration, table, now);
        HintResult::Handled
    }

    /// 到期的短时加速在此撤销
    pub fn expire_boosts(&mut self, now: Instant) -> usize {
        self.boosts.expire(&mut self.engine, now)
    }

    /// 亮灭屏提示，未开启时直接返回 Handled
    pub fn set_interactive(&mut self, on: bool) -> HintResult {
        if !self.display_hint {
            return HintResult::Handled;
        }

        let governor = match current_governor(self.root()) {
            Ok(g) => g,
            Err(e) => {
                error!("Can't obtain scaling governor: {e}");
                return HintResult::NotHandled;
            }
        };
        if !is_interactive(&governor) {
            return HintResult::NotHandled;
        }

        if on {
            self.engine.undo_action(ActionId::DISPLAY_STATE);
            info!("Display Off hint stop");
        } else {
            self.engine.apply_action(ActionId::DISPLAY_STATE, &[]);
            info!("Display Off hint start");
        }
        HintResult::Handled
    }

    pub fn current_profile(&self) -> Profile {
        self.current_profile
    }

    pub fn saved_profile(&self) -> Profile {
        self.saved_profile
    }

    pub fn is_sustained_perf_active(&self) -> bool {
        self.sustained_perf_active
    }

    pub fn is_vr_active(&self) -> bool {
        self.vr_active
    }

    pub fn engine(&self) -> &HintActionEngine {
        &self.engine
    }
}

impl fmt::Display for PowerHal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "profile={} saved={} sustained={} vr={}",
            self.current_profile,
            self.saved_profile,
            u8::from(self.sustained_perf_active),
            u8::from(self.vr_active)
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        model::{
            device_tuning::{PROJECT_OP, PROJECT_OPT},
            tunable::TunableKey,
        },
        test_utils::*,
    };
    use tempfile::{TempDir, tempdir};

    fn hal(variant: i32) -> (TempDir, PowerHal) {
        let dir = tempdir().unwrap();
        mock_sysfs(dir.path(), "interactive");
        let mut hal = PowerHal::new(dir.path(), false);
        hal.set_device_variant(variant);
        (dir, hal)
    }

    fn profile_table(hal: &PowerHal) -> Option<&[crate::model::tunable::TunablePair]> {
        hal.engine().active_table(ActionId::DEFAULT_PROFILE)
    }

    #[test]
    fn profile_switch_keeps_exactly_one_table() {
        let (dir, mut hal) = hal(PROJECT_OP);
        let root = dir.path();

        assert_eq!(hal.set_power_profile(0), HintResult::Handled);
        assert_eq!(profile_table(&hal), Some(profile::PROFILE_POWER_SAVE));
        assert_eq!(read_key(root, TunableKey::CpusOnlineMaxLimitBig), "1");

        hal.set_power_profile(2);
        assert_eq!(hal.current_profile(), Profile::HighPerformance);
        assert_eq!(profile_table(&hal), Some(profile::PROFILE_HIGH_PERFORMANCE));
        // power save values are gone
        assert_eq!(read_key(root, TunableKey::CpusOnlineMaxLimitBig), "7");
        assert_eq!(read_key(root, TunableKey::MaxFreqBig), "7");
        assert_eq!(read_key(root, TunableKey::SchedBoost), "1");

        hal.set_power_profile(4);
        assert_eq!(profile_table(&hal), Some(profile::PROFILE_BIAS_PERFORMANCE));
        assert_eq!(read_key(root, TunableKey::SchedBoost), "7");
        assert_eq!(read_key(root, TunableKey::MinFreqBig), "1400000");

        hal.set_power_profile(1);
        assert_eq!(hal.current_profile(), Profile::Balanced);
        assert_eq!(profile_table(&hal), None);
        assert_eq!(read_key(root, TunableKey::MinFreqBig), "7");
    }

    #[test]
    fn unknown_and_virtual_profile_ids_are_rejected() {
        let (_dir, mut hal) = hal(PROJECT_OP);

        assert_eq!(hal.set_power_profile(9), HintResult::NotHandled);
        assert_eq!(hal.hint(Hint::SetProfile(1337)), HintResult::NotHandled);
        assert_eq!(hal.current_profile(), Profile::Balanced);
        assert_eq!(hal.number_of_profiles(), 5);
    }

    #[test]
    fn sustained_performance_restores_previous_profile() {
        let (dir, mut hal) = hal(PROJECT_OPT);
        let root = dir.path();
        hal.set_power_profile(3);

        hal.hint(Hint::SustainedPerformance(Some(true)));
        assert!(hal.is_sustained_perf_active());
        assert_eq!(hal.current_profile(), Profile::SustainedPerformance);
        assert_eq!(hal.saved_profile(), Profile::BiasPower);
        assert_eq!(read_node(root, GPU_MAX_FREQ_PATH), "560000000");
        assert_eq!(read_key(root, TunableKey::CpusOnlineMaxLimitBig), "0");
        assert_eq!(read_key(root, TunableKey::MaxFreqLittle), "1190000");

        hal.hint(Hint::SustainedPerformance(Some(false)));
        assert!(!hal.is_sustained_perf_active());
        assert_eq!(hal.current_profile(), Profile::BiasPower);
        assert_eq!(profile_table(&hal), Some(profile::PROFILE_BIAS_POWER));
        assert_eq!(read_node(root, GPU_MAX_FREQ_PATH), "652800000");
        assert_eq!(read_key(root, TunableKey::CpusOnlineMaxLimitBig), "7");
    }

    #[test]
    fn repeated_enable_does_not_toggle() {
        let (_dir, mut hal) = hal(PROJECT_OP);

        hal.set_sustained_performance(true);
        hal.set_sustained_performance(true);
        assert!(hal.is_sustained_perf_active());

        hal.set_vr_mode(false);
        assert!(hal.is_sustained_perf_active());
        assert_eq!(hal.current_profile(), Profile::SustainedPerformance);
    }

    #[test]
    fn vr_after_sustained_only_touches_gpu_min() {
        let (dir, mut hal) = hal(PROJECT_OP);
        let root = dir.path();
        hal.set_power_profile(2);
        hal.set_sustained_performance(true);

        hal.hint(Hint::VrMode(Some(true)));
        assert!(hal.is_vr_active());
        assert_eq!(hal.current_profile(), Profile::SustainedPerformance);
        assert_eq!(hal.saved_profile(), Profile::HighPerformance);
        assert_eq!(read_node(root, GPU_MIN_FREQ_PATH), "401800000");

        hal.hint(Hint::VrMode(Some(false)));
        assert!(!hal.is_vr_active());
        assert_eq!(hal.current_profile(), Profile::SustainedPerformance);
        assert_eq!(hal.saved_profile(), Profile::HighPerformance);
        assert_eq!(read_node(root, GPU_MIN_FREQ_PATH), "133000000");

        hal.set_sustained_performance(false);
        assert_eq!(hal.current_profile(), Profile::HighPerformance);
    }

    #[test]
    fn sustained_ending_first_leaves_profile_with_vr() {
        let (dir, mut hal) = hal(PROJECT_OP);
        let root = dir.path();
        hal.set_power_profile(4);
        hal.set_sustained_performance(true);
        hal.set_vr_mode(true);

        // sustained owned the slot; VR is still running so nothing is restored yet
        hal.set_sustained_performance(false);
        assert_eq!(hal.current_profile(), Profile::SustainedPerformance);
        assert_eq!(read_node(root, GPU_MAX_FREQ_PATH), "624000000");

        // the later VR session restores the profile saved by sustained mode
        hal.set_vr_mode(false);
        assert_eq!(hal.current_profile(), Profile::BiasPerformance);
        assert_eq!(profile_table(&hal), Some(profile::PROFILE_BIAS_PERFORMANCE));
    }

    #[test]
    fn vr_first_owns_profile_slot() {
        let (_dir, mut hal) = hal(PROJECT_OP);
        hal.set_power_profile(0);

        hal.set_vr_mode(true);
        hal.set_sustained_performance(true);
        assert_eq!(hal.current_profile(), Profile::Vr);
        assert_eq!(hal.saved_profile(), Profile::PowerSave);

        hal.set_vr_mode(false);
        hal.set_sustained_performance(false);
        assert_eq!(hal.current_profile(), Profile::PowerSave);
    }

    #[test]
    fn modes_suppress_boosts_and_defer_profiles() {
        let (dir, mut hal) = hal(PROJECT_OP);
        let root = dir.path();
        hal.set_vr_mode(true);

        assert_eq!(hal.hint(Hint::Interaction(Some(200))), HintResult::Handled);
        assert_eq!(hal.hint(Hint::Launch), HintResult::Handled);
        assert_eq!(hal.hint(Hint::CpuBoost(50_000)), HintResult::Handled);
        assert_eq!(
            hal.hint(Hint::VideoEncode(Some("state=1".into()))),
            HintResult::Handled
        );
        assert!(!hal.engine().is_active(ActionId::INTERACTION));
        assert!(!hal.engine().is_active(ActionId::LAUNCH));
        assert!(!hal.engine().is_active(ActionId::VIDEO_ENCODE));

        assert_eq!(hal.hint(Hint::SetProfile(2)), HintResult::Handled);
        assert_eq!(hal.current_profile(), Profile::Vr);
        assert_eq!(profile_table(&hal), Some(TUNING_VR));
        assert_eq!(read_key(root, TunableKey::SchedBoost), "7");

        hal.set_vr_mode(false);
        assert_eq!(hal.current_profile(), Profile::HighPerformance);
    }

    const TUNING_VR: &[crate::model::tunable::TunablePair] =
        crate::model::device_tuning::TUNING_OP.vr;

    #[test]
    fn power_save_suppresses_boosts_but_not_profiles() {
        let (_dir, mut hal) = hal(PROJECT_OP);
        hal.set_power_profile(0);

        assert_eq!(hal.hint(Hint::Interaction(None)), HintResult::Handled);
        assert_eq!(hal.hint(Hint::Launch), HintResult::Handled);
        assert!(!hal.engine().is_active(ActionId::INTERACTION));
        assert!(!hal.engine().is_active(ActionId::LAUNCH));

        hal.hint(Hint::SetProfile(1));
        assert_eq!(hal.current_profile(), Profile::Balanced);
        hal.hint(Hint::Launch);
        assert!(hal.engine().is_active(ActionId::LAUNCH));
    }

    #[test]
    fn interaction_throttle_and_fling_selection() {
        let (_dir, mut hal) = hal(PROJECT_OP);
        let t0 = Instant::now();

        hal.hint_at(Hint::Interaction(Some(200)), t0);
        assert_eq!(
            hal.engine().active_table(ActionId::INTERACTION),
            Some(profile::INTERACTION_BOOST)
        );
        hal.expire_boosts(t0 + Duration::from_millis(200));
        assert!(!hal.engine().is_active(ActionId::INTERACTION));

        // coalesced: still handled, nothing applied
        let r = hal.hint_at(Hint::Interaction(Some(200)), t0 + Duration::from_millis(100));
        assert_eq!(r, HintResult::Handled);
        assert!(!hal.engine().is_active(ActionId::INTERACTION));

        hal.hint_at(Hint::Interaction(Some(2000)), t0 + Duration::from_millis(300));
        assert_eq!(
            hal.engine().active_table(ActionId::INTERACTION),
            Some(profile::INTERACTION_FLING_BOOST)
        );
    }

    #[test]
    fn cpu_boost_needs_positive_millis() {
        let (dir, mut hal) = hal(PROJECT_OP);
        let t0 = Instant::now();

        assert_eq!(hal.hint_at(Hint::CpuBoost(999), t0), HintResult::NotHandled);
        assert_eq!(hal.hint_at(Hint::CpuBoost(-5), t0), HintResult::NotHandled);
        assert_eq!(hal.hint_at(Hint::CpuBoost(30_000), t0), HintResult::Handled);
        assert_eq!(read_key(dir.path(), TunableKey::MinFreqBig), "1000000");

        assert_eq!(hal.expire_boosts(t0 + Duration::from_millis(30)), 1);
        assert_eq!(read_key(dir.path(), TunableKey::MinFreqBig), "7");
    }

    #[test]
    fn boost_expiry_keeps_profile_values() {
        let (dir, mut hal) = hal(PROJECT_OP);
        let root = dir.path();
        let t0 = Instant::now();
        hal.set_power_profile(2);

        hal.hint_at(Hint::Launch, t0);
        hal.expire_boosts(t0 + Duration::from_secs(3));

        // high performance still pins sched_boost and the big floor
        assert_eq!(read_key(root, TunableKey::SchedBoost), "1");
        assert_eq!(read_key(root, TunableKey::MinFreqBig), "4294967295");
        assert_eq!(read_key(root, TunableKey::MaxFreqBig), "7");
    }

    #[test]
    fn interaction_boost_keeps_high_performance_floor() {
        let (dir, mut hal) = hal(PROJECT_OP);
        let root = dir.path();
        let t0 = Instant::now();
        hal.set_power_profile(2);

        hal.hint_at(Hint::Interaction(Some(200)), t0);
        assert!(hal.engine().is_active(ActionId::INTERACTION));
        assert_eq!(read_key(root, TunableKey::MinFreqBig), "4294967295");

        // the boost floor shows through once the profile lets go
        hal.set_power_profile(1);
        assert_eq!(read_key(root, TunableKey::MinFreqBig), "1000000");

        hal.expire_boosts(t0 + Duration::from_millis(200));
        assert_eq!(read_key(root, TunableKey::MinFreqBig), "7");
    }

    #[test]
    fn video_encode_cannot_reuse_profile_action() {
        let (_dir, mut hal) = hal(PROJECT_OP);
        hal.set_power_profile(2);

        let r = hal.hint(Hint::VideoEncode(Some("hint_id=0xFF00;state=0".into())));

        assert_eq!(r, HintResult::NotHandled);
        assert_eq!(profile_table(&hal), Some(profile::PROFILE_HIGH_PERFORMANCE));
    }

    #[test]
    fn unknown_variant_makes_modes_inert() {
        let (dir, mut hal) = hal(1);
        let root = dir.path();

        assert_eq!(hal.hint(Hint::SustainedPerformance(Some(true))), HintResult::Handled);
        assert_eq!(hal.hint(Hint::VrMode(Some(true))), HintResult::Handled);

        assert!(!hal.is_sustained_perf_active());
        assert!(!hal.is_vr_active());
        assert_eq!(hal.current_profile(), Profile::Balanced);
        assert_eq!(read_node(root, GPU_MAX_FREQ_PATH), "624000000");
        assert_eq!(read_node(root, GPU_MIN_FREQ_PATH), "133000000");
    }

    #[test]
    fn toggles_without_payload_are_not_handled() {
        let (_dir, mut hal) = hal(PROJECT_OP);

        assert_eq!(hal.hint(Hint::SustainedPerformance(None)), HintResult::NotHandled);
        assert_eq!(hal.hint(Hint::VrMode(None)), HintResult::NotHandled);
    }

    #[test]
    fn interactive_state_is_disabled_by_default() {
        let (_dir, mut hal) = hal(PROJECT_OP);

        assert_eq!(hal.set_interactive(false), HintResult::Handled);
        assert!(!hal.engine().is_active(ActionId::DISPLAY_STATE));
    }

    #[test]
    fn display_hint_flag_enables_display_action() {
        let dir = tempdir().unwrap();
        mock_sysfs(dir.path(), "interactive");
        let mut hal = PowerHal::new(dir.path(), true);

        assert_eq!(hal.set_interactive(false), HintResult::Handled);
        assert!(hal.engine().is_active(ActionId::DISPLAY_STATE));
        assert_eq!(hal.set_interactive(true), HintResult::Handled);
        assert!(!hal.engine().is_active(ActionId::DISPLAY_STATE));

        mock_node(dir.path(), crate::datasource::file_path::SCALING_GOVERNOR_PATH, "schedutil");
        assert_eq!(hal.set_interactive(false), HintResult::NotHandled);
    }

    #[test]
    fn status_line_reports_state() {
        let (_dir, mut hal) = hal(PROJECT_OP);
        hal.set_power_profile(2);
        hal.set_vr_mode(true);

        assert_eq!(
            hal.to_string(),
            "profile=vr saved=high_performance sustained=0 vr=1"
        );
    }
}
