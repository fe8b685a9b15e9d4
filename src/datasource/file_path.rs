// Thread names
pub const HINT_THREAD: &str = "HintWatcher";
pub const BOOST_THREAD: &str = "BoostExpiry";
pub const LOG_LEVEL_THREAD: &str = "LogLevelWatcher";

// Daemon files
pub const CONFIG_PATH: &str = "/data/adb/power_hal/config.toml";
pub const DAEMON_DIR: &str = "/data/adb/power_hal";
pub const HINT_NODE_PATH: &str = "/data/adb/power_hal/hint";
pub const HINT_WORK_PATH: &str = "/data/adb/power_hal/.hint.work";
pub const STATUS_PATH: &str = "/data/adb/power_hal/status";
pub const LOG_LEVEL_PATH: &str = "/data/adb/power_hal/log/log_level";

// System properties
pub const PROP_PROJECT_NAME: &str = "ro.boot.project_name";
pub const GETPROP_BIN: &str = "/system/bin/getprop";

// 以下节点均相对于 sysfs 根目录
pub const GPU_MAX_FREQ_PATH: &str = "sys/class/kgsl/kgsl-3d0/devfreq/max_freq";
pub const GPU_MIN_FREQ_PATH: &str = "sys/class/kgsl/kgsl-3d0/devfreq/min_freq";
pub const SCALING_GOVERNOR_PATH: &str = "sys/devices/system/cpu/cpu0/cpufreq/scaling_governor";

// VR HAL
pub const GPU_INFLIGHT_PATH: &str = "sys/class/kgsl/kgsl-3d0/dispatch/inflight_low_latency";
pub const DEVFREQ_BUS_SPEED_PATH: &str = "sys/class/devfreq/soc:qcom,gpubw/min_freq";

pub const SCHED_BOOST_PATH: &str = "proc/sys/kernel/sched_boost";
pub const LPM_SLEEP_DISABLED_PATH: &str = "sys/module/lpm_levels/parameters/sleep_disabled";
pub const UFS_CLKSCALE_PATH: &str = "sys/devices/soc/624000.ufshc/clkscale_enable";

pub const INTERACTIVE_GOVERNOR: &str = "interactive";
