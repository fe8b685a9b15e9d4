/// Power HAL 常量定义
pub const NOTES: &str = "MSM8996 Power HAL";
pub const AUTHOR: &str = "Author: Seyud @GitHub, Tools-cx-app @GitHub";
pub const VERSION: &str = "Version: v1.2.0";

/// 守护进程相关常量
pub mod daemon {
    /// 启动时等待 sysfs 节点就绪的重试次数
    pub const SYSFS_READY_RETRIES: u32 = 30;
    pub const SYSFS_READY_INTERVAL_MS: u64 = 1000;
}
