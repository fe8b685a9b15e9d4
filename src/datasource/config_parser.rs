use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{error, info};
use serde::Deserialize;

fn default_sysfs_root() -> PathBuf {
    PathBuf::from("/")
}

fn default_boost_poll_ms() -> u64 {
    50
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaemonConfig {
    /// 所有控制节点的根目录
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: PathBuf,
    /// 短时加速到期检查间隔（毫秒）
    #[serde(default = "default_boost_poll_ms")]
    pub boost_poll_ms: u64,
    /// 亮灭屏提示开关
    #[serde(default)]
    pub display_hint: bool,
    /// 覆盖 ro.boot.project_name 读取到的机型
    #[serde(default)]
    pub variant: Option<i32>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            sysfs_root: default_sysfs_root(),
            boost_poll_ms: default_boost_poll_ms(),
            display_hint: false,
            variant: None,
        }
    }
}

pub fn parse_config(content: &str) -> Result<DaemonConfig> {
    let config: DaemonConfig = toml::from_str(content).context("Invalid config file")?;
    Ok(config)
}

/// 配置文件不存在或格式错误时使用默认配置
pub fn config_read(config_file: &str) -> DaemonConfig {
    if !Path::new(config_file).is_file() {
        info!("Config file not found: {config_file}, using defaults");
        return DaemonConfig::default();
    }

    let result = fs::read_to_string(config_file)
        .with_context(|| format!("Failed to read config file: {config_file}"))
        .and_then(|content| parse_config(&content));

    match result {
        Ok(config) => {
            info!("Loaded config: {config:?}");
            config
        }
        Err(e) => {
            error!("{e:#}, using defaults");
            DaemonConfig::default()
        }
    }
}
