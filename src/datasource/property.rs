use std::process::Command;

use anyhow::{Context, Result, bail};
use log::{debug, warn};

use crate::datasource::{config_parser::DaemonConfig, file_path::*};

pub fn get_prop(key: &str) -> Result<String> {
    let output = Command::new(GETPROP_BIN)
        .arg(key)
        .output()
        .with_context(|| format!("Failed to run getprop {key}"))?;
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if value.is_empty() {
        bail!("Property {key} is empty");
    }
    Ok(value)
}

/// 配置中的机型优先，其次读取 ro.boot.project_name；失败返回 0（未知机型）
pub fn detect_variant(config: &DaemonConfig) -> i32 {
    if let Some(variant) = config.variant {
        debug!("Using variant {variant} from config");
        return variant;
    }

    match get_prop(PROP_PROJECT_NAME).and_then(|v| {
        v.parse::<i32>()
            .with_context(|| format!("{PROP_PROJECT_NAME}={v} is not a project id"))
    }) {
        Ok(variant) => variant,
        Err(e) => {
            warn!("{e:#}");
            0
        }
    }
}
