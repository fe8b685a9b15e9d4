use std::path::Path;

use crate::{
    datasource::file_path::{INTERACTIVE_GOVERNOR, SCALING_GOVERNOR_PATH},
    error::HalResult,
    utils::file_helper::FileHelper,
};

/// 读取 cpu0 当前的调频器名称
pub fn current_governor(root: &Path) -> HalResult<String> {
    FileHelper::read_trimmed(root.join(SCALING_GOVERNOR_PATH))
}

/// 名称必须完全等于 interactive，前缀或后缀变体都不算
pub fn is_interactive(governor: &str) -> bool {
    governor == INTERACTIVE_GOVERNOR
}
