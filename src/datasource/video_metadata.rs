use log::debug;

use crate::{
    error::{HalError, HalResult},
    model::hint_action::ActionId,
};

/// 视频编码提示携带的元数据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoEncodeMetadata {
    pub hint_id: ActionId,
    pub state: i32,
}

impl Default for VideoEncodeMetadata {
    fn default() -> Self {
        Self {
            hint_id: ActionId::VIDEO_ENCODE,
            state: -1,
        }
    }
}

fn parse_number(key: &str, value: &str) -> HalResult<i64> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => value.parse::<i64>(),
    };
    parsed.map_err(|e| HalError::Parse(format!("{key}={value}: {e}")))
}

/// 解析 "state=1;hint_id=2560" 形式的元数据，未知键忽略
pub fn parse_video_encode_metadata(metadata: &str) -> HalResult<VideoEncodeMetadata> {
    let mut parsed = VideoEncodeMetadata::default();

    for token in metadata.split(';').map(str::trim).filter(|t| !t.is_empty()) {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| HalError::Parse(format!("expected key=value, got '{token}'")))?;
        let (key, value) = (key.trim(), value.trim());

        match key {
            "state" => {
                parsed.state = i32::try_from(parse_number(key, value)?)
                    .map_err(|e| HalError::Parse(format!("state={value}: {e}")))?;
            }
            "hint_id" => {
                parsed.hint_id = ActionId(
                    u32::try_from(parse_number(key, value)?)
                        .map_err(|e| HalError::Parse(format!("hint_id={value}: {e}")))?,
                );
            }
            _ => debug!("Ignoring metadata key {key}"),
        }
    }

    Ok(parsed)
}
