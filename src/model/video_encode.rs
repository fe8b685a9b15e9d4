use std::path::Path;

use log::{error, info, warn};

use crate::{
    datasource::{
        governor::{current_governor, is_interactive},
        video_metadata::parse_video_encode_metadata,
    },
    model::{hint::HintResult, hint_action::HintActionEngine, profile::VIDEO_ENCODE},
};

/// 仅在 interactive 调频器下应用/撤销视频编码表
pub fn process_video_encode_hint(
    engine: &mut HintActionEngine,
    root: &Path,
    metadata: Option<&str>,
) -> HintResult {
    let governor = match current_governor(root) {
        Ok(g) => g,
        Err(e) => {
            error!("Can't obtain scaling governor: {e}");
            return HintResult::NotHandled;
        }
    };

    let Some(metadata) = metadata else {
        return HintResult::NotHandled;
    };

    let metadata = match parse_video_encode_metadata(metadata) {
        Ok(m) => m,
        Err(e) => {
            error!("Error occurred while parsing metadata: {e}");
            return HintResult::NotHandled;
        }
    };

    if !metadata.hint_id.is_video_encode() {
        warn!("Rejecting video encode hint_id {:#06x}", metadata.hint_id.0);
        return HintResult::NotHandled;
    }

    if !is_interactive(&governor) {
        return HintResult::NotHandled;
    }

    match metadata.state {
        1 => {
            engine.apply_action(metadata.hint_id, VIDEO_ENCODE);
            info!("Video Encode hint start");
            HintResult::Handled
        }
        0 => {
            engine.undo_action(metadata.hint_id);
            info!("Video Encode hint stop");
            HintResult::Handled
        }
        _ => HintResult::NotHandled,
    }
}
