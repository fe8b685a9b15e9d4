use std::time::{Duration, Instant};

use log::debug;

pub const DEFAULT_INTERACTION_MS: i32 = 500;
pub const MAX_ELAPSED: Duration = Duration::from_millis(750);
pub const MIN_BOOST_INTERVAL: Duration = Duration::from_millis(250);
pub const COALESCE_DURATION_MS: i32 = 750;
pub const FLING_DURATION_MS: i32 = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostKind {
    Interaction,
    Fling,
}

/// 交互加速节流：短时间内的短请求合并到正在生效的加速窗口
#[derive(Debug, Default)]
pub struct InteractionThrottle {
    last_boost: Option<Instant>,
}

impl InteractionThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 返回 None 表示该请求被合并
    pub fn evaluate(&mut self, duration_ms: i32, now: Instant) -> Option<BoostKind> {
        let elapsed = self
            .last_boost
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(MAX_ELAPSED)
            .min(MAX_ELAPSED);

        if elapsed < MIN_BOOST_INTERVAL && duration_ms <= COALESCE_DURATION_MS {
            debug!(
                "Interaction {duration_ms}ms coalesced ({}ms since last boost)",
                elapsed.as_millis()
            );
            return None;
        }

        self.last_boost = Some(now);

        if duration_ms >= FLING_DURATION_MS {
            Some(BoostKind::Fling)
        } else {
            Some(BoostKind::Interaction)
        }
    }

    pub fn last_boost(&self) -> Option<Instant> {
        self.last_boost
    }
}
