use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use log::debug;

use crate::model::{
    hint_action::{ActionId, HintActionEngine},
    tunable::TunablePair,
};

/// 短时加速：按类型占用独立的 ActionId，到期后撤销
#[derive(Debug, Default)]
pub struct BoostTracker {
    deadlines: HashMap<ActionId, Instant>,
}

impl BoostTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同类型的新加速替换旧加速并重置到期时间
    pub fn boost(
        &mut self,
        engine: &mut HintActionEngine,
        id: ActionId,
        duration_ms: i32,
        table: &[TunablePair],
        now: Instant,
    ) {
        let duration = Duration::from_millis(u64::try_from(duration_ms).unwrap_or(0));
        engine.apply_action(id, table);
        self.deadlines.insert(id, now + duration);
        debug!("Boost {:#06x} for {}ms", id.0, duration.as_millis());
    }

    /// 撤销所有已到期的加速，返回撤销数量
    pub fn expire(&mut self, engine: &mut HintActionEngine, now: Instant) -> usize {
        let expired: Vec<ActionId> = self
            .deadlines
            .iter()
            .filter(|&(_, &deadline)| deadline <= now)
            .map(|(&id, _)| id)
            .collect();

        for id in &expired {
            self.deadlines.remove(id);
            engine.undo_action(*id);
            debug!("Boost {:#06x} expired", id.0);
        }

        expired.len()
    }

    pub fn deadline(&self, id: ActionId) -> Option<Instant> {
        self.deadlines.get(&id).copied()
    }
}
