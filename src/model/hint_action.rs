use std::collections::HashMap;

use log::{debug, error};

use crate::model::tunable::{SysfsTunables, TunableKey, TunablePair};

/// 独立可撤销的一组节点写入的标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub u32);

impl ActionId {
    pub const INTERACTION: ActionId = ActionId(0x0100);
    pub const LAUNCH: ActionId = ActionId(0x0200);
    pub const CPU_BOOST: ActionId = ActionId(0x0300);
    pub const VIDEO_ENCODE: ActionId = ActionId(0x0A00);
    pub const DISPLAY_STATE: ActionId = ActionId(0x0B00);
    pub const DEFAULT_PROFILE: ActionId = ActionId(0xFF00);

    /// 视频编码提示可自带 hint_id，但只能落在 0x0A00..=0x0AFF
    pub fn is_video_encode(self) -> bool {
        (0x0A00..=0x0AFF).contains(&self.0)
    }
}

/// 按 ActionId 记录当前生效的表，保证每张表只被撤销一次
///
/// 同一节点被多个动作持有时写入合并值（见 [`TunableKey::preference`]），
/// 短时加速因此不会削弱档位已设定的更激进取值。
pub struct HintActionEngine {
    tunables: SysfsTunables,
    active: HashMap<ActionId, Vec<TunablePair>>,
}

impl HintActionEngine {
    pub fn new(tunables: SysfsTunables) -> Self {
        Self {
            tunables,
            active: HashMap::new(),
        }
    }

    pub fn tunables(&self) -> &SysfsTunables {
        &self.tunables
    }

    pub fn apply_action(&mut self, id: ActionId, table: &[TunablePair]) {
        if self.active.contains_key(&id) {
            debug!("Action {:#06x} already active, undoing before re-apply", id.0);
            self.undo_action(id);
        }

        self.active.insert(id, table.to_vec());

        for &(key, _) in table {
            let Some(value) = self.resolved(key) else {
                continue;
            };
            if let Err(e) = self.tunables.write(key, value) {
                error!("Action {:#06x}: {e}", id.0);
            }
        }
        debug!("Action {:#06x} applied ({} tunables)", id.0, table.len());
    }

    pub fn undo_action(&mut self, id: ActionId) {
        let Some(table) = self.active.remove(&id) else {
            return;
        };

        for &(key, _) in &table {
            let result = match self.resolved(key) {
                Some(value) => self.tunables.write(key, value),
                None => self.tunables.restore(key),
            };
            if let Err(e) = result {
                error!("Undo {:#06x}: {e}", id.0);
            }
        }
        debug!("Action {:#06x} undone", id.0);
    }

    /// 所有仍生效的动作对该键的合并取值
    fn resolved(&self, key: TunableKey) -> Option<i32> {
        let preference = key.preference();
        self.active
            .values()
            .filter_map(|table| table.iter().find(|(k, _)| *k == key).map(|&(_, v)| v))
            .reduce(|a, b| preference.pick(a, b))
    }

    pub fn is_active(&self, id: ActionId) -> bool {
        self.active.contains_key(&id)
    }

    pub fn active_table(&self, id: ActionId) -> Option<&[TunablePair]> {
        self.active.get(&id).map(Vec::as_slice)
    }
}
