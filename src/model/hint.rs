/// 上层下发的提示，按类型携带各自的负载
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hint {
    /// 交互时长（毫秒），缺省 500ms
    Interaction(Option<i32>),
    Launch,
    /// 加速时长（微秒）
    CpuBoost(i32),
    /// 原始元数据字符串
    VideoEncode(Option<String>),
    SustainedPerformance(Option<bool>),
    VrMode(Option<bool>),
    SetProfile(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintResult {
    Handled,
    NotHandled,
}
