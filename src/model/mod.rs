pub mod boost;
pub mod device_tuning;
pub mod hint;
pub mod hint_action;
pub mod interaction;
pub mod power_hal;
pub mod profile;
pub mod tunable;
pub mod video_encode;
pub mod vr_hal;
