//! What the device reported about itself.

use flarm_proto::{Heartbeat, SelfTest};

/// Versions and self test result, kept until the source disconnects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    pub hardware_version: Option<String>,
    pub software_version: Option<String>,
    pub obstacle_db_version: Option<String>,
    pub self_test: Option<SelfTest>,
    /// Status from the most recent heartbeat.
    pub status: Option<Heartbeat>,
}

impl DeviceInfo {
    /// Store `value` into `slot`, returning whether it changed.
    pub(crate) fn update(slot: &mut Option<String>, value: &str) -> bool {
        if slot.as_deref() == Some(value) {
            return false;
        }
        *slot = Some(value.to_owned());
        true
    }
}
