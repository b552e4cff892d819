use crate::models::DeviceKey;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PingRecord {
    pub device_id: DeviceKey,
    pub time: i64,
}

/// Timestamps grouped by device identifier. Devices without a ping in the
/// queried range are absent rather than mapped to an empty list.
pub type GroupedPingTimes = BTreeMap<String, Vec<i64>>;

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
#[serde(untagged)]
pub enum PingTimes {
    Device(Vec<i64>),
    Grouped(GroupedPingTimes),
}
