use std::fmt::Display;

/// Storage-assigned device key, allocated once per identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct DeviceKey(i64);

impl From<DeviceKey> for i64 {
    fn from(value: DeviceKey) -> Self {
        value.0
    }
}

impl Display for DeviceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}
