pub mod device;
pub mod ping;
pub mod query;

pub use device::DeviceKey;
pub use ping::{GroupedPingTimes, PingRecord, PingTimes};
pub use query::{DeviceTarget, NewPing, PingQuery};
