use crate::common::{ApiError, ApiResult};
use crate::utils::time_parser::{self, DayWindow};

/// Identifier reserved for queries spanning every device.
pub const ALL_DEVICES: &str = "all";

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DeviceTarget {
    All,
    Device(String),
}

impl DeviceTarget {
    fn from_segment(segment: &str) -> Self {
        if segment == ALL_DEVICES {
            DeviceTarget::All
        } else {
            DeviceTarget::Device(segment.to_string())
        }
    }
}

/// A validated read request, built once from the raw path segments.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PingQuery {
    ByDate {
        target: DeviceTarget,
        window: DayWindow,
    },
    ByRange {
        target: DeviceTarget,
        from: i64,
        to: i64,
    },
}

impl PingQuery {
    pub fn by_date(device_id: &str, date: &str) -> ApiResult<Self> {
        let device_id = require_segment("device_id", device_id)?;
        let date = require_segment("date", date)?;
        let window = DayWindow::parse(date).map_err(ApiError::InvalidTimeFormat)?;
        Ok(Self::ByDate {
            target: DeviceTarget::from_segment(device_id),
            window,
        })
    }

    pub fn by_range(device_id: &str, from: &str, to: &str) -> ApiResult<Self> {
        let device_id = require_segment("device_id", device_id)?;
        let from = require_segment("from", from)?;
        let to = require_segment("to", to)?;
        Ok(Self::ByRange {
            target: DeviceTarget::from_segment(device_id),
            from: time_parser::parse_time_endpoint(from).map_err(ApiError::InvalidTimeFormat)?,
            to: time_parser::parse_time_endpoint(to).map_err(ApiError::InvalidTimeFormat)?,
        })
    }
}

/// A validated ping to append.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NewPing {
    pub device_id: String,
    pub time: i64,
}

impl NewPing {
    pub fn from_segments(device_id: &str, epoch_time: &str) -> ApiResult<Self> {
        let device_id = require_segment("device_id", device_id)?;
        let epoch_time = require_segment("epoch_time", epoch_time)?;
        let time = epoch_time.parse::<i64>().map_err(|_| {
            ApiError::InvalidTimeFormat(time_parser::TimeFormatError::new(epoch_time))
        })?;
        Ok(Self {
            device_id: device_id.to_string(),
            time,
        })
    }
}

/// Rejects empty or blank segments; anything else is passed on exactly as sent.
pub fn require_segment<'a>(name: &'static str, value: &'a str) -> ApiResult<&'a str> {
    if value.trim().is_empty() {
        return Err(ApiError::MissingInput(name));
    }
    Ok(value)
}
