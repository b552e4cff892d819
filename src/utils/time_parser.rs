use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

pub const SECONDS_PER_DAY: i64 = 60 * 60 * 24;

/// Date-time layouts accepted by the permissive parser, tried in order.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d %B %Y %H:%M:%S",
    "%d %B %Y %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d %B %Y", "%B %d, %Y", "%B %d %Y"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid time format: '{0}'")]
pub struct TimeFormatError(String);

impl TimeFormatError {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

/// Half-open `[from, to)` window covering one calendar day.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DayWindow {
    pub from: i64,
    pub to: i64,
}

impl DayWindow {
    /// Parses a strict `YYYY-MM-DD` date as the day starting at local midnight.
    pub fn parse(raw: &str) -> Result<Self, TimeFormatError> {
        Self::parse_in(raw, &Local)
    }

    pub fn parse_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Result<Self, TimeFormatError> {
        let date = parse_iso_date(raw).ok_or_else(|| TimeFormatError::new(raw))?;
        let from = midnight_of(date, tz).ok_or_else(|| TimeFormatError::new(raw))?;
        Ok(Self {
            from,
            to: from + SECONDS_PER_DAY,
        })
    }
}

/// Matches exactly `YYYY-MM-DD` with a year in 1000..=9999 and a day that
/// exists in the calendar, leap years included.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' || bytes[0] == b'0' {
        return None;
    }
    if ![0, 1, 2, 3, 5, 6, 8, 9]
        .iter()
        .all(|&ix| bytes[ix].is_ascii_digit())
    {
        return None;
    }
    let year = raw[0..4].parse::<i32>().ok()?;
    let month = raw[5..7].parse::<u32>().ok()?;
    let day = raw[8..10].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Normalizes a range endpoint into epoch seconds.
///
/// Classification order: strict ISO calendar date (local midnight), plain
/// integer (taken as epoch seconds as-is), then a permissive date-time parse
/// where missing components default to `1970-01-01 00:00:00` local time.
pub fn parse_time_endpoint(raw: &str) -> Result<i64, TimeFormatError> {
    parse_time_endpoint_in(raw, &Local)
}

pub fn parse_time_endpoint_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Result<i64, TimeFormatError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(TimeFormatError::new(raw));
    }
    if let Some(date) = parse_iso_date(value) {
        return midnight_of(date, tz).ok_or_else(|| TimeFormatError::new(raw));
    }
    if let Ok(epoch) = value.parse::<i64>() {
        return Ok(epoch);
    }
    parse_loose(value, tz).ok_or_else(|| TimeFormatError::new(raw))
}

fn parse_loose<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.timestamp());
    }
    if let Some(dt) = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return local_epoch(&dt, tz);
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
    {
        return midnight_of(date, tz);
    }
    let time = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(value, fmt).ok())?;
    local_epoch(&NaiveDate::from_ymd_opt(1970, 1, 1)?.and_time(time), tz)
}

fn midnight_of<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<i64> {
    local_epoch(&date.and_hms_opt(0, 0, 0)?, tz)
}

// Ambiguous local times (DST fold) resolve to the earlier instant.
fn local_epoch<Tz: TimeZone>(dt: &NaiveDateTime, tz: &Tz) -> Option<i64> {
    tz.from_local_datetime(dt).earliest().map(|it| it.timestamp())
}
