//! DateTime display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS TZ`, in the system time zone
/// unless another zone is given.
pub struct LocalDateTime<'a> {
    timestamp: &'a Timestamp,
    zone: Option<TimeZone>,
}

impl<'a> LocalDateTime<'a> {
    pub fn new(timestamp: &'a Timestamp) -> Self {
        Self {
            timestamp,
            zone: None,
        }
    }

    pub fn in_zone(timestamp: &'a Timestamp, zone: TimeZone) -> Self {
        Self {
            timestamp,
            zone: Some(zone),
        }
    }
}

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let zone = self.zone.clone().unwrap_or_else(TimeZone::system);
        write!(
            f,
            "{}",
            self.timestamp
                .to_zoned(zone)
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}
