use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Human-readable form of the stamp layout every timed log line carries.
///
/// Matches the Go reference layout `2006/01/02 15:04:05.000 MST`: a slash
/// separated date, a time with exactly three fractional digits, and a named
/// zone.
pub const STAMP_LAYOUT: &str = "YYYY/MM/DD HH:MM:SS.mmm ZONE";

/// chrono format for the date and time tokens of a stamp.
const DATE_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.3f";

/// Point in time with nanosecond precision, counted from the UNIX epoch.
///
/// `Stamp::MIN` and `Stamp::MAX` double as the "nothing observed yet" and
/// "+infinity" sentinels used by the merge watermark.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stamp(i64);

impl Stamp {
    /// Smallest representable stamp.
    pub const MIN: Self = Self(i64::MIN);
    /// Largest representable stamp.
    pub const MAX: Self = Self(i64::MAX);
    /// 1970-01-01 00:00:00 UTC.
    pub const EPOCH: Self = Self(0);

    /// Create a stamp from nanoseconds since the epoch.
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Nanoseconds since the epoch.
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// Whole seconds since the epoch, rounded towards negative infinity.
    pub const fn epoch_seconds(self) -> i64 {
        self.0.div_euclid(1_000_000_000)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self(i64::try_from(nanos).unwrap_or(i64::MAX))
    }

    /// Step back by `duration`, clamping at [`Stamp::MIN`].
    pub fn saturating_sub(self, duration: Duration) -> Self {
        let nanos = i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX);
        Self(self.0.saturating_sub(nanos))
    }

    /// Parse a stamp in the [`STAMP_LAYOUT`] format.
    ///
    /// The text must consist of exactly three whitespace-separated tokens.
    /// Zone abbreviations resolve to a zero UTC offset; `GMT+H` and `GMT-H`
    /// apply the given whole-hour offset.
    pub fn parse(text: &str) -> Result<Self, TypeError> {
        let mut tokens = text.split_whitespace();
        let (Some(date), Some(time), Some(zone), None) =
            (tokens.next(), tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(TypeError::InvalidStamp {
                text: text.to_string(),
                reason: format!("expected {STAMP_LAYOUT}"),
            });
        };

        if !has_shape(date, "dddd/dd/dd") || !has_shape(time, "dd:dd:dd.ddd") {
            return Err(TypeError::InvalidStamp {
                text: text.to_string(),
                reason: format!("expected {STAMP_LAYOUT}"),
            });
        }
        if time.get(6..8) == Some("60") {
            return Err(TypeError::InvalidStamp {
                text: text.to_string(),
                reason: "second out of range".into(),
            });
        }

        let offset = zone_offset(zone)?;
        let naive = NaiveDateTime::parse_from_str(&format!("{date} {time}"), DATE_TIME_FORMAT)
            .map_err(|e| TypeError::InvalidStamp {
                text: text.to_string(),
                reason: e.to_string(),
            })?;

        naive
            .and_local_timezone(offset)
            .single()
            .and_then(|dt| dt.timestamp_nanos_opt())
            .map(Self)
            .ok_or_else(|| TypeError::StampOutOfRange(text.to_string()))
    }
}

/// Check `token` against a template where `d` stands for an ASCII digit and
/// every other byte must match literally.
fn has_shape(token: &str, template: &str) -> bool {
    token.len() == template.len()
        && token
            .bytes()
            .zip(template.bytes())
            .all(|(b, t)| if t == b'd' { b.is_ascii_digit() } else { b == t })
}

/// Resolve a zone token to its UTC offset.
fn zone_offset(zone: &str) -> Result<FixedOffset, TypeError> {
    let invalid = || TypeError::InvalidZone(zone.to_string());

    if let Some(rest) = zone.strip_prefix("GMT").filter(|r| !r.is_empty()) {
        let (sign, hours) = if let Some(hours) = rest.strip_prefix('+') {
            (1, hours)
        } else if let Some(hours) = rest.strip_prefix('-') {
            (-1, hours)
        } else {
            return Err(invalid());
        };
        if hours.is_empty() || hours.len() > 2 || !hours.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        if hours > 23 {
            return Err(invalid());
        }
        return FixedOffset::east_opt(sign * hours * 3600).ok_or_else(invalid);
    }

    if (3..=5).contains(&zone.len()) && zone.bytes().all(|b| b.is_ascii_uppercase()) {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    Err(invalid())
}

impl fmt::Debug for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stamp({})", self.0)
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::MIN => write!(f, "-inf"),
            Self::MAX => write!(f, "+inf"),
            Self(nanos) => write!(
                f,
                "{} UTC",
                Utc.timestamp_nanos(nanos).format(DATE_TIME_FORMAT)
            ),
        }
    }
}
