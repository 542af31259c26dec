use crate::offset::OffsetMinutes;
use chrono::{NaiveTime, Timelike};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const MINUTES_PER_DAY: i32 = 24 * 60;

const TIME_FORMAT: &str = "%H:%M";

#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[error("{0:?} is not a time of day in HH:MM form")]
pub struct TimeParseError(pub String);

/// A wall-clock time with minute precision, written as `HH:MM`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Builds a time from its hour and minute, `None` when out of range.
    ///
    /// # Examples
    /// ```
    /// use mission_libs::time::TimeOfDay;
    ///
    /// assert_eq!(TimeOfDay::new(9, 5).unwrap().to_string(), "09:05");
    /// assert!(TimeOfDay::new(24, 0).is_none());
    /// ```
    pub fn new(hour: u32, minute: u32) -> Option<TimeOfDay> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(TimeOfDay)
    }

    /// Minutes elapsed since midnight
    pub fn minutes(self) -> i32 {
        (self.0.hour() * 60 + self.0.minute()) as i32
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
            .map(TimeOfDay)
            .map_err(|_| TimeParseError(s.to_string()))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for TimeOfDay {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let minute = u.int_in_range(0..=(MINUTES_PER_DAY - 1) as u32)?;
        TimeOfDay::new(minute / 60, minute % 60).ok_or(arbitrary::Error::IncorrectFormat)
    }
}

/// Shifts a local time onto the UTC clock and returns its UTC minute-of-day.
///
/// Offsets the `UTC±HH:MM` labels describe stay within a day, so at most one
/// 24h correction happens. The euclidean remainder keeps the result inside
/// `[0, 1440)` for the oversized labels the pattern still accepts.
///
/// # Examples
/// ```
/// use mission_libs::time::{normalize, TimeOfDay};
///
/// // 14:00 at UTC+01:00 is 13:00 UTC
/// assert_eq!(normalize("14:00".parse().unwrap(), 60), 780);
/// // 00:30 at UTC+02:00 is 22:30 UTC the day before
/// assert_eq!(normalize("00:30".parse().unwrap(), 120), 1290);
/// ```
pub fn normalize(local: TimeOfDay, offset: OffsetMinutes) -> u16 {
    (local.minutes() - offset).rem_euclid(MINUTES_PER_DAY) as u16
}

/// Half-open `[start, end)` range of UTC minutes-of-day, repeating daily.
///
/// There is no wraparound handling: when the local start and end land on
/// different sides of UTC midnight, `start > end` and the window never
/// contains any minute.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct NormalizedWindow {
    pub start_minute: u16,
    pub end_minute: u16,
}

impl NormalizedWindow {
    pub fn new(start_minute: u16, end_minute: u16) -> NormalizedWindow {
        NormalizedWindow {
            start_minute,
            end_minute,
        }
    }

    /// Normalizes both ends of a local window with the same offset
    pub fn from_local(start: TimeOfDay, end: TimeOfDay, offset: OffsetMinutes) -> NormalizedWindow {
        NormalizedWindow::new(normalize(start, offset), normalize(end, offset))
    }

    /// # Examples
    /// ```
    /// use mission_libs::time::NormalizedWindow;
    ///
    /// let window = NormalizedWindow::new(780, 840);
    /// assert!(window.contains(780));
    /// assert!(!window.contains(840));
    /// assert!(!window.contains(779));
    /// ```
    pub fn contains(self, minute_of_day: u16) -> bool {
        minute_of_day >= self.start_minute && minute_of_day < self.end_minute
    }

    /// True when normalization pushed `start` past `end`
    pub fn is_wrapped(self) -> bool {
        self.start_minute > self.end_minute
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_prints_hh_mm() {
        assert_eq!(t("00:00").minutes(), 0);
        assert_eq!(t("23:59").minutes(), 1439);
        assert_eq!(t(" 07:15 ").to_string(), "07:15");
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("12:60".parse::<TimeOfDay>().is_err());
        assert!("noon".parse::<TimeOfDay>().is_err());
        assert!("".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn orders_like_the_clock() {
        assert!(t("09:00") < t("17:30"));
        assert!(t("10:00") > t("09:59"));
        assert_eq!(t("12:00"), t("12:00"));
    }

    #[test]
    fn serializes_as_text() {
        assert_eq!(serde_json::to_string(&t("08:05")).unwrap(), "\"08:05\"");
        assert_eq!(serde_json::from_str::<TimeOfDay>("\"21:45\"").unwrap(), t("21:45"));
        assert!(serde_json::from_str::<TimeOfDay>("\"9am\"").is_err());
    }

    #[test]
    fn normalizes_with_single_wrap() {
        assert_eq!(normalize(t("14:00"), 60), 780);
        assert_eq!(normalize(t("00:30"), 120), 1290);
        assert_eq!(normalize(t("22:00"), -180), 60);
        assert_eq!(normalize(t("12:00"), 0), 720);
        assert_eq!(normalize(t("23:59"), -(14 * 60)), 13 * 60 + 59);
    }

    #[test]
    fn oversized_offsets_stay_in_range() {
        assert_eq!(normalize(t("23:59"), -(99 * 60 + 99)), 278);
        assert!(normalize(t("00:00"), 99 * 60 + 99) < 1440);
    }

    /// Shifts with at most one 24h correction and no further wrapping
    fn single_wrap(local: TimeOfDay, offset: OffsetMinutes) -> i32 {
        let minutes = local.minutes() - offset;
        if minutes < 0 {
            minutes + MINUTES_PER_DAY
        } else if minutes >= MINUTES_PER_DAY {
            minutes - MINUTES_PER_DAY
        } else {
            minutes
        }
    }

    #[test]
    fn agrees_with_single_wrap_within_a_day() {
        for offset in (-(23 * 60 + 59)..=23 * 60 + 59).step_by(15) {
            for minute in (0..MINUTES_PER_DAY as u32).step_by(7) {
                let local = TimeOfDay::new(minute / 60, minute % 60).unwrap();
                assert_eq!(
                    normalize(local, offset) as i32,
                    single_wrap(local, offset),
                    "{} at offset {}",
                    local,
                    offset
                );
            }
        }
    }

    #[test]
    fn oversized_offsets_part_from_single_wrap() {
        let offset = 99 * 60 + 99;

        // A single correction leaves 09:00 at UTC+99:99 below zero, so such a
        // window could never match. The full remainder lands it at 04:21.
        assert_eq!(single_wrap(t("09:00"), offset), -4059);
        assert_eq!(normalize(t("09:00"), offset), 4 * 60 + 21);
        assert_eq!(
            NormalizedWindow::from_local(t("09:00"), t("10:00"), offset),
            NormalizedWindow::new(261, 321)
        );
    }

    #[test]
    fn window_is_half_open() {
        let window = NormalizedWindow::from_local(t("14:00"), t("15:00"), 60);
        assert_eq!(window, NormalizedWindow::new(780, 840));
        assert!(window.contains(780));
        assert!(window.contains(839));
        assert!(!window.contains(840));
        assert!(!window.contains(779));
    }

    #[test]
    fn asymmetric_wrap_never_contains() {
        // 01:00-03:00 at UTC+02:00 is 23:00-01:00 UTC
        let window = NormalizedWindow::from_local(t("01:00"), t("03:00"), 120);
        assert!(window.is_wrapped());
        assert!((0..1440).all(|minute| !window.contains(minute)));
    }
}
