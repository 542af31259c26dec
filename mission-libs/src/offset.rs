use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// Signed distance, in minutes, between a local clock and UTC.
pub type OffsetMinutes = i32;

static UTC_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"UTC([+-])([0-9]{2}):([0-9]{2})").expect("literal pattern"));

/// Reads the fixed `UTC<sign><HH>:<MM>` pattern out of a timezone label.
///
/// The pattern may sit anywhere in the label, so decorated labels such as
/// `"(UTC+05:30) Kolkata"` still resolve. Labels without the pattern resolve
/// to `0` rather than failing.
///
/// # Examples
/// ```
/// use mission_libs::offset::resolve_offset;
///
/// assert_eq!(resolve_offset("UTC+05:30"), 330);
/// assert_eq!(resolve_offset("UTC-03:00"), -180);
/// assert_eq!(resolve_offset("garbage"), 0);
/// ```
pub fn resolve_offset(label: &str) -> OffsetMinutes {
    let captures = match UTC_LABEL.captures(label) {
        Some(captures) => captures,
        None => {
            debug!("timezone label {:?} has no UTC offset, using 0", label);
            return 0;
        }
    };

    let sign = if &captures[1] == "+" { 1 } else { -1 };
    // Both groups are exactly two ASCII digits, parsing cannot fail
    let hours: OffsetMinutes = captures[2].parse().unwrap_or(0);
    let minutes: OffsetMinutes = captures[3].parse().unwrap_or(0);

    sign * (hours * 60 + minutes)
}
