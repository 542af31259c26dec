use crate::participant::Participant;
use crate::roster::Roster;
use crate::time::NormalizedWindow;
use chrono::{DateTime, Duration, Timelike, Utc};
use itertools::Itertools;
use log::{debug, trace};

/// How many hourly slots, starting at the anchor, are considered
pub const LOOKAHEAD_HOURS: i64 = 24;

/// UTC minute-of-day of an instant, seconds dropped
pub fn minute_of_day(instant: DateTime<Utc>) -> u16 {
    (instant.hour() * 60 + instant.minute()) as u16
}

/// Whether the window covers the instant's time of day on the UTC clock.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use mission_libs::schedule::is_available;
/// use mission_libs::time::NormalizedWindow;
///
/// let window = NormalizedWindow::new(780, 840);
/// let at = |h, m| Utc.with_ymd_and_hms(2026, 10, 16, h, m, 0).unwrap();
///
/// assert!(is_available(window, at(13, 0)));
/// assert!(!is_available(window, at(14, 0)));
/// assert!(!is_available(window, at(12, 59)));
/// ```
pub fn is_available(window: NormalizedWindow, instant: DateTime<Utc>) -> bool {
    window.contains(minute_of_day(instant))
}

/// The hourly instants `anchor, anchor + 1h, ..., anchor + 23h`
pub fn candidates(anchor: DateTime<Utc>) -> impl Iterator<Item = DateTime<Utc>> + Clone {
    (0..LOOKAHEAD_HOURS).map(move |hour| anchor + Duration::hours(hour))
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridCell<'a> {
    pub name: &'a str,
    pub available: bool,
}

/// One hour of the overlap grid
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GridRow<'a> {
    pub instant: DateTime<Utc>,
    pub cells: Vec<GridCell<'a>>,
}

impl GridRow<'_> {
    /// `HH:MM` of the slot on the UTC clock
    pub fn label(&self) -> String {
        self.instant.format("%H:%M").to_string()
    }

    pub fn available_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.available).count()
    }
}

/// Builds the 24 hourly rows of the overlap grid, one cell per participant in
/// roster order.
///
/// Nothing is computed until the iterator is driven, and every call starts
/// over from the anchor.
pub fn build_grid(
    roster: &Roster,
    anchor: DateTime<Utc>,
) -> impl Iterator<Item = GridRow<'_>> + Clone {
    let windows = roster
        .iter()
        .map(|participant| (participant.name.as_str(), participant.window()))
        .collect_vec();

    candidates(anchor).map(move |instant| GridRow {
        instant,
        cells: windows
            .iter()
            .map(|&(name, window)| GridCell {
                name,
                available: is_available(window, instant),
            })
            .collect(),
    })
}

/// Picks the slot where the most participants are available.
///
/// Only a strictly higher count replaces the current best, so ties go to the
/// earliest slot. A slot nobody can attend never wins, which means an empty
/// roster, or one with no overlap with the next 24 hours, yields `None`.
pub fn suggest_best(roster: &Roster, anchor: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let windows = roster.iter().map(Participant::window).collect_vec();

    let (best, max_available) =
        candidates(anchor).fold((None, 0), |(best, max_available), instant| {
            let count = windows
                .iter()
                .filter(|&&window| is_available(window, instant))
                .count();
            trace!("{} has {} available", instant, count);

            if count > max_available {
                (Some(instant), count)
            } else {
                (best, max_available)
            }
        });

    debug!(
        "best slot from {}: {:?} with {} of {} available",
        anchor,
        best,
        max_available,
        windows.len()
    );
    best
}
