use crate::countdown::CountdownStatus;
use crate::participant::{Participant, SubmitError, SubmitForm};
use crate::roster::{ConfirmedSet, Roster};
use crate::schedule::{build_grid, suggest_best, GridRow};
use crate::store::{
    KeyValueStore, StoreError, AVAILABILITIES_KEY, CONFIRMED_USERS_KEY, NEXT_MISSION_TIME_KEY,
};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ConfirmError {
    #[error("{name} is not registered. Submit your availability first.")]
    NotRegistered { name: String },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Confirmation {
    Confirmed,
    AlreadyConfirmed,
    /// No name was given, nothing to do
    Skipped,
}

/// What a successful submission changed
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Submission {
    pub participant: Participant,
    pub replaced: bool,
    /// `None` when nobody overlaps with the next 24 hours; the previous
    /// suggestion is kept in that case
    pub suggestion: Option<DateTime<Utc>>,
}

/// Everything the board shows: who is available when, who confirmed, and
/// the suggested mission time.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Board {
    pub roster: Roster,
    pub confirmed: ConfirmedSet,
    pub next_mission: Option<DateTime<Utc>>,
}

impl Board {
    pub fn new() -> Board {
        Board::default()
    }

    /// Reads the three board keys, treating absent ones as empty
    pub fn load<S: KeyValueStore>(store: &S) -> Result<Board, StoreError> {
        let roster = read_json(store, AVAILABILITIES_KEY)?.unwrap_or_default();
        let confirmed = read_json(store, CONFIRMED_USERS_KEY)?.unwrap_or_default();
        let next_mission = match store.get(NEXT_MISSION_TIME_KEY)? {
            Some(raw) if !raw.trim().is_empty() => Some(parse_instant(&raw)?),
            _ => None,
        };

        let board = Board {
            roster,
            confirmed,
            next_mission,
        };
        debug!(
            "loaded board with {} participants, {} confirmed, next mission {:?}",
            board.roster.len(),
            board.confirmed.len(),
            board.next_mission
        );
        Ok(board)
    }

    pub fn save<S: KeyValueStore>(&self, store: &mut S) -> Result<(), StoreError> {
        self.save_roster(store)?;
        self.save_confirmed(store)?;
        self.save_next_mission(store)
    }

    pub fn save_roster<S: KeyValueStore>(&self, store: &mut S) -> Result<(), StoreError> {
        write_json(store, AVAILABILITIES_KEY, &self.roster)
    }

    pub fn save_confirmed<S: KeyValueStore>(&self, store: &mut S) -> Result<(), StoreError> {
        write_json(store, CONFIRMED_USERS_KEY, &self.confirmed)
    }

    /// Does nothing while there is no suggestion
    pub fn save_next_mission<S: KeyValueStore>(&self, store: &mut S) -> Result<(), StoreError> {
        match self.next_mission {
            Some(instant) => store.set(
                NEXT_MISSION_TIME_KEY,
                &instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            None => Ok(()),
        }
    }

    /// Validates the form, upserts the participant and looks for a better
    /// mission time from `now` on.
    ///
    /// Nothing changes when validation fails.
    pub fn submit(
        &mut self,
        form: &SubmitForm,
        now: DateTime<Utc>,
    ) -> Result<Submission, SubmitError> {
        let participant = form.validate()?;
        let replaced = self.roster.upsert(participant.clone()).is_some();
        info!(
            "{} {} availability {}-{} ({})",
            if replaced { "updated" } else { "added" },
            participant.name,
            participant.start_time,
            participant.end_time,
            participant.timezone
        );

        let suggestion = suggest_best(&self.roster, now);
        match suggestion {
            Some(instant) => {
                info!("next mission suggested at {}", instant);
                self.next_mission = Some(instant);
            }
            None => debug!("no overlap in the next 24h, keeping {:?}", self.next_mission),
        }

        Ok(Submission {
            participant,
            replaced,
            suggestion,
        })
    }

    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use mission_libs::board::{Board, Confirmation, ConfirmError};
    /// use mission_libs::participant::SubmitForm;
    ///
    /// let mut board = Board::new();
    /// board
    ///     .submit(&SubmitForm::new("ana", "UTC+00:00", "09:00", "10:00"), Utc::now())
    ///     .unwrap();
    ///
    /// assert_eq!(board.confirm("ana"), Ok(Confirmation::Confirmed));
    /// assert_eq!(board.confirm("ana"), Ok(Confirmation::AlreadyConfirmed));
    /// assert!(matches!(board.confirm("bo"), Err(ConfirmError::NotRegistered { .. })));
    /// ```
    pub fn confirm(&mut self, name: &str) -> Result<Confirmation, ConfirmError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Confirmation::Skipped);
        }

        if !self.roster.contains(name) {
            return Err(ConfirmError::NotRegistered {
                name: name.to_string(),
            });
        }

        if self.confirmed.insert(name) {
            info!("{} confirmed", name);
            Ok(Confirmation::Confirmed)
        } else {
            Ok(Confirmation::AlreadyConfirmed)
        }
    }

    pub fn grid(&self, now: DateTime<Utc>) -> impl Iterator<Item = GridRow<'_>> + Clone {
        build_grid(&self.roster, now)
    }

    pub fn countdown(&self, now: DateTime<Utc>) -> Option<CountdownStatus> {
        self.next_mission.map(|target| CountdownStatus::at(target, now))
    }
}

fn read_json<S, T>(store: &S, key: &'static str) -> Result<Option<T>, StoreError>
where
    S: KeyValueStore,
    T: DeserializeOwned,
{
    match store.get(key)? {
        None => Ok(None),
        // `null` reads the same as a missing key
        Some(raw) => serde_json::from_str::<Option<T>>(&raw).map_err(|err| {
            StoreError::Malformed {
                key,
                reason: err.to_string(),
            }
        }),
    }
}

fn write_json<S, T>(store: &mut S, key: &'static str, value: &T) -> Result<(), StoreError>
where
    S: KeyValueStore,
    T: Serialize,
{
    let raw = serde_json::to_string(value).map_err(|err| StoreError::Malformed {
        key,
        reason: err.to_string(),
    })?;
    store.set(key, &raw)
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| StoreError::Malformed {
            key: NEXT_MISSION_TIME_KEY,
            reason: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, hour, minute, 0).unwrap()
    }

    fn form(name: &str, tz: &str, start: &str, end: &str) -> SubmitForm {
        SubmitForm::new(name, tz, start, end)
    }

    #[test]
    fn resubmitting_replaces_the_entry() {
        let mut board = Board::new();
        let first = board
            .submit(&form("ana", "UTC+01:00", "09:00", "10:00"), at(6, 0))
            .unwrap();
        assert!(!first.replaced);
        assert_eq!(first.suggestion, Some(at(8, 0)));

        let second = board
            .submit(&form("ana", "UTC-03:00", "11:00", "12:00"), at(6, 0))
            .unwrap();
        assert!(second.replaced);
        assert_eq!(board.roster.len(), 1);
        assert_eq!(board.roster.get("ana").unwrap().timezone, "UTC-03:00");
        assert_eq!(board.next_mission, Some(at(14, 0)));
    }

    #[test]
    fn invalid_submission_changes_nothing() {
        let mut board = Board::new();
        board
            .submit(&form("ana", "UTC+00:00", "09:00", "10:00"), at(6, 0))
            .unwrap();
        let before = board.clone();

        assert!(board
            .submit(&form("ana", "UTC+00:00", "12:00", "11:00"), at(6, 0))
            .is_err());
        assert!(board
            .submit(&form("", "UTC+00:00", "09:00", "10:00"), at(6, 0))
            .is_err());
        assert_eq!(board, before);
    }

    #[test]
    fn submission_without_overlap_keeps_previous_suggestion() {
        let mut board = Board::new();
        board
            .submit(&form("ana", "UTC+00:00", "09:00", "10:00"), at(6, 0))
            .unwrap();
        assert_eq!(board.next_mission, Some(at(9, 0)));

        // 01:00-03:00 at UTC+02:00 wraps past UTC midnight and never matches
        let submission = board
            .submit(&form("ana", "UTC+02:00", "01:00", "03:00"), at(6, 0))
            .unwrap();
        assert_eq!(submission.suggestion, None);
        assert_eq!(board.next_mission, Some(at(9, 0)));

        let mut lonely = Board::new();
        lonely
            .submit(&form("bo", "UTC+02:00", "01:00", "03:00"), at(6, 0))
            .unwrap();
        assert_eq!(lonely.next_mission, None);
    }

    #[test]
    fn confirmation_needs_registration() {
        let mut board = Board::new();
        assert_eq!(
            board.confirm("ghost"),
            Err(ConfirmError::NotRegistered {
                name: "ghost".to_string()
            })
        );
        assert!(board.confirmed.is_empty());

        board
            .submit(&form("ana", "UTC+00:00", "09:00", "10:00"), at(6, 0))
            .unwrap();
        assert_eq!(board.confirm("  "), Ok(Confirmation::Skipped));
        assert_eq!(board.confirm(" ana "), Ok(Confirmation::Confirmed));
        assert_eq!(board.confirm("ana"), Ok(Confirmation::AlreadyConfirmed));
        assert_eq!(board.confirmed.len(), 1);
    }

    #[test]
    fn saves_and_loads_all_keys() {
        let mut store = MemoryStore::new();
        let mut board = Board::new();
        board
            .submit(&form("ana", "UTC+05:30", "14:30", "16:00"), at(6, 0))
            .unwrap();
        board.confirm("ana").unwrap();
        board.save(&mut store).unwrap();

        assert_eq!(
            store.get(NEXT_MISSION_TIME_KEY).unwrap().as_deref(),
            Some("2026-10-16T09:00:00.000Z")
        );
        assert_eq!(
            store.get(CONFIRMED_USERS_KEY).unwrap().as_deref(),
            Some(r#"["ana"]"#)
        );
        assert_eq!(Board::load(&store).unwrap(), board);
    }

    #[test]
    fn loads_browser_written_values() {
        let mut store = MemoryStore::new();
        store
            .set(
                AVAILABILITIES_KEY,
                r#"[{"name":"ana","timezone":"UTC-03:00","startTime":"08:00","endTime":"09:30"}]"#,
            )
            .unwrap();
        store.set(CONFIRMED_USERS_KEY, "null").unwrap();
        store
            .set(NEXT_MISSION_TIME_KEY, "2026-10-16T11:00:00.000Z")
            .unwrap();

        let board = Board::load(&store).unwrap();
        assert_eq!(board.roster.len(), 1);
        assert!(board.confirmed.is_empty());
        assert_eq!(board.next_mission, Some(at(11, 0)));
        assert_eq!(
            board.countdown(at(10, 0)).unwrap().to_string(),
            "Next mission in 1h 0m 0s"
        );
        assert_eq!(board.countdown(at(12, 0)), Some(CountdownStatus::Begun));
    }

    #[test]
    fn empty_store_loads_empty_board() {
        let board = Board::load(&MemoryStore::new()).unwrap();
        assert_eq!(board, Board::new());
        assert_eq!(board.countdown(at(0, 0)), None);
    }

    #[test]
    fn malformed_values_are_reported() {
        let mut store = MemoryStore::new();
        store.set(AVAILABILITIES_KEY, "{").unwrap();
        assert!(matches!(
            Board::load(&store),
            Err(StoreError::Malformed {
                key: AVAILABILITIES_KEY,
                ..
            })
        ));

        let mut store = MemoryStore::new();
        store.set(NEXT_MISSION_TIME_KEY, "tomorrow").unwrap();
        assert!(matches!(
            Board::load(&store),
            Err(StoreError::Malformed {
                key: NEXT_MISSION_TIME_KEY,
                ..
            })
        ));
    }
}
