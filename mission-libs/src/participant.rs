use crate::offset::{resolve_offset, OffsetMinutes};
use crate::time::{NormalizedWindow, TimeOfDay, TimeParseError};
use log::trace;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum SubmitError {
    #[error("Please fill in every field ({field} is missing)")]
    MissingField { field: &'static str },
    #[error("Invalid {field}: {source}")]
    InvalidTime {
        field: &'static str,
        source: TimeParseError,
    },
    #[error("The end time ({end}) must be after the start time ({start})")]
    EndNotAfterStart { start: TimeOfDay, end: TimeOfDay },
}

/// Raw strings as typed into the availability form.
#[derive(Debug, Clone, Default)]
pub struct SubmitForm {
    pub name: String,
    pub timezone: String,
    pub start_time: String,
    pub end_time: String,
}

impl SubmitForm {
    pub fn new(name: &str, timezone: &str, start_time: &str, end_time: &str) -> SubmitForm {
        SubmitForm {
            name: name.to_string(),
            timezone: timezone.to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
        }
    }

    /// Checks the form and turns it into a `Participant`.
    ///
    /// # Examples
    /// ```
    /// use mission_libs::participant::{SubmitError, SubmitForm};
    ///
    /// let user = SubmitForm::new(" ana ", "UTC+01:00", "09:00", "17:00")
    ///     .validate()
    ///     .unwrap();
    /// assert_eq!(user.name, "ana");
    ///
    /// assert!(matches!(
    ///     SubmitForm::new("ana", "UTC+01:00", "17:00", "09:00").validate(),
    ///     Err(SubmitError::EndNotAfterStart { .. })
    /// ));
    /// ```
    pub fn validate(&self) -> Result<Participant, SubmitError> {
        let name = required("name", &self.name)?;
        let timezone = required("timezone", &self.timezone)?;
        let start_time = required("start time", &self.start_time)?;
        let end_time = required("end time", &self.end_time)?;

        let start_time = parse_time("start time", start_time)?;
        let end_time = parse_time("end time", end_time)?;

        if start_time >= end_time {
            return Err(SubmitError::EndNotAfterStart {
                start: start_time,
                end: end_time,
            });
        }

        Ok(Participant::new(name, timezone, start_time, end_time))
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, SubmitError> {
    let value = value.trim();
    if value.is_empty() {
        Err(SubmitError::MissingField { field })
    } else {
        Ok(value)
    }
}

fn parse_time(field: &'static str, value: &str) -> Result<TimeOfDay, SubmitError> {
    value
        .parse()
        .map_err(|source| SubmitError::InvalidTime { field, source })
}

/// One person's daily availability, in their own local time.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Participant {
    pub name: String,
    pub timezone: String,
    #[serde(rename = "startTime")]
    pub start_time: TimeOfDay,
    #[serde(rename = "endTime")]
    pub end_time: TimeOfDay,
}

impl Participant {
    /// Does not check `start_time < end_time`, `SubmitForm::validate` does.
    pub fn new(
        name: &str,
        timezone: &str,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
    ) -> Participant {
        Participant {
            name: name.to_string(),
            timezone: timezone.to_string(),
            start_time,
            end_time,
        }
    }

    pub fn offset(&self) -> OffsetMinutes {
        resolve_offset(&self.timezone)
    }

    /// This participant's window on the UTC clock
    pub fn window(&self) -> NormalizedWindow {
        let window = NormalizedWindow::from_local(self.start_time, self.end_time, self.offset());
        trace!(
            "{} {}-{} ({}) -> {:?}",
            self.name,
            self.start_time,
            self.end_time,
            self.timezone,
            window
        );
        window
    }
}
