use crate::board::{Board, ConfirmError, Confirmation, Submission};
use crate::countdown::{Countdown, CountdownStatus};
use crate::participant::{SubmitError, SubmitForm};
use crate::store::{KeyValueStore, StoreError};
use chrono::{DateTime, Utc};
use log::warn;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Confirm(#[from] ConfirmError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One interactive session over a persisted board.
///
/// The board is loaded once when the session opens and written back after
/// every change. If writing fails the change is undone in memory as well.
pub struct Session<S: KeyValueStore> {
    store: S,
    board: Board,
    countdown: Countdown,
}

impl<S: KeyValueStore> Session<S> {
    /// Loads the board and resumes the countdown to a stored mission time.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open(store: S, now: DateTime<Utc>) -> Result<Session<S>, StoreError> {
        let board = Board::load(&store)?;
        let mut countdown = Countdown::new();
        if let Some(target) = board.next_mission {
            countdown.start(target, now);
        }

        Ok(Session {
            store,
            board,
            countdown,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn submit(
        &mut self,
        form: &SubmitForm,
        now: DateTime<Utc>,
    ) -> Result<Submission, SessionError> {
        let snapshot = self.board.clone();
        let submission = self.board.submit(form, now)?;

        self.board.save_roster(&mut self.store).map_err(|err| {
            warn!("could not save {}: {}", submission.participant.name, err);
            self.board = snapshot.clone();
            err
        })?;

        if let Err(err) = self.board.save_next_mission(&mut self.store) {
            warn!(
                "could not save the mission time for {}: {}",
                submission.participant.name, err
            );
            // The roster already reached the store, put the old one back
            if let Err(restore) = snapshot.save_roster(&mut self.store) {
                warn!("could not restore the saved roster: {}", restore);
            }
            self.board = snapshot;
            return Err(err.into());
        }

        if let Some(target) = submission.suggestion {
            self.countdown.start(target, now);
        }
        Ok(submission)
    }

    pub fn confirm(&mut self, name: &str) -> Result<Confirmation, SessionError> {
        let snapshot = self.board.clone();
        let confirmation = self.board.confirm(name)?;

        if confirmation == Confirmation::Confirmed {
            if let Err(err) = self.board.save_confirmed(&mut self.store) {
                warn!("could not save confirmation of {}: {}", name.trim(), err);
                self.board = snapshot;
                return Err(err.into());
            }
        }
        Ok(confirmation)
    }

    pub fn countdown_updates(&self) -> watch::Receiver<Option<CountdownStatus>> {
        self.countdown.subscribe()
    }

    /// Latest published countdown, `None` while no mission was suggested
    pub fn countdown_status(&self) -> Option<CountdownStatus> {
        self.countdown.latest()
    }

    pub fn is_counting_down(&self) -> bool {
        self.countdown.is_running()
    }
}
