pub mod board;
pub mod countdown;
pub mod offset;
pub mod participant;
pub mod roster;
pub mod schedule;
pub mod session;
pub mod store;
pub mod time;

pub use board::{Board, ConfirmError, Confirmation, Submission};
pub use countdown::{Countdown, CountdownStatus};
pub use offset::resolve_offset;
pub use participant::{Participant, SubmitError, SubmitForm};
pub use roster::{ConfirmedSet, Roster};
pub use schedule::{build_grid, is_available, suggest_best, GridRow};
pub use session::{Session, SessionError};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use time::{normalize, NormalizedWindow, TimeOfDay};
