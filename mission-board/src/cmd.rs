use chrono::Utc;
use mission_libs::{Confirmation, KeyValueStore, Session, SessionError, SubmitForm};
use std::io::{self, Write};
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};

use crate::render;

pub const HELP: &str = "\
Commands:
  submit   enter your name, timezone (e.g. UTC+05:30) and available hours
  confirm  confirm you will join the next mission
  grid     show who is available over the next 24 hours
  status   show the countdown and who confirmed
  help     show this message
  quit     leave the board";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Cmd {
    Submit,
    Confirm,
    Grid,
    Status,
    Help,
    Quit,
}

impl FromStr for Cmd {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "submit" | "s" => Ok(Cmd::Submit),
            "confirm" | "c" => Ok(Cmd::Confirm),
            "grid" | "g" => Ok(Cmd::Grid),
            "status" => Ok(Cmd::Status),
            "help" | "h" | "?" => Ok(Cmd::Help),
            "quit" | "q" | "exit" => Ok(Cmd::Quit),
            other => Err(format!("Unknown command {:?}, type `help`", other)),
        }
    }
}

pub enum Flow {
    Continue,
    Quit,
}

/// Asks for one line at a time on stdout and reads the answer
pub struct Prompter<R> {
    lines: Lines<BufReader<R>>,
}

impl<R: AsyncRead + Unpin> Prompter<R> {
    pub fn new(input: R) -> Self {
        Prompter {
            lines: BufReader::new(input).lines(),
        }
    }

    /// `None` once input is exhausted
    pub async fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        print!("{}", label);
        io::stdout().flush()?;
        self.lines.next_line().await
    }
}

pub async fn execute<S, R>(
    cmd: Cmd,
    session: &mut Session<S>,
    prompter: &mut Prompter<R>,
) -> io::Result<Flow>
where
    S: KeyValueStore,
    R: AsyncRead + Unpin,
{
    match cmd {
        Cmd::Submit => submit(session, prompter).await,
        Cmd::Confirm => confirm(session, prompter).await,
        Cmd::Grid | Cmd::Status => {
            println!(
                "{}",
                render::board(session.board(), session.countdown_status(), Utc::now())
            );
            Ok(Flow::Continue)
        }
        Cmd::Help => {
            println!("{}", HELP);
            Ok(Flow::Continue)
        }
        Cmd::Quit => Ok(Flow::Quit),
    }
}

async fn submit<S, R>(session: &mut Session<S>, prompter: &mut Prompter<R>) -> io::Result<Flow>
where
    S: KeyValueStore,
    R: AsyncRead + Unpin,
{
    let mut answers = Vec::with_capacity(4);
    for label in ["Name: ", "Timezone (UTC+HH:MM): ", "Start (HH:MM): ", "End (HH:MM): "] {
        match prompter.ask(label).await? {
            Some(answer) => answers.push(answer),
            None => return Ok(Flow::Quit),
        }
    }
    let form = SubmitForm::new(&answers[0], &answers[1], &answers[2], &answers[3]);

    match session.submit(&form, Utc::now()) {
        Ok(submission) => {
            println!("Availability submitted.");
            if submission.suggestion.is_none() {
                println!("Nobody is available in the next 24 hours yet.");
            }
            println!(
                "{}",
                render::board(session.board(), session.countdown_status(), Utc::now())
            );
        }
        Err(SessionError::Submit(err)) => println!("{}", err),
        Err(err) => {
            tracing::error!("submission not saved: {}", err);
            println!("Could not save your availability: {}", err);
        }
    }
    Ok(Flow::Continue)
}

async fn confirm<S, R>(session: &mut Session<S>, prompter: &mut Prompter<R>) -> io::Result<Flow>
where
    S: KeyValueStore,
    R: AsyncRead + Unpin,
{
    let name = match prompter.ask("Enter your name to confirm: ").await? {
        Some(name) => name,
        None => return Ok(Flow::Quit),
    };

    match session.confirm(&name) {
        Ok(Confirmation::Confirmed) => {
            println!("Participation confirmed.");
            println!("{}", session.board().confirmed.summary());
        }
        Ok(Confirmation::AlreadyConfirmed) => {
            println!("You have already confirmed your participation.")
        }
        Ok(Confirmation::Skipped) => {}
        Err(SessionError::Confirm(err)) => println!("{}", err),
        Err(err) => {
            tracing::error!("confirmation not saved: {}", err);
            println!("Could not save your confirmation: {}", err);
        }
    }
    Ok(Flow::Continue)
}
