mod cmd;
mod config;
mod render;

use anyhow::Context;
use chrono::Utc;
use cmd::{Cmd, Flow, Prompter};
use config::Config;
use mission_libs::{FileStore, Session};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        // module paths are noise next to the prompts
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let store = FileStore::open(&config.store_path)
        .with_context(|| format!("opening board at {}", config.store_path.display()))?;
    let mut session = Session::open(store, Utc::now()).context("loading saved board")?;
    tracing::info!(path = %config.store_path.display(), "board loaded");

    println!(
        "{}",
        render::board(session.board(), session.countdown_status(), Utc::now())
    );
    println!("{}", cmd::HELP);

    let mut prompter = Prompter::new(tokio::io::stdin());
    loop {
        let line = match prompter.ask("> ").await? {
            Some(line) => line,
            None => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Cmd>() {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        if let Flow::Quit = cmd::execute(command, &mut session, &mut prompter).await? {
            break;
        }
    }

    Ok(())
}
