use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;

const STORE_PATH_VAR: &str = "MISSION_STORE_PATH";
const DEFAULT_STORE_PATH: &str = "./mission_board.json";
const LOG_FILTER_VAR: &str = "RUST_LOG";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub struct Config {
    pub store_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_path = match lookup(STORE_PATH_VAR) {
            Some(raw) if raw.trim().is_empty() => {
                bail!("{STORE_PATH_VAR} is set but empty. Unset it to use {DEFAULT_STORE_PATH}")
            }
            Some(raw) => PathBuf::from(raw.trim()),
            None => PathBuf::from(DEFAULT_STORE_PATH),
        };

        let log_filter = lookup(LOG_FILTER_VAR)
            .map(|filter| filter.trim().to_owned())
            .filter(|filter| !filter.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned());

        Ok(Config {
            store_path,
            log_filter,
        })
    }
}
