//! Command-line inputs shared by the daygrid binaries.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use daygrid_core::{ingest, render::session_dates, Config, Session};

/// Where sessions and settings come from.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// JSON file with the session list
    #[arg(short, long)]
    pub file: PathBuf,

    /// Day to show (YYYY-MM-DD); defaults to the earliest date in the file
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Config file (defaults to ~/.config/daygrid/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Everything loaded from the inputs.
pub struct Loaded {
    pub config: Config,
    pub sessions: Vec<Session>,
    pub date: NaiveDate,
}

impl InputArgs {
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("failed to load config from {}", path.display())),
            None => Config::load().context("failed to load configuration"),
        }
    }

    /// Load sessions and pick the day to show.
    pub fn load(&self, config: Config) -> Result<Loaded> {
        let sessions = ingest::load_sessions(&self.file)
            .with_context(|| format!("failed to load sessions from {}", self.file.display()))?;

        let date = match self.date {
            Some(date) => date,
            None => session_dates(&sessions)
                .first()
                .copied()
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
        };

        Ok(Loaded {
            config,
            sessions,
            date,
        })
    }
}
