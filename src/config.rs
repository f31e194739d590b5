//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

use crate::services::JsonFileStore;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pomo-relay")]
#[command(about = "A shared round-robin Pomodoro timer served over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Settings file (defaults to the platform config directory)
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Keep settings in memory only
    #[arg(long, conflicts_with = "settings")]
    pub no_persist: bool,

    /// Start the countdown as soon as the server is up
    #[arg(long)]
    pub autostart: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings file location
    pub fn settings_path(&self) -> PathBuf {
        self.settings
            .clone()
            .unwrap_or_else(JsonFileStore::default_path)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
