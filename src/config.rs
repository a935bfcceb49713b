//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::store::Store;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "flow-zone")]
#[command(about = "A state-managed Pomodoro timer server with task tracking")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Directory of built front-end assets to serve
    #[arg(long, default_value = "dist")]
    pub static_dir: PathBuf,

    /// Path to the persisted state file (defaults to the platform data dir)
    #[arg(long)]
    pub state_file: Option<PathBuf>,

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

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Resolve the persisted state file location
    pub fn state_path(&self) -> PathBuf {
        self.state_file.clone().unwrap_or_else(Store::default_path)
    }
}
