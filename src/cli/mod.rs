//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    download::{FetchConfig, DEFAULT_ENDPOINT},
    error::Result,
    publish::Destination,
    window::DEFAULT_LAG_HOURS,
};

/// Japanese upper-air network.
const DEFAULT_STATIONS: [&str; 16] = [
    "47401", "47412", "47418", "47582", "47600", "47646", "47678", "47741", "47778", "47807",
    "47827", "47909", "47918", "47945", "47971", "47991",
];

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
/// Fetches the latest soundings and publishes them as gzipped JSON.
/// Every option has a default, so running with no arguments does a full run.
pub struct Cli {
    /// Sounding archive endpoint
    #[arg(long, env = "SOUNDING_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Comma separated station numbers
    #[arg(
        long,
        env = "SOUNDING_STATIONS",
        value_delimiter = ',',
        default_values = DEFAULT_STATIONS
    )]
    pub stations: Vec<String>,

    /// Base URL to PUT objects under, or a local directory [default: ~/soundings]
    #[arg(long, env = "SOUNDING_DESTINATION")]
    pub destination: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "SOUNDING_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    /// Hours to step back before picking the synoptic time
    #[arg(long, env = "SOUNDING_LAG_HOURS", default_value_t = DEFAULT_LAG_HOURS)]
    pub lag_hours: u32,
}

impl Cli {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }

    pub fn destination(&self) -> Result<Destination> {
        let target = match &self.destination {
            Some(target) => target.clone(),
            None => default_destination().to_string_lossy().to_string(),
        };

        Destination::parse(&target, Duration::from_secs(self.timeout))
    }
}

fn default_destination() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("soundings")
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    let template = "[{eta_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}";
    let style = ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

    ProgressBar::new(size).with_message(message).with_style(style)
}

// -- Tests -------------------------------------------------------------------
