mod aggregate;
mod cli;
mod download;
mod error;
mod publish;
mod reading;
mod window;

use anyhow::Result;
use clap::Parser;
use cli::{command, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let keys = command::run(&cli).await?;
    println!("Published `{}`", keys.join("`, `"));

    Ok(())
}
