mod cli;
mod config;
mod error;
mod identity;
mod logging;
mod model;
mod normalize;
mod orchestrator;
mod provider;
mod render;
mod request;
mod session;
mod site;
mod storage;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = cli::Cli::parse();
    cli::run(args).await
}
