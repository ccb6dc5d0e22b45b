//! iecgen - Session and history core for an IEC 61131-3 code generator.
//!
//! Architecture:
//! - `store` holds the session and bounded history behind a pure transition function
//! - `storage` persists history and theme to a key-value file
//! - `services` are the external generation, validation and simulation collaborators
//! - `runtime` performs the store's effects and feeds collaborator results back

mod cli;
mod config;
mod logging;
mod models;
mod prompts;
mod runtime;
mod services;
mod storage;
mod store;

use anyhow::Result;
use clap::Parser;

use cli::{execute, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    execute(cli).await
}
