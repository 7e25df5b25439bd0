pub mod cli;
pub mod definition;
pub mod error;
pub mod index_range;
pub mod inspect;
pub mod io_utils;
pub mod milestone;
pub mod preprocess;
pub mod priority;
pub mod process;
pub mod story;
pub mod strategy;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("backlog_rank", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Sort(args) => process::execute(&args),
        Commands::Validate(args) => process::validate(&args.definition),
        Commands::Inspect(args) => inspect::execute(&args),
    }
}
