use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Rank backlog CSV files with a column definition", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Pre-process and rank a backlog, writing the stories in their new order
    Sort(SortArgs),
    /// Check a definition file and list every violation
    Validate(ValidateArgs),
    /// Show the columns and enabled strategies of a definition file
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
pub struct SortArgs {
    /// Backlog CSV file to rank (use '-' for stdin)
    #[arg(short, long)]
    pub input: PathBuf,
    /// Definition file (.json, .yml or .yaml)
    #[arg(short, long)]
    pub definition: PathBuf,
    /// Sprint schedule used to resolve milestone priorities
    #[arg(short, long)]
    pub schedule: Option<PathBuf>,
    /// Output CSV file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Report what would be ranked without writing any output
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Definition file (.json, .yml or .yaml)
    #[arg(short, long)]
    pub definition: PathBuf,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Definition file (.json, .yml or .yaml)
    #[arg(short, long)]
    pub definition: PathBuf,
    /// Print the parsed columns as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "pipe" | "|" => Ok(b'|'),
        "semicolon" | ";" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() || !first.is_ascii() {
                return Err("Delimiter must be a single ASCII character".to_string());
            }
            Ok(first as u8)
        }
    }
}
