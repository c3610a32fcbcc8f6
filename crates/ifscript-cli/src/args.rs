//! Command-line surface (spec.md §6 "CLI Surface").
//!
//! Grounded on `plotnik-cli`'s `cli/args.rs`: a single `clap::Parser`
//! struct with positional and flag fields, no subcommands needed here
//! since the driver has exactly one mode.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ifscript", bin_name = "ifscript")]
#[command(about = "Play a scripted interactive-fiction game file from the terminal")]
pub struct Cli {
    /// The game file to load
    #[arg(default_value = "game.txt")]
    pub game_file: PathBuf,

    /// Fork to enter instead of the file's first fork
    #[arg(long = "fork", value_name = "NAME")]
    pub fork: Option<String>,

    /// Raise and halt on the first interpreter error instead of
    /// swallowing it (spec.md §7 `strict_errors`)
    #[arg(long)]
    pub strict: bool,

    /// Print swallowed (non-strict) errors to stderr as they occur
    #[arg(long)]
    pub print_errors: bool,
}
