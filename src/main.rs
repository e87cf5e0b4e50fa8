mod commands;
mod formats;
mod import;
mod model;
mod seats;

use crate::commands::{check, import};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
struct Opts {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import the two result files and print a summary.
    Import {
        /// Results XML (Wahlkreis -> Partei -> Kandidat hierarchy)
        results_file: PathBuf,
        /// General information XML (per-Stimmkreis data)
        info_file: PathBuf,
        /// Election year (2013 or 2018; other years skip the seat table)
        year: u16,
        /// Print the summary as JSON instead of the colored report
        #[clap(long)]
        json: bool,
    },
    /// Import and report consistency findings across the two files.
    Check {
        /// Results XML (Wahlkreis -> Partei -> Kandidat hierarchy)
        results_file: PathBuf,
        /// General information XML (per-Stimmkreis data)
        info_file: PathBuf,
        /// Election year (2013 or 2018; other years skip the seat table)
        year: u16,
    },
}

fn main() {
    let opts = Opts::parse();

    let result = match opts.command {
        Command::Import {
            results_file,
            info_file,
            year,
            json,
        } => import(&results_file, &info_file, year, json),
        Command::Check {
            results_file,
            info_file,
            year,
        } => check(&results_file, &info_file, year),
    };

    if let Err(e) = result {
        eprintln!("❌ Import failed: {}", e);
        std::process::exit(1);
    }
}
