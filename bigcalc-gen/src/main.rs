//! Command-line interface for the expression generators.
//!
//! `generate` writes a fresh random expression; `repeat` stretches an
//! existing one to a target size. Both emit files the calculator service
//! accepts verbatim.

use anyhow::{Context, Result};
use bigcalc_gen::{generate_expression, repeat_expression};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, Write};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Writes a random well-formed expression
    Generate {
        /// Destination file
        #[arg(short, long)]
        dest: String,

        /// Approximate maximum size in bytes
        #[arg(short, long)]
        size: u64,
    },

    /// Repeats a seed expression up to a target size
    Repeat {
        /// Destination file
        #[arg(short, long)]
        dest: String,

        /// File holding the seed expression
        #[arg(long)]
        source: String,

        /// Approximate target size in bytes
        #[arg(short, long)]
        size: u64,
    },
}

fn create_dest(path: &str) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("can't create {path:?}"))?;
    Ok(BufWriter::new(file))
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    match args.command {
        Commands::Generate { dest, size } => {
            let mut out = create_dest(&dest)?;
            generate_expression(&mut out, size)?;
            out.flush()?;
        }
        Commands::Repeat { dest, source, size } => {
            let seed = std::fs::read_to_string(&source)
                .with_context(|| format!("can't read {source:?}"))?;
            let mut out = create_dest(&dest)?;
            repeat_expression(&mut out, &seed, size)?;
            out.flush()?;
        }
    }
    Ok(())
}
