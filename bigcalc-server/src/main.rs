//! Command-line entry point for the calculator service.
//!
//! Binds a TCP listener and serves streamed big-integer expressions until
//! the process is terminated. Logging goes through `env_logger`; run with
//! `RUST_LOG=info` (or `trace` to watch the evaluator work).

use anyhow::Result;
use bigcalc_server::{NumericHandleFactory, Server};
use clap::Parser;
use num_bigint::BigInt;
use std::sync::Arc;
use std::thread;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TCP port to listen on
    #[arg(short, long, default_value_t = 6666)]
    port: u16,

    /// Maximum number of concurrent client sessions
    /// (defaults to the hardware concurrency)
    #[arg(short, long)]
    max_sessions: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let max_sessions = args
        .max_sessions
        .unwrap_or_else(|| thread::available_parallelism().map(usize::from).unwrap_or(1));

    let factory = Arc::new(NumericHandleFactory::<BigInt>::new());
    let server = Server::bind(("0.0.0.0", args.port), factory, max_sessions)?;

    println!("Server started on port {}", args.port);
    server.run()
}
