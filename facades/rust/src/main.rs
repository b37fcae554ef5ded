//! `supradrive` — drive one scanhash pass from the command line.
//!
//! Usage:
//!   supradrive --midstate <64 hex chars> --data <128 hex chars> \
//!              --target <64 hex chars> --max-nonce <u32>

use std::sync::atomic::Ordering;

use clap::Parser;
use supradrive_cli::{decode_data, decode_midstate, decode_target, run_once, FacadeError, RestartSignal};
use tracing::info;

#[derive(Parser)]
#[command(name = "supradrive")]
#[command(about = "Run one scanhash pass over a fixed nonce range", long_about = None)]
struct Cli {
    /// 32-byte midstate, as 64 hex characters (first 64-byte block already compressed).
    #[arg(long)]
    midstate: String,

    /// The second 64-byte block of the header, as 128 hex characters. Bytes 12..16 are
    /// overwritten with each candidate nonce.
    #[arg(long)]
    data: String,

    /// 32-byte big-endian target, as 64 hex characters.
    #[arg(long)]
    target: String,

    /// Upper bound of the nonce space to search.
    #[arg(long, default_value_t = u32::MAX)]
    max_nonce: u32,

    /// Nonce to resume an up-city scan from.
    #[arg(long, default_value_t = 0)]
    last_nonce: u32,

    /// Candidate count already spent before this call, e.g. when resuming.
    #[arg(long, default_value_t = 0)]
    start_total: u32,

    /// PRNG seed for the randomized strategies (IRandom, Random, DRandom, NRandom).
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<(), FacadeError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let midstate = decode_midstate(&cli.midstate)?;
    let mut data = decode_data(&cli.data)?;
    let target = decode_target(&cli.target)?;

    let restart = RestartSignal::new();
    let handler_signal = restart.clone();
    ctrlc::set_handler(move || {
        info!("received interrupt, requesting restart");
        handler_signal.trigger();
    })?;

    let mut last_nonce = cli.last_nonce;
    let (found, results) = run_once(
        &restart,
        &midstate,
        &mut data,
        &target,
        cli.max_nonce,
        &mut last_nonce,
        cli.start_total,
        cli.seed,
    );

    if restart.work_restart() {
        info!("scan interrupted before completion");
    }

    if found {
        for result in &results {
            let meets = supradrive_cli::meets_target(&result.hash, &result.target);
            println!(
                "nonce={} hash={} status={:?} meets_target={meets}",
                result.nonce,
                hex::encode(result.hash),
                result.status
            );
        }
    } else {
        println!("no semi-results; last_nonce={last_nonce}");
    }

    Ok(())
}
