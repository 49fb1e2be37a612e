//! FACTORY CLI entry point: reads one JSON request from stdin, writes one
//! JSON response to stdout (spec §6.1/A3).

use clap::Parser;
use factory_belts_core::factory::{solve_factory, FactoryRequest, FactoryResponse};
use factory_belts_core::Error;
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;

/// Recipe-activity LP solver for production planning.
#[derive(Parser, Debug)]
#[command(name = "factory", version)]
struct Args {
    /// Increase log verbosity (stderr only). Repeatable.
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease log verbosity (stderr only). Repeatable.
    #[arg(short = 'q', long, action = clap::ArgAction::Count)]
    quiet: u8,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    if let Err(err) = run() {
        tracing::error!(%err, "factory failed");
        eprintln!("factory: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| Error::malformed(format!("failed to read stdin: {e}")))?;

    let request: FactoryRequest = serde_json::from_str(&input)
        .map_err(|e| Error::malformed(format!("invalid JSON: {e}")))?;
    request.validate()?;

    tracing::info!(
        recipes = request.recipes.len(),
        target_item = %request.target.item,
        target_rate = request.target.rate_per_min,
        "solving factory request"
    );
    let started = std::time::Instant::now();
    let response = solve_factory(&request);
    let status = match &response {
        FactoryResponse::Optimal { .. } => "ok",
        FactoryResponse::Infeasible { .. } => "infeasible",
    };
    tracing::info!(status, elapsed_ms = started.elapsed().as_secs_f64() * 1000.0, "factory solve finished");

    // Route through `Value` so struct fields come out key-sorted like the
    // `BTreeMap`s already do, matching the sorted-keys JSON contract (spec
    // §6.1/§6.5; the Python reference uses `json.dump(..., sort_keys=True)`).
    let value = serde_json::to_value(&response)
        .map_err(|e| Error::unsolvable(format!("failed to encode response: {e}")))?;
    let out = serde_json::to_string(&value)
        .map_err(|e| Error::unsolvable(format!("failed to encode response: {e}")))?;
    let mut stdout = io::stdout();
    writeln!(stdout, "{out}").map_err(|e| Error::unsolvable(format!("failed to write stdout: {e}")))?;
    Ok(())
}

fn init_tracing(verbose: u8, quiet: u8) {
    let level = match verbose as i16 - quiet as i16 {
        i16::MIN..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
