//! Checking and benchmarking of the ring and tree allreduce algorithms.
//!
//! # Usage
//!
//! ```bash
//! # Correctness suite (TAP on stdout) over 4 ranks
//! ringtree
//!
//! # Benchmark two message sizes over 8 ranks
//! ringtree -t BENCH -N 1024 -N 1048576 -p 8
//! ```
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG=ringtree=debug`
//! for per-rank detail. Group parameters can also come from `RINGTREE_*`
//! environment variables (see [`ringtree::RingtreeConfig::from_env`]).

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use ringtree::{
    Output, RingtreeConfig, RingtreeError, abort_code, bench_allreduce, check_allreduce, run_spmd,
};
use std::process::ExitCode;
use std::sync::Arc;

/// Run benchmarking or checking of allreduce.
#[derive(Parser, Debug)]
#[command(name = "ringtree")]
#[command(about = "Run benchmarking or checking of allreduce")]
#[command(version)]
struct Args {
    /// Set the message count (required for BENCH, may be repeated)
    #[arg(short = 'N', value_name = "N", value_parser = parse_count)]
    count: Vec<usize>,

    /// Select execution mode. CHECK: non-exhaustive check of correctness.
    /// BENCH: print timing data.
    #[arg(short = 't', value_name = "MODE", value_enum, ignore_case = true, default_value_t = Mode::Check)]
    mode: Mode,

    /// Number of ranks in the process group
    #[arg(short = 'p', long = "ranks", value_name = "P", value_parser = clap::value_parser!(u32).range(1..))]
    ranks: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    #[value(name = "CHECK")]
    Check,
    #[value(name = "BENCH")]
    Bench,
}

fn parse_count(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!(
            "Could not interpret message size '{s}' as positive integer."
        )),
    }
}

fn usage() -> String {
    <Args as clap::CommandFactory>::command()
        .render_help()
        .to_string()
}

/// Stderr text for a failed parse: clap's diagnostic followed by the full
/// usage. `-h` and `-V` print only what was asked for.
fn parse_failure_text(e: &clap::Error) -> String {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.render().to_string(),
        _ => format!("{}\n{}", e.render(), usage()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Usage, help and bad arguments all go to stderr; no group is
            // started.
            eprint!("{}", parse_failure_text(&e));
            return ExitCode::SUCCESS;
        }
    };

    let mut config = RingtreeConfig::from_env();
    if let Some(ranks) = args.ranks {
        config.world_size = ranks;
    }
    if let Err(e) = config.validate() {
        eprintln!("{e}");
        return ExitCode::SUCCESS;
    }
    if args.mode == Mode::Bench && args.count.is_empty() {
        eprintln!("BENCH mode requires a message count (-N).\n");
        eprint!("{}", usage());
        return ExitCode::SUCCESS;
    }

    match run(args, config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, config: RingtreeConfig) -> Result<ExitCode, RingtreeError> {
    let out = Output::stdout();
    let config = Arc::new(config);
    let counts = Arc::new(args.count);
    let mode = args.mode;

    let results = run_spmd(&config, {
        let config = Arc::clone(&config);
        move |comm| {
            let config = Arc::clone(&config);
            let counts = Arc::clone(&counts);
            let out = out.clone();
            async move {
                match mode {
                    Mode::Check => {
                        check_allreduce(&comm, &config, &out).await?;
                    }
                    Mode::Bench => {
                        for &count in counts.iter() {
                            bench_allreduce(&comm, &config, count, &out).await?;
                        }
                    }
                }
                Ok(())
            }
        }
    })
    .await?;

    if let Some(code) = abort_code(&results) {
        // Exit statuses are a byte; keep nonzero codes nonzero.
        let status = u8::try_from(code).ok().filter(|&c| c != 0).unwrap_or(1);
        return Ok(ExitCode::from(status));
    }
    if let Some(Err(e)) = results.into_iter().find(Result::is_err) {
        tracing::error!("{e}");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
