use std::{num::NonZeroUsize, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use nbody_relay::{
    config::DT,
    prelude::*,
    trace::{CSV_FILE, TEXT_FILE},
};

/// Integrates a gravitational N-body system and writes its trajectory to `output.txt` and `output`.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// System file: `G N steps` followed by `m x y vx vy` for each body.
    config: PathBuf,

    /// Number of worker threads.
    threads: NonZeroUsize,

    /// How accelerations are computed.
    #[arg(short, long, value_enum, default_value_t = Method::Pairs)]
    method: Method,

    /// Integration step.
    #[arg(long, default_value_t = DT)]
    dt: f64,

    /// Directory receiving the trace files.
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Single thread, ignoring the thread count.
    Sequential,
    /// Every worker computes every interaction of its bodies.
    Naive,
    /// The force of each pair is computed once and shared between workers.
    Pairs,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = SystemConfig::from_path(&args.config)?;
    let parameters = Parameters {
        dt: args.dt,
        ..Parameters::default()
    };

    let trace = TraceWriter::create(&args.output).with_context(|| {
        format!(
            "could not create {TEXT_FILE} and {CSV_FILE} in {}",
            args.output.display()
        )
    })?;

    let start = Instant::now();
    let Outcome { trace, .. } = match args.method {
        Method::Sequential => sequential::run(&config, &parameters, trace)?,
        Method::Naive => run(&BruteForce, &config, &parameters, args.threads, trace)?,
        Method::Pairs => run(&BruteForcePairs, &config, &parameters, args.threads, trace)?,
    };
    trace.finish()?;

    println!("Time: {:.6} seconds", start.elapsed().as_secs_f64());
    Ok(())
}
