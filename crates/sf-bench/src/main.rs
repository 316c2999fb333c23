use std::io::{self, Write};

use anyhow::Context;
use log::info;
use sf_bench::{run_all, BenchConfig};

/// Reads `<rows> <cols>` from stdin and benchmarks every strategy for all six
/// element types.
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let config = BenchConfig::from_reader(io::stdin().lock())
        .context("failed to read matrix dimensions from stdin")?
        .with_env(|var| std::env::var(var).ok())
        .context("invalid benchmark environment")?;
    info!(
        "matrices: {}x{} ({} elements), dump={}",
        config.rows,
        config.cols,
        config.numel(),
        config.dump
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let reports = run_all(&config, &mut out).context("benchmark run failed")?;
    out.flush().context("failed to flush stdout")?;

    let mismatched = reports.iter().filter(|r| !r.all_match()).count();
    if mismatched > 0 {
        anyhow::bail!("{} element type(s) produced results that differ from scalar", mismatched);
    }
    Ok(())
}
