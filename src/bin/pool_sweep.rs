//! Pool performance across many seeds, for pools of increasing size.
//!
//! Usage: pool_sweep [--seeds N] [--probability P]
//!
//! Each pool size is simulated at offsets 0..N. The table shows how the spread of
//! claims/premium narrows toward 1.0 as the pool grows.

use clap::Parser;
use rayon::prelude::*;

use fundamentals::config::Assumptions;
use fundamentals::risk_pool::{self, RiskPoolParams};
use fundamentals::stats::{self, DistStats};
use fundamentals::{SeedOffset, seed};

const POOL_SIZES: [u64; 4] = [10, 100, 1_000, 10_000];

#[derive(Parser, Debug)]
#[command(name = "pool_sweep")]
#[command(about = "Spread of risk-pool performance by pool size")]
struct Args {
    /// Number of seed offsets per pool size
    #[arg(long, default_value_t = 200)]
    seeds: u64,

    /// Accident probability per policyholder
    #[arg(long, default_value_t = 0.05)]
    probability: f64,
}

struct SweepRow {
    num_policyholders: u64,
    performance: Option<DistStats>,
    deficit_share: f64,
    undefined: usize,
}

fn sweep(params: &RiskPoolParams, seeds: u64) -> SweepRow {
    let assumptions = Assumptions::canonical().risk_pool;
    let pools: Vec<risk_pool::RiskPool> = (0..seeds)
        .into_par_iter()
        .map(|o| {
            let mut rng = seed::rng_for(params.seed(SeedOffset(o)));
            risk_pool::simulate(params, &assumptions, &mut rng)
        })
        .collect();

    let deficits = pools.iter().filter(|p| p.surplus() < 0.0).count();
    let mut performance: Vec<f64> = pools.iter().filter_map(|p| p.pool_performance).collect();
    SweepRow {
        num_policyholders: params.num_policyholders(),
        undefined: pools.len() - performance.len(),
        performance: stats::percentile_stats(&mut performance),
        deficit_share: deficits as f64 / pools.len().max(1) as f64,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    anyhow::ensure!(args.seeds >= 2, "--seeds must be at least 2");

    let rows = POOL_SIZES
        .iter()
        .map(|&n| -> anyhow::Result<SweepRow> {
            Ok(sweep(&RiskPoolParams::new(args.probability, n)?, args.seeds))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    println!(
        "\n=== Pool performance (claims / premium), p={}, N={} seeds ===",
        args.probability, args.seeds
    );
    println!(
        "{:>7} | {:>6} | {:>6} | {:>6} | {:>6} | {:>6} | {:>6} | {:>6} | {:>9}",
        "Pool", "p5", "p25", "p50", "p75", "p95", "Mean", "StdDev", "Deficit%"
    );
    for row in &rows {
        match &row.performance {
            Some(d) => println!(
                "{:>7} | {:>6.3} | {:>6.3} | {:>6.3} | {:>6.3} | {:>6.3} | {:>6.3} | {:>6.3} | {:>8.1}%",
                row.num_policyholders,
                d.p5,
                d.p25,
                d.p50,
                d.p75,
                d.p95,
                d.mean,
                d.std_dev,
                row.deficit_share * 100.0
            ),
            None => println!("{:>7} | no premium collected in any run", row.num_policyholders),
        }
        if row.undefined > 0 {
            log::warn!("pool of {}: {} runs had undefined performance", row.num_policyholders, row.undefined);
        }
    }
    Ok(())
}
