//! Insurance fundamentals CLI
//!
//! Runs one concept and prints its interpretation, or the full result as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use fundamentals::balance_sheet::BalanceSheetParams;
use fundamentals::capital::CapitalParams;
use fundamentals::convergence::ConvergenceParams;
use fundamentals::premium::PremiumParams;
use fundamentals::risk_pool::RiskPoolParams;
use fundamentals::{Assumptions, Request, SeedOffset, report, seed};

#[derive(Parser, Debug)]
#[command(name = "fundamentals")]
#[command(about = "Seeded simulations of core insurance concepts")]
struct Cli {
    #[command(subcommand)]
    concept: ConceptCommand,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Draw a fresh seed offset instead of the deterministic default
    #[arg(long, global = true, conflicts_with = "offset")]
    resimulate: bool,

    /// Pin the seed offset (0 reproduces the default run)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(0..=SeedOffset::MAX))]
    offset: Option<u64>,

    /// Print the full result as JSON instead of the interpretation
    #[arg(long, global = true)]
    json: bool,

    /// JSON file replacing the built-in assumptions
    #[arg(long, global = true)]
    assumptions: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum ConceptCommand {
    /// Law of large numbers: observed rate vs sample size
    Convergence {
        /// True accident probability
        #[arg(long, default_value_t = 0.05)]
        probability: f64,
    },
    /// One year of losses across a pool priced at fair premium
    RiskPool {
        /// Accident probability per policyholder
        #[arg(long, default_value_t = 0.05)]
        probability: f64,
        /// Number of policyholders in the pool
        #[arg(long, default_value_t = 100)]
        policyholders: u64,
    },
    /// Balance sheet and capital adequacy at a given loss ratio
    BalanceSheet {
        #[arg(long, default_value_t = 0.65)]
        loss_ratio: f64,
    },
    /// Premium from expected loss plus loadings
    Premium {
        /// Annual claim frequency
        #[arg(long, default_value_t = 0.05)]
        frequency: f64,
        /// Average claim severity ($)
        #[arg(long, default_value_t = 8_000.0)]
        severity: f64,
    },
    /// Multi-year solvency of many simulated companies
    Capital {
        /// Initial capital ($M)
        #[arg(long, default_value_t = 50.0)]
        capital: f64,
        /// Projection horizon in years
        #[arg(long, default_value_t = 10)]
        years: u32,
    },
}

impl ConceptCommand {
    fn request(&self) -> anyhow::Result<Request> {
        let request = match *self {
            ConceptCommand::Convergence { probability } => {
                Request::Convergence(ConvergenceParams::new(probability)?)
            }
            ConceptCommand::RiskPool { probability, policyholders } => {
                Request::RiskPool(RiskPoolParams::new(probability, policyholders)?)
            }
            ConceptCommand::BalanceSheet { loss_ratio } => {
                Request::BalanceSheet(BalanceSheetParams::new(loss_ratio)?)
            }
            ConceptCommand::Premium { frequency, severity } => {
                Request::Premium(PremiumParams::new(frequency, severity)?)
            }
            ConceptCommand::Capital { capital, years } => {
                Request::CapitalSurvival(CapitalParams::new(capital, years)?)
            }
        };
        Ok(request)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let request = cli.concept.request().context("invalid parameters")?;

    let assumptions = match &cli.run.assumptions {
        Some(path) => Assumptions::load(path)?,
        None => Assumptions::canonical(),
    };

    let offset = if cli.run.resimulate {
        seed::resimulate_offset(&mut rand::rng())
    } else {
        cli.run.offset.map(SeedOffset).unwrap_or_default()
    };
    if let Some(s) = request.seed(offset) {
        log::debug!("{:?} seed {s} (offset {})", request.concept(), offset.0);
    }

    let result = request.compute_with(&assumptions, offset)?;

    if cli.run.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.concept.title());
        println!("{}\n", "=".repeat(result.concept.title().len()));
        if let Some(s) = result.seed {
            println!("Seed: {s}\n");
        }
        println!("{}", report::interpret(&result));
    }
    Ok(())
}
