//! Risk pooling: one year of independent losses across a pool of policyholders.
//!
//! Each policyholder pays the actuarially fair premium (no loading). The pool's
//! performance is claims paid over premium collected; it tends to 1 as the pool
//! grows, which is the point of the demonstration.

use rand::Rng;

use crate::config::{Assumptions, RiskPoolAssumptions};
use crate::error::{self, ParameterError};
use crate::result::{Axis, Category, Concept, Panel, PanelKind, Series, SimulationResult};
use crate::seed;
use crate::stats;
use crate::types::{Seed, SeedOffset};

/// Largest pool accepted. One draw per policyholder.
pub const MAX_POLICYHOLDERS: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskPoolParams {
    accident_probability: f64,
    num_policyholders: u64,
}

impl RiskPoolParams {
    pub fn new(accident_probability: f64, num_policyholders: u64) -> Result<Self, ParameterError> {
        Ok(RiskPoolParams {
            accident_probability: error::check_probability("accident_probability", accident_probability)?,
            num_policyholders: error::check_between("num_policyholders", 1, MAX_POLICYHOLDERS, num_policyholders)?,
        })
    }

    pub fn accident_probability(&self) -> f64 {
        self.accident_probability
    }

    pub fn num_policyholders(&self) -> u64 {
        self.num_policyholders
    }

    pub fn seed(&self, offset: SeedOffset) -> Seed {
        seed::risk_pool_seed(self.accident_probability, self.num_policyholders, offset)
    }
}

impl Default for RiskPoolParams {
    fn default() -> Self {
        RiskPoolParams { accident_probability: 0.05, num_policyholders: 100 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskPool {
    pub accident_probability: f64,
    pub num_policyholders: u64,
    pub claim_amount: f64,
    pub num_with_loss: u64,
    /// Expected loss per policyholder.
    pub fair_premium: f64,
    pub pool_premium_total: f64,
    pub total_losses: f64,
    /// Claims over premium; `None` when no premium was collected.
    pub pool_performance: Option<f64>,
}

impl RiskPool {
    pub fn percent_with_loss(&self) -> f64 {
        self.num_with_loss as f64 / self.num_policyholders as f64 * 100.0
    }

    /// Premium collected minus claims paid. Negative is a deficit.
    pub fn surplus(&self) -> f64 {
        self.pool_premium_total - self.total_losses
    }
}

pub fn simulate(params: &RiskPoolParams, assumptions: &RiskPoolAssumptions, rng: &mut impl Rng) -> RiskPool {
    let p = params.accident_probability;
    let n = params.num_policyholders;
    let claim_amount = assumptions.claim_amount;

    let num_with_loss = (0..n).filter(|_| rng.random::<f64>() < p).count() as u64;
    let fair_premium = p * claim_amount;
    let pool_premium_total = n as f64 * fair_premium;
    let total_losses = num_with_loss as f64 * claim_amount;

    RiskPool {
        accident_probability: p,
        num_policyholders: n,
        claim_amount,
        num_with_loss,
        fair_premium,
        pool_premium_total,
        total_losses,
        pool_performance: stats::ratio(total_losses, pool_premium_total),
    }
}

pub fn compute(params: &RiskPoolParams, seed: Seed) -> SimulationResult {
    compute_with(params, &Assumptions::canonical().risk_pool, seed)
}

pub fn compute_with(params: &RiskPoolParams, assumptions: &RiskPoolAssumptions, seed: Seed) -> SimulationResult {
    let mut rng = seed::rng_for(seed);
    let pool = simulate(params, assumptions, &mut rng);
    log::debug!(
        "risk pool: p={} n={} seed={seed} losses={} performance={:?}",
        pool.accident_probability,
        pool.num_policyholders,
        pool.num_with_loss,
        pool.pool_performance
    );

    let outcomes = Series::categories(
        "Policyholders",
        vec![
            Category::new("No loss", (pool.num_policyholders - pool.num_with_loss) as f64),
            Category::new("Loss", pool.num_with_loss as f64),
        ],
    );
    let totals = Series::categories(
        "Pool",
        vec![
            Category::new("Premiums collected", pool.pool_premium_total),
            Category::new("Claims paid", pool.total_losses),
        ],
    );

    SimulationResult::new(Concept::RiskPool, Some(seed))
        .with_parameter("accident_probability", pool.accident_probability)
        .with_parameter("num_policyholders", pool.num_policyholders as f64)
        .with_parameter("claim_amount", pool.claim_amount)
        .with_statistic("num_with_loss", pool.num_with_loss as f64)
        .with_statistic("percent_with_loss", pool.percent_with_loss())
        .with_statistic("fair_premium", pool.fair_premium)
        .with_statistic("pool_premium_total", pool.pool_premium_total)
        .with_statistic("total_losses", pool.total_losses)
        .with_statistic("pool_performance", pool.pool_performance)
        .with_panel(
            Panel::new("Without Insurance: Individual Outcomes", PanelKind::Bar)
                .labels("Outcome", "Number of Policyholders")
                .series(outcomes),
        )
        .with_panel(
            Panel::new("With Insurance: Pool Results", PanelKind::Bar)
                .labels("Cash flow", "Amount ($)")
                .series(totals)
                .reference("Expected claims", Axis::Y, pool.pool_premium_total),
        )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::result::Statistic;

    fn params(p: f64, n: u64) -> RiskPoolParams {
        RiskPoolParams::new(p, n).unwrap()
    }

    #[test]
    fn same_seed_produces_identical_results() {
        let p = params(0.05, 100);
        let seed = p.seed(SeedOffset::NONE);
        assert_eq!(compute(&p, seed), compute(&p, seed));
    }

    #[test]
    fn fair_premium_is_expected_loss() {
        let r = compute(&params(0.05, 100), Seed(600));
        assert_relative_eq!(r.value("fair_premium").unwrap(), 1_000.0);
        assert_relative_eq!(r.value("pool_premium_total").unwrap(), 100_000.0);
    }

    #[test]
    fn totals_are_consistent() {
        let r = compute(&params(0.12, 250), Seed(3));
        let k = r.value("num_with_loss").unwrap();
        assert_relative_eq!(r.value("total_losses").unwrap(), k * 20_000.0);
        assert_relative_eq!(r.value("percent_with_loss").unwrap(), k / 250.0 * 100.0);
        assert_relative_eq!(
            r.value("pool_performance").unwrap(),
            r.value("total_losses").unwrap() / r.value("pool_premium_total").unwrap()
        );
    }

    #[test]
    fn zero_probability_leaves_performance_undefined() {
        let r = compute(&params(0.0, 10), Seed(10));
        assert_eq!(r.value("num_with_loss"), Some(0.0));
        assert_eq!(r.value("pool_premium_total"), Some(0.0));
        assert_eq!(r.statistic("pool_performance"), Some(Statistic::Undefined));
    }

    #[test]
    fn certain_loss_hits_everyone() {
        let r = compute(&params(1.0, 40), Seed(10_040));
        assert_eq!(r.value("num_with_loss"), Some(40.0));
        assert_eq!(r.value("percent_with_loss"), Some(100.0));
        assert_relative_eq!(r.value("pool_performance").unwrap(), 1.0);
    }

    #[test]
    fn single_policyholder_is_all_or_nothing() {
        for s in 0..20u64 {
            let r = compute(&params(0.25, 1), Seed(s));
            let perf = r.value("pool_performance").unwrap();
            assert!(perf == 0.0 || perf == 4.0, "seed {s}: performance {perf}");
        }
    }

    #[test]
    fn chart_matches_statistics() {
        let pool = simulate(&params(0.1, 500), &Assumptions::canonical().risk_pool, &mut seed::rng_for(Seed(8)));
        let r = compute(&params(0.1, 500), Seed(8));
        assert_eq!(r.value("num_with_loss"), Some(pool.num_with_loss as f64));
        assert_eq!(r.chart.panels.len(), 2);
    }

    /// Spread of pool performance across seeds collapses as the pool grows.
    #[test]
    fn performance_spread_shrinks_with_pool_size() {
        let spread = |n: u64| {
            let p = params(0.05, n);
            let perf: Vec<f64> = (0..30u64)
                .map(|o| compute(&p, p.seed(SeedOffset(o))).value("pool_performance").unwrap())
                .collect();
            stats::std_dev(&perf)
        };
        let small = spread(10);
        let large = spread(10_000);
        assert!(
            large * 5.0 < small,
            "std dev at n=10,000 ({large:.4}) should be far below n=10 ({small:.4})"
        );
    }

    #[test]
    fn params_reject_empty_pool() {
        assert!(matches!(
            RiskPoolParams::new(0.05, 0),
            Err(ParameterError::BelowMinimum { field: "num_policyholders", .. })
        ));
    }

    #[test]
    fn params_cap_the_pool_size() {
        assert!(RiskPoolParams::new(0.05, MAX_POLICYHOLDERS).is_ok());
        assert!(matches!(
            RiskPoolParams::new(0.05, MAX_POLICYHOLDERS + 1),
            Err(ParameterError::AboveMaximum { field: "num_policyholders", .. })
        ));
        assert!(RiskPoolParams::new(0.05, u64::MAX).is_err());
    }
}
