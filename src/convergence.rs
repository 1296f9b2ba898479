//! Law of large numbers: observed accident rates at increasing sample sizes.

use rand::Rng;

use crate::config::{Assumptions, ConvergenceAssumptions};
use crate::error::{self, ParameterError};
use crate::result::{Axis, Concept, Panel, PanelKind, Series, SimulationResult, Statistic};
use crate::seed;
use crate::types::{Seed, SeedOffset};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceParams {
    true_probability: f64,
}

impl ConvergenceParams {
    pub fn new(true_probability: f64) -> Result<Self, ParameterError> {
        Ok(ConvergenceParams {
            true_probability: error::check_probability("true_probability", true_probability)?,
        })
    }

    pub fn true_probability(&self) -> f64 {
        self.true_probability
    }

    pub fn seed(&self, offset: SeedOffset) -> Seed {
        seed::convergence_seed(self.true_probability, offset)
    }
}

impl Default for ConvergenceParams {
    fn default() -> Self {
        ConvergenceParams { true_probability: 0.05 }
    }
}

/// Result of one batch of Bernoulli trials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleOutcome {
    pub sample_size: u64,
    pub successes: u64,
    pub observed_probability: f64,
    /// `|observed − true|`.
    pub error: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Convergence {
    pub true_probability: f64,
    /// One outcome per sample size, ascending.
    pub outcomes: Vec<SampleOutcome>,
}

impl Convergence {
    pub fn outcome(&self, sample_size: u64) -> Option<&SampleOutcome> {
        self.outcomes.iter().find(|o| o.sample_size == sample_size)
    }

    pub fn smallest(&self) -> Option<&SampleOutcome> {
        self.outcomes.first()
    }

    pub fn largest(&self) -> Option<&SampleOutcome> {
        self.outcomes.last()
    }
}

/// Draw each batch from the same stream, in order. Later batches continue the
/// stream rather than restarting it.
pub fn simulate(
    params: &ConvergenceParams,
    assumptions: &ConvergenceAssumptions,
    rng: &mut impl Rng,
) -> Convergence {
    let p = params.true_probability;
    let outcomes = assumptions
        .sample_sizes
        .iter()
        .map(|&n| {
            let successes = (0..n).filter(|_| rng.random::<f64>() < p).count() as u64;
            let observed_probability = successes as f64 / n as f64;
            SampleOutcome {
                sample_size: n,
                successes,
                observed_probability,
                error: (observed_probability - p).abs(),
            }
        })
        .collect();
    Convergence { true_probability: p, outcomes }
}

pub fn compute(params: &ConvergenceParams, seed: Seed) -> SimulationResult {
    compute_with(params, &Assumptions::canonical().convergence, seed)
}

pub fn compute_with(
    params: &ConvergenceParams,
    assumptions: &ConvergenceAssumptions,
    seed: Seed,
) -> SimulationResult {
    let mut rng = seed::rng_for(seed);
    let run = simulate(params, assumptions, &mut rng);
    log::debug!(
        "convergence: p={} seed={seed} sizes={}",
        run.true_probability,
        run.outcomes.len()
    );

    let observed_of = |o: Option<&SampleOutcome>| Statistic::from(o.map(|o| o.observed_probability));
    let error_of = |o: Option<&SampleOutcome>| Statistic::from(o.map(|o| o.error));
    let small = run.smallest();
    let medium = run.outcome(assumptions.medium_sample_size);
    let large = run.largest();

    let rates = Series::points(
        "Observed accident rate",
        run.outcomes.iter().map(|o| (o.sample_size as f64, o.observed_probability)),
    );
    let errors = Series::points(
        "|Observed − True|",
        run.outcomes.iter().map(|o| (o.sample_size as f64, o.error)),
    );

    SimulationResult::new(Concept::Convergence, Some(seed))
        .with_parameter("true_probability", run.true_probability)
        .with_parameter("small_sample_size", small.map_or(0.0, |o| o.sample_size as f64))
        .with_parameter("medium_sample_size", assumptions.medium_sample_size as f64)
        .with_parameter("large_sample_size", large.map_or(0.0, |o| o.sample_size as f64))
        .with_statistic("small_sample", observed_of(small))
        .with_statistic("medium_sample", observed_of(medium))
        .with_statistic("large_sample", observed_of(large))
        .with_statistic("small_error", error_of(small))
        .with_statistic("medium_error", error_of(medium))
        .with_statistic("large_error", error_of(large))
        .with_panel(
            Panel::new("Observed Accident Rate vs. Sample Size", PanelKind::SemiLogX)
                .labels("Number of Drivers", "Observed Accident Rate")
                .series(rates)
                .reference("True probability", Axis::Y, run.true_probability),
        )
        .with_panel(
            Panel::new("Error vs. Sample Size", PanelKind::LogLog)
                .labels("Number of Drivers", "Error (|Observed - True|)")
                .series(errors),
        )
}
