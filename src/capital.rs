//! Role of capital: Monte Carlo survival of an insurer over a multi-year horizon.
//!
//! Each replicate is one simulated company. Every year it writes the same
//! premium, draws a loss ratio, pays fixed-ratio expenses and earns investment
//! income on the capital it held at the start of the year. Capital at or below
//! zero at a year boundary is ruin: the replicate stops and never recovers.
//!
//! The top-level seed emits one sub-seed per replicate, so replicates are
//! independent and run on the rayon pool without changing the aggregate.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;

use crate::config::{Assumptions, CapitalAssumptions};
use crate::error::{self, ParameterError};
use crate::result::{Axis, Category, Concept, Panel, PanelKind, Series, SimulationResult};
use crate::seed;
use crate::stats;
use crate::types::{Seed, SeedOffset};

/// Longest projection horizon accepted, in years.
pub const MAX_YEARS: u32 = 100;

/// Horizons up to this length get one histogram bin per year; longer ones are
/// binned in five-year groups.
const YEARLY_BINS_UP_TO: u32 = 25;
const LONG_HORIZON_BIN_WIDTH: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapitalParams {
    capital_amount: f64,
    num_years: u32,
}

impl CapitalParams {
    /// Any finite capital is accepted; a non-positive amount is ruined before year 1.
    /// The horizon must be between 1 and [`MAX_YEARS`].
    pub fn new(capital_amount: f64, num_years: u32) -> Result<Self, ParameterError> {
        error::check_between("num_years", 1, u64::from(MAX_YEARS), u64::from(num_years))?;
        Ok(CapitalParams {
            capital_amount: error::check_finite("capital_amount", capital_amount)?,
            num_years,
        })
    }

    pub fn capital_amount(&self) -> f64 {
        self.capital_amount
    }

    pub fn num_years(&self) -> u32 {
        self.num_years
    }

    pub fn seed(&self, offset: SeedOffset) -> Seed {
        seed::capital_seed(self.capital_amount, self.num_years, offset)
    }
}

impl Default for CapitalParams {
    fn default() -> Self {
        CapitalParams { capital_amount: 50.0, num_years: 10 }
    }
}

/// Annual loss ratio: Normal(mean, volatility), floored.
#[derive(Debug, Clone, Copy)]
pub struct LossRatioModel {
    normal: Normal<f64>,
    floor: f64,
}

impl LossRatioModel {
    pub fn new(a: &CapitalAssumptions) -> Result<Self, ParameterError> {
        // Normal::new accepts a negative std dev and mirrors the draws.
        if a.loss_ratio_volatility.is_nan() || a.loss_ratio_volatility < 0.0 {
            return Err(ParameterError::LossDistribution(format!(
                "volatility must be non-negative, got {}",
                a.loss_ratio_volatility
            )));
        }
        let normal = Normal::new(a.expected_loss_ratio, a.loss_ratio_volatility)
            .map_err(|e| ParameterError::LossDistribution(e.to_string()))?;
        Ok(LossRatioModel { normal, floor: a.loss_ratio_floor })
    }

    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        self.normal.sample(rng).max(self.floor)
    }
}

/// One simulated company's history, reduced to what the aggregate needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompanyTrial {
    /// Last completed year. Frozen once the company is ruined.
    pub years_survived: u32,
    pub final_capital: f64,
}

impl CompanyTrial {
    pub fn is_solvent(&self) -> bool {
        self.final_capital > 0.0
    }
}

/// Batch summary across all replicates.
#[derive(Debug, Clone, PartialEq)]
pub struct CapitalSurvival {
    pub initial_capital: f64,
    pub num_years: u32,
    pub num_simulations: usize,
    /// Replicates that completed every year of the horizon.
    pub survivors: usize,
    pub survival_rate: f64,
    pub average_years: f64,
    /// Mean final capital over replicates that end with positive capital.
    /// `None` when every replicate is ruined.
    pub average_final_capital: Option<f64>,
    /// `years_histogram[y]` = replicates with exactly `y` years survived, `y` in `0..=num_years`.
    pub years_histogram: Vec<usize>,
    /// `survival_curve[y - 1]` = share of replicates that completed year `y`.
    pub survival_curve: Vec<f64>,
}

/// Histogram bin over completed years `first..=last`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearBin {
    pub first: u32,
    pub last: u32,
    pub count: usize,
}

impl YearBin {
    pub fn midpoint(&self) -> f64 {
        (f64::from(self.first) + f64::from(self.last)) / 2.0
    }
}

impl CapitalSurvival {
    /// Years-survived histogram for display. Bins start at year 1, so replicates
    /// ruined before completing a year are not drawn. Horizons longer than 25
    /// years use five-year bins; the last bin may be narrower.
    pub fn year_bins(&self) -> Vec<YearBin> {
        let width = if self.num_years <= YEARLY_BINS_UP_TO { 1 } else { LONG_HORIZON_BIN_WIDTH };
        (1..=self.num_years)
            .step_by(width as usize)
            .map(|first| {
                let last = (first + width - 1).min(self.num_years);
                let count = self.years_histogram[first as usize..=last as usize].iter().sum();
                YearBin { first, last, count }
            })
            .collect()
    }
}

/// Runs replicates under one set of assumptions. Construction validates the
/// loss distribution; running never fails.
#[derive(Debug, Clone)]
pub struct CapitalSimulator {
    assumptions: CapitalAssumptions,
    loss_ratio: LossRatioModel,
}

impl CapitalSimulator {
    pub fn new(assumptions: &CapitalAssumptions) -> Result<Self, ParameterError> {
        Ok(CapitalSimulator {
            loss_ratio: LossRatioModel::new(assumptions)?,
            assumptions: assumptions.clone(),
        })
    }

    pub fn canonical() -> Self {
        Self::new(&Assumptions::canonical().capital).expect("canonical loss-ratio distribution is valid")
    }

    pub fn assumptions(&self) -> &CapitalAssumptions {
        &self.assumptions
    }

    /// Simulate one company until ruin or the end of the horizon.
    pub fn simulate_company(&self, initial_capital: f64, num_years: u32, rng: &mut impl Rng) -> CompanyTrial {
        let a = &self.assumptions;
        let premium = a.annual_premium;
        let expenses = premium * a.expense_ratio;

        let mut capital = initial_capital;
        let mut years_survived = 0;
        for year in 1..=num_years {
            if capital <= 0.0 {
                break;
            }
            let losses = premium * self.loss_ratio.sample(rng);
            let underwriting_profit = premium - losses - expenses;
            // Earned on capital held before this year's result lands.
            let investment_income = capital * a.investment_return;
            capital += underwriting_profit + investment_income;
            years_survived = year;
        }
        CompanyTrial { years_survived, final_capital: capital }
    }

    /// All replicates, in replicate order.
    pub fn run_trials(&self, params: &CapitalParams, seed: Seed) -> Vec<CompanyTrial> {
        seed::replicate_seeds(seed, self.assumptions.num_simulations as usize)
            .into_par_iter()
            .map(|sub_seed| {
                let mut rng = seed::rng_for(sub_seed);
                self.simulate_company(params.capital_amount, params.num_years, &mut rng)
            })
            .collect()
    }

    pub fn run(&self, params: &CapitalParams, seed: Seed) -> CapitalSurvival {
        let trials = self.run_trials(params, seed);
        aggregate(params.capital_amount, params.num_years, &trials)
    }

    pub fn compute(&self, params: &CapitalParams, seed: Seed) -> SimulationResult {
        let s = self.run(params, seed);
        let a = &self.assumptions;
        log::debug!(
            "capital survival: capital={} years={} seed={seed} survival_rate={:.3} average_years={:.2}",
            s.initial_capital,
            s.num_years,
            s.survival_rate,
            s.average_years
        );

        let failed = s.num_simulations - s.survivors;
        let split = Series::categories(
            "Companies",
            vec![
                Category::new(format!("Survived all {} years", s.num_years), s.survivors as f64),
                Category::new(format!("Failed before year {}", s.num_years), failed as f64),
            ],
        );
        let histogram = Series::points(
            "Number of Companies",
            s.year_bins().iter().map(|bin| (bin.midpoint(), bin.count as f64)),
        );
        let curve = Series::points(
            "Survival rate",
            s.survival_curve.iter().enumerate().map(|(i, &share)| ((i + 1) as f64, share)),
        );

        SimulationResult::new(Concept::CapitalSurvival, Some(seed))
            .with_parameter("capital_amount", params.capital_amount)
            .with_parameter("num_years", f64::from(params.num_years))
            .with_parameter("annual_premium", a.annual_premium)
            .with_parameter("capital_ratio", params.capital_amount / a.annual_premium)
            .with_parameter("num_simulations", s.num_simulations as f64)
            .with_parameter("adequacy_threshold", a.adequacy_threshold)
            .with_statistic("capital_amount", params.capital_amount)
            .with_statistic("initial_capital", s.initial_capital)
            .with_statistic("num_years", f64::from(s.num_years))
            .with_statistic("survival_rate", s.survival_rate)
            .with_statistic("average_years", s.average_years)
            .with_statistic("average_final_capital", s.average_final_capital)
            .with_statistic("seed", seed::exact_f64(seed))
            .with_panel(
                Panel::new(
                    format!("Survival Rate with ${:.1}M Initial Capital", params.capital_amount),
                    PanelKind::Pie,
                )
                .series(split),
            )
            .with_panel(
                Panel::new("Distribution of Survival Years", PanelKind::Histogram)
                    .labels("Years Survived", "Number of Companies")
                    .series(histogram)
                    .reference("Average", Axis::X, s.average_years),
            )
            .with_panel(
                Panel::new("Survival Rate Over Time", PanelKind::Line)
                    .labels("Year", "Share of Companies Still Solvent")
                    .series(curve)
                    .reference("Adequacy threshold", Axis::Y, a.adequacy_threshold),
            )
    }
}

/// Reduce replicate outcomes to the batch summary. Ruined replicates are left
/// out of the final-capital average only.
pub fn aggregate(initial_capital: f64, num_years: u32, trials: &[CompanyTrial]) -> CapitalSurvival {
    let n = trials.len();
    let horizon = num_years as usize;

    let mut years_histogram = vec![0usize; horizon + 1];
    for t in trials {
        years_histogram[(t.years_survived as usize).min(horizon)] += 1;
    }
    let survivors = years_histogram[horizon];

    // Alive after year y = replicates with years_survived >= y.
    let mut survival_curve = vec![0.0; horizon];
    let mut alive = n;
    for y in 1..=horizon {
        alive -= years_histogram[y - 1];
        survival_curve[y - 1] = stats::ratio(alive as f64, n as f64).unwrap_or(0.0);
    }

    let years: Vec<f64> = trials.iter().map(|t| f64::from(t.years_survived)).collect();
    let solvent_capital: Vec<f64> =
        trials.iter().filter(|t| t.is_solvent()).map(|t| t.final_capital).collect();

    CapitalSurvival {
        initial_capital,
        num_years,
        num_simulations: n,
        survivors,
        survival_rate: stats::ratio(survivors as f64, n as f64).unwrap_or(0.0),
        average_years: stats::mean(&years).unwrap_or(0.0),
        average_final_capital: stats::mean(&solvent_capital),
        years_histogram,
        survival_curve,
    }
}

pub fn compute(params: &CapitalParams, seed: Seed) -> SimulationResult {
    CapitalSimulator::canonical().compute(params, seed)
}
