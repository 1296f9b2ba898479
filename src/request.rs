//! One request per concept, dispatched to the matching computation.
//!
//! The caller supplies the parameters and an offset; the seed itself is always
//! derived here, so the same request reproduces the same result.

use crate::balance_sheet::{self, BalanceSheetParams};
use crate::capital::{self, CapitalParams, CapitalSimulator};
use crate::config::Assumptions;
use crate::convergence::{self, ConvergenceParams};
use crate::error::ParameterError;
use crate::premium::{self, PremiumParams};
use crate::result::{Concept, SimulationResult};
use crate::risk_pool::{self, RiskPoolParams};
use crate::types::{Seed, SeedOffset};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    Convergence(ConvergenceParams),
    RiskPool(RiskPoolParams),
    BalanceSheet(BalanceSheetParams),
    Premium(PremiumParams),
    CapitalSurvival(CapitalParams),
}

impl Request {
    pub fn concept(&self) -> Concept {
        match self {
            Request::Convergence(_) => Concept::Convergence,
            Request::RiskPool(_) => Concept::RiskPool,
            Request::BalanceSheet(_) => Concept::BalanceSheet,
            Request::Premium(_) => Concept::Premium,
            Request::CapitalSurvival(_) => Concept::CapitalSurvival,
        }
    }

    pub fn is_stochastic(&self) -> bool {
        self.seed(SeedOffset::NONE).is_some()
    }

    /// Derived seed; `None` for the deterministic concepts, which ignore the offset.
    pub fn seed(&self, offset: SeedOffset) -> Option<Seed> {
        match self {
            Request::Convergence(p) => Some(p.seed(offset)),
            Request::RiskPool(p) => Some(p.seed(offset)),
            Request::CapitalSurvival(p) => Some(p.seed(offset)),
            Request::BalanceSheet(_) | Request::Premium(_) => None,
        }
    }

    /// Compute under the canonical assumptions.
    pub fn compute(&self, offset: SeedOffset) -> SimulationResult {
        match self {
            Request::Convergence(p) => convergence::compute(p, p.seed(offset)),
            Request::RiskPool(p) => risk_pool::compute(p, p.seed(offset)),
            Request::BalanceSheet(p) => balance_sheet::compute(p),
            Request::Premium(p) => premium::compute(p),
            Request::CapitalSurvival(p) => capital::compute(p, p.seed(offset)),
        }
    }

    /// Compute under caller-supplied assumptions. Fails only if the loss-ratio
    /// distribution in `assumptions` cannot be built.
    pub fn compute_with(
        &self,
        assumptions: &Assumptions,
        offset: SeedOffset,
    ) -> Result<SimulationResult, ParameterError> {
        let result = match self {
            Request::Convergence(p) => convergence::compute_with(p, &assumptions.convergence, p.seed(offset)),
            Request::RiskPool(p) => risk_pool::compute_with(p, &assumptions.risk_pool, p.seed(offset)),
            Request::BalanceSheet(p) => balance_sheet::compute_with(p, &assumptions.balance_sheet),
            Request::Premium(p) => premium::compute_with(p, &assumptions.premium),
            Request::CapitalSurvival(p) => {
                CapitalSimulator::new(&assumptions.capital)?.compute(p, p.seed(offset))
            }
        };
        log::info!(
            "{:?} computed (seed {:?}, {} statistics)",
            result.concept,
            result.seed.map(|s| s.0),
            result.statistics.len()
        );
        Ok(result)
    }
}
