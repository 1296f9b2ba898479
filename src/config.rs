use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{self, ConfigError, ParameterError};

/// Upper bound on capital-survival replicates per run.
pub const MAX_SIMULATIONS: u64 = 100_000;

/// Sample sizes for the convergence demonstration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceAssumptions {
    /// Strictly ascending; exponential spacing reads well on log axes.
    pub sample_sizes: Vec<u64>,
    /// Sample size reported as the "medium" headline. Must appear in `sample_sizes`.
    pub medium_sample_size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPoolAssumptions {
    /// Loss suffered by each policyholder who has an accident.
    pub claim_amount: f64,
}

/// Fixed inputs of the single-year balance sheet. Monetary values in millions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetAssumptions {
    pub premium: f64,
    pub expense_ratio: f64,
    /// Capital held against the book, as a fraction of premium.
    pub required_capital_ratio: f64,
    pub investment_return: f64,
    /// Share of premium written but not yet collected.
    pub receivable_ratio: f64,
    /// Share of premium not yet earned at the balance-sheet date.
    pub unearned_premium_ratio: f64,
    /// Regulatory floor on capital / premium.
    pub minimum_capital_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumAssumptions {
    pub expense_ratio: f64,
    pub risk_margin_ratio: f64,
}

/// Fixed inputs of the multi-year solvency simulation. Monetary values in millions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalAssumptions {
    pub annual_premium: f64,
    pub expected_loss_ratio: f64,
    /// Standard deviation of the annual loss ratio.
    pub loss_ratio_volatility: f64,
    /// Lowest loss ratio a year can produce.
    pub loss_ratio_floor: f64,
    pub expense_ratio: f64,
    pub investment_return: f64,
    /// Monte Carlo replicate count.
    pub num_simulations: u32,
    /// Survival rate below which the report advises more capital.
    pub adequacy_threshold: f64,
}

/// Every constant the five concepts rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    pub convergence: ConvergenceAssumptions,
    pub risk_pool: RiskPoolAssumptions,
    pub balance_sheet: BalanceSheetAssumptions,
    pub premium: PremiumAssumptions,
    pub capital: CapitalAssumptions,
}

impl Assumptions {
    pub fn canonical() -> Self {
        Assumptions {
            convergence: ConvergenceAssumptions {
                sample_sizes: vec![10, 50, 100, 500, 1_000, 5_000, 10_000, 50_000],
                medium_sample_size: 5_000,
            },
            risk_pool: RiskPoolAssumptions { claim_amount: 20_000.0 },
            // ── A small insurer writing $100M a year ──────────────────────────
            balance_sheet: BalanceSheetAssumptions {
                premium: 100.0,
                expense_ratio: 0.25,
                required_capital_ratio: 0.5,
                investment_return: 0.05,
                receivable_ratio: 0.1,
                unearned_premium_ratio: 0.5,
                minimum_capital_ratio: 0.5,
            },
            premium: PremiumAssumptions { expense_ratio: 0.25, risk_margin_ratio: 0.05 },
            capital: CapitalAssumptions {
                annual_premium: 100.0,
                expected_loss_ratio: 0.65,
                loss_ratio_volatility: 0.15,
                loss_ratio_floor: 0.20,
                expense_ratio: 0.30,
                investment_return: 0.05,
                num_simulations: 500,
                adequacy_threshold: 0.90,
            },
        }
    }

    /// Load a complete assumptions document from JSON and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let assumptions: Assumptions = serde_json::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        assumptions
            .validate()
            .map_err(|source| ConfigError::Invalid { path: path.to_path_buf(), source })?;
        log::info!("loaded assumptions from {}", path.display());
        Ok(assumptions)
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        let conv = &self.convergence;
        if conv.sample_sizes.is_empty() {
            return Err(ParameterError::BelowMinimum { field: "sample_sizes.len", min: 1, value: 0 });
        }
        for &n in &conv.sample_sizes {
            error::check_at_least("sample_sizes", 1, n)?;
        }
        if conv.sample_sizes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ParameterError::Inconsistent {
                field: "sample_sizes",
                reason: "must be strictly ascending",
            });
        }
        if !conv.sample_sizes.contains(&conv.medium_sample_size) {
            return Err(ParameterError::Inconsistent {
                field: "medium_sample_size",
                reason: "must be one of sample_sizes",
            });
        }

        error::check_positive("claim_amount", self.risk_pool.claim_amount)?;

        let bs = &self.balance_sheet;
        error::check_positive("balance_sheet.premium", bs.premium)?;
        error::check_probability("balance_sheet.expense_ratio", bs.expense_ratio)?;
        error::check_finite("required_capital_ratio", bs.required_capital_ratio)?;
        error::check_finite("balance_sheet.investment_return", bs.investment_return)?;
        error::check_probability("receivable_ratio", bs.receivable_ratio)?;
        error::check_probability("unearned_premium_ratio", bs.unearned_premium_ratio)?;
        error::check_finite("minimum_capital_ratio", bs.minimum_capital_ratio)?;

        let pr = &self.premium;
        error::check_probability("premium.expense_ratio", pr.expense_ratio)?;
        error::check_probability("risk_margin_ratio", pr.risk_margin_ratio)?;
        let loadings = pr.expense_ratio + pr.risk_margin_ratio;
        if loadings >= 1.0 {
            return Err(ParameterError::Inconsistent {
                field: "expense_ratio + risk_margin_ratio",
                reason: "must be below 1",
            });
        }

        let cap = &self.capital;
        error::check_positive("annual_premium", cap.annual_premium)?;
        error::check_finite("expected_loss_ratio", cap.expected_loss_ratio)?;
        error::check_finite("loss_ratio_floor", cap.loss_ratio_floor)?;
        error::check_finite("capital.expense_ratio", cap.expense_ratio)?;
        error::check_finite("capital.investment_return", cap.investment_return)?;
        error::check_between("num_simulations", 1, MAX_SIMULATIONS, u64::from(cap.num_simulations))?;
        error::check_probability("adequacy_threshold", cap.adequacy_threshold)?;
        crate::capital::LossRatioModel::new(cap)?;

        Ok(())
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_is_valid() {
        assert_eq!(Assumptions::canonical().validate(), Ok(()));
    }

    #[test]
    fn unsorted_sample_sizes_rejected() {
        let mut a = Assumptions::canonical();
        a.convergence.sample_sizes = vec![10, 100, 50];
        assert_eq!(
            a.validate(),
            Err(ParameterError::Inconsistent { field: "sample_sizes", reason: "must be strictly ascending" })
        );
    }

    #[test]
    fn medium_sample_size_must_be_listed() {
        let mut a = Assumptions::canonical();
        a.convergence.medium_sample_size = 7;
        assert!(a.validate().is_err());
    }

    #[test]
    fn premium_loadings_must_leave_room_for_losses() {
        let mut a = Assumptions::canonical();
        a.premium.expense_ratio = 0.7;
        a.premium.risk_margin_ratio = 0.3;
        assert!(matches!(a.validate(), Err(ParameterError::Inconsistent { .. })));
    }

    #[test]
    fn replicate_count_is_bounded() {
        let mut a = Assumptions::canonical();
        a.capital.num_simulations = 0;
        assert!(matches!(a.validate(), Err(ParameterError::BelowMinimum { .. })));
        a.capital.num_simulations = MAX_SIMULATIONS as u32 + 1;
        assert!(matches!(a.validate(), Err(ParameterError::AboveMaximum { field: "num_simulations", .. })));
    }

    #[test]
    fn negative_volatility_rejected() {
        let mut a = Assumptions::canonical();
        a.capital.loss_ratio_volatility = -0.1;
        assert!(matches!(a.validate(), Err(ParameterError::LossDistribution(_))));
    }

    #[test]
    fn json_roundtrip_preserves_canonical() {
        let a = Assumptions::canonical();
        let text = serde_json::to_string(&a).unwrap();
        let back: Assumptions = serde_json::from_str(&text).unwrap();
        assert_eq!(a, back);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Assumptions::load(Path::new("/nonexistent/assumptions.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }), "got {err:?}");
    }

    #[test]
    fn load_reads_valid_override() {
        let mut a = Assumptions::canonical();
        a.capital.num_simulations = 50;
        let path = std::env::temp_dir().join(format!("fundamentals-assumptions-{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string_pretty(&a).unwrap()).unwrap();
        let loaded = Assumptions::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.capital.num_simulations, 50);
    }
}
