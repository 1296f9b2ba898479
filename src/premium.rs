//! Premium built backward from expected loss and proportional loadings.

use crate::config::{Assumptions, PremiumAssumptions};
use crate::error::{self, ParameterError};
use crate::result::{Category, Concept, Panel, PanelKind, Series, SimulationResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PremiumParams {
    accident_frequency: f64,
    claim_severity: f64,
}

impl PremiumParams {
    pub fn new(accident_frequency: f64, claim_severity: f64) -> Result<Self, ParameterError> {
        Ok(PremiumParams {
            accident_frequency: error::check_probability("accident_frequency", accident_frequency)?,
            claim_severity: error::check_positive("claim_severity", claim_severity)?,
        })
    }

    pub fn accident_frequency(&self) -> f64 {
        self.accident_frequency
    }

    pub fn claim_severity(&self) -> f64 {
        self.claim_severity
    }
}

impl Default for PremiumParams {
    fn default() -> Self {
        PremiumParams { accident_frequency: 0.05, claim_severity: 8_000.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PremiumBreakdown {
    /// Pure cost of risk: frequency × severity.
    pub expected_loss: f64,
    pub expenses: f64,
    pub risk_margin: f64,
    pub premium: f64,
}

/// Solve `premium = expected_loss + e·premium + r·premium` for premium.
pub fn price(params: &PremiumParams, a: &PremiumAssumptions) -> PremiumBreakdown {
    let expected_loss = params.accident_frequency * params.claim_severity;
    let permissible_loss_ratio = 1.0 - a.expense_ratio - a.risk_margin_ratio;
    let premium = expected_loss / permissible_loss_ratio;
    PremiumBreakdown {
        expected_loss,
        expenses: premium * a.expense_ratio,
        risk_margin: premium * a.risk_margin_ratio,
        premium,
    }
}

pub fn compute(params: &PremiumParams) -> SimulationResult {
    compute_with(params, &Assumptions::canonical().premium)
}

pub fn compute_with(params: &PremiumParams, assumptions: &PremiumAssumptions) -> SimulationResult {
    let b = price(params, assumptions);
    log::debug!(
        "premium: frequency={} severity={} premium={:.2}",
        params.accident_frequency,
        params.claim_severity,
        b.premium
    );

    let mut base = 0.0;
    let mut components = Vec::with_capacity(3);
    for (label, value) in [
        ("Expected Loss", b.expected_loss),
        ("Expenses", b.expenses),
        ("Risk Margin", b.risk_margin),
    ] {
        components.push(Category::stacked(label, value, base));
        base += value;
    }

    SimulationResult::new(Concept::Premium, None)
        .with_parameter("accident_frequency", params.accident_frequency)
        .with_parameter("claim_severity", params.claim_severity)
        .with_parameter("expense_ratio", assumptions.expense_ratio)
        .with_parameter("risk_margin_ratio", assumptions.risk_margin_ratio)
        .with_statistic("expected_loss", b.expected_loss)
        .with_statistic("expenses", b.expenses)
        .with_statistic("risk_margin", b.risk_margin)
        .with_statistic("premium", b.premium)
        .with_panel(
            Panel::new("Premium Components", PanelKind::StackedBar)
                .labels("", "Amount ($)")
                .series(Series::categories("Premium", components)),
        )
        .with_panel(
            Panel::new("Premium Breakdown", PanelKind::Pie).series(Series::categories(
                "Share of premium",
                vec![
                    Category::new("Expected Loss", b.expected_loss),
                    Category::new("Expenses", b.expenses),
                    Category::new("Risk Margin", b.risk_margin),
                ],
            )),
        )
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    use super::*;

    fn breakdown(frequency: f64, severity: f64) -> PremiumBreakdown {
        price(&PremiumParams::new(frequency, severity).unwrap(), &Assumptions::canonical().premium)
    }

    #[test]
    fn canonical_pricing_scenario() {
        let b = breakdown(0.05, 8_000.0);
        assert_abs_diff_eq!(b.expected_loss, 400.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.premium, 571.43, epsilon = 0.01);
        assert_abs_diff_eq!(b.expenses, 142.86, epsilon = 0.01);
        assert_abs_diff_eq!(b.risk_margin, 28.57, epsilon = 0.01);
    }

    #[test]
    fn zero_frequency_prices_at_zero() {
        let b = breakdown(0.0, 2_000.0);
        assert_eq!(b.premium, 0.0);
        assert_eq!(b.expenses, 0.0);
    }

    #[test]
    fn result_exposes_the_four_components() {
        let r = compute(&PremiumParams::default());
        assert_eq!(r.statistics.len(), 4);
        assert_eq!(r.seed, None);
        assert_abs_diff_eq!(r.value("premium").unwrap(), 4_000.0 / 7.0, epsilon = 1e-9);
    }

    #[test]
    fn severity_must_be_positive() {
        assert!(PremiumParams::new(0.05, 0.0).is_err());
        assert!(PremiumParams::new(0.05, -10.0).is_err());
    }

    proptest! {
        #[test]
        fn components_sum_to_premium(frequency in 0.0f64..=1.0, severity in 1.0f64..1_000_000.0) {
            let b = breakdown(frequency, severity);
            let total = b.expected_loss + b.expenses + b.risk_margin;
            prop_assert!((total - b.premium).abs() <= 1e-9 * b.premium.max(1.0));
        }
    }
}
