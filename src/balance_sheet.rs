//! Single-year balance sheet and income statement derived from a loss ratio.
//!
//! Capital is the residual `assets − liabilities`; it is never estimated on its
//! own, so the accounting identity holds by construction.

use crate::config::{Assumptions, BalanceSheetAssumptions};
use crate::error::{self, ParameterError};
use crate::result::{Axis, Category, Concept, Panel, PanelKind, Series, SimulationResult};
use crate::stats;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceSheetParams {
    loss_ratio: f64,
}

impl BalanceSheetParams {
    pub fn new(loss_ratio: f64) -> Result<Self, ParameterError> {
        Ok(BalanceSheetParams { loss_ratio: error::check_probability("loss_ratio", loss_ratio)? })
    }

    pub fn loss_ratio(&self) -> f64 {
        self.loss_ratio
    }
}

impl Default for BalanceSheetParams {
    fn default() -> Self {
        BalanceSheetParams { loss_ratio: 0.65 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assets {
    pub premiums_receivable: f64,
    pub cash_and_investments: f64,
}

impl Assets {
    pub fn total(&self) -> f64 {
        self.premiums_receivable + self.cash_and_investments
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Liabilities {
    pub loss_reserves: f64,
    pub unearned_premium: f64,
}

impl Liabilities {
    pub fn total(&self) -> f64 {
        self.loss_reserves + self.unearned_premium
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceSheet {
    pub loss_ratio: f64,
    pub premium: f64,
    pub expected_losses: f64,
    pub expenses: f64,
    pub underwriting_result: f64,
    pub required_capital: f64,
    pub investable_assets: f64,
    pub investment_income: f64,
    pub total_profit: f64,
    pub assets: Assets,
    pub liabilities: Liabilities,
    /// Residual: `assets.total() − liabilities.total()`.
    pub capital: f64,
    /// `None` only if premium is zero.
    pub capital_ratio: Option<f64>,
    pub minimum_capital_ratio: f64,
}

impl BalanceSheet {
    pub fn total_assets(&self) -> f64 {
        self.assets.total()
    }

    pub fn total_liabilities(&self) -> f64 {
        self.liabilities.total()
    }

    pub fn minimum_capital(&self) -> f64 {
        self.minimum_capital_ratio * self.premium
    }

    /// Capital above the regulatory minimum. Negative is a shortfall.
    pub fn capital_surplus(&self) -> f64 {
        self.capital - self.minimum_capital()
    }

    pub fn adequately_capitalized(&self) -> bool {
        self.capital_ratio.is_some_and(|r| r >= self.minimum_capital_ratio)
    }
}

pub fn derive(params: &BalanceSheetParams, a: &BalanceSheetAssumptions) -> BalanceSheet {
    let premium = a.premium;

    let expected_losses = premium * params.loss_ratio;
    let expenses = premium * a.expense_ratio;
    let underwriting_result = premium - expected_losses - expenses;

    let required_capital = premium * a.required_capital_ratio;
    let investable_assets = premium + required_capital;
    let investment_income = investable_assets * a.investment_return;

    let total_profit = underwriting_result + investment_income;

    let assets = Assets {
        premiums_receivable: premium * a.receivable_ratio,
        cash_and_investments: investable_assets,
    };
    let liabilities = Liabilities {
        loss_reserves: expected_losses,
        unearned_premium: premium * a.unearned_premium_ratio,
    };
    let capital = assets.total() - liabilities.total();

    BalanceSheet {
        loss_ratio: params.loss_ratio,
        premium,
        expected_losses,
        expenses,
        underwriting_result,
        required_capital,
        investable_assets,
        investment_income,
        total_profit,
        assets,
        liabilities,
        capital,
        capital_ratio: stats::ratio(capital, premium),
        minimum_capital_ratio: a.minimum_capital_ratio,
    }
}

pub fn compute(params: &BalanceSheetParams) -> SimulationResult {
    compute_with(params, &Assumptions::canonical().balance_sheet)
}

pub fn compute_with(params: &BalanceSheetParams, assumptions: &BalanceSheetAssumptions) -> SimulationResult {
    let bs = derive(params, assumptions);
    log::debug!(
        "balance sheet: loss_ratio={} capital={:.2} ratio={:?}",
        bs.loss_ratio,
        bs.capital,
        bs.capital_ratio
    );

    SimulationResult::new(Concept::BalanceSheet, None)
        .with_parameter("loss_ratio", bs.loss_ratio)
        .with_parameter("premium", bs.premium)
        .with_parameter("minimum_capital_ratio", bs.minimum_capital_ratio)
        .with_statistic("expected_losses", bs.expected_losses)
        .with_statistic("expenses", bs.expenses)
        .with_statistic("underwriting_result", bs.underwriting_result)
        .with_statistic("investment_income", bs.investment_income)
        .with_statistic("total_profit", bs.total_profit)
        .with_statistic("total_assets", bs.total_assets())
        .with_statistic("total_liabilities", bs.total_liabilities())
        .with_statistic("capital", bs.capital)
        .with_statistic("capital_ratio", bs.capital_ratio)
        .with_statistic("capital_surplus", bs.capital_surplus())
        .with_statistic("adequately_capitalized", bs.adequately_capitalized())
        .with_panel(balance_panel(&bs))
        .with_panel(waterfall_panel(&bs))
        .with_panel(
            Panel::new("Capital Adequacy", PanelKind::Gauge)
                .labels("Capital ($M)", "")
                .series(Series::categories("Capital", vec![Category::new("Capital", bs.capital)]))
                .reference("Regulatory minimum", Axis::X, bs.minimum_capital()),
        )
}

fn balance_panel(bs: &BalanceSheet) -> Panel {
    let a = &bs.assets;
    let l = &bs.liabilities;
    let assets = Series::categories(
        "Assets",
        vec![
            Category::stacked("Premiums Receivable", a.premiums_receivable, 0.0),
            Category::stacked("Cash & Investments", a.cash_and_investments, a.premiums_receivable),
        ],
    );
    let mut base = 0.0;
    let mut liab_capital = Vec::with_capacity(3);
    for (label, value) in [
        ("Loss Reserves", l.loss_reserves),
        ("Unearned Premium", l.unearned_premium),
        ("Capital (Equity)", bs.capital),
    ] {
        liab_capital.push(Category::stacked(label, value, base));
        base += value;
    }

    Panel::new("Insurance Company Balance Sheet", PanelKind::StackedBar)
        .labels("", "Amount ($M)")
        .series(assets)
        .series(Series::categories("Liabilities & Capital", liab_capital))
}

/// Premium, losses, expenses and investment income stack into profit; the
/// profit bar itself starts at zero.
fn waterfall_panel(bs: &BalanceSheet) -> Panel {
    let mut cumulative = 0.0;
    let mut bars = Vec::with_capacity(5);
    for (label, value) in [
        ("Premium", bs.premium),
        ("Losses", -bs.expected_losses),
        ("Expenses", -bs.expenses),
        ("Investment Income", bs.investment_income),
    ] {
        let bottom = if value > 0.0 { cumulative } else { cumulative + value };
        bars.push(Category::stacked(label, value, bottom));
        cumulative += value;
    }
    bars.push(Category::stacked("Profit/Loss", bs.total_profit, 0.0));

    Panel::new("Income Statement Components", PanelKind::Waterfall)
        .labels("", "Amount ($M)")
        .series(Series::categories("Income", bars))
}
