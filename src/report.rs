//! Plain-text interpretation of a result.
//!
//! Every number quoted here is read back out of the `SimulationResult`, so the
//! text always agrees with the chart drawn from the same result.

use std::fmt::Write;

use crate::result::{Concept, SimulationResult, Statistic};

const HEADER: &str = "Insurance Interpretation:\n";
const NA: &str = "N/A";

/// Render the interpretation bullets for `result`.
pub fn interpret(result: &SimulationResult) -> String {
    let mut text = String::from(HEADER);
    let view = View(result);
    match result.concept {
        Concept::Convergence => convergence(&view, &mut text),
        Concept::RiskPool => risk_pool(&view, &mut text),
        Concept::BalanceSheet => balance_sheet(&view, &mut text),
        Concept::Premium => premium(&view, &mut text),
        Concept::CapitalSurvival => capital(&view, &mut text),
    }
    text
}

/// Formatting accessors over a result. Missing or undefined values print as `N/A`.
struct View<'a>(&'a SimulationResult);

impl View<'_> {
    fn stat(&self, name: &str) -> Option<f64> {
        self.0.statistic(name).and_then(Statistic::value)
    }

    fn param(&self, name: &str) -> Option<f64> {
        self.0.parameter(name)
    }

    fn fixed(&self, value: Option<f64>, decimals: usize) -> String {
        value.map_or_else(|| NA.to_string(), |v| format!("{v:.decimals$}"))
    }

    fn percent(&self, value: Option<f64>, decimals: usize) -> String {
        value.map_or_else(|| NA.to_string(), |v| format!("{:.decimals$}%", v * 100.0))
    }

    fn dollars(&self, value: Option<f64>) -> String {
        value.map_or_else(|| NA.to_string(), |v| format!("${}", grouped(v)))
    }
}

/// Whole-number amount with thousands separators, e.g. `-1,234,568`.
fn grouped(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn convergence(v: &View, text: &mut String) {
    let p = v.param("true_probability");
    let gap = |observed: Option<f64>| {
        let diff = observed.zip(p).map(|(o, p)| (o - p).abs() * 100.0);
        v.fixed(diff, 1)
    };
    let small = v.stat("small_sample");
    let large = v.stat("large_sample");
    let _ = writeln!(
        text,
        "• With only {} drivers, the observed accident rate was {}, which is {} percentage points away from the true rate of {}",
        v.fixed(v.param("small_sample_size"), 0),
        v.percent(small, 1),
        gap(small),
        v.percent(p, 1)
    );
    let _ = writeln!(
        text,
        "• With {} drivers, the observed accident rate was {}, which is {} percentage points away from the true rate\n",
        v.param("large_sample_size").map_or_else(|| NA.to_string(), grouped),
        v.percent(large, 1),
        gap(large)
    );
    text.push_str("Insurance companies rely on large numbers of policyholders to make accurate predictions!");
}

fn risk_pool(v: &View, text: &mut String) {
    let claim = v.dollars(v.param("claim_amount"));
    let premium_total = v.stat("pool_premium_total");
    let losses = v.stat("total_losses");
    let _ = writeln!(
        text,
        "• Individual Risk: Each person has a {} chance of a {claim} loss.",
        v.percent(v.param("accident_probability"), 1)
    );
    let _ = writeln!(
        text,
        "• Without Insurance: {} people ({}%) faced a {claim} loss in this simulation.",
        v.fixed(v.stat("num_with_loss"), 0),
        v.fixed(v.stat("percent_with_loss"), 1)
    );
    let _ = writeln!(text, "• With Insurance: Everyone pays a premium of {}.", v.dollars(v.stat("fair_premium")));
    let _ = writeln!(
        text,
        "• Risk Pooling Result: The insurer collected {} and paid {} in claims.",
        v.dollars(premium_total),
        v.dollars(losses)
    );

    let gap = premium_total.zip(losses).map(|(p, l)| (p - l).abs());
    match v.stat("pool_performance") {
        Some(ratio) if ratio < 1.0 => {
            let _ = writeln!(text, "\n• This year the insurance pool had a {} surplus.", v.dollars(gap));
            text.push_str("• The surplus can be held as capital to handle future years when claims exceed premiums.");
        }
        Some(_) => {
            let _ = writeln!(text, "\n• This year the insurance pool had a {} deficit.", v.dollars(gap));
            text.push_str("• The deficit must be covered by the insurer's capital reserves.");
        }
        None => {
            let _ = writeln!(text, "\n• Pool performance (Actual/Expected): {NA}.");
            text.push_str("• No premium was collected, so the pool result cannot be measured.");
        }
    }
    text.push_str(
        "\n\n• Key Insight: As the number of policyholders increases, the 'Actual/Expected' ratio approaches 1.0, \
         making the insurance pool's results more predictable and stable.",
    );
}

fn balance_sheet(v: &View, text: &mut String) {
    let millions = |value: Option<f64>| value.map_or_else(|| NA.to_string(), |m| format!("${m:.1}M"));
    let _ = writeln!(
        text,
        "• Loss Ratio: {} ({} in losses per {} in premium)",
        v.fixed(v.param("loss_ratio"), 2),
        millions(v.stat("expected_losses")),
        millions(v.param("premium"))
    );
    let _ = writeln!(text, "• Underwriting Result: {}", millions(v.stat("underwriting_result")));
    let _ = writeln!(text, "• Investment Income: {}", millions(v.stat("investment_income")));
    let _ = writeln!(text, "• Total Profit: {}", millions(v.stat("total_profit")));
    let _ = writeln!(
        text,
        "• Capital: {} (Capital Ratio: {})\n",
        millions(v.stat("capital")),
        v.fixed(v.stat("capital_ratio"), 2)
    );

    let minimum = v.fixed(v.param("minimum_capital_ratio"), 2);
    let surplus = v.stat("capital_surplus");
    match v.0.statistic("adequately_capitalized").and_then(Statistic::flag) {
        Some(false) => {
            let _ = writeln!(text, "• ALERT: Capital ratio is below the regulatory minimum of {minimum}!");
            let _ = write!(
                text,
                "• The company needs at least {} more capital to meet minimum requirements.",
                millions(surplus.map(|s| -s))
            );
        }
        Some(true) => {
            let _ = write!(
                text,
                "• The company has {} of capital surplus above the regulatory minimum.",
                millions(surplus)
            );
        }
        None => {
            let _ = write!(text, "• Capital adequacy against the minimum of {minimum}: {NA}.");
        }
    }
}

fn premium(v: &View, text: &mut String) {
    let cents = |value: Option<f64>| value.map_or_else(|| NA.to_string(), |c| format!("${c:.2}"));
    let _ = writeln!(
        text,
        "• Accident Frequency: {} (probability of claim per year)",
        v.percent(v.param("accident_frequency"), 1)
    );
    let _ = writeln!(
        text,
        "• Average Claim Severity: {} (average cost when a claim occurs)",
        v.dollars(v.param("claim_severity"))
    );
    let _ = writeln!(text, "• Expected Loss: {} (pure cost of risk)", cents(v.stat("expected_loss")));
    let _ = writeln!(
        text,
        "• Expenses: {} ({} of premium for administration, commissions, etc.)",
        cents(v.stat("expenses")),
        v.percent(v.param("expense_ratio"), 0)
    );
    let _ = writeln!(
        text,
        "• Risk Margin: {} ({} of premium for profit and uncertainty)",
        cents(v.stat("risk_margin")),
        v.percent(v.param("risk_margin_ratio"), 0)
    );
    let _ = writeln!(text, "• Final Premium: {}\n", cents(v.stat("premium")));
    text.push_str("This is the base premium before applying individual rating factors like age, driving history, etc.");
}

fn capital(v: &View, text: &mut String) {
    let survival = v.stat("survival_rate");
    text.push_str("• Capital serves as a buffer against unexpected losses.\n");
    let _ = writeln!(
        text,
        "• With ${}M of initial capital ({}x annual premium), {} of companies survived all {} years.",
        v.fixed(v.param("capital_amount"), 1),
        v.fixed(v.param("capital_ratio"), 1),
        v.percent(survival, 1),
        v.fixed(v.param("num_years"), 0)
    );
    text.push_str("• Higher capital amounts mean better protection against insolvency.\n");
    text.push_str("• Insurance regulators require minimum capital levels to ensure companies can pay claims.\n\n");

    match survival.zip(v.param("adequacy_threshold")) {
        Some((rate, threshold)) if rate < threshold => {
            text.push_str("• Warning: This capital level may be inadequate for long-term stability.\n");
            text.push_str("• Recommendation: Increase capital to improve survival probability.");
        }
        Some(_) => text.push_str("• This capital level appears adequate with a high survival probability."),
        None => {
            let _ = write!(text, "• Capital adequacy: {NA}.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance_sheet::{self, BalanceSheetParams};
    use crate::capital::{self, CapitalParams};
    use crate::convergence::{self, ConvergenceParams};
    use crate::premium::{self, PremiumParams};
    use crate::risk_pool::{self, RiskPoolParams, simulate};
    use crate::config::Assumptions;
    use crate::seed;
    use crate::types::{Seed, SeedOffset};

    #[test]
    fn grouped_inserts_separators() {
        assert_eq!(grouped(0.0), "0");
        assert_eq!(grouped(999.4), "999");
        assert_eq!(grouped(1_000.0), "1,000");
        assert_eq!(grouped(100_000.0), "100,000");
        assert_eq!(grouped(-1_234_567.8), "-1,234,568");
    }

    #[test]
    fn every_concept_starts_with_the_header() {
        let results = [
            convergence::compute(&ConvergenceParams::default(), Seed(500)),
            risk_pool::compute(&RiskPoolParams::default(), Seed(600)),
            balance_sheet::compute(&BalanceSheetParams::default()),
            premium::compute(&PremiumParams::default()),
            capital::compute(&CapitalParams::new(50.0, 3).unwrap(), Seed(5_030)),
        ];
        for r in &results {
            let text = interpret(r);
            assert!(text.starts_with(HEADER), "{:?}", r.concept);
            assert!(!text.contains(NA), "{:?} printed N/A:\n{text}", r.concept);
        }
    }

    #[test]
    fn convergence_quotes_sample_sizes_and_true_rate() {
        let text = interpret(&convergence::compute(&ConvergenceParams::default(), Seed(500)));
        assert!(text.contains("With only 10 drivers"));
        assert!(text.contains("With 50,000 drivers"));
        assert!(text.contains("true rate of 5.0%"));
    }

    #[test]
    fn risk_pool_reports_surplus_or_deficit_with_the_same_amount() {
        let params = RiskPoolParams::new(0.3, 7).unwrap();
        for s in 0..10u64 {
            let pool = simulate(&params, &Assumptions::canonical().risk_pool, &mut seed::rng_for(Seed(s)));
            let text = interpret(&risk_pool::compute(&params, Seed(s)));
            let amount = format!("${}", grouped(pool.surplus().abs()));
            if pool.surplus() > 0.0 {
                assert!(text.contains(&format!("{amount} surplus")), "{text}");
            } else {
                assert!(text.contains(&format!("{amount} deficit")), "{text}");
            }
        }
    }

    #[test]
    fn risk_pool_without_premium_prints_na() {
        let text = interpret(&risk_pool::compute(&RiskPoolParams::new(0.0, 5).unwrap(), Seed(5)));
        assert!(text.contains("Actual/Expected): N/A"));
        assert!(!text.contains("surplus."));
    }

    #[test]
    fn balance_sheet_alert_below_minimum() {
        let text = interpret(&balance_sheet::compute(&BalanceSheetParams::new(0.65).unwrap()));
        assert!(text.contains("ALERT: Capital ratio is below the regulatory minimum of 0.50!"));
        assert!(text.contains("needs at least $5.0M more capital"));
        assert!(text.contains("Capital: $45.0M (Capital Ratio: 0.45)"));
    }

    #[test]
    fn balance_sheet_surplus_above_minimum() {
        let text = interpret(&balance_sheet::compute(&BalanceSheetParams::new(0.40).unwrap()));
        assert!(!text.contains("ALERT"));
        assert!(text.contains("has $20.0M of capital surplus"));
    }

    #[test]
    fn premium_quotes_loadings() {
        let text = interpret(&premium::compute(&PremiumParams::default()));
        assert!(text.contains("Accident Frequency: 5.0%"));
        assert!(text.contains("Average Claim Severity: $8,000"));
        assert!(text.contains("Expected Loss: $400.00"));
        assert!(text.contains("Expenses: $142.86 (25% of premium"));
        assert!(text.contains("Risk Margin: $28.57 (5% of premium"));
        assert!(text.contains("Final Premium: $571.43"));
    }

    #[test]
    fn capital_warns_below_threshold() {
        let params = CapitalParams::new(0.0001, 5).unwrap();
        let text = interpret(&capital::compute(&params, params.seed(SeedOffset::NONE)));
        assert!(text.contains("Warning: This capital level may be inadequate"));
        assert!(text.contains("(0.0x annual premium)"));
    }

    #[test]
    fn capital_adequate_when_well_funded() {
        let params = CapitalParams::new(100.0, 10).unwrap();
        let text = interpret(&capital::compute(&params, params.seed(SeedOffset::NONE)));
        assert!(text.contains("appears adequate"));
        assert!(text.contains("With $100.0M of initial capital (1.0x annual premium)"));
    }
}
