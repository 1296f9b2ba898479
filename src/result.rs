//! The result contract handed to the presentation layer.
//!
//! A [`SimulationResult`] carries the named statistics and the chart built from
//! the very same draws. Text and chart must both be rendered from one result;
//! nothing downstream recomputes a displayed number.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::Seed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Concept {
    Convergence,
    RiskPool,
    BalanceSheet,
    Premium,
    CapitalSurvival,
}

impl Concept {
    pub fn title(self) -> &'static str {
        match self {
            Concept::Convergence => "Law of Large Numbers",
            Concept::RiskPool => "Risk Pooling",
            Concept::BalanceSheet => "Balance Sheet",
            Concept::Premium => "Premium Calculation",
            Concept::CapitalSurvival => "Role of Capital",
        }
    }
}

/// One named statistic. `Undefined` stands in for a quotient whose denominator
/// was zero, or a value with no exact f64 form, and serializes as JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Statistic {
    Value(f64),
    Flag(bool),
    Undefined,
}

impl Statistic {
    pub fn value(self) -> Option<f64> {
        match self {
            Statistic::Value(v) => Some(v),
            Statistic::Flag(_) | Statistic::Undefined => None,
        }
    }

    pub fn flag(self) -> Option<bool> {
        match self {
            Statistic::Flag(b) => Some(b),
            Statistic::Value(_) | Statistic::Undefined => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Statistic::Undefined)
    }
}

impl From<f64> for Statistic {
    fn from(v: f64) -> Self {
        Statistic::Value(v)
    }
}

impl From<Option<f64>> for Statistic {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Statistic::Undefined, Statistic::Value)
    }
}

impl From<bool> for Statistic {
    fn from(b: bool) -> Self {
        Statistic::Flag(b)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub concept: Concept,
    /// Seed the draws came from; `None` for the deterministic concepts.
    pub seed: Option<Seed>,
    /// Inputs and fixed assumptions quoted by the interpretation text.
    pub parameters: BTreeMap<&'static str, f64>,
    pub statistics: BTreeMap<&'static str, Statistic>,
    pub chart: Chart,
}

impl SimulationResult {
    pub fn new(concept: Concept, seed: Option<Seed>) -> Self {
        SimulationResult {
            concept,
            seed,
            parameters: BTreeMap::new(),
            statistics: BTreeMap::new(),
            chart: Chart { title: concept.title().to_string(), panels: Vec::new() },
        }
    }

    pub fn with_parameter(mut self, name: &'static str, value: f64) -> Self {
        self.parameters.insert(name, value);
        self
    }

    pub fn with_statistic(mut self, name: &'static str, stat: impl Into<Statistic>) -> Self {
        let stat = stat.into();
        if stat.is_undefined() {
            log::warn!("{:?}: statistic {name} is undefined", self.concept);
        }
        self.statistics.insert(name, stat);
        self
    }

    pub fn with_panel(mut self, panel: Panel) -> Self {
        self.chart.panels.push(panel);
        self
    }

    pub fn statistic(&self, name: &str) -> Option<Statistic> {
        self.statistics.get(name).copied()
    }

    /// Numeric value of a statistic; `None` if absent, undefined or a flag.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.statistic(name).and_then(Statistic::value)
    }

    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).copied()
    }
}

// ── Chart specification ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub panels: Vec<Panel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    Line,
    /// Log-scaled x axis.
    SemiLogX,
    LogLog,
    Bar,
    StackedBar,
    Waterfall,
    Pie,
    Histogram,
    Gauge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub label: String,
    pub value: f64,
    /// Bottom of the bar for stacked and waterfall panels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,
}

impl Category {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Category { label: label.into(), value, base: None }
    }

    pub fn stacked(label: impl Into<String>, value: f64, base: f64) -> Self {
        Category { label: label.into(), value, base: Some(base) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesData {
    Points(Vec<Point>),
    Categories(Vec<Category>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub data: SeriesData,
}

impl Series {
    pub fn points(name: impl Into<String>, points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Series {
            name: name.into(),
            data: SeriesData::Points(points.into_iter().map(|(x, y)| Point { x, y }).collect()),
        }
    }

    pub fn categories(name: impl Into<String>, categories: Vec<Category>) -> Self {
        Series { name: name.into(), data: SeriesData::Categories(categories) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub label: String,
    pub axis: Axis,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub kind: PanelKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    pub series: Vec<Series>,
    pub reference_lines: Vec<ReferenceLine>,
}

impl Panel {
    pub fn new(title: impl Into<String>, kind: PanelKind) -> Self {
        Panel {
            title: title.into(),
            kind,
            x_label: None,
            y_label: None,
            series: Vec::new(),
            reference_lines: Vec::new(),
        }
    }

    pub fn labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = Some(x.into());
        self.y_label = Some(y.into());
        self
    }

    pub fn series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn reference(mut self, label: impl Into<String>, axis: Axis, value: f64) -> Self {
        self.reference_lines.push(ReferenceLine { label: label.into(), axis, value });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_serializes_as_null() {
        let r = SimulationResult::new(Concept::RiskPool, Some(Seed(1)))
            .with_statistic("pool_performance", None::<f64>)
            .with_statistic("fair_premium", 1000.0);
        let json = serde_json::to_value(&r).unwrap();
        assert!(json["statistics"]["pool_performance"].is_null());
        assert_eq!(json["statistics"]["fair_premium"], 1000.0);
        assert_eq!(json["concept"], "risk_pool");
        assert_eq!(json["seed"], 1);
    }

    #[test]
    fn flag_is_not_a_value() {
        let r = SimulationResult::new(Concept::BalanceSheet, None)
            .with_statistic("adequately_capitalized", true);
        assert_eq!(r.value("adequately_capitalized"), None);
        assert_eq!(r.statistic("adequately_capitalized").and_then(Statistic::flag), Some(true));
    }

    #[test]
    fn missing_statistic_is_none() {
        let r = SimulationResult::new(Concept::Premium, None);
        assert_eq!(r.statistic("premium"), None);
        assert_eq!(r.parameter("claim_severity"), None);
    }

    #[test]
    fn panels_accumulate_in_order() {
        let r = SimulationResult::new(Concept::Convergence, Some(Seed(3)))
            .with_panel(Panel::new("a", PanelKind::SemiLogX))
            .with_panel(Panel::new("b", PanelKind::LogLog));
        let titles: Vec<_> = r.chart.panels.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert_eq!(r.chart.title, "Law of Large Numbers");
    }
}
