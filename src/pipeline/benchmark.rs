use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::Metric;
use crate::pipeline::summary::KpiSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkKey {
    Roas,
    Ctr,
    Cpc,
    SpendShareOfGp,
}

impl BenchmarkKey {
    pub fn label(self) -> &'static str {
        match self {
            BenchmarkKey::Roas => "ROAS",
            BenchmarkKey::Ctr => "CTR",
            BenchmarkKey::Cpc => "CPC",
            BenchmarkKey::SpendShareOfGp => "Spend / Gross Profit",
        }
    }

    pub fn format(self) -> MetricFormat {
        match self {
            BenchmarkKey::Roas => MetricFormat::Decimal,
            BenchmarkKey::Ctr => MetricFormat::Percent { decimals: 2 },
            BenchmarkKey::Cpc => MetricFormat::Currency,
            BenchmarkKey::SpendShareOfGp => MetricFormat::Percent { decimals: 1 },
        }
    }
}

impl fmt::Display for BenchmarkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkTarget {
    pub key: BenchmarkKey,
    pub target: f64,
    pub direction: Direction,
}

impl BenchmarkTarget {
    pub fn new(key: BenchmarkKey, target: f64, direction: Direction) -> Self {
        Self {
            key,
            target,
            direction,
        }
    }

    pub fn judge(&self, actual: Metric) -> Outcome {
        match actual {
            Metric::Undefined => Outcome::NotApplicable,
            Metric::Defined(v) => {
                let pass = match self.direction {
                    Direction::HigherIsBetter => v >= self.target,
                    Direction::LowerIsBetter => v <= self.target,
                };
                if pass {
                    Outcome::Pass
                } else {
                    Outcome::Fail
                }
            }
        }
    }
}

/// The benchmark set with its fixed directions.
pub fn standard_targets(roas: f64, ctr: f64, cpc: f64, spend_share_of_gp: f64) -> Vec<BenchmarkTarget> {
    vec![
        BenchmarkTarget::new(BenchmarkKey::Roas, roas, Direction::HigherIsBetter),
        BenchmarkTarget::new(BenchmarkKey::Ctr, ctr, Direction::HigherIsBetter),
        BenchmarkTarget::new(BenchmarkKey::Cpc, cpc, Direction::LowerIsBetter),
        BenchmarkTarget::new(
            BenchmarkKey::SpendShareOfGp,
            spend_share_of_gp,
            Direction::LowerIsBetter,
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Fail,
    NotApplicable,
}

impl Outcome {
    pub fn indicator(self) -> &'static str {
        match self {
            Outcome::Pass => "PASS",
            Outcome::Fail => "FAIL",
            Outcome::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.indicator())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricFormat {
    Decimal,
    Percent { decimals: usize },
    Currency,
}

impl MetricFormat {
    pub fn render(self, value: Metric) -> String {
        let Some(v) = value.value() else {
            return "n/a".to_string();
        };
        match self {
            MetricFormat::Decimal => format!("{:.2}", v),
            MetricFormat::Percent { decimals } => format!("{:.*}%", decimals, v * 100.0),
            MetricFormat::Currency => format!("${:.2}", v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub target: BenchmarkTarget,
    pub actual: Metric,
    pub outcome: Outcome,
}

impl BenchmarkResult {
    /// (actual, target, indicator) rendered for display.
    pub fn display(&self) -> (String, String, &'static str) {
        let fmt = self.target.key.format();
        (
            fmt.render(self.actual),
            fmt.render(Metric::Defined(self.target.target)),
            self.outcome.indicator(),
        )
    }
}

/// Judges each target against its actual. A key absent from `actuals` is not applicable.
pub fn evaluate(
    actuals: &BTreeMap<BenchmarkKey, Metric>,
    targets: &[BenchmarkTarget],
) -> Vec<BenchmarkResult> {
    targets
        .iter()
        .map(|t| {
            let actual = actuals.get(&t.key).copied().unwrap_or(Metric::Undefined);
            BenchmarkResult {
                target: *t,
                actual,
                outcome: t.judge(actual),
            }
        })
        .collect()
}

/// The actual values a KPI summary offers for each benchmark.
pub fn actuals_from(kpis: &KpiSummary) -> BTreeMap<BenchmarkKey, Metric> {
    BTreeMap::from([
        (BenchmarkKey::Roas, kpis.blended_roas),
        (BenchmarkKey::Ctr, kpis.ctr),
        (BenchmarkKey::Cpc, kpis.cpc),
        (BenchmarkKey::SpendShareOfGp, kpis.spend_share_of_gp),
    ])
}
