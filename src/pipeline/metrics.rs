use serde::{Deserialize, Serialize};

use crate::models::{HasTotals, MarketingTotals, Metric};

/// Efficiency ratios derived from [`MarketingTotals`].
///
/// `ctr` is zero when there were no impressions; `cpc`, `cpm` and `roas`
/// are `Undefined` on their zero denominators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub ctr: f64,
    pub cpc: Metric,
    pub cpm: Metric,
    pub roas: Metric,
}

impl DerivedMetrics {
    pub fn from_totals(t: &MarketingTotals) -> Self {
        let impressions = t.impressions as f64;
        let clicks = t.clicks as f64;

        Self {
            ctr: Metric::ratio(clicks, impressions).value().unwrap_or(0.0),
            cpc: Metric::ratio(t.spend, clicks),
            cpm: Metric::ratio(t.spend, impressions / 1000.0),
            roas: Metric::ratio(t.attributed_revenue, t.spend),
        }
    }

    pub fn of<T: HasTotals>(row: &T) -> Self {
        Self::from_totals(&row.totals())
    }
}

/// A row paired with the metrics derived from its own totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithMetrics<T> {
    #[serde(flatten)]
    pub row: T,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
}

/// Augments every row with its derived metrics. Granularity-agnostic:
/// the same call serves raw records and pre-summed aggregates.
pub fn derive_metrics<T, I>(rows: I) -> Vec<WithMetrics<T>>
where
    T: HasTotals,
    I: IntoIterator<Item = T>,
{
    rows.into_iter()
        .map(|row| {
            let metrics = DerivedMetrics::of(&row);
            WithMetrics { row, metrics }
        })
        .collect()
}
