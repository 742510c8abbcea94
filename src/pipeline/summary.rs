use serde::{Deserialize, Serialize};

use crate::models::{HasTotals, MarketingRecord, MarketingTotals, Metric};
use crate::pipeline::merge::MergedDailyRecord;
use crate::pipeline::metrics::DerivedMetrics;

/// Headline figures for a filtered view. Ratios are `Undefined` when the
/// view holds no marketing rows, so an empty selection never reads as a 0% rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub record_count: usize,
    pub totals: MarketingTotals,
    pub ctr: Metric,
    pub cpc: Metric,
    pub cpm: Metric,
    /// Total attributed revenue over total spend.
    pub blended_roas: Metric,
    /// Mean of per-record ROAS, skipping records without spend.
    pub avg_roas: Metric,
    /// Mean of the daily attributed-revenue share over merged days.
    pub avg_attributed_rev_share: Metric,
    /// Merged spend over merged gross profit.
    pub spend_share_of_gp: Metric,
}

impl KpiSummary {
    pub fn compute(records: &[MarketingRecord], merged: &[MergedDailyRecord]) -> Self {
        let totals: MarketingTotals = records.iter().map(HasTotals::totals).sum();
        let blended = DerivedMetrics::from_totals(&totals);
        let has_rows = !records.is_empty();

        let avg_roas = Metric::mean(records.iter().map(|r| DerivedMetrics::of(r).roas));
        // business days alone carry no marketing signal
        let (avg_attributed_rev_share, spend_share_of_gp) = if has_rows {
            let merged_spend: f64 = merged.iter().map(|m| m.marketing.spend).sum();
            let merged_gp: f64 = merged.iter().map(|m| m.business.gross_profit).sum();
            (
                Metric::mean(
                    merged
                        .iter()
                        .map(|m| Metric::Defined(m.attributed_rev_share_of_total)),
                ),
                Metric::ratio(merged_spend, merged_gp),
            )
        } else {
            (Metric::Undefined, Metric::Undefined)
        };

        Self {
            record_count: records.len(),
            totals,
            ctr: if has_rows {
                Metric::Defined(blended.ctr)
            } else {
                Metric::Undefined
            },
            cpc: blended.cpc,
            cpm: blended.cpm,
            blended_roas: blended.roas,
            avg_roas,
            avg_attributed_rev_share,
            spend_share_of_gp,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}
