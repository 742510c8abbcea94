use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use crate::models::{BusinessRecord, HasTotals, MarketingTotals, Metric};
use crate::pipeline::aggregate::AggregateRow;
use crate::pipeline::metrics::DerivedMetrics;

/// One business day joined with that day's marketing totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedDailyRecord {
    #[serde(flatten)]
    pub business: BusinessRecord,
    #[serde(flatten)]
    pub marketing: MarketingTotals,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
    /// False when no marketing row matched this date.
    pub has_marketing: bool,
    /// attributed_revenue / total_revenue, 0 when total revenue is not positive.
    pub attributed_rev_share_of_total: f64,
    /// spend / gross_profit, undefined when gross profit is not positive.
    pub marketing_spend_share_of_gp: Metric,
}

impl MergedDailyRecord {
    pub fn date(&self) -> NaiveDate {
        self.business.date
    }

    fn new(business: BusinessRecord, marketing: Option<MarketingTotals>) -> Self {
        let has_marketing = marketing.is_some();
        let marketing = marketing.unwrap_or_default();

        let attributed_rev_share_of_total =
            Metric::ratio(marketing.attributed_revenue, business.total_revenue)
                .value()
                .unwrap_or(0.0);
        let marketing_spend_share_of_gp = Metric::ratio(marketing.spend, business.gross_profit);

        Self {
            metrics: DerivedMetrics::from_totals(&marketing),
            marketing,
            has_marketing,
            attributed_rev_share_of_total,
            marketing_spend_share_of_gp,
            business,
        }
    }
}

impl HasTotals for MergedDailyRecord {
    fn totals(&self) -> MarketingTotals {
        self.marketing
    }
}

/// Collapses business rows sharing a date into one row per date, in date order.
pub fn business_by_date(business: &[BusinessRecord]) -> Vec<BusinessRecord> {
    let mut days: BTreeMap<NaiveDate, BusinessRecord> = BTreeMap::new();
    for row in business {
        match days.get_mut(&row.date) {
            Some(existing) => {
                warn!("Business date {} appears more than once; rows summed", row.date);
                existing.absorb(row);
            }
            None => {
                days.insert(row.date, row.clone());
            }
        }
    }
    days.into_values().collect()
}

/// Left join on date: every business date appears exactly once, marketing
/// activity on dates the business calendar lacks is dropped. Aggregate rows
/// without a date key are ignored.
pub fn merge_daily(business: &[BusinessRecord], daily: &[AggregateRow]) -> Vec<MergedDailyRecord> {
    let mut marketing: HashMap<NaiveDate, MarketingTotals> = HashMap::new();
    for row in daily {
        match row.key.date {
            Some(d) => *marketing.entry(d).or_default() += row.totals,
            None => debug!("Ignoring aggregate without a date key: {:?}", row.key),
        }
    }

    let merged: Vec<MergedDailyRecord> = business_by_date(business)
        .into_iter()
        .map(|b| {
            let m = marketing.remove(&b.date);
            MergedDailyRecord::new(b, m)
        })
        .collect();

    if !marketing.is_empty() {
        debug!(
            "{} marketing dates have no business row and were dropped",
            marketing.len()
        );
    }
    merged
}
