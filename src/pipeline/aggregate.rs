use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Channel, HasTotals, MarketingRecord, MarketingTotals, Metric};
use crate::pipeline::metrics::DerivedMetrics;

pub const DEFAULT_TOP_CAMPAIGNS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupBy {
    Date,
    DateChannel,
    Channel,
    ChannelCampaign,
}

impl GroupBy {
    fn key_of(self, r: &MarketingRecord) -> GroupKey {
        let date = Some(r.date);
        let channel = Some(r.channel.clone());
        match self {
            GroupBy::Date => GroupKey {
                date,
                ..GroupKey::default()
            },
            GroupBy::DateChannel => GroupKey {
                date,
                channel,
                campaign: None,
            },
            GroupBy::Channel => GroupKey {
                channel,
                ..GroupKey::default()
            },
            GroupBy::ChannelCampaign => GroupKey {
                date: None,
                channel,
                campaign: r.campaign.clone(),
            },
        }
    }
}

/// The grouping values of an aggregate row; fields outside the grouping are `None`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct GroupKey {
    pub date: Option<NaiveDate>,
    pub channel: Option<Channel>,
    pub campaign: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    #[serde(flatten)]
    pub key: GroupKey,
    #[serde(flatten)]
    pub totals: MarketingTotals,
    /// Re-derived from `totals`, never averaged from member rows.
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
    pub record_count: usize,
    /// Mean of the members' own defined ROAS values. Reported alongside, not instead of, `metrics.roas`.
    pub mean_record_roas: Metric,
}

impl HasTotals for AggregateRow {
    fn totals(&self) -> MarketingTotals {
        self.totals
    }
}

#[derive(Default)]
struct Accumulator {
    totals: MarketingTotals,
    count: usize,
    roas: Vec<Metric>,
}

/// Sums the additive fields per key, then re-derives ratios from the sums.
/// Rows come back in key order.
pub fn aggregate<'a, I>(records: I, by: GroupBy) -> Vec<AggregateRow>
where
    I: IntoIterator<Item = &'a MarketingRecord>,
{
    let mut groups: BTreeMap<GroupKey, Accumulator> = BTreeMap::new();

    for r in records {
        let totals = r.totals();
        let acc = groups.entry(by.key_of(r)).or_default();
        acc.totals += totals;
        acc.count += 1;
        acc.roas.push(DerivedMetrics::from_totals(&totals).roas);
    }

    groups
        .into_iter()
        .map(|(key, acc)| AggregateRow {
            key,
            metrics: DerivedMetrics::from_totals(&acc.totals),
            totals: acc.totals,
            record_count: acc.count,
            mean_record_roas: Metric::mean(acc.roas),
        })
        .collect()
}

pub fn by_date<'a, I>(records: I) -> Vec<AggregateRow>
where
    I: IntoIterator<Item = &'a MarketingRecord>,
{
    aggregate(records, GroupBy::Date)
}

pub fn by_channel<'a, I>(records: I) -> Vec<AggregateRow>
where
    I: IntoIterator<Item = &'a MarketingRecord>,
{
    aggregate(records, GroupBy::Channel)
}

/// Sorts by ROAS descending with undefined ROAS last, then keeps the first `n`.
/// Ties fall back to spend descending, then key order.
pub fn rank_by_roas(mut rows: Vec<AggregateRow>, n: usize) -> Vec<AggregateRow> {
    rows.sort_by(|a, b| {
        a.metrics
            .roas
            .cmp_desc(&b.metrics.roas)
            .then_with(|| b.totals.spend.total_cmp(&a.totals.spend))
            .then_with(|| a.key.cmp(&b.key))
    });
    rows.truncate(n);
    rows
}

pub fn top_campaigns<'a, I>(records: I, n: usize) -> Vec<AggregateRow>
where
    I: IntoIterator<Item = &'a MarketingRecord>,
{
    rank_by_roas(aggregate(records, GroupBy::ChannelCampaign), n)
}
