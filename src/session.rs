use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Config;
use crate::ingest::RecordLoader;
use crate::models::{BusinessRecord, Channel, MarketingRecord};
use crate::pipeline::aggregate::{self, AggregateRow, GroupBy, DEFAULT_TOP_CAMPAIGNS};
use crate::pipeline::benchmark::{self, BenchmarkResult, BenchmarkTarget};
use crate::pipeline::merge::{merge_daily, MergedDailyRecord};
use crate::pipeline::metrics::{derive_metrics, WithMetrics};
use crate::pipeline::{Filter, KpiSummary};

/// Base records as loaded. Never modified after construction.
#[derive(Debug, Default)]
pub struct Snapshot {
    marketing: Vec<MarketingRecord>,
    business: Vec<BusinessRecord>,
}

/// Read-only handle to a loaded snapshot. Cloning shares the same records;
/// every view is computed into fresh tables.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    snapshot: Arc<Snapshot>,
}

#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub top_campaigns: usize,
    pub benchmarks: Vec<BenchmarkTarget>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            top_campaigns: DEFAULT_TOP_CAMPAIGNS,
            benchmarks: Config::default().benchmarks(),
        }
    }
}

impl From<&Config> for ViewOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            top_campaigns: cfg.top_campaigns,
            benchmarks: cfg.benchmarks(),
        }
    }
}

/// Everything a presentation layer needs for one filter selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub filter: Filter,
    pub records: Vec<WithMetrics<MarketingRecord>>,
    pub daily: Vec<AggregateRow>,
    pub daily_by_channel: Vec<AggregateRow>,
    pub by_channel: Vec<AggregateRow>,
    pub top_campaigns: Vec<AggregateRow>,
    pub campaign_options: Vec<String>,
    pub merged: Vec<MergedDailyRecord>,
    pub kpis: KpiSummary,
    pub benchmarks: Vec<BenchmarkResult>,
}

impl Dataset {
    pub fn new(marketing: Vec<MarketingRecord>, business: Vec<BusinessRecord>) -> Self {
        Self {
            snapshot: Arc::new(Snapshot {
                marketing,
                business,
            }),
        }
    }

    /// Reads every configured source once.
    pub fn load(cfg: &Config) -> Result<Self> {
        let loader = RecordLoader::default();

        let mut marketing = Vec::new();
        for source in &cfg.marketing_sources {
            let path = cfg.source_path(&source.file);
            let rows = loader
                .load_marketing_path(&path, &source.channel)
                .with_context(|| format!("loading {} data from {}", source.channel, path.display()))?;
            marketing.extend(rows);
        }

        let path = cfg.source_path(&cfg.business_file);
        let business = loader
            .load_business_path(&path)
            .with_context(|| format!("loading business data from {}", path.display()))?;

        info!(
            "Snapshot ready: {} marketing rows, {} business rows",
            marketing.len(),
            business.len()
        );
        Ok(Self::new(marketing, business))
    }

    pub fn marketing(&self) -> &[MarketingRecord] {
        &self.snapshot.marketing
    }

    pub fn business(&self) -> &[BusinessRecord] {
        &self.snapshot.business
    }

    /// Earliest and latest marketing dates, the default filter range.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self.marketing().iter().map(|r| r.date);
        let min = dates.clone().min()?;
        let max = dates.max()?;
        Some((min, max))
    }

    pub fn channels(&self) -> Vec<Channel> {
        self.marketing()
            .iter()
            .map(|r| r.channel.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Recomputes every table from the records the filter selects.
    pub fn view(&self, filter: &Filter, options: &ViewOptions) -> DashboardView {
        let filtered = filter.marketing(self.marketing());
        let business = filter.business(self.business());
        debug!(
            "Filter kept {}/{} marketing rows, {}/{} business rows",
            filtered.len(),
            self.marketing().len(),
            business.len(),
            self.business().len()
        );

        let daily = aggregate::by_date(&filtered);
        let merged = merge_daily(&business, &daily);
        let kpis = KpiSummary::compute(&filtered, &merged);
        let benchmarks = benchmark::evaluate(&benchmark::actuals_from(&kpis), &options.benchmarks);

        DashboardView {
            filter: filter.clone(),
            daily_by_channel: aggregate::aggregate(&filtered, GroupBy::DateChannel),
            by_channel: aggregate::by_channel(&filtered),
            top_campaigns: aggregate::top_campaigns(&filtered, options.top_campaigns),
            campaign_options: campaign_options(&filtered),
            daily,
            merged,
            kpis,
            benchmarks,
            records: derive_metrics(filtered),
        }
    }

    /// Filtered rows of one campaign in date order.
    pub fn campaign_drilldown(
        &self,
        filter: &Filter,
        campaign: &str,
    ) -> Vec<WithMetrics<MarketingRecord>> {
        let mut rows: Vec<MarketingRecord> = self
            .marketing()
            .iter()
            .filter(|r| filter.matches(r) && r.campaign.as_deref() == Some(campaign))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.channel.cmp(&b.channel)));
        derive_metrics(rows)
    }
}

fn campaign_options(records: &[MarketingRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.campaign.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metric;
    use crate::pipeline::Outcome;
    use crate::test_helpers::{business, date, marketing};

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                marketing(date(2024, 1, 1), Channel::Facebook, "A", 1000, 20, 50.0, 150.0),
                marketing(date(2024, 1, 1), Channel::Google, "B", 500, 5, 20.0, 0.0),
                marketing(date(2024, 1, 3), Channel::Google, "B", 100, 2, 4.0, 12.0),
            ],
            vec![
                business(date(2024, 1, 1), 500.0, 200.0),
                business(date(2024, 1, 2), 0.0, 0.0),
                business(date(2024, 1, 3), 100.0, 40.0),
            ],
        )
    }

    #[test]
    fn bounds_and_channels() {
        let ds = dataset();
        assert_eq!(ds.date_bounds(), Some((date(2024, 1, 1), date(2024, 1, 3))));
        assert_eq!(ds.channels(), vec![Channel::Facebook, Channel::Google]);
        assert_eq!(Dataset::default().date_bounds(), None);
    }

    #[test]
    fn view_recomputes_from_filtered_rows() {
        let ds = dataset();
        let all = ds.view(&Filter::all(), &ViewOptions::default());
        let google = ds.view(
            &Filter::all().with_channels([Channel::Google]),
            &ViewOptions::default(),
        );

        assert_eq!(all.kpis.totals.spend, 74.0);
        assert_eq!(google.kpis.totals.spend, 24.0);
        assert_eq!(google.by_channel.len(), 1);
        assert_eq!(google.merged.len(), 3);
        assert_eq!(google.merged[0].marketing.spend, 20.0);
        assert_eq!(google.campaign_options, vec!["B".to_string()]);
        // the base snapshot is untouched by either view
        assert_eq!(ds.marketing().len(), 3);
    }

    #[test]
    fn empty_selection_yields_no_data_state() {
        let ds = dataset();
        let view = ds.view(&Filter::all().with_channels(Vec::new()), &ViewOptions::default());
        assert!(view.records.is_empty());
        assert!(view.daily.is_empty());
        assert!(view.top_campaigns.is_empty());
        assert_eq!(view.merged.len(), 3);
        assert!(view.kpis.is_empty());
        assert_eq!(view.kpis.blended_roas, Metric::Undefined);
        assert_eq!(view.kpis.avg_attributed_rev_share, Metric::Undefined);
        assert_eq!(view.kpis.spend_share_of_gp, Metric::Undefined);
        assert_eq!(view.benchmarks.len(), 4);
        assert!(view
            .benchmarks
            .iter()
            .all(|b| b.outcome == Outcome::NotApplicable));
    }

    #[test]
    fn date_range_with_no_rows_yields_no_data_state() {
        let ds = dataset();
        let view = ds.view(
            &Filter::between(date(2025, 1, 1), date(2025, 1, 31)),
            &ViewOptions::default(),
        );
        assert!(view.records.is_empty());
        assert!(view.merged.is_empty());
        assert!(view.by_channel.is_empty());
        let k = &view.kpis;
        for m in [
            k.ctr,
            k.cpc,
            k.cpm,
            k.blended_roas,
            k.avg_roas,
            k.avg_attributed_rev_share,
            k.spend_share_of_gp,
        ] {
            assert_eq!(m, Metric::Undefined);
        }
        assert!(view
            .benchmarks
            .iter()
            .all(|b| b.outcome == Outcome::NotApplicable));
    }

    #[test]
    fn drilldown_is_date_ordered() {
        let ds = dataset();
        let rows = ds.campaign_drilldown(&Filter::all(), "B");
        assert_eq!(rows.len(), 2);
        assert!(rows[0].row.date < rows[1].row.date);
        assert_eq!(rows[1].metrics.roas, Metric::Defined(3.0));
        assert!(ds.campaign_drilldown(&Filter::all(), "missing").is_empty());
    }

    #[test]
    fn clones_share_one_snapshot() {
        let ds = dataset();
        let other = ds.clone();
        assert!(std::ptr::eq(ds.marketing().as_ptr(), other.marketing().as_ptr()));
    }
}
