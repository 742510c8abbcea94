mod common;

use std::collections::BTreeMap;

use common::{date, load_business, load_channel, BUSINESS_CSV, FACEBOOK_CSV, GOOGLE_CSV};
use marketing_intel::export;
use marketing_intel::ingest::{LoadError, RecordLoader};
use marketing_intel::models::{Channel, HasTotals, MarketingRecord, Metric};
use marketing_intel::pipeline::benchmark::standard_targets;
use marketing_intel::pipeline::{
    aggregate, by_date, derive_metrics, evaluate, merge_daily, top_campaigns, BenchmarkKey,
    BenchmarkTarget, Direction, Filter, GroupBy, Outcome,
};
use marketing_intel::session::{Dataset, ViewOptions};

fn dataset() -> Dataset {
    let mut marketing = load_channel(FACEBOOK_CSV, Channel::Facebook);
    marketing.extend(load_channel(GOOGLE_CSV, Channel::Google));
    Dataset::new(marketing, load_business(BUSINESS_CSV))
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn two_channels_aggregate_by_date() {
    let ds = dataset();
    let jan1: Vec<MarketingRecord> = ds
        .marketing()
        .iter()
        .filter(|r| r.date == date(2024, 1, 1))
        .cloned()
        .collect();

    let daily = by_date(&jan1);
    assert_eq!(daily.len(), 1);
    let day = &daily[0];
    assert_eq!(day.totals.impressions, 1500);
    assert_eq!(day.totals.clicks, 25);
    assert_eq!(day.totals.spend, 70.0);
    assert_eq!(day.totals.attributed_revenue, 150.0);
    assert!(close(day.metrics.roas.value().unwrap(), 2.142857142857));
    assert!(close(day.metrics.ctr, 0.016666666667));
}

#[test]
fn merged_day_share_metrics() {
    let ds = dataset();
    let view = ds.view(&Filter::all(), &ViewOptions::default());
    let jan1 = view
        .merged
        .iter()
        .find(|m| m.date() == date(2024, 1, 1))
        .unwrap();
    assert!(close(jan1.attributed_rev_share_of_total, 0.30));
    assert!(close(jan1.marketing_spend_share_of_gp.value().unwrap(), 0.35));
}

#[test]
fn business_day_without_marketing_keeps_zero_and_missing_defaults() {
    let ds = dataset();
    let view = ds.view(&Filter::all(), &ViewOptions::default());
    let jan5 = view
        .merged
        .iter()
        .find(|m| m.date() == date(2024, 1, 5))
        .unwrap();
    assert!(!jan5.has_marketing);
    assert_eq!(jan5.marketing.spend, 0.0);
    assert_eq!(jan5.marketing.attributed_revenue, 0.0);
    assert_eq!(jan5.attributed_rev_share_of_total, 0.0);
    assert_eq!(jan5.marketing_spend_share_of_gp, Metric::Undefined);
}

#[test]
fn zero_spend_campaign_ranks_last() {
    let ds = dataset();
    let ranked = top_campaigns(ds.marketing(), 20);
    let names: Vec<&str> = ranked
        .iter()
        .map(|r| r.key.campaign.as_deref().unwrap())
        .collect();
    assert_eq!(names, vec!["Spring Sale", "Brand", "Retargeting"]);
    assert_eq!(ranked[2].metrics.roas, Metric::Undefined);
}

#[test]
fn cpc_benchmark_pass_and_not_applicable() {
    let target = [BenchmarkTarget::new(BenchmarkKey::Cpc, 1.5, Direction::LowerIsBetter)];

    let measured = BTreeMap::from([(BenchmarkKey::Cpc, Metric::Defined(1.2))]);
    assert_eq!(evaluate(&measured, &target)[0].outcome, Outcome::Pass);

    let no_clicks = BTreeMap::from([(BenchmarkKey::Cpc, Metric::Undefined)]);
    assert_eq!(evaluate(&no_clicks, &target)[0].outcome, Outcome::NotApplicable);
}

#[test]
fn merged_rows_match_business_dates_for_any_overlap() {
    let ds = dataset();
    let filters = [
        Filter::all(),
        Filter::all().with_channels([Channel::Google]),
        Filter::all().with_channels(Vec::new()),
    ];
    for f in &filters {
        let view = ds.view(f, &ViewOptions::default());
        assert_eq!(view.merged.len(), 4);
    }
    // marketing on 2024-01-04 has no business row
    let merged = merge_daily(ds.business(), &by_date(ds.marketing()));
    assert!(merged.iter().all(|m| m.date() != date(2024, 1, 4)));
}

#[test]
fn every_grouping_rederives_roas_from_sums() {
    let ds = dataset();
    for by in [
        GroupBy::Date,
        GroupBy::DateChannel,
        GroupBy::Channel,
        GroupBy::ChannelCampaign,
    ] {
        for row in aggregate(ds.marketing(), by) {
            let members: Vec<&MarketingRecord> = ds
                .marketing()
                .iter()
                .filter(|r| {
                    row.key.date.map_or(true, |d| d == r.date)
                        && row.key.channel.as_ref().map_or(true, |c| *c == r.channel)
                        && (by != GroupBy::ChannelCampaign || row.key.campaign == r.campaign)
                })
                .collect();
            let spend: f64 = members.iter().map(|r| r.spend).sum();
            let revenue: f64 = members.iter().map(|r| r.attributed_revenue).sum();
            assert_eq!(row.record_count, members.len());
            match row.metrics.roas {
                Metric::Defined(v) => assert!(close(v, revenue / spend)),
                Metric::Undefined => assert_eq!(spend, 0.0),
            }
        }
    }
}

#[test]
fn undefined_sentinels_follow_their_denominators() {
    let ds = dataset();
    for r in derive_metrics(ds.marketing()) {
        let t = r.row.totals();
        assert_eq!(r.metrics.cpc.is_defined(), t.clicks > 0);
        assert_eq!(r.metrics.cpm.is_defined(), t.impressions > 0);
        assert_eq!(r.metrics.roas.is_defined(), t.spend > 0.0);
        if t.impressions == 0 {
            assert_eq!(r.metrics.ctr, 0.0);
        }
    }
}

#[test]
fn export_then_reload_gives_the_same_rows() {
    let ds = dataset();
    let view = ds.view(
        &Filter::between(date(2024, 1, 1), date(2024, 1, 4)),
        &ViewOptions::default(),
    );
    let text = export::to_csv_string(&view.records).unwrap();

    let reloaded = RecordLoader::default()
        .load_exported_marketing(text.as_bytes(), "filtered_marketing.csv")
        .unwrap();

    let original: Vec<&MarketingRecord> = view.records.iter().map(|r| &r.row).collect();
    assert_eq!(reloaded.len(), original.len());
    for (a, b) in reloaded.iter().zip(original) {
        assert_eq!(a, b);
    }
}

#[test]
fn lenient_numbers_but_fatal_dates() {
    let google = load_channel(GOOGLE_CSV, Channel::Google);
    let jan4 = google.iter().find(|r| r.date == date(2024, 1, 4)).unwrap();
    assert_eq!(jan4.clicks, 0);
    assert_eq!(jan4.attributed_revenue, 0.0);
    assert_eq!(jan4.spend, 5.0);

    let broken = "date,clicks\n2024-01-01,1\n01-2024-02,1\n";
    let err = RecordLoader::default()
        .load_marketing(broken.as_bytes(), "broken.csv", &Channel::TikTok)
        .unwrap_err();
    assert!(matches!(err, LoadError::InvalidDate { line: 3, .. }));
}

#[test]
fn filtered_view_is_recomputed_not_reused() {
    let ds = dataset();
    let opts = ViewOptions::default();
    let full = ds.view(&Filter::all(), &opts);
    let narrow = ds.view(&Filter::between(date(2024, 1, 2), date(2024, 1, 2)), &opts);

    assert_eq!(full.kpis.record_count, 6);
    assert_eq!(narrow.kpis.record_count, 2);
    assert_eq!(narrow.kpis.totals.spend, 50.0);
    assert!(close(narrow.kpis.blended_roas.value().unwrap(), 65.0 / 50.0));
    assert_eq!(narrow.merged.len(), 1);
    assert_eq!(ds.marketing().len(), 6);
}

#[test]
fn default_benchmarks_over_full_view() {
    let ds = dataset();
    let view = ds.view(&Filter::all(), &ViewOptions::default());
    assert_eq!(view.benchmarks.len(), 4);
    assert_eq!(
        view.benchmarks.iter().map(|b| b.target).collect::<Vec<_>>(),
        standard_targets(3.0, 0.01, 1.5, 0.5)
    );
    // merged spend 120 over gross profit 460
    let share = view
        .benchmarks
        .iter()
        .find(|b| b.target.key == BenchmarkKey::SpendShareOfGp)
        .unwrap();
    assert_eq!(share.outcome, Outcome::Pass);
}

#[test]
fn empty_channel_selection_never_passes_a_benchmark() {
    let ds = dataset();
    let view = ds.view(&Filter::all().with_channels(Vec::new()), &ViewOptions::default());
    assert_eq!(view.kpis.record_count, 0);
    assert_eq!(view.merged.len(), 4);
    assert_eq!(view.kpis.avg_attributed_rev_share, Metric::Undefined);
    assert_eq!(view.kpis.spend_share_of_gp, Metric::Undefined);
    assert_eq!(view.benchmarks.len(), 4);
    for b in &view.benchmarks {
        assert_eq!(b.outcome, Outcome::NotApplicable, "{:?}", b.target.key);
    }
}

#[test]
fn oversized_count_cells_aggregate_without_overflow() {
    let csv = "date,impressions,clicks,spend\n2024-01-01,1e20,1,1\n2024-01-01,1e20,1,1\n";
    let rows = load_channel(csv, Channel::TikTok);
    assert_eq!(rows[0].impressions, u64::MAX);

    let daily = by_date(&rows);
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].totals.impressions, u64::MAX);
    assert_eq!(daily[0].totals.clicks, 2);
    assert_eq!(daily[0].totals.spend, 2.0);
}
