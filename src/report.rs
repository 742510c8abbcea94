use crate::models::{MarketingRecord, Metric};
use crate::pipeline::aggregate::AggregateRow;
use crate::pipeline::benchmark::MetricFormat;
use crate::pipeline::metrics::WithMetrics;
use crate::session::DashboardView;

/// Appends one formatted line to a `String`.
macro_rules! emit {
    ($out:expr) => {
        $out.push('\n')
    };
    ($out:expr, $($arg:tt)*) => {{
        $out.push_str(&format!($($arg)*));
        $out.push('\n');
    }};
}

const RULE: &str = "  ───────────────────────────────────";

fn money(v: f64) -> String {
    format!("${:.0}", v)
}

fn pct(m: Metric) -> String {
    MetricFormat::Percent { decimals: 1 }.render(m)
}

fn push_aggregate(out: &mut String, label: &str, row: &AggregateRow) {
    emit!(
        out,
        "  {:<28} {:>10} imp | {:>7} clk | spend {:>9} | rev {:>9} | ROAS {:>5.2}",
        label,
        row.totals.impressions,
        row.totals.clicks,
        money(row.totals.spend),
        money(row.totals.attributed_revenue),
        row.metrics.roas,
    );
}

/// Plain-text rendering of a dashboard view.
pub fn render(view: &DashboardView, drilldown: Option<(&str, &[WithMetrics<MarketingRecord>])>) -> String {
    let mut out = String::new();
    let k = &view.kpis;

    emit!(out, "\n{}", "=".repeat(70));
    emit!(out, "  MARKETING INTELLIGENCE");
    emit!(out, "{}", "=".repeat(70));
    let range = match (view.filter.start, view.filter.end) {
        (Some(s), Some(e)) => format!("{} to {}", s.format("%Y-%m-%d"), e.format("%Y-%m-%d")),
        (Some(s), None) => format!("from {}", s.format("%Y-%m-%d")),
        (None, Some(e)) => format!("until {}", e.format("%Y-%m-%d")),
        (None, None) => "all dates".to_string(),
    };
    emit!(out, "  Period:      {}", range);
    let channels = match &view.filter.channels {
        Some(set) => set.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", "),
        None => "all channels".to_string(),
    };
    emit!(out, "  Channels:    {}", channels);

    emit!(out);
    emit!(out, "  KPIs");
    emit!(out, "{}", RULE);
    if k.is_empty() {
        emit!(out, "  No marketing data for this selection.");
    }
    emit!(out, "  Total Spend:          {}", money(k.totals.spend));
    emit!(out, "  Attributed Revenue:   {}", money(k.totals.attributed_revenue));
    emit!(out, "  Avg ROAS:             {:.2}", k.avg_roas);
    emit!(out, "  Blended ROAS:         {:.2}", k.blended_roas);
    emit!(out, "  Attributed Rev Share: {}", pct(k.avg_attributed_rev_share));

    emit!(out);
    emit!(out, "  DAILY");
    emit!(out, "{}", RULE);
    for day in &view.merged {
        emit!(
            out,
            "  {}  spend {:>9} | attributed {:>9} | total {:>9} | share {:>6}",
            day.date().format("%Y-%m-%d"),
            money(day.marketing.spend),
            money(day.marketing.attributed_revenue),
            money(day.business.total_revenue),
            pct(Metric::Defined(day.attributed_rev_share_of_total)),
        );
    }

    if !view.by_channel.is_empty() {
        emit!(out);
        emit!(out, "  BY CHANNEL");
        emit!(out, "{}", RULE);
        for row in &view.by_channel {
            let label = row
                .key
                .channel
                .as_ref()
                .map(|c| c.to_string())
                .unwrap_or_default();
            push_aggregate(&mut out, &label, row);
        }
    }

    if !view.top_campaigns.is_empty() {
        emit!(out);
        emit!(out, "  TOP CAMPAIGNS");
        emit!(out, "{}", RULE);
        for (rank, row) in view.top_campaigns.iter().enumerate() {
            let label = format!(
                "{:>2}. {} / {}",
                rank + 1,
                row.key.channel.as_ref().map(|c| c.as_str()).unwrap_or(""),
                row.key.campaign.as_deref().unwrap_or("(none)")
            );
            push_aggregate(&mut out, &label, row);
        }
    }

    if let Some((campaign, rows)) = drilldown {
        emit!(out);
        emit!(out, "  DRILL-DOWN: {}", campaign);
        emit!(out, "{}", RULE);
        if rows.is_empty() {
            emit!(out, "  No rows for this campaign.");
        }
        for r in rows {
            emit!(
                out,
                "  {}  {:<8} spend {:>9} | attributed {:>9} | ROAS {:>5.2}",
                r.row.date.format("%Y-%m-%d"),
                r.row.channel,
                money(r.row.spend),
                money(r.row.attributed_revenue),
                r.metrics.roas,
            );
        }
    }

    emit!(out);
    emit!(out, "  BENCHMARKS");
    emit!(out, "{}", RULE);
    for b in &view.benchmarks {
        let (actual, target, indicator) = b.display();
        emit!(
            out,
            "  {:<22} {:>9} vs {:>9}  {}",
            b.target.key.label(),
            actual,
            target,
            indicator
        );
    }

    emit!(out, "{}", "=".repeat(70));
    out
}

pub fn print_summary(view: &DashboardView, drilldown: Option<(&str, &[WithMetrics<MarketingRecord>])>) {
    println!("{}", render(view, drilldown));
}
