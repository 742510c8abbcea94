use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use marketing_intel::config::Config;
use marketing_intel::export;
use marketing_intel::models::Channel;
use marketing_intel::pipeline::Filter;
use marketing_intel::report;
use marketing_intel::session::{Dataset, ViewOptions};

/// Positional argument `idx`, treating "-" and blanks as absent.
fn positional(args: &[String], idx: usize) -> Option<&str> {
    args.get(idx)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "-")
}

fn parse_date_arg(arg: Option<&str>, name: &str) -> Result<Option<NaiveDate>> {
    match arg {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .with_context(|| format!("{} must be YYYY-MM-DD, got {:?}", name, s)),
    }
}

fn main() -> Result<()> {
    let cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    // marketing-intel [START] [END] [CHANNELS] [CAMPAIGN]; "-" skips a position
    let args: Vec<String> = std::env::args().collect();

    let dataset = Dataset::load(&cfg)?;
    let (min_date, max_date) = match dataset.date_bounds() {
        Some(bounds) => bounds,
        None => {
            println!("No marketing rows found under {}", cfg.data_dir);
            return Ok(());
        }
    };

    let start = parse_date_arg(positional(&args, 1), "START")?.unwrap_or(min_date);
    let end = parse_date_arg(positional(&args, 2), "END")?.unwrap_or(max_date);

    let mut selection = Filter::between(start, end);
    if let Some(list) = positional(&args, 3) {
        selection = selection.with_channels(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Channel::from),
        );
    }

    info!(
        "Building view for {} to {} over {} channel(s)",
        start,
        end,
        selection
            .channels
            .as_ref()
            .map_or(dataset.channels().len(), |c| c.len())
    );

    let view = dataset.view(&selection, &ViewOptions::from(&cfg));

    let campaign = positional(&args, 4)
        .map(str::to_string)
        .or_else(|| view.campaign_options.first().cloned());
    let drilldown = campaign
        .as_deref()
        .map(|c| (c, dataset.campaign_drilldown(&selection, c)));

    report::print_summary(
        &view,
        drilldown.as_ref().map(|(c, rows)| (*c, rows.as_slice())),
    );

    export::write_csv_path(&view.records, &cfg.export_path)
        .with_context(|| format!("writing export to {}", cfg.export_path))?;
    println!("\nFiltered data exported to: {}", cfg.export_path);

    if let Some(path) = &cfg.report_path {
        let json = serde_json::to_string_pretty(&view)?;
        std::fs::write(path, json).with_context(|| format!("writing report to {}", path))?;
        println!("Report saved to: {}", path);
    }

    Ok(())
}
