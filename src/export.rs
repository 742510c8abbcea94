use csv::Writer;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::models::{MarketingRecord, Metric};
use crate::pipeline::WithMetrics;

pub const CANONICAL_COLUMNS: &[&str] = &[
    "date",
    "channel",
    "campaign",
    "impressions",
    "clicks",
    "spend",
    "attributed_revenue",
    "ctr",
    "cpc",
    "cpm",
    "roas",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode export: {0}")]
    Csv(#[from] csv::Error),
}

fn metric_cell(m: Metric) -> String {
    m.value().map(|v| v.to_string()).unwrap_or_default()
}

/// Header for a set of rows: the canonical columns, then every extra column seen, sorted.
pub fn header_for(rows: &[WithMetrics<MarketingRecord>]) -> Vec<String> {
    let extras: BTreeSet<&str> = rows
        .iter()
        .flat_map(|r| r.row.extra.keys().map(String::as_str))
        .collect();
    CANONICAL_COLUMNS
        .iter()
        .copied()
        .chain(extras)
        .map(str::to_string)
        .collect()
}

/// Writes rows as comma-separated UTF-8 text with a header row.
/// Undefined metrics become empty cells.
pub fn write_csv<W: Write>(rows: &[WithMetrics<MarketingRecord>], out: W) -> Result<(), ExportError> {
    let header = header_for(rows);
    let extras = &header[CANONICAL_COLUMNS.len()..];

    let mut writer = Writer::from_writer(out);
    writer.write_record(&header)?;

    for WithMetrics { row, metrics } in rows {
        let mut cells = vec![
            row.date.format("%Y-%m-%d").to_string(),
            row.channel.to_string(),
            row.campaign.clone().unwrap_or_default(),
            row.impressions.to_string(),
            row.clicks.to_string(),
            row.spend.to_string(),
            row.attributed_revenue.to_string(),
            metrics.ctr.to_string(),
            metric_cell(metrics.cpc),
            metric_cell(metrics.cpm),
            metric_cell(metrics.roas),
        ];
        cells.extend(
            extras
                .iter()
                .map(|name| row.extra.get(name).cloned().unwrap_or_default()),
        );
        writer.write_record(&cells)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn to_csv_string(rows: &[WithMetrics<MarketingRecord>]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_csv_path(
    rows: &[WithMetrics<MarketingRecord>],
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(rows, file)?;
    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}
