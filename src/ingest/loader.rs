use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::ingest::coerce::{coerce_amount_with_outcome, coerce_count_with_outcome, parse_date};
use crate::ingest::columns::{default_rules, ColumnRule, HeaderMap};
use crate::ingest::LoadError;
use crate::models::{BusinessRecord, Channel, MarketingRecord};

/// Columns with a fixed meaning in marketing input. Anything else is carried as an extra.
const MARKETING_COLUMNS: &[&str] = &[
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

/// Reads channel and business exports into normalized records.
#[derive(Debug, Clone)]
pub struct RecordLoader {
    rules: Vec<ColumnRule>,
}

impl Default for RecordLoader {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

struct Table {
    input: String,
    header: HeaderMap,
    rows: Vec<(u64, StringRecord)>,
}

impl Table {
    fn cell<'a>(&self, row: &'a StringRecord, column: &str) -> &'a str {
        self.header
            .position(column)
            .and_then(|pos| row.get(pos))
            .unwrap_or("")
    }

    fn date(&self, line: u64, row: &StringRecord) -> Result<NaiveDate, LoadError> {
        let raw = self.cell(row, "date");
        parse_date(raw).ok_or_else(|| LoadError::InvalidDate {
            input: self.input.clone(),
            line,
            value: raw.to_string(),
        })
    }

    fn require(&self, column: &str) -> Result<(), LoadError> {
        if self.header.contains(column) {
            Ok(())
        } else {
            Err(LoadError::MissingColumn {
                input: self.input.clone(),
                column: column.to_string(),
            })
        }
    }
}

/// Counts cells that fell back to zero, for one debug line per input.
#[derive(Default)]
struct Fallbacks(usize);

impl Fallbacks {
    fn count(&mut self, table: &Table, row: &StringRecord, column: &str) -> u64 {
        let (v, outcome) = coerce_count_with_outcome(table.cell(row, column));
        if outcome.is_fallback() && table.header.contains(column) {
            self.0 += 1;
        }
        v
    }

    fn amount(&mut self, table: &Table, row: &StringRecord, column: &str) -> f64 {
        let (v, outcome) = coerce_amount_with_outcome(table.cell(row, column));
        if outcome.is_fallback() && table.header.contains(column) {
            self.0 += 1;
        }
        v
    }
}

impl RecordLoader {
    pub fn new(rules: Vec<ColumnRule>) -> Self {
        Self { rules }
    }

    /// Loads one channel's export, stamping `channel` on every row.
    pub fn load_marketing<R: Read>(
        &self,
        reader: R,
        input: &str,
        channel: &Channel,
    ) -> Result<Vec<MarketingRecord>, LoadError> {
        let table = self.read_table(reader, input)?;
        let records = self.marketing_rows(&table, |_| channel.clone())?;
        info!("Loaded {} {} rows from {}", records.len(), channel, input);
        Ok(records)
    }

    pub fn load_marketing_path(
        &self,
        path: impl AsRef<Path>,
        channel: &Channel,
    ) -> Result<Vec<MarketingRecord>, LoadError> {
        let (file, input) = open(path.as_ref())?;
        self.load_marketing(file, &input, channel)
    }

    /// Loads a file previously written by the exporter, taking each row's
    /// channel from its `channel` column.
    pub fn load_exported_marketing<R: Read>(
        &self,
        reader: R,
        input: &str,
    ) -> Result<Vec<MarketingRecord>, LoadError> {
        let table = self.read_table(reader, input)?;
        table.require("channel")?;
        let records = self.marketing_rows(&table, |row| Channel::from(table.cell(row, "channel")))?;
        info!("Loaded {} exported rows from {}", records.len(), input);
        Ok(records)
    }

    pub fn load_business<R: Read>(
        &self,
        reader: R,
        input: &str,
    ) -> Result<Vec<BusinessRecord>, LoadError> {
        let table = self.read_table(reader, input)?;
        let mut fallbacks = Fallbacks::default();
        let mut records = Vec::with_capacity(table.rows.len());

        for (line, row) in &table.rows {
            records.push(BusinessRecord {
                date: table.date(*line, row)?,
                orders: fallbacks.count(&table, row, "orders"),
                new_orders: fallbacks.count(&table, row, "new_orders"),
                new_customers: fallbacks.count(&table, row, "new_customers"),
                total_revenue: fallbacks.amount(&table, row, "total_revenue"),
                gross_profit: fallbacks.amount(&table, row, "gross_profit"),
                cogs: fallbacks.amount(&table, row, "cogs"),
            });
        }

        if fallbacks.0 > 0 {
            debug!("{}: {} numeric cells zero-filled", input, fallbacks.0);
        }
        info!("Loaded {} business rows from {}", records.len(), input);
        Ok(records)
    }

    pub fn load_business_path(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Vec<BusinessRecord>, LoadError> {
        let (file, input) = open(path.as_ref())?;
        self.load_business(file, &input)
    }

    fn marketing_rows(
        &self,
        table: &Table,
        channel_of: impl Fn(&StringRecord) -> Channel,
    ) -> Result<Vec<MarketingRecord>, LoadError> {
        let extras: Vec<(&str, usize)> = table
            .header
            .columns()
            .filter(|(name, _)| !MARKETING_COLUMNS.contains(name))
            .collect();

        let mut fallbacks = Fallbacks::default();
        let mut records = Vec::with_capacity(table.rows.len());

        for (line, row) in &table.rows {
            let campaign = table.cell(row, "campaign").trim();
            let extra: BTreeMap<String, String> = extras
                .iter()
                .map(|(name, pos)| (name.to_string(), row.get(*pos).unwrap_or("").to_string()))
                .collect();

            records.push(MarketingRecord {
                date: table.date(*line, row)?,
                channel: channel_of(row),
                campaign: (!campaign.is_empty()).then(|| campaign.to_string()),
                impressions: fallbacks.count(table, row, "impressions"),
                clicks: fallbacks.count(table, row, "clicks"),
                spend: fallbacks.amount(table, row, "spend"),
                attributed_revenue: fallbacks.amount(table, row, "attributed_revenue"),
                extra,
            });
        }

        if fallbacks.0 > 0 {
            debug!("{}: {} numeric cells zero-filled", table.input, fallbacks.0);
        }
        Ok(records)
    }

    fn read_table<R: Read>(&self, reader: R, input: &str) -> Result<Table, LoadError> {
        let csv_err = |error| LoadError::Csv {
            input: input.to_string(),
            error,
        };

        let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = rdr.headers().map_err(csv_err)?.clone();
        let header = HeaderMap::resolve(headers.iter(), &self.rules, input);

        let table = Table {
            input: input.to_string(),
            header,
            rows: Vec::new(),
        };
        table.require("date")?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let row = result.map_err(csv_err)?;
            if row.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            rows.push((line, row));
        }

        Ok(Table { rows, ..table })
    }
}

fn open(path: &Path) -> Result<(File, String), LoadError> {
    let input = path.display().to_string();
    let file = File::open(path).map_err(|error| LoadError::Io {
        input: input.clone(),
        error,
    })?;
    Ok((file, input))
}
