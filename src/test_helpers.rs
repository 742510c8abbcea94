use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::{BusinessRecord, Channel, MarketingRecord};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A marketing row with no extra columns.
pub fn marketing(
    date: NaiveDate,
    channel: Channel,
    campaign: &str,
    impressions: u64,
    clicks: u64,
    spend: f64,
    attributed_revenue: f64,
) -> MarketingRecord {
    MarketingRecord {
        date,
        channel,
        campaign: Some(campaign.to_string()),
        impressions,
        clicks,
        spend,
        attributed_revenue,
        extra: BTreeMap::new(),
    }
}

/// A business day with only revenue and gross profit set.
pub fn business(date: NaiveDate, total_revenue: f64, gross_profit: f64) -> BusinessRecord {
    BusinessRecord {
        total_revenue,
        gross_profit,
        ..BusinessRecord::empty(date)
    }
}
