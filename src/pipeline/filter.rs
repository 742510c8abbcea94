use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{BusinessRecord, Channel, MarketingRecord};

/// Date range (inclusive) and channel selection applied to base records.
///
/// `channels: None` selects every channel; an empty set selects none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub channels: Option<BTreeSet<Channel>>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            channels: None,
        }
    }

    pub fn with_channels<I>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = Channel>,
    {
        self.channels = Some(channels.into_iter().collect());
        self
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    pub fn contains_channel(&self, channel: &Channel) -> bool {
        self.channels.as_ref().map_or(true, |set| set.contains(channel))
    }

    pub fn matches(&self, record: &MarketingRecord) -> bool {
        self.contains_date(record.date) && self.contains_channel(&record.channel)
    }

    /// Copies of the matching marketing records; the input is left untouched.
    pub fn marketing(&self, records: &[MarketingRecord]) -> Vec<MarketingRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }

    /// Business rows inside the date range. Channel selection does not apply.
    pub fn business(&self, records: &[BusinessRecord]) -> Vec<BusinessRecord> {
        records
            .iter()
            .filter(|r| self.contains_date(r.date))
            .cloned()
            .collect()
    }
}
