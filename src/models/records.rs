use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::models::Channel;

/// One row of a channel export: a channel's activity on one date, optionally per campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingRecord {
    pub date: NaiveDate,
    pub channel: Channel,
    #[serde(default)]
    pub campaign: Option<String>,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub attributed_revenue: f64,
    /// Source columns with no canonical meaning, carried through to the export.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub date: NaiveDate,
    pub orders: u64,
    pub new_orders: u64,
    pub new_customers: u64,
    pub total_revenue: f64,
    pub gross_profit: f64,
    pub cogs: f64,
}

impl BusinessRecord {
    /// A business day with every figure at zero.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            orders: 0,
            new_orders: 0,
            new_customers: 0,
            total_revenue: 0.0,
            gross_profit: 0.0,
            cogs: 0.0,
        }
    }

    /// Folds another row for the same date into this one.
    pub fn absorb(&mut self, other: &BusinessRecord) {
        self.orders = self.orders.saturating_add(other.orders);
        self.new_orders = self.new_orders.saturating_add(other.new_orders);
        self.new_customers = self.new_customers.saturating_add(other.new_customers);
        self.total_revenue += other.total_revenue;
        self.gross_profit += other.gross_profit;
        self.cogs += other.cogs;
    }
}

/// The additive marketing fields. Summing these and re-deriving ratios is
/// the only way aggregate metrics are produced. Counts saturate at `u64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketingTotals {
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub attributed_revenue: f64,
}

impl Add for MarketingTotals {
    type Output = MarketingTotals;

    fn add(self, rhs: MarketingTotals) -> MarketingTotals {
        MarketingTotals {
            impressions: self.impressions.saturating_add(rhs.impressions),
            clicks: self.clicks.saturating_add(rhs.clicks),
            spend: self.spend + rhs.spend,
            attributed_revenue: self.attributed_revenue + rhs.attributed_revenue,
        }
    }
}

impl AddAssign for MarketingTotals {
    fn add_assign(&mut self, rhs: MarketingTotals) {
        *self = *self + rhs;
    }
}

impl Sum for MarketingTotals {
    fn sum<I: Iterator<Item = MarketingTotals>>(iter: I) -> Self {
        iter.fold(MarketingTotals::default(), Add::add)
    }
}

/// Anything carrying the four raw marketing counts.
pub trait HasTotals {
    fn totals(&self) -> MarketingTotals;
}

impl HasTotals for MarketingTotals {
    fn totals(&self) -> MarketingTotals {
        *self
    }
}

impl HasTotals for MarketingRecord {
    fn totals(&self) -> MarketingTotals {
        MarketingTotals {
            impressions: self.impressions,
            clicks: self.clicks,
            spend: self.spend,
            attributed_revenue: self.attributed_revenue,
        }
    }
}

impl<T: HasTotals> HasTotals for &T {
    fn totals(&self) -> MarketingTotals {
        (**self).totals()
    }
}
