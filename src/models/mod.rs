pub mod channel;
pub mod metric;
pub mod records;

pub use channel::Channel;
pub use metric::Metric;
pub use records::{BusinessRecord, HasTotals, MarketingRecord, MarketingTotals};
