pub mod aggregate;
pub mod benchmark;
pub mod filter;
pub mod merge;
pub mod metrics;
pub mod summary;

pub use aggregate::{aggregate, by_channel, by_date, rank_by_roas, top_campaigns, AggregateRow, GroupBy, GroupKey};
pub use benchmark::{evaluate, BenchmarkKey, BenchmarkResult, BenchmarkTarget, Direction, Outcome};
pub use filter::Filter;
pub use merge::{merge_daily, MergedDailyRecord};
pub use metrics::{derive_metrics, DerivedMetrics, WithMetrics};
pub use summary::KpiSummary;
