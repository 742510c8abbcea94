pub mod config;
pub mod export;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod session;
#[cfg(test)]
pub mod test_helpers;
