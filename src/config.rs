use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::Channel;
use crate::pipeline::aggregate::DEFAULT_TOP_CAMPAIGNS;
use crate::pipeline::benchmark::{standard_targets, BenchmarkTarget};

const DEFAULT_SOURCES: &str = "Facebook=Facebook.csv,Google=Google.csv,TikTok=TikTok.csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketingSource {
    pub channel: Channel,
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Inputs
    pub data_dir: String,
    pub marketing_sources: Vec<MarketingSource>,
    pub business_file: String,

    // Presentation
    pub top_campaigns: usize,

    // Outputs
    pub export_path: String,
    pub report_path: Option<String>,

    // Benchmarks
    pub target_roas: f64,
    pub target_ctr: f64,
    pub target_cpc: f64,
    pub target_spend_share_gp: f64,

    // Logging
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: "data".to_string(),
            marketing_sources: parse_sources(DEFAULT_SOURCES),
            business_file: "Business.csv".to_string(),
            top_campaigns: DEFAULT_TOP_CAMPAIGNS,
            export_path: "filtered_marketing.csv".to_string(),
            report_path: None,
            target_roas: 3.0,
            target_ctr: 0.01,
            target_cpc: 1.5,
            target_spend_share_gp: 0.5,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Malformed numbers fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Config::default();
        let env = |key: &str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| default.to_string())
        };
        let num = |key: &str, default: f64| -> f64 {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        let sources = parse_sources(&env("MI_MARKETING_SOURCES", DEFAULT_SOURCES));

        Config {
            data_dir: env("MI_DATA_DIR", &d.data_dir),
            marketing_sources: if sources.is_empty() {
                d.marketing_sources
            } else {
                sources
            },
            business_file: env("MI_BUSINESS_FILE", &d.business_file),
            top_campaigns: lookup("MI_TOP_CAMPAIGNS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(d.top_campaigns),
            export_path: env("MI_EXPORT_PATH", &d.export_path),
            report_path: lookup("MI_REPORT_PATH").filter(|p| !p.trim().is_empty()),
            target_roas: num("MI_TARGET_ROAS", d.target_roas),
            target_ctr: num("MI_TARGET_CTR", d.target_ctr),
            target_cpc: num("MI_TARGET_CPC", d.target_cpc),
            target_spend_share_gp: num("MI_TARGET_SPEND_SHARE_GP", d.target_spend_share_gp),
            log_level: env("MI_LOG_LEVEL", &d.log_level),
        }
    }

    pub fn benchmarks(&self) -> Vec<BenchmarkTarget> {
        standard_targets(
            self.target_roas,
            self.target_ctr,
            self.target_cpc,
            self.target_spend_share_gp,
        )
    }

    pub fn source_path(&self, file: &str) -> PathBuf {
        PathBuf::from(&self.data_dir).join(file)
    }
}

/// `Channel=file.csv` pairs, comma-separated. Malformed entries are skipped.
fn parse_sources(raw: &str) -> Vec<MarketingSource> {
    raw.split(',')
        .filter_map(|pair| {
            let (channel, file) = pair.split_once('=')?;
            let (channel, file) = (channel.trim(), file.trim());
            if channel.is_empty() || file.is_empty() {
                return None;
            }
            Some(MarketingSource {
                channel: Channel::from(channel),
                file: file.to_string(),
            })
        })
        .collect()
}
