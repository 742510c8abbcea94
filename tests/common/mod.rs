#![allow(dead_code)]

use chrono::NaiveDate;

use marketing_intel::ingest::RecordLoader;
use marketing_intel::models::{BusinessRecord, Channel, MarketingRecord};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Loads a channel export held in memory.
pub fn load_channel(csv: &str, channel: Channel) -> Vec<MarketingRecord> {
    RecordLoader::default()
        .load_marketing(csv.as_bytes(), &format!("{channel}.csv"), &channel)
        .unwrap()
}

pub fn load_business(csv: &str) -> Vec<BusinessRecord> {
    RecordLoader::default()
        .load_business(csv.as_bytes(), "Business.csv")
        .unwrap()
}

pub const FACEBOOK_CSV: &str = "\
date,tactic,state,campaign,impression,clicks,spend,attributed revenue
2024-01-01,ASC,CA,Spring Sale,1000,20,50,150
2024-01-02,ASC,NY,Spring Sale,800,10,40,60
2024-01-03,LAL,CA,Retargeting,400,8,0,0
";

pub const GOOGLE_CSV: &str = "\
Date,Tactic,State,Campaign,Impressions,Clicks,Spend,Attributed Revenue
2024-01-01,Search,CA,Brand,500,5,20,0
2024-01-02,Search,TX,Brand,600,12,10,5
2024-01-04,Search,TX,Brand,100,n/a,5,
";

pub const BUSINESS_CSV: &str = "\
Date,Orders,New Orders,New Customers,Total Revenue,Gross Profit,COGS
2024-01-01,12,4,3,500,200,300
2024-01-02,7,2,2,400,160,240
2024-01-03,5,1,1,250,100,150
2024-01-05,0,0,0,0,0,0
";
