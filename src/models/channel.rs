use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Channel {
    Facebook,
    Google,
    TikTok,
    Other(String),
}

impl Channel {
    pub fn as_str(&self) -> &str {
        match self {
            Channel::Facebook => "Facebook",
            Channel::Google => "Google",
            Channel::TikTok => "TikTok",
            Channel::Other(name) => name,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Channel {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "facebook" => Channel::Facebook,
            "google" => Channel::Google,
            "tiktok" => Channel::TikTok,
            _ => Channel::Other(trimmed.to_string()),
        })
    }
}

impl From<String> for Channel {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(channel) => channel,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for Channel {
    fn from(value: &str) -> Self {
        Channel::from(value.to_string())
    }
}

impl From<Channel> for String {
    fn from(value: Channel) -> Self {
        value.as_str().to_string()
    }
}
