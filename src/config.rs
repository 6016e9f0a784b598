//! Configuration for routefilter.
//!
//! All fields have defaults matching the stock upstream sources, so the tool
//! runs without a config file; a YAML file overrides individual fields.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory for the per-source fallback cache.
    pub cache_dir: PathBuf,

    /// HTTP timeout per request, in seconds.
    pub timeout_secs: u64,

    /// User-Agent sent with every request. bgp.tools requires an
    /// identifying one.
    pub user_agent: String,

    /// Upstream source URLs.
    pub sources: Sources,
}

/// Upstream list locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Sources {
    /// bgp.tools full-table dump (JSON lines with ASN and CIDR fields).
    pub bgptools: String,

    /// Tor node list (bare IPv4 addresses, one per line).
    pub tor: String,

    /// Manually curated route list.
    pub manual: String,

    /// antifilter.download lists, merged.
    pub antifilter: Vec<String>,

    /// Twitter IP list.
    pub twitter: String,

    /// Exclude list, used when no local exclude file is given.
    pub exclude: String,

    /// AS number list, used when no local AS list file is given.
    pub as_list: String,
}

fn default_user_agent() -> String {
    format!("routefilter/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(".cache"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
            sources: Sources::default(),
        }
    }
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            bgptools: "https://bgp.tools/table.jsonl".to_string(),
            tor: "https://www.dan.me.uk/torlist/".to_string(),
            manual: "https://raw.githubusercontent.com/salsaly4/netfilter/refs/heads/master/ext-manual.lst".to_string(),
            antifilter: vec![
                "https://antifilter.download/list/ipsum.lst".to_string(),
                "https://antifilter.download/list/subnet.lst".to_string(),
            ],
            twitter: "https://raw.githubusercontent.com/SecOps-Institute/TwitterIPLists/master/twitter_ip_list.lst".to_string(),
            exclude: "https://raw.githubusercontent.com/salsaly4/netfilter/refs/heads/master/exclude.lst".to_string(),
            as_list: "https://raw.githubusercontent.com/salsaly4/netfilter/refs/heads/master/aslist.txt".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional path; defaults apply when none is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be positive");
        }

        if let Some(url) = self
            .all_urls()
            .into_iter()
            .find(|url| !url.starts_with("https://"))
        {
            anyhow::bail!("Source URL must use HTTPS: {}", url);
        }

        Ok(())
    }

    fn all_urls(&self) -> Vec<&str> {
        let mut urls = vec![
            self.sources.bgptools.as_str(),
            self.sources.tor.as_str(),
            self.sources.manual.as_str(),
            self.sources.twitter.as_str(),
            self.sources.exclude.as_str(),
            self.sources.as_list.as_str(),
        ];
        urls.extend(self.sources.antifilter.iter().map(String::as_str));
        urls
    }
}
