//! HTTP fetchers for the upstream route sources.
//!
//! One method per source, all sharing a client with timeout and an
//! identifying User-Agent (bgp.tools refuses anonymous clients). Every
//! source caches its processed lines after a successful fetch and falls
//! back to the cache when the fetch fails; a source with neither
//! contributes nothing rather than aborting the run.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::aslist::AsList;
use crate::cache::ListCache;
use crate::config::{Config, Sources};
use crate::utils::format_count;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 2000;

/// Size cap for ordinary list downloads (10 MB).
const MAX_LIST_SIZE: usize = 10 * 1024 * 1024;

/// The bgp.tools table dump covers the full IPv4 table and runs far larger
/// than any curated list (256 MB).
const MAX_TABLE_SIZE: usize = 256 * 1024 * 1024;

/// HTTP client for fetching source lists.
pub struct Fetcher {
    client: Client,
    sources: Sources,
    cache: Arc<dyn ListCache>,
}

impl Fetcher {
    pub fn new(config: &Config, cache: Arc<dyn ListCache>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            sources: config.sources.clone(),
            cache,
        })
    }

    /// Routes originated by the ASNs in `as_list`, from the bgp.tools
    /// table dump.
    pub async fn fetch_bgptools(&self, as_list: &AsList) -> Vec<String> {
        info!("Fetching routes from bgp.tools...");
        match self
            .fetch_with_retry(&self.sources.bgptools, MAX_TABLE_SIZE)
            .await
        {
            Ok(content) => {
                let routes = parse_table_dump(&content, as_list);
                info!("Fetched {} routes from bgp.tools", format_count(routes.len()));
                self.cache.put("bgptools", &routes);
                routes
            }
            Err(e) => self.fallback("bgptools", &e),
        }
    }

    /// Tor node addresses as `/32` networks.
    pub async fn fetch_tor(&self) -> Vec<String> {
        info!("Fetching Tor node list...");
        match self.fetch_with_retry(&self.sources.tor, MAX_LIST_SIZE).await {
            Ok(content) => {
                let routes = parse_tor_list(&content);
                info!("Fetched {} Tor nodes", format_count(routes.len()));
                self.cache.put("tor", &routes);
                routes
            }
            Err(e) => self.fallback("tor", &e),
        }
    }

    /// Manually curated route list.
    pub async fn fetch_manual(&self) -> Vec<String> {
        self.fetch_plain_list("manual", &self.sources.manual)
            .await
    }

    /// Both antifilter.download lists, merged.
    pub async fn fetch_antifilter(&self) -> Vec<String> {
        let mut routes = Vec::new();
        for url in &self.sources.antifilter {
            info!("Fetching list from {}...", url);
            match self.fetch_with_retry(url, MAX_LIST_SIZE).await {
                Ok(content) => {
                    let lines = non_empty_lines(&content);
                    info!("Fetched {} routes from {}", format_count(lines.len()), url);
                    routes.extend(lines);
                }
                Err(e) => warn!("Failed to fetch {}: {}", url, e),
            }
        }
        if routes.is_empty() {
            return match self.cache.get("antifilter") {
                Some(cached) => {
                    info!(
                        "Using cached data for antifilter: {} entries",
                        format_count(cached.len())
                    );
                    cached
                }
                None => Vec::new(),
            };
        }
        self.cache.put("antifilter", &routes);
        routes
    }

    /// Twitter IP list.
    pub async fn fetch_twitter(&self) -> Vec<String> {
        self.fetch_plain_list("twitter", &self.sources.twitter)
            .await
    }

    /// Exclude list, when no local exclude file was given.
    pub async fn fetch_exclude(&self) -> Vec<String> {
        self.fetch_plain_list("exclude", &self.sources.exclude)
            .await
    }

    /// AS number list, when no local AS list file was given.
    pub async fn fetch_as_list(&self) -> Vec<String> {
        self.fetch_plain_list("aslist", &self.sources.as_list)
            .await
    }

    /// Fetch a one-entry-per-line list, cache it, fall back on failure.
    async fn fetch_plain_list(&self, name: &str, url: &str) -> Vec<String> {
        info!("Fetching {} list from {}...", name, url);
        match self.fetch_with_retry(url, MAX_LIST_SIZE).await {
            Ok(content) => {
                let lines = non_empty_lines(&content);
                info!("Fetched {} {} entries", format_count(lines.len()), name);
                self.cache.put(name, &lines);
                lines
            }
            Err(e) => self.fallback(name, &e),
        }
    }

    fn fallback(&self, name: &str, error: &anyhow::Error) -> Vec<String> {
        warn!("Failed to fetch {}: {:#}", name, error);
        match self.cache.get(name) {
            Some(cached) => {
                info!(
                    "Using cached data for {}: {} entries",
                    name,
                    format_count(cached.len())
                );
                cached
            }
            None => {
                warn!("No cached data for {}", name);
                Vec::new()
            }
        }
    }

    /// Fetch with retry, exponential backoff and a response size cap.
    async fn fetch_with_retry(&self, url: &str, max_size: usize) -> Result<String> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = RETRY_DELAY_MS * (1 << (attempt - 1));
                debug!("Retry {} after {}ms for {}", attempt, delay, url);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            match self.client.get(url).send().await {
                Ok(response) if response.status().is_success() => {
                    if let Some(length) = response.content_length() {
                        if length as usize > max_size {
                            anyhow::bail!(
                                "Response too large: {} bytes (max: {} bytes)",
                                length,
                                max_size
                            );
                        }
                    }
                    let body = response
                        .text()
                        .await
                        .context("Failed to read response body")?;
                    if body.len() > max_size {
                        anyhow::bail!(
                            "Downloaded content too large: {} bytes (max: {} bytes)",
                            body.len(),
                            max_size
                        );
                    }
                    return Ok(body);
                }
                Ok(response) => {
                    last_error = Some(anyhow::anyhow!("HTTP {}", response.status()));
                }
                Err(e) => {
                    last_error = Some(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("request failed: {}", url)))
    }
}

/// Parse the bgp.tools JSONL table dump, keeping IPv4 routes whose origin
/// ASN is in the AS list. Malformed lines are skipped.
fn parse_table_dump(content: &str, as_list: &AsList) -> Vec<String> {
    #[derive(Deserialize)]
    struct TableEntry {
        #[serde(rename = "ASN")]
        asn: u32,
        #[serde(rename = "CIDR")]
        cidr: String,
    }

    content
        .lines()
        .filter_map(|line| serde_json::from_str::<TableEntry>(line).ok())
        .filter(|entry| {
            as_list.contains_key(&entry.asn)
                && entry.cidr.contains('.')
                && !entry.cidr.contains(':')
        })
        .map(|entry| entry.cidr)
        .collect()
}

/// Parse the Tor node list: bare IPv4 addresses become `/32` networks,
/// everything else (headers, IPv6) is dropped.
fn parse_tor_list(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| line.trim().parse::<Ipv4Addr>().ok())
        .map(|addr| format!("{}/32", addr))
        .collect()
}

/// Trimmed, non-empty lines of a plain list.
fn non_empty_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
