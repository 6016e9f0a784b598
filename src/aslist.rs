//! AS number list handling.
//!
//! The AS list selects which origin ASNs from the bgp.tools table dump are
//! collected. Format: one `ASN [# comment]` per line; `#`-prefixed lines
//! are comments.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

use crate::fetcher::Fetcher;

/// ASN to comment, ordered for stable iteration.
pub type AsList = BTreeMap<u32, String>;

/// Parse `ASN [# comment]` lines; invalid lines are warned and skipped.
pub fn parse_as_list<'a, I: IntoIterator<Item = &'a str>>(lines: I) -> AsList {
    let mut as_list = AsList::new();
    for (lineno, line) in lines.into_iter().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (asn_part, comment) = match line.split_once('#') {
            Some((asn, comment)) => (asn.trim(), comment.trim()),
            None => (line, ""),
        };
        match asn_part.parse::<u32>() {
            Ok(asn) => {
                as_list.insert(asn, comment.to_string());
            }
            Err(_) => warn!("Invalid ASN format on line {}: {}", lineno + 1, line),
        }
    }
    as_list
}

/// Load the AS list from a local file, or fetch it when none is given.
pub async fn load(path: Option<&Path>, fetcher: &Fetcher) -> Result<AsList> {
    let as_list = match path {
        Some(path) => {
            info!("Reading AS list from {:?}...", path);
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read AS list file {:?}", path))?;
            parse_as_list(content.lines())
        }
        None => {
            let lines = fetcher.fetch_as_list().await;
            parse_as_list(lines.iter().map(String::as_str))
        }
    };
    info!("Loaded {} AS entries", as_list.len());
    Ok(as_list)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_asns() {
        let as_list = parse_as_list(["13414", "35995"]);
        assert_eq!(as_list.len(), 2);
        assert!(as_list.contains_key(&13414));
        assert_eq!(as_list[&35995], "");
    }

    #[test]
    fn test_parse_with_comments() {
        let as_list = parse_as_list(["13414 # Twitter", "# full comment line", ""]);
        assert_eq!(as_list.len(), 1);
        assert_eq!(as_list[&13414], "Twitter");
    }

    #[test]
    fn test_parse_skips_invalid_lines() {
        let as_list = parse_as_list(["13414", "AS35995", "-7", "35995"]);
        assert_eq!(
            as_list.keys().copied().collect::<Vec<_>>(),
            vec![13414, 35995]
        );
    }

    #[test]
    fn test_parse_duplicate_keeps_last_comment() {
        let as_list = parse_as_list(["13414 # old", "13414 # new"]);
        assert_eq!(as_list.len(), 1);
        assert_eq!(as_list[&13414], "new");
    }
}
