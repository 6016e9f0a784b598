//! The engine entry point: raw lines in, rendered prefix list out.
//!
//! Pure except for log output; all I/O lives in the collector.

use tracing::{info, warn};

use crate::aggregator::merge_siblings;
use crate::error::EngineError;
use crate::exclusion::subtract_all;
use crate::prefix::{self, ParseFailure};

fn warn_failures(kind: &str, failures: &[ParseFailure]) {
    for failure in failures {
        warn!("Skipping invalid {} entry '{}': {}", kind, failure.text, failure.error);
    }
}

/// Parse includes and excludes, subtract, optionally summarize, and render.
///
/// Unparsable lines are reported and skipped; an include set that is empty
/// after parsing is an error. Output is sorted by (base address, prefix
/// length) and deduplicated, so it is deterministic for a given input set.
pub fn compute<S: AsRef<str>>(
    includes: &[S],
    excludes: &[S],
    summarize: bool,
) -> Result<Vec<String>, EngineError> {
    let (networks, failures) = prefix::parse_networks(includes);
    warn_failures("network", &failures);
    if networks.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    let (exclude_networks, failures) = prefix::parse_networks(excludes);
    warn_failures("exclude", &failures);

    let cover: Vec<_> = subtract_all(&networks, &exclude_networks)
        .into_iter()
        .collect();

    let result = if summarize {
        let merged = merge_siblings(&cover);
        info!(
            "Summarization reduced networks from {} to {}",
            cover.len(),
            merged.len()
        );
        merged
    } else {
        cover
    };

    Ok(prefix::render(&result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_basic_exclusion() {
        let includes = ["10.0.0.0/24"];
        let excludes = ["10.0.0.0/26", "10.0.0.128/25"];
        let result = compute(&includes, &excludes, false).unwrap();
        assert_eq!(result, vec!["10.0.0.64/26"]);
    }

    #[test]
    fn test_compute_skips_bad_lines() {
        let includes = [
            "10.0.0.0/24",
            "garbage",
            "10.0.0.1/24",
            "# comment only",
            "",
        ];
        let result = compute(&includes, &[] as &[&str], false).unwrap();
        assert_eq!(result, vec!["10.0.0.0/24"]);
    }

    #[test]
    fn test_compute_empty_includes_is_error() {
        let includes = ["not-a-network", "# nothing"];
        let err = compute(&includes, &[] as &[&str], false).unwrap_err();
        assert_eq!(err, EngineError::EmptyInput);
    }

    #[test]
    fn test_compute_fully_excluded_is_empty_ok() {
        let includes = ["10.0.0.0/24"];
        let excludes = ["10.0.0.0/24"];
        let result = compute(&includes, &excludes, false).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_compute_summarize_merges_siblings() {
        let includes = ["10.0.0.0/25", "10.0.0.128/25"];
        let result = compute(&includes, &[] as &[&str], true).unwrap();
        assert_eq!(result, vec!["10.0.0.0/24"]);
    }

    #[test]
    fn test_compute_without_summarize_keeps_halves() {
        let includes = ["10.0.0.0/25", "10.0.0.128/25"];
        let result = compute(&includes, &[] as &[&str], false).unwrap();
        assert_eq!(result, vec!["10.0.0.0/25", "10.0.0.128/25"]);
    }

    #[test]
    fn test_compute_deterministic_across_input_order() {
        let a = ["10.0.0.0/24", "192.168.0.0/16", "172.16.0.0/12"];
        let b = ["172.16.0.0/12", "10.0.0.0/24", "192.168.0.0/16"];
        let excludes = ["192.168.1.0/24"];
        assert_eq!(
            compute(&a, &excludes, true).unwrap(),
            compute(&b, &excludes, true).unwrap()
        );
    }

    #[test]
    fn test_compute_dedups_duplicate_includes() {
        let includes = ["10.0.0.0/24", "10.0.0.0/24 # again"];
        let result = compute(&includes, &[] as &[&str], false).unwrap();
        assert_eq!(result, vec!["10.0.0.0/24"]);
    }
}
