//! Disk-backed fallback cache for fetched source lists.
//!
//! Each source caches its raw lines after a successful fetch and falls back
//! to the cached copy when the next fetch fails. The cache stores raw text
//! lines only, never parsed networks; every run reparses from scratch.
//! Cache I/O failures are warnings, not errors.

use std::fs;
use std::path::PathBuf;
use tracing::warn;

#[cfg(test)]
use mockall::automock;

/// Key-value store of raw source lines, one instance per run.
///
/// Abstracted as a trait so the fetchers can be tested without touching
/// the real filesystem.
#[cfg_attr(test, automock)]
pub trait ListCache: Send + Sync {
    /// Cached lines for a source, or `None` when absent or unreadable.
    fn get(&self, source: &str) -> Option<Vec<String>>;

    /// Replace the cached lines for a source. Best-effort.
    fn put(&self, source: &str, lines: &[String]);
}

/// Real cache: one `<source>.txt` per key under a directory.
pub struct DirCache {
    dir: PathBuf,
}

impl DirCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, source: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", source))
    }
}

impl ListCache for DirCache {
    fn get(&self, source: &str) -> Option<Vec<String>> {
        let path = self.path_for(source);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let lines: Vec<String> = content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect();
                (!lines.is_empty()).then_some(lines)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Could not read cache file {:?}: {}", path, e);
                None
            }
        }
    }

    fn put(&self, source: &str, lines: &[String]) {
        if lines.is_empty() {
            warn!("No data to cache for {}", source);
            return;
        }
        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!("Could not create cache directory {:?}: {}", self.dir, e);
            return;
        }
        let path = self.path_for(source);
        let mut content = String::new();
        for line in lines {
            let line = line.trim();
            if !line.is_empty() {
                content.push_str(line);
                content.push('\n');
            }
        }
        if let Err(e) = fs::write(&path, content) {
            warn!("Could not write cache file {:?}: {}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn lines(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_get_missing_source_is_none() {
        let dir = tempdir().unwrap();
        let cache = DirCache::new(dir.path());
        assert_eq!(cache.get("bgptools"), None);
    }

    #[test]
    fn test_put_then_get_round_trip() {
        let dir = tempdir().unwrap();
        let cache = DirCache::new(dir.path());
        let data = lines(&["10.0.0.0/24", "192.168.0.0/16"]);
        cache.put("tor", &data);
        assert_eq!(cache.get("tor"), Some(data));
    }

    #[test]
    fn test_put_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let cache = DirCache::new(dir.path());
        cache.put("manual", &lines(&["10.0.0.0/24", "", "  ", "172.16.0.0/12"]));
        assert_eq!(
            cache.get("manual"),
            Some(lines(&["10.0.0.0/24", "172.16.0.0/12"]))
        );
    }

    #[test]
    fn test_put_empty_writes_nothing() {
        let dir = tempdir().unwrap();
        let cache = DirCache::new(dir.path());
        cache.put("twitter", &[]);
        assert_eq!(cache.get("twitter"), None);
    }

    #[test]
    fn test_put_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let cache = DirCache::new(dir.path().join("nested").join("cache"));
        cache.put("exclude", &lines(&["10.0.0.0/8"]));
        assert_eq!(cache.get("exclude"), Some(lines(&["10.0.0.0/8"])));
    }

    #[test]
    fn test_sources_are_independent() {
        let dir = tempdir().unwrap();
        let cache = DirCache::new(dir.path());
        cache.put("a", &lines(&["10.0.0.0/8"]));
        cache.put("b", &lines(&["172.16.0.0/12"]));
        assert_eq!(cache.get("a"), Some(lines(&["10.0.0.0/8"])));
        assert_eq!(cache.get("b"), Some(lines(&["172.16.0.0/12"])));
    }
}
