//! Shared helpers: count formatting for logs and output-file hashing.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Format a count with K/M suffix for compact log output.
pub fn format_count(count: usize) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// SHA-256 of a file's contents as lowercase hex, `None` when the file is
/// missing or unreadable. Used to detect whether a rewrite changed the
/// output so an unchanged route list can skip the daemon reload.
pub fn file_hash(path: &Path) -> Option<String> {
    let bytes = fs::read(path).ok()?;
    Some(hex::encode(Sha256::digest(&bytes)))
}
